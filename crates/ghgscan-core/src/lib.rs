//! ghgscan core: error taxonomy, configuration and data directory management.

pub mod config;
pub mod error;

pub use config::{DataPaths, GhgScanConfig, OcrSettings};
pub use error::{Error, Result};
