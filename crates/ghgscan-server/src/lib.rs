//! ghgscan server: the HTTP API and the local `analyze` command.

pub mod cli;
pub mod routes;
pub mod state;

pub use state::AppState;
