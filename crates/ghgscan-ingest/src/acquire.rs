//! Text acquisition from uploaded documents.
//!
//! PDFs are read through their embedded text layer. Everything else is
//! treated as a scanned page: preprocessed for OCR and run through the
//! `tesseract` CLI. Acquisition never fails outward; a broken document
//! yields empty text and the caller decides what that means.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use ghgscan_core::{Error, OcrSettings, Result};
use image::imageops::FilterType;
use image::ImageFormat;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

/// An uploaded document. Owned by a single pipeline run.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub bytes: Vec<u8>,
    pub filename: String,
    /// Declared media type, if the caller knows it.
    pub media_type: Option<String>,
}

impl RawDocument {
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            filename: filename.into(),
            media_type: None,
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from_filename(&self.filename)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Acquisition route, chosen by filename alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Image,
}

impl DocumentKind {
    pub fn from_filename(filename: &str) -> Self {
        if filename.to_lowercase().ends_with(".pdf") {
            Self::Pdf
        } else {
            Self::Image
        }
    }
}

/// Check a declared media type against what the pipeline can read.
pub fn is_supported_media_type(media_type: &str) -> bool {
    let media_type = media_type.trim().to_lowercase();
    media_type == "application/pdf" || media_type.starts_with("image/")
}

/// Media type implied by a filename extension, for callers with no declared type.
pub fn media_type_from_filename(filename: &str) -> Option<&'static str> {
    let ext = Path::new(filename).extension()?.to_str()?.to_lowercase();
    let media_type = match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "tif" | "tiff" => "image/tiff",
        "bmp" => "image/bmp",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => return None,
    };
    Some(media_type)
}

/// Turns a raw document into plain text.
#[async_trait]
pub trait TextAcquirer: Send + Sync {
    /// Returns empty text on failure. Attempted exactly once.
    async fn acquire(&self, doc: &RawDocument) -> String;
}

/// PDF text layer plus tesseract OCR for images.
pub struct DocumentTextAcquirer {
    ocr: OcrSettings,
}

impl DocumentTextAcquirer {
    pub fn new(ocr: OcrSettings) -> Self {
        Self { ocr }
    }

    /// Fallible form of [`TextAcquirer::acquire`].
    pub async fn try_acquire(&self, doc: &RawDocument) -> Result<String> {
        if doc.is_empty() {
            return Err(Error::Acquisition(format!("{} is empty", doc.filename)));
        }

        match doc.kind() {
            DocumentKind::Pdf => extract_pdf_text(doc.bytes.clone()).await,
            DocumentKind::Image => self.ocr_image(doc.bytes.clone()).await,
        }
    }

    async fn ocr_image(&self, bytes: Vec<u8>) -> Result<String> {
        let width = self.ocr.target_width;
        let page = tokio::task::spawn_blocking(move || preprocess_image(&bytes, width))
            .await
            .map_err(|e| Error::Acquisition(format!("image preprocessing aborted: {}", e)))??;

        run_tesseract(page.path(), &self.ocr).await
    }
}

impl Default for DocumentTextAcquirer {
    fn default() -> Self {
        Self::new(OcrSettings::default())
    }
}

#[async_trait]
impl TextAcquirer for DocumentTextAcquirer {
    async fn acquire(&self, doc: &RawDocument) -> String {
        match self.try_acquire(doc).await {
            Ok(text) => {
                debug!("Acquired {} chars from {}", text.len(), doc.filename);
                text
            }
            Err(e) => {
                warn!("Text acquisition failed for {}: {}", doc.filename, e);
                String::new()
            }
        }
    }
}

/// Read the PDF text layer. A parser panic counts as a failed extraction.
pub async fn extract_pdf_text(bytes: Vec<u8>) -> Result<String> {
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| Error::Acquisition(format!("PDF parser aborted: {}", e)))?
        .map_err(|e| Error::Acquisition(format!("PDF text extraction failed: {}", e)))
}

/// Greyscale, resize to `target_width` keeping the aspect ratio, sharpen, and
/// write the result to a temporary PNG for the OCR engine.
pub fn preprocess_image(bytes: &[u8], target_width: u32) -> Result<tempfile::NamedTempFile> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| Error::Acquisition(format!("unreadable image: {}", e)))?;

    let (width, height) = (img.width().max(1), img.height());
    let target_height = ((height as u64 * target_width as u64) / width as u64).max(1) as u32;

    let processed = img
        .grayscale()
        .resize_exact(target_width, target_height, FilterType::Lanczos3)
        .unsharpen(1.0, 1);

    let file = tempfile::Builder::new()
        .prefix("ghgscan-ocr-")
        .suffix(".png")
        .tempfile()?;
    processed
        .save_with_format(file.path(), ImageFormat::Png)
        .map_err(|e| Error::Acquisition(format!("failed to write OCR input: {}", e)))?;

    Ok(file)
}

async fn run_tesseract(path: &Path, ocr: &OcrSettings) -> Result<String> {
    let mut command = tokio::process::Command::new(&ocr.tesseract_path);
    command
        .arg(path)
        .arg("stdout")
        .arg("-l")
        .arg(&ocr.language)
        .stdin(Stdio::null())
        .kill_on_drop(true);

    let output = tokio::time::timeout(ocr.timeout, command.output())
        .await
        .map_err(|_| Error::Acquisition(format!("tesseract timed out after {:?}", ocr.timeout)))?
        .map_err(|e| {
            Error::Acquisition(format!(
                "failed to run tesseract (path='{}'): {}",
                ocr.tesseract_path, e
            ))
        })?;

    if !output.status.success() {
        return Err(Error::Acquisition(format!(
            "tesseract exited with {}: {}",
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// SHA-256 hex digest of the original document bytes.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_kind() {
        assert_eq!(DocumentKind::from_filename("report.pdf"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_filename("REPORT.PDF"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_filename("scan.png"), DocumentKind::Image);
        assert_eq!(DocumentKind::from_filename("pdf"), DocumentKind::Image);
    }

    #[test]
    fn test_supported_media_types() {
        assert!(is_supported_media_type("application/pdf"));
        assert!(is_supported_media_type("image/jpeg"));
        assert!(is_supported_media_type("Image/PNG"));
        assert!(!is_supported_media_type("text/plain"));
        assert!(!is_supported_media_type("application/zip"));
    }

    #[test]
    fn test_media_type_from_filename() {
        assert_eq!(media_type_from_filename("Report.PDF"), Some("application/pdf"));
        assert_eq!(media_type_from_filename("scan.jpeg"), Some("image/jpeg"));
        assert_eq!(media_type_from_filename("notes.txt"), None);
        assert_eq!(media_type_from_filename("README"), None);
    }

    #[test]
    fn test_content_hash() {
        let hash = content_hash(b"hello");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824");
    }

    #[test]
    fn test_preprocess_resizes_to_target_width() {
        let img = image::DynamicImage::new_rgb8(300, 150);
        let mut encoded = std::io::Cursor::new(Vec::new());
        img.write_to(&mut encoded, ImageFormat::Png).unwrap();

        let file = preprocess_image(encoded.get_ref(), 1200).unwrap();
        let out = image::open(file.path()).unwrap();
        assert_eq!(out.width(), 1200);
        assert_eq!(out.height(), 600);
    }

    #[tokio::test]
    async fn test_empty_document_yields_empty_text() {
        let acquirer = DocumentTextAcquirer::default();
        let text = acquirer.acquire(&RawDocument::new(Vec::new(), "empty.pdf")).await;
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_garbage_pdf_yields_empty_text() {
        let acquirer = DocumentTextAcquirer::default();
        let doc = RawDocument::new(b"definitely not a pdf".to_vec(), "report.pdf");
        assert!(acquirer.try_acquire(&doc).await.is_err());
        assert!(acquirer.acquire(&doc).await.is_empty());
    }

    #[tokio::test]
    async fn test_garbage_image_yields_empty_text() {
        let acquirer = DocumentTextAcquirer::default();
        let doc = RawDocument::new(vec![0u8; 64], "scan.jpg").with_media_type("image/jpeg");
        assert!(acquirer.acquire(&doc).await.is_empty());
    }
}
