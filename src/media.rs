//! Upload handling for diagram files.
//!
//! Accepts any `image/*` type or `application/pdf` and turns the payload
//! into the `data:` URL stored in the configuration.

use std::path::Path;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;

use crate::error::{SketchError, SketchResult};

pub const PDF_MIME: &str = "application/pdf";
const OCTET_STREAM_MIME: &str = "application/octet-stream";
const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, detecting its MIME type from the extension or content.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let mime_type = detect_mime(path, &bytes);
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(file_name, mime_type, bytes))
    }

    pub fn is_supported(&self) -> bool {
        is_supported_mime(&self.mime_type)
    }

    /// Validates the upload and encodes it as a `data:` URL.
    pub fn into_data_url(self) -> SketchResult<String> {
        if !self.is_supported() {
            return Err(SketchError::UnsupportedMediaType(self.mime_type));
        }
        if self.bytes.is_empty() {
            return Err(SketchError::validation(format!(
                "{} is empty",
                self.file_name
            )));
        }
        Ok(format!(
            "data:{};base64,{}",
            self.mime_type.trim().to_ascii_lowercase(),
            STANDARD.encode(&self.bytes)
        ))
    }
}

pub fn is_supported_mime(mime: &str) -> bool {
    let mime = mime.trim().to_ascii_lowercase();
    mime.starts_with("image/") || mime == PDF_MIME
}

pub fn detect_mime(path: &Path, bytes: &[u8]) -> String {
    let by_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    if by_extension.as_deref() == Some("pdf") {
        return PDF_MIME.to_string();
    }
    if let Ok(format) = ImageFormat::from_path(path) {
        return format.to_mime_type().to_string();
    }
    if bytes.starts_with(PDF_MAGIC) {
        return PDF_MIME.to_string();
    }
    match image::guess_format(bytes) {
        Ok(format) => format.to_mime_type().to_string(),
        Err(_) => OCTET_STREAM_MIME.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    #[test]
    fn accepts_images_and_pdf_case_insensitively() {
        assert!(is_supported_mime("image/png"));
        assert!(is_supported_mime("IMAGE/SVG+XML"));
        assert!(is_supported_mime("application/pdf"));
        assert!(!is_supported_mime("text/plain"));
        assert!(!is_supported_mime("application/pdfx"));
    }

    #[test]
    fn unsupported_upload_is_rejected() {
        let file = UploadedFile::new("notes.txt", "text/plain", b"hello".to_vec());
        assert!(matches!(
            file.into_data_url(),
            Err(SketchError::UnsupportedMediaType(mime)) if mime == "text/plain"
        ));
    }

    #[test]
    fn empty_upload_is_rejected() {
        let file = UploadedFile::new("plan.png", "image/png", Vec::new());
        assert!(matches!(file.into_data_url(), Err(SketchError::Validation(_))));
    }

    #[test]
    fn encodes_data_url() {
        let file = UploadedFile::new("plan.png", "image/png", b"abc".to_vec());
        assert_eq!(file.into_data_url().unwrap(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn detects_by_extension_then_content() {
        assert_eq!(detect_mime(Path::new("plan.PDF"), b""), PDF_MIME);
        assert_eq!(detect_mime(Path::new("plan.jpg"), b""), "image/jpeg");
        assert_eq!(detect_mime(Path::new("upload"), b"%PDF-1.7"), PDF_MIME);
        assert_eq!(detect_mime(Path::new("upload"), PNG_SIGNATURE), "image/png");
        assert_eq!(detect_mime(Path::new("upload.bin"), b"zzzz"), OCTET_STREAM_MIME);
    }

    #[test]
    fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("floor.png");
        std::fs::write(&path, PNG_SIGNATURE).unwrap();

        let file = UploadedFile::from_path(&path).unwrap();
        assert_eq!(file.file_name, "floor.png");
        assert_eq!(file.mime_type, "image/png");
        assert!(file.is_supported());
    }
}
