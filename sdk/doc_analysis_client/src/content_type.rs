//! Content-type detection for document payloads.
//!
//! When a caller submits raw bytes without naming a content type, the SDK
//! sniffs the leading bytes for the handful of formats the service accepts.

use doc_analysis_core::error::{DocError, DocResult};

/// JPEG start-of-image marker.
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

/// PNG 8-byte signature.
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// PDF header: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// TIFF little-endian header: II*\0
const TIFF_LE_MAGIC: &[u8] = &[0x49, 0x49, 0x2A, 0x00];

/// TIFF big-endian header: MM\0*
const TIFF_BE_MAGIC: &[u8] = &[0x4D, 0x4D, 0x00, 0x2A];

/// A content type the service accepts for binary document submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Jpeg,
    Png,
    Pdf,
    Tiff,
}

impl ContentType {
    /// Returns the MIME type string sent in the `Content-Type` header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Pdf => "application/pdf",
            Self::Tiff => "image/tiff",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the content type of a document from its leading bytes.
///
/// # Errors
///
/// Returns [`DocError::InvalidRequest`] if the data does not start with a
/// recognized JPEG, PNG, PDF, or TIFF signature.
pub fn detect_content_type(data: &[u8]) -> DocResult<ContentType> {
    if data.starts_with(JPEG_MAGIC) {
        return Ok(ContentType::Jpeg);
    }
    if data.starts_with(PNG_MAGIC) {
        return Ok(ContentType::Png);
    }
    if data.starts_with(PDF_MAGIC) {
        return Ok(ContentType::Pdf);
    }
    if data.starts_with(TIFF_LE_MAGIC) || data.starts_with(TIFF_BE_MAGIC) {
        return Ok(ContentType::Tiff);
    }

    Err(DocError::InvalidRequest(
        "content type could not be detected; supply it explicitly \
         (supported: image/jpeg, image/png, application/pdf, image/tiff)"
            .into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_jpeg() {
        let data = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
        assert_eq!(detect_content_type(&data).unwrap(), ContentType::Jpeg);
        assert_eq!(detect_content_type(&data).unwrap().as_str(), "image/jpeg");
    }

    #[test]
    fn detects_png() {
        let data = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];
        assert_eq!(detect_content_type(&data).unwrap(), ContentType::Png);
        assert_eq!(detect_content_type(&data).unwrap().as_str(), "image/png");
    }

    #[test]
    fn detects_pdf() {
        let data = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3";
        assert_eq!(detect_content_type(data).unwrap(), ContentType::Pdf);
        assert_eq!(
            detect_content_type(data).unwrap().as_str(),
            "application/pdf"
        );
    }

    #[test]
    fn detects_tiff_both_byte_orders() {
        let little_endian = [0x49, 0x49, 0x2A, 0x00, 0x08, 0x00];
        let big_endian = [0x4D, 0x4D, 0x00, 0x2A, 0x00, 0x08];
        assert_eq!(
            detect_content_type(&little_endian).unwrap(),
            ContentType::Tiff
        );
        assert_eq!(detect_content_type(&big_endian).unwrap(), ContentType::Tiff);
        assert_eq!(
            detect_content_type(&little_endian).unwrap().as_str(),
            "image/tiff"
        );
    }

    #[test]
    fn rejects_ole_compound_document() {
        // OLE2 header used by legacy .doc files.
        let data = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
        let err = detect_content_type(&data).expect_err("should reject .doc");
        assert!(
            matches!(err, DocError::InvalidRequest(_)),
            "got: {err:?}"
        );
        assert!(err.to_string().contains("content type"), "error: {err}");
    }

    #[test]
    fn rejects_truncated_input() {
        assert!(detect_content_type(&[0xFF]).is_err());
        assert!(detect_content_type(b"").is_err());
    }

    #[test]
    fn display_matches_mime_string() {
        assert_eq!(ContentType::Pdf.to_string(), "application/pdf");
        assert_eq!(ContentType::Jpeg.to_string(), "image/jpeg");
    }
}
