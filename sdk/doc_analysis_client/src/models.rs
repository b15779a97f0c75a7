//! Typed result models returned by the document analysis service.
//!
//! These are plain immutable value records populated by response
//! deserialization; they carry no behavior beyond convenience accessors.

use crate::fields::DocumentField;
use serde::Deserialize;
use std::collections::HashMap;

/// The status of an asynchronous analyze operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationStatus {
    /// The operation has not started.
    NotStarted,
    /// The operation is in progress.
    Running,
    /// The operation completed successfully.
    Succeeded,
    /// The operation failed.
    Failed,
}

impl OperationStatus {
    /// Returns `true` if the status is terminal (succeeded or failed).
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotStarted => "notStarted",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Structured error detail reported by the service for a failed operation.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    /// The error code (e.g. `InvalidContent`, `ModelNotFound`).
    pub code: String,
    /// Human-readable error description.
    pub message: String,
    /// Nested error with a more specific code, when present.
    pub innererror: Option<InnerError>,
}

/// Nested error detail.
#[derive(Debug, Clone, Deserialize)]
pub struct InnerError {
    /// The inner error code (often a numeric string such as `1002`).
    pub code: Option<String>,
    /// Inner error description.
    pub message: Option<String>,
}

/// The body returned when polling an analyze operation.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeOperationResult {
    /// Current status of the operation.
    pub status: OperationStatus,

    /// Error details, present when status is `Failed`.
    pub error: Option<ErrorDetail>,

    /// The analysis result, present when status is `Succeeded`.
    #[serde(rename = "analyzeResult")]
    pub analyze_result: Option<AnalyzeResult>,
}

/// The full result of a document analysis.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    /// API version used for analysis.
    pub api_version: String,

    /// Model ID used for analysis.
    pub model_id: String,

    /// Full text content extracted from the document.
    pub content: Option<String>,

    /// Pages in the document.
    pub pages: Option<Vec<DocumentPage>>,

    /// Tables found in the document.
    pub tables: Option<Vec<DocumentTable>>,

    /// Text styles (e.g. handwriting) detected in the document.
    pub styles: Option<Vec<DocumentStyle>>,

    /// Structured documents extracted, each with a docType and typed fields.
    pub documents: Option<Vec<AnalyzedDocument>>,
}

/// A contiguous region of the full `content` string.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DocumentSpan {
    /// 0-based offset into the content string.
    pub offset: usize,
    /// Length of the span.
    pub length: usize,
}

/// A page in the analyzed document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPage {
    /// 1-based page number.
    pub page_number: u32,

    /// Rotation angle in degrees.
    pub angle: Option<f64>,

    /// Page width in the unit specified by `unit`.
    pub width: Option<f64>,

    /// Page height in the unit specified by `unit`.
    pub height: Option<f64>,

    /// Unit of measurement (e.g., "inch", "pixel").
    pub unit: Option<String>,

    /// Words detected on the page.
    pub words: Option<Vec<DocumentWord>>,

    /// Lines detected on the page.
    pub lines: Option<Vec<DocumentLine>>,

    /// Selection marks detected on the page.
    pub selection_marks: Option<Vec<DocumentSelectionMark>>,
}

/// A word detected on a page.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentWord {
    /// The word text.
    pub content: String,
    /// Bounding polygon as alternating x/y coordinates.
    pub polygon: Option<Vec<f64>>,
    /// Location in the full content string.
    pub span: Option<DocumentSpan>,
    /// Confidence score (0.0 to 1.0).
    pub confidence: f64,
}

/// A line of text detected on a page.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentLine {
    /// The line text.
    pub content: String,
    /// Bounding polygon as alternating x/y coordinates.
    pub polygon: Option<Vec<f64>>,
}

/// A selection mark (checkbox, radio button) detected on a page.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentSelectionMark {
    /// "selected" or "unselected".
    pub state: String,
    /// Confidence score (0.0 to 1.0).
    pub confidence: f64,
}

/// A table detected in a document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTable {
    /// Number of rows.
    pub row_count: u32,
    /// Number of columns.
    pub column_count: u32,
    /// Table cells.
    pub cells: Vec<DocumentTableCell>,
}

/// A cell in a document table.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTableCell {
    /// 0-based row index.
    pub row_index: u32,
    /// 0-based column index.
    pub column_index: u32,
    /// Cell text content.
    pub content: String,
    /// Rows spanned, when greater than one.
    pub row_span: Option<u32>,
    /// Columns spanned, when greater than one.
    pub column_span: Option<u32>,
}

/// An observed text style.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStyle {
    /// Whether the spanned text is handwritten.
    pub is_handwritten: Option<bool>,
    /// Content spans the style applies to.
    pub spans: Option<Vec<DocumentSpan>>,
    /// Confidence score (0.0 to 1.0).
    pub confidence: f64,
}

/// A structured document extracted by a prebuilt or custom model.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedDocument {
    /// Document type (e.g., "receipt.retailMeal", "invoice").
    pub doc_type: String,

    /// Named, typed fields extracted from the document.
    #[serde(default)]
    pub fields: HashMap<String, DocumentField>,

    /// Confidence score (0.0 to 1.0).
    pub confidence: Option<f64>,
}
