//! Typed field values extracted from analyzed documents.
//!
//! The service returns each document field as a discriminated union: a
//! `type` tag plus a `value*` property matching that tag. [`DocumentField`]
//! models this as an enum with payload and exposes checked `as_*` accessors
//! that either return the value unchanged or report a descriptive
//! type-mismatch error.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// The declared kind of a [`DocumentField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Date,
    Time,
    PhoneNumber,
    Number,
    Integer,
    SelectionMark,
    CountryRegion,
    List,
    Map,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::String => "string",
            Self::Date => "date",
            Self::Time => "time",
            Self::PhoneNumber => "phoneNumber",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::SelectionMark => "selectionMark",
            Self::CountryRegion => "countryRegion",
            Self::List => "array",
            Self::Map => "object",
        };
        f.write_str(s)
    }
}

/// Error returned when a field is read as a kind it does not hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldCastError {
    /// The field holds a different kind than the one requested.
    #[error("field of type {actual} cannot be read as {requested}")]
    TypeMismatch {
        requested: FieldKind,
        actual: FieldKind,
    },

    /// The field has the requested kind but the service sent no value
    /// (for example when confidence was too low to commit to one).
    #[error("field of type {kind} has no value")]
    MissingValue { kind: FieldKind },
}

/// The state of a selection mark (checkbox, radio button).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionMarkState {
    Selected,
    Unselected,
}

/// The value union of a document field, discriminated by the wire `type` tag.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum FieldValue {
    #[serde(rename = "string")]
    String {
        #[serde(rename = "valueString")]
        value: Option<String>,
    },
    #[serde(rename = "date")]
    Date {
        #[serde(rename = "valueDate")]
        value: Option<NaiveDate>,
    },
    #[serde(rename = "time")]
    Time {
        #[serde(rename = "valueTime")]
        value: Option<NaiveTime>,
    },
    #[serde(rename = "phoneNumber")]
    PhoneNumber {
        #[serde(rename = "valuePhoneNumber")]
        value: Option<String>,
    },
    #[serde(rename = "number")]
    Number {
        #[serde(rename = "valueNumber")]
        value: Option<f64>,
    },
    #[serde(rename = "integer")]
    Integer {
        #[serde(rename = "valueInteger")]
        value: Option<i64>,
    },
    #[serde(rename = "selectionMark")]
    SelectionMark {
        #[serde(rename = "valueSelectionMark")]
        value: Option<SelectionMarkState>,
    },
    #[serde(rename = "countryRegion")]
    CountryRegion {
        #[serde(rename = "valueCountryRegion")]
        value: Option<String>,
    },
    #[serde(rename = "array")]
    List {
        #[serde(rename = "valueArray", default)]
        value: Vec<DocumentField>,
    },
    #[serde(rename = "object")]
    Map {
        #[serde(rename = "valueObject", default)]
        value: HashMap<String, DocumentField>,
    },
}

/// A single extracted field: the typed value union plus the verbatim text
/// and confidence reported by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentField {
    #[serde(flatten)]
    value: FieldValue,

    /// Verbatim text the value was extracted from.
    pub content: Option<String>,

    /// Confidence score (0.0 to 1.0).
    pub confidence: Option<f64>,
}

impl DocumentField {
    /// The declared kind of this field.
    pub fn kind(&self) -> FieldKind {
        match &self.value {
            FieldValue::String { .. } => FieldKind::String,
            FieldValue::Date { .. } => FieldKind::Date,
            FieldValue::Time { .. } => FieldKind::Time,
            FieldValue::PhoneNumber { .. } => FieldKind::PhoneNumber,
            FieldValue::Number { .. } => FieldKind::Number,
            FieldValue::Integer { .. } => FieldKind::Integer,
            FieldValue::SelectionMark { .. } => FieldKind::SelectionMark,
            FieldValue::CountryRegion { .. } => FieldKind::CountryRegion,
            FieldValue::List { .. } => FieldKind::List,
            FieldValue::Map { .. } => FieldKind::Map,
        }
    }

    /// Borrow the raw value union.
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    fn mismatch(&self, requested: FieldKind) -> FieldCastError {
        FieldCastError::TypeMismatch {
            requested,
            actual: self.kind(),
        }
    }

    /// Read the field as a string.
    pub fn as_string(&self) -> Result<&str, FieldCastError> {
        match &self.value {
            FieldValue::String { value } => value.as_deref().ok_or(FieldCastError::MissingValue {
                kind: FieldKind::String,
            }),
            _ => Err(self.mismatch(FieldKind::String)),
        }
    }

    /// Read the field as a calendar date.
    pub fn as_date(&self) -> Result<NaiveDate, FieldCastError> {
        match &self.value {
            FieldValue::Date { value } => value.ok_or(FieldCastError::MissingValue {
                kind: FieldKind::Date,
            }),
            _ => Err(self.mismatch(FieldKind::Date)),
        }
    }

    /// Read the field as a time of day.
    pub fn as_time(&self) -> Result<NaiveTime, FieldCastError> {
        match &self.value {
            FieldValue::Time { value } => value.ok_or(FieldCastError::MissingValue {
                kind: FieldKind::Time,
            }),
            _ => Err(self.mismatch(FieldKind::Time)),
        }
    }

    /// Read the field as a phone number string.
    pub fn as_phone_number(&self) -> Result<&str, FieldCastError> {
        match &self.value {
            FieldValue::PhoneNumber { value } => {
                value.as_deref().ok_or(FieldCastError::MissingValue {
                    kind: FieldKind::PhoneNumber,
                })
            }
            _ => Err(self.mismatch(FieldKind::PhoneNumber)),
        }
    }

    /// Read the field as a floating-point number.
    pub fn as_f64(&self) -> Result<f64, FieldCastError> {
        match &self.value {
            FieldValue::Number { value } => value.ok_or(FieldCastError::MissingValue {
                kind: FieldKind::Number,
            }),
            _ => Err(self.mismatch(FieldKind::Number)),
        }
    }

    /// Read the field as a signed integer.
    pub fn as_i64(&self) -> Result<i64, FieldCastError> {
        match &self.value {
            FieldValue::Integer { value } => value.ok_or(FieldCastError::MissingValue {
                kind: FieldKind::Integer,
            }),
            _ => Err(self.mismatch(FieldKind::Integer)),
        }
    }

    /// Read the field as a selection-mark state.
    pub fn as_selection_mark(&self) -> Result<SelectionMarkState, FieldCastError> {
        match &self.value {
            FieldValue::SelectionMark { value } => value.ok_or(FieldCastError::MissingValue {
                kind: FieldKind::SelectionMark,
            }),
            _ => Err(self.mismatch(FieldKind::SelectionMark)),
        }
    }

    /// Read the field as a country/region code.
    pub fn as_country_region(&self) -> Result<&str, FieldCastError> {
        match &self.value {
            FieldValue::CountryRegion { value } => {
                value.as_deref().ok_or(FieldCastError::MissingValue {
                    kind: FieldKind::CountryRegion,
                })
            }
            _ => Err(self.mismatch(FieldKind::CountryRegion)),
        }
    }

    /// Read the field as a list of nested fields.
    pub fn as_list(&self) -> Result<&[DocumentField], FieldCastError> {
        match &self.value {
            FieldValue::List { value } => Ok(value),
            _ => Err(self.mismatch(FieldKind::List)),
        }
    }

    /// Read the field as a map of named nested fields.
    pub fn as_map(&self) -> Result<&HashMap<String, DocumentField>, FieldCastError> {
        match &self.value {
            FieldValue::Map { value } => Ok(value),
            _ => Err(self.mismatch(FieldKind::Map)),
        }
    }
}
