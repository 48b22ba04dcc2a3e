//! Per-field validation outcome and the validator plugin seam.

use std::fmt;

use crate::field::FieldKind;
use crate::value::FieldType;

/// Outcome of a field's last validation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    #[default]
    Info,
    /// Only produced by user supplied validators.
    Warn,
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Info => "INFO",
            Status::Warn => "WARN",
            Status::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Status, code and message attached to one field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationInfo {
    pub status: Status,
    pub code: i32,
    pub message: String,
}

impl ValidationInfo {
    pub fn info() -> Self {
        Self::default()
    }

    pub fn warn(code: i32, message: impl Into<String>) -> Self {
        Self {
            status: Status::Warn,
            code,
            message: message.into(),
        }
    }

    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            code,
            message: message.into(),
        }
    }

    /// Back to INFO / 0 / "".
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }

    pub fn is_warn(&self) -> bool {
        self.status == Status::Warn
    }

    pub fn is_info(&self) -> bool {
        self.status == Status::Info
    }
}

impl fmt::Display for ValidationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{} [{}]", self.status, self.code)
        } else {
            write!(f, "{} [{}] {}", self.status, self.code, self.message)
        }
    }
}

/// What a [`Validator`] gets to see of the field it checks.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    pub name: &'a str,
    pub kind: FieldKind,
    pub field_type: FieldType,
    /// Padded wire value.
    pub value: &'a str,
    /// Value with the padding of the last encode removed.
    pub raw: &'a str,
}

/// A custom field-level check. When attached, it fully decides the
/// outcome once the length and mandatory checks have passed.
pub trait Validator: fmt::Debug + Send + Sync {
    fn validate(&self, field: &FieldContext<'_>) -> ValidationInfo;
}
