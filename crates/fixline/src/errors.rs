//! Error types for field encoding, record assembly and format plugins.
//!
//! Two families are exposed to callers: [`FieldError`] for single-field
//! problems and [`RecordError`] for whole-record problems. Each carries a
//! stable numeric code through [`FieldErrorCode`] / [`RecordErrorCode`] so
//! callers can branch without matching on messages.

use std::fmt;

use thiserror::Error;

use crate::validation::Status;
use crate::value::FieldType;

/// Errors produced by a format plugin, before a field identity is attached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The decimal pattern could not be understood.
    #[error("invalid decimal pattern '{0}'")]
    InvalidDecimalPattern(String),
    /// The date pattern contains an unknown specifier.
    #[error("invalid date pattern '{0}'")]
    InvalidDatePattern(String),
    /// Text does not match the decimal pattern.
    #[error("'{value}' is not a valid number")]
    Number { value: String },
    /// Text does not match the date pattern.
    #[error("'{value}' does not match date pattern '{pattern}'")]
    Date { value: String, pattern: String },
    /// Text is neither the true nor the false literal.
    #[error("'{value}' is neither '{true_value}' nor '{false_value}'")]
    Boolean {
        value: String,
        true_value: String,
        false_value: String,
    },
    /// A value cannot be represented (NaN, infinity, out of range).
    #[error("value {0} cannot be represented")]
    Unrepresentable(String),
    /// A user supplied format refused the value.
    #[error("{0}")]
    Custom(String),
}

/// Stable codes for [`FieldError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldErrorCode {
    NumericTooLong,
    DecimalOnAlphanumeric,
    FormatOnNumeric,
    ConflictingFormats,
    RemoveSeparatorWithoutDecimal,
    InvalidPad,
    DuplicateProperty,
    TypeMismatch,
    Malformed,
    Format,
    Invalid,
}

impl FieldErrorCode {
    pub fn as_u16(self) -> u16 {
        match self {
            FieldErrorCode::NumericTooLong => 101,
            FieldErrorCode::DecimalOnAlphanumeric => 102,
            FieldErrorCode::FormatOnNumeric => 103,
            FieldErrorCode::ConflictingFormats => 104,
            FieldErrorCode::RemoveSeparatorWithoutDecimal => 105,
            FieldErrorCode::InvalidPad => 106,
            FieldErrorCode::DuplicateProperty => 107,
            FieldErrorCode::TypeMismatch => 110,
            FieldErrorCode::Malformed => 111,
            FieldErrorCode::Format => 112,
            FieldErrorCode::Invalid => 113,
        }
    }
}

impl fmt::Display for FieldErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.as_u16())
    }
}

/// Errors raised by a single [`crate::compiled::Field`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// Numeric fields hold at most 19 digits.
    #[error("field '{field}': numeric length {length} exceeds 19")]
    NumericTooLong { field: String, length: usize },
    /// A decimal format is attached to an alphanumeric field.
    #[error("field '{field}': decimal format requires a numeric field")]
    DecimalOnAlphanumeric { field: String },
    /// A date, boolean or custom format is attached to a numeric field.
    #[error("field '{field}': date, boolean and custom formats require an alphanumeric field")]
    FormatOnNumeric { field: String },
    /// More than one of date, boolean and custom formats is attached.
    #[error("field '{field}': date, boolean and custom formats are mutually exclusive")]
    ConflictingFormats { field: String },
    /// Decimal separator removal without a numeric decimal format.
    #[error("field '{field}': decimal separator removal requires a numeric field with a decimal format")]
    RemoveSeparatorWithoutDecimal { field: String },
    /// Pad must be exactly one character.
    #[error("field '{field}': pad '{pad}' must be exactly one character")]
    InvalidPad { field: String, pad: String },
    /// The same property kind is declared twice on one field.
    #[error("field '{field}': property {property} declared more than once")]
    DuplicateProperty { field: String, property: String },
    /// A typed accessor does not match the field classification.
    #[error("field '{field}': expected {expected} access, field is {actual} (value: '{value}')")]
    TypeMismatch {
        field: String,
        expected: FieldType,
        actual: FieldType,
        value: String,
    },
    /// The field text cannot be converted to the requested type.
    #[error("field '{field}': {source} (value: '{value}')")]
    Malformed {
        field: String,
        value: String,
        source: FormatError,
    },
    /// A custom format refused the value.
    #[error("field '{field}': custom format failed: {source} (value: '{value}')")]
    Format {
        field: String,
        value: String,
        source: FormatError,
    },
    /// The field is in ERROR status and cannot be read or rendered.
    #[error("field '{field}' is {status} [{code}]: {message} (value: '{value}')")]
    Invalid {
        field: String,
        value: String,
        status: Status,
        code: i32,
        message: String,
    },
}

impl FieldError {
    pub fn code(&self) -> FieldErrorCode {
        match self {
            FieldError::NumericTooLong { .. } => FieldErrorCode::NumericTooLong,
            FieldError::DecimalOnAlphanumeric { .. } => FieldErrorCode::DecimalOnAlphanumeric,
            FieldError::FormatOnNumeric { .. } => FieldErrorCode::FormatOnNumeric,
            FieldError::ConflictingFormats { .. } => FieldErrorCode::ConflictingFormats,
            FieldError::RemoveSeparatorWithoutDecimal { .. } => {
                FieldErrorCode::RemoveSeparatorWithoutDecimal
            }
            FieldError::InvalidPad { .. } => FieldErrorCode::InvalidPad,
            FieldError::DuplicateProperty { .. } => FieldErrorCode::DuplicateProperty,
            FieldError::TypeMismatch { .. } => FieldErrorCode::TypeMismatch,
            FieldError::Malformed { .. } => FieldErrorCode::Malformed,
            FieldError::Format { .. } => FieldErrorCode::Format,
            FieldError::Invalid { .. } => FieldErrorCode::Invalid,
        }
    }

    /// Name of the field the error belongs to.
    pub fn field(&self) -> &str {
        match self {
            FieldError::NumericTooLong { field, .. }
            | FieldError::DecimalOnAlphanumeric { field }
            | FieldError::FormatOnNumeric { field }
            | FieldError::ConflictingFormats { field }
            | FieldError::RemoveSeparatorWithoutDecimal { field }
            | FieldError::InvalidPad { field, .. }
            | FieldError::DuplicateProperty { field, .. }
            | FieldError::TypeMismatch { field, .. }
            | FieldError::Malformed { field, .. }
            | FieldError::Format { field, .. }
            | FieldError::Invalid { field, .. } => field,
        }
    }
}

/// Stable codes for [`RecordError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordErrorCode {
    LineTooLong,
    ReservedName,
    DuplicateName,
    RoundTrip,
    IllegalRecordProperty,
    UnknownField,
    InvalidFields,
    LengthMismatch,
    FieldsExceedLength,
    ColumnCount,
    MalformedLine,
    UnknownOccurrence,
    InvalidOptions,
    Field,
}

impl RecordErrorCode {
    pub fn as_u16(self) -> u16 {
        match self {
            RecordErrorCode::LineTooLong => 201,
            RecordErrorCode::ReservedName => 202,
            RecordErrorCode::DuplicateName => 203,
            RecordErrorCode::RoundTrip => 204,
            RecordErrorCode::IllegalRecordProperty => 205,
            RecordErrorCode::UnknownField => 206,
            RecordErrorCode::InvalidFields => 207,
            RecordErrorCode::LengthMismatch => 208,
            RecordErrorCode::FieldsExceedLength => 209,
            RecordErrorCode::ColumnCount => 210,
            RecordErrorCode::MalformedLine => 211,
            RecordErrorCode::UnknownOccurrence => 212,
            RecordErrorCode::InvalidOptions => 213,
            RecordErrorCode::Field => 220,
        }
    }
}

impl fmt::Display for RecordErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.as_u16())
    }
}

/// Errors raised by [`crate::record::Record`] and [`crate::csv::CsvRecord`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// Input line is longer than the declared record length.
    #[error("record '{record}': line length {actual} exceeds declared length {expected}")]
    LineTooLong {
        record: String,
        expected: usize,
        actual: usize,
    },
    /// A schema field uses the name reserved for the filler.
    #[error("record '{record}': field name '{name}' is reserved")]
    ReservedName { record: String, name: String },
    /// Two schema fields share a name.
    #[error("record '{record}': duplicate field name '{name}'")]
    DuplicateName { record: String, name: String },
    /// Re-rendering a parsed line did not reproduce it.
    #[error("record '{record}': round-trip mismatch, parsed '{expected}' but rendered '{actual}'")]
    RoundTrip {
        record: String,
        expected: String,
        actual: String,
    },
    /// Only pad and validator properties may be declared at record level.
    #[error("record '{record}': property {property} is not allowed at record level")]
    IllegalRecordProperty { record: String, property: String },
    /// No field with this name exists.
    #[error("record '{record}': unknown field '{name}'")]
    UnknownField { record: String, name: String },
    /// One or more fields are in ERROR status.
    #[error("record '{record}' has invalid fields: {details}")]
    InvalidFields { record: String, details: String },
    /// The rendered line does not have the declared length.
    #[error("record '{record}': rendered length {actual} differs from declared length {expected}")]
    LengthMismatch {
        record: String,
        expected: usize,
        actual: usize,
    },
    /// Field lengths add up to more than the declared record length.
    #[error("record '{record}': fields need {actual} characters, declared length is {expected}")]
    FieldsExceedLength {
        record: String,
        expected: usize,
        actual: usize,
    },
    /// A CSV line has more columns than the schema.
    #[error("record '{record}': line has {actual} columns, schema has {expected}")]
    ColumnCount {
        record: String,
        expected: usize,
        actual: usize,
    },
    /// A CSV line could not be read or written as a single row.
    #[error("record '{record}': malformed delimited line: {message}")]
    MalformedLine { record: String, message: String },
    /// A field occurrence index is out of range, or repetition is not supported.
    #[error("record '{record}': field '{name}' has no occurrence {occurrence}")]
    UnknownOccurrence {
        record: String,
        name: String,
        occurrence: usize,
    },
    /// Separator and enclosing cannot delimit a line together.
    #[error("record '{record}': invalid csv options: {reason}")]
    InvalidOptions { record: String, reason: String },
    /// A single field failed.
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl RecordError {
    pub fn code(&self) -> RecordErrorCode {
        match self {
            RecordError::LineTooLong { .. } => RecordErrorCode::LineTooLong,
            RecordError::ReservedName { .. } => RecordErrorCode::ReservedName,
            RecordError::DuplicateName { .. } => RecordErrorCode::DuplicateName,
            RecordError::RoundTrip { .. } => RecordErrorCode::RoundTrip,
            RecordError::IllegalRecordProperty { .. } => RecordErrorCode::IllegalRecordProperty,
            RecordError::UnknownField { .. } => RecordErrorCode::UnknownField,
            RecordError::InvalidFields { .. } => RecordErrorCode::InvalidFields,
            RecordError::LengthMismatch { .. } => RecordErrorCode::LengthMismatch,
            RecordError::FieldsExceedLength { .. } => RecordErrorCode::FieldsExceedLength,
            RecordError::ColumnCount { .. } => RecordErrorCode::ColumnCount,
            RecordError::MalformedLine { .. } => RecordErrorCode::MalformedLine,
            RecordError::UnknownOccurrence { .. } => RecordErrorCode::UnknownOccurrence,
            RecordError::InvalidOptions { .. } => RecordErrorCode::InvalidOptions,
            RecordError::Field(_) => RecordErrorCode::Field,
        }
    }

    /// The wrapped field error, if this is a single-field failure.
    pub fn field_error(&self) -> Option<&FieldError> {
        match self {
            RecordError::Field(e) => Some(e),
            _ => None,
        }
    }
}
