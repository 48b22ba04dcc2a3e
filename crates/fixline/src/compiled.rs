//! Runtime field codec built from a [`FieldSpec`].
//!
//! A [`Field`] owns one formatted (padded) value. Every write goes through
//! [`Field::encode`], which strips padding-looking characters, re-pads to
//! the field length, remembers how many pad characters it added and
//! re-validates. Reads undo exactly that padding and convert through the
//! attached format plugin.

use std::sync::Arc;

use chrono::NaiveDateTime;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::{FieldError, FieldErrorCode, FormatError};
use crate::field::{FieldKind, FieldSpec, Mandatory, Way};
use crate::format::{BooleanFormat, CustomFormat, DateFormat, DecimalFormat};
use crate::pad::{self, PadDirection};
use crate::property::{Property, PropertyKind};
use crate::validation::{FieldContext, Status, ValidationInfo, Validator};
use crate::value::{FieldType, Value};

/// Numeric fields hold at most this many characters.
pub const MAX_NUMERIC_LENGTH: usize = 19;

/// Numeric fields this long or longer are long/double, shorter ones integer/float.
const WIDE_NUMERIC_LENGTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Length {
    Fixed(usize),
    /// Fixed by the first value with non-empty content.
    Inferred(Option<usize>),
    /// No length at all; values are stored verbatim.
    Free,
}

#[derive(Debug, Clone)]
enum Format {
    Plain,
    Decimal {
        format: DecimalFormat,
        remove_separator: bool,
    },
    Date(DateFormat),
    Boolean(BooleanFormat),
    Custom(Arc<dyn CustomFormat>),
}

/// One field of a record: schema, current value and validation state.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    kind: FieldKind,
    mandatory: Mandatory,
    way: Way,
    length: Length,
    direction: PadDirection,
    fill: char,
    format: Format,
    validator: Option<Arc<dyn Validator>>,
    field_type: FieldType,
    value: String,
    pad_added: usize,
    validation: ValidationInfo,
}

impl Field {
    /// Builds a field for a fixed-width record travelling `way`.
    ///
    /// A spec length of 0 is fixed by the first non-empty value.
    pub fn new(spec: &FieldSpec, way: Way) -> Result<Self, FieldError> {
        let length = match spec.length {
            0 => Length::Inferred(None),
            n => Length::Fixed(n),
        };
        Self::build(spec, way, length)
    }

    /// Builds a field for a delimited record; a spec length of 0 means unbounded.
    pub fn unbounded(spec: &FieldSpec, way: Way) -> Result<Self, FieldError> {
        let length = match spec.length {
            0 => Length::Free,
            n => Length::Fixed(n),
        };
        Self::build(spec, way, length)
    }

    fn build(spec: &FieldSpec, way: Way, length: Length) -> Result<Self, FieldError> {
        let name = spec.name.clone();
        let numeric = spec.kind == FieldKind::Numeric;

        if numeric && spec.length > MAX_NUMERIC_LENGTH {
            return Err(FieldError::NumericTooLong {
                field: name,
                length: spec.length,
            });
        }

        let mut seen: Vec<PropertyKind> = Vec::with_capacity(spec.properties.len());
        let mut pad = None;
        let mut decimal = None;
        let mut remove_separator = false;
        let mut date = None;
        let mut boolean = None;
        let mut custom = None;
        let mut validator = None;

        for property in &spec.properties {
            let kind = property.kind();
            if seen.contains(&kind) {
                return Err(FieldError::DuplicateProperty {
                    field: name,
                    property: kind.to_string(),
                });
            }
            seen.push(kind);

            match property {
                Property::PadLeft(fill) => pad = Some((PadDirection::Left, fill)),
                Property::PadRight(fill) => pad = Some((PadDirection::Right, fill)),
                Property::Decimal(format) => decimal = Some(format.clone()),
                Property::RemoveDecimalSeparator => remove_separator = true,
                Property::Date(format) => date = Some(format.clone()),
                Property::Boolean(format) => boolean = Some(format.clone()),
                Property::Custom(format) => custom = Some(Arc::clone(format)),
                Property::Validator(v) => validator = Some(Arc::clone(v)),
            }
        }

        if decimal.is_some() && !numeric {
            return Err(FieldError::DecimalOnAlphanumeric { field: name });
        }

        let text_formats = [date.is_some(), boolean.is_some(), custom.is_some()]
            .iter()
            .filter(|present| **present)
            .count();
        if text_formats > 0 && numeric {
            return Err(FieldError::FormatOnNumeric { field: name });
        }
        if text_formats > 1 {
            return Err(FieldError::ConflictingFormats { field: name });
        }

        if remove_separator && (decimal.is_none() || !numeric) {
            return Err(FieldError::RemoveSeparatorWithoutDecimal { field: name });
        }

        let (direction, fill) = match pad {
            Some((direction, fill)) => {
                let mut chars = fill.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => (direction, c),
                    _ => {
                        return Err(FieldError::InvalidPad {
                            field: name,
                            pad: fill.clone(),
                        });
                    }
                }
            }
            None if numeric => (PadDirection::Left, '0'),
            None => (PadDirection::Right, ' '),
        };

        let field_type = match spec.kind {
            FieldKind::Alphanumeric if date.is_some() => FieldType::Date,
            FieldKind::Alphanumeric if boolean.is_some() => FieldType::Boolean,
            FieldKind::Alphanumeric => FieldType::String,
            FieldKind::Numeric => match (decimal.is_some(), spec.length >= WIDE_NUMERIC_LENGTH) {
                (false, true) => FieldType::Long,
                (false, false) => FieldType::Integer,
                (true, true) => FieldType::Double,
                (true, false) => FieldType::Float,
            },
        };

        let format = match (decimal, date, boolean, custom) {
            (Some(format), ..) => Format::Decimal {
                format,
                remove_separator,
            },
            (_, Some(format), ..) => Format::Date(format),
            (_, _, Some(format), _) => Format::Boolean(format),
            (.., Some(format)) => Format::Custom(format),
            _ => Format::Plain,
        };

        let mut field = Field {
            name,
            kind: spec.kind,
            mandatory: spec.mandatory,
            way,
            length,
            direction,
            fill,
            format,
            validator,
            field_type,
            value: String::new(),
            pad_added: 0,
            validation: ValidationInfo::default(),
        };

        // An unset mandatory field starts empty and fails the mandatory check.
        match &spec.default_value {
            Some(default) => field.set_value(default)?,
            None => field.encode(""),
        }

        Ok(field)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn mandatory(&self) -> Mandatory {
        self.mandatory
    }

    pub fn way(&self) -> Way {
        self.way
    }

    pub fn pad_direction(&self) -> PadDirection {
        self.direction
    }

    pub fn pad_char(&self) -> char {
        self.fill
    }

    /// Whether the mandatory policy applies to this field's record direction.
    pub fn is_mandatory(&self) -> bool {
        self.mandatory.applies_to(self.way)
    }

    /// Current effective length in chars.
    pub fn length(&self) -> usize {
        match self.length {
            Length::Fixed(n) => n,
            Length::Inferred(n) => n.unwrap_or(0),
            Length::Free => pad::char_len(&self.value),
        }
    }

    pub fn is_string(&self) -> bool {
        self.field_type == FieldType::String
    }

    pub fn is_date(&self) -> bool {
        self.field_type == FieldType::Date
    }

    pub fn is_boolean(&self) -> bool {
        self.field_type == FieldType::Boolean
    }

    pub fn is_long(&self) -> bool {
        self.field_type == FieldType::Long
    }

    pub fn is_integer(&self) -> bool {
        self.field_type == FieldType::Integer
    }

    pub fn is_double(&self) -> bool {
        self.field_type == FieldType::Double
    }

    pub fn is_float(&self) -> bool {
        self.field_type == FieldType::Float
    }

    pub fn is_big_decimal(&self) -> bool {
        self.field_type.is_big_decimal()
    }

    /// Formatted (padded) wire value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Pad characters added by the last encode.
    pub fn pad_added(&self) -> usize {
        self.pad_added
    }

    /// The current value with the padding of the last encode removed.
    pub fn decoded(&self) -> &str {
        pad::unpad(&self.value, self.pad_added, self.direction)
    }

    /// The value as written to a delimited line: padding removed, numeric
    /// space as nothing, a numeric value of only pad digits as `0`.
    pub fn unpadded(&self) -> &str {
        match self.kind {
            FieldKind::Numeric => self.numeric_text().unwrap_or(""),
            FieldKind::Alphanumeric => self.decoded(),
        }
    }

    /// Normalizes `raw` to the field length and re-validates.
    ///
    /// Any run of the pad character on the padding side is treated as
    /// padding, so already formatted values encode to themselves.
    pub fn encode(&mut self, raw: &str) {
        let (value, added) = match self.length {
            Length::Free => (raw.to_string(), 0),
            _ => {
                let width = self.length();
                if self.kind == FieldKind::Numeric
                    && width > 0
                    && raw.chars().all(char::is_whitespace)
                {
                    // Numeric space: the logical null of a numeric field.
                    (pad::pad(raw, width, ' ', PadDirection::Left).value, 0)
                } else {
                    let stripped = pad::strip(raw, self.fill, self.direction);
                    if self.length == Length::Inferred(None) && !stripped.is_empty() {
                        self.length = Length::Inferred(Some(pad::char_len(stripped)));
                    }
                    let padded = pad::pad(stripped, self.length(), self.fill, self.direction);
                    (padded.value, padded.added)
                }
            }
        };

        self.value = value;
        self.pad_added = added;
        tracing::trace!(field = %self.name, pad_added = added, "encoded field value");
        self.validate();
    }

    pub fn validation(&self) -> &ValidationInfo {
        &self.validation
    }

    pub fn status(&self) -> Status {
        self.validation.status
    }

    pub fn reset_validation(&mut self) {
        self.validation.reset();
    }

    /// Re-runs validation and stores the outcome.
    pub fn validate(&mut self) -> &ValidationInfo {
        self.validation = self.check();
        &self.validation
    }

    /// Computes the validation outcome without storing it.
    pub fn check(&self) -> ValidationInfo {
        if let Err(info) = self.check_structure() {
            return info;
        }

        if let Some(validator) = &self.validator {
            return validator.validate(&self.context());
        }

        let converted = match self.field_type {
            FieldType::String => Ok(()),
            FieldType::Long => self.parse_long().map(drop),
            FieldType::Integer => self.parse_integer().map(drop),
            FieldType::Double | FieldType::Float => self.parse_f64().map(drop),
            FieldType::Date => self.parse_date().map(drop),
            FieldType::Boolean => self.parse_boolean().map(drop),
        };

        let code = i32::from(FieldErrorCode::Malformed.as_u16());
        match converted {
            Ok(()) => ValidationInfo::info(),
            Err(FieldError::Malformed { source, .. }) => {
                ValidationInfo::error(code, source.to_string())
            }
            Err(e) => ValidationInfo::error(code, e.to_string()),
        }
    }

    fn context(&self) -> FieldContext<'_> {
        FieldContext {
            name: &self.name,
            kind: self.kind,
            field_type: self.field_type,
            value: &self.value,
            raw: self.decoded(),
        }
    }

    /// Length and mandatory checks.
    fn check_structure(&self) -> Result<(), ValidationInfo> {
        let code = i32::from(FieldErrorCode::Invalid.as_u16());

        if self.length != Length::Free {
            let expected = self.length();
            let actual = pad::char_len(&self.value);
            if actual != expected {
                return Err(ValidationInfo::error(
                    code,
                    format!("length {actual} differs from field length {expected}"),
                ));
            }
        }

        if self.is_mandatory() && self.is_empty() {
            return Err(ValidationInfo::error(code, "mandatory field is empty"));
        }

        Ok(())
    }

    /// Numeric space, or nothing left once the padding is removed.
    pub fn is_empty(&self) -> bool {
        match self.kind {
            FieldKind::Numeric => {
                self.value.chars().all(char::is_whitespace) || self.decoded().is_empty()
            }
            FieldKind::Alphanumeric => self.decoded().is_empty(),
        }
    }

    /// Fails when the field is in ERROR status, reporting that status.
    pub fn ensure_valid(&self) -> Result<(), FieldError> {
        let info = match self.check_structure() {
            Err(info) => info,
            Ok(()) if self.validation.is_error() => self.validation.clone(),
            Ok(()) => return Ok(()),
        };

        Err(FieldError::Invalid {
            field: self.name.clone(),
            value: self.value.clone(),
            status: info.status,
            code: info.code,
            message: info.message,
        })
    }

    /// The value without padding, passed back through a custom format if any.
    pub fn value_as_string(&self) -> Result<String, FieldError> {
        self.ensure_valid()?;
        let raw = self.decoded();
        match &self.format {
            Format::Custom(format) => format.parse(raw).map_err(|source| FieldError::Format {
                field: self.name.clone(),
                value: self.value.clone(),
                source,
            }),
            _ => Ok(raw.to_string()),
        }
    }

    pub fn get_long(&self) -> Result<Option<i64>, FieldError> {
        self.expect_type(FieldType::Long)?;
        self.ensure_valid()?;
        self.parse_long()
    }

    pub fn get_integer(&self) -> Result<Option<i32>, FieldError> {
        self.expect_type(FieldType::Integer)?;
        self.ensure_valid()?;
        self.parse_integer()
    }

    pub fn get_double(&self) -> Result<Option<f64>, FieldError> {
        self.expect_type(FieldType::Double)?;
        self.ensure_valid()?;
        self.parse_f64()
    }

    pub fn get_float(&self) -> Result<Option<f32>, FieldError> {
        self.expect_type(FieldType::Float)?;
        self.ensure_valid()?;
        Ok(self.parse_f64()?.map(|v| v as f32))
    }

    /// Reads a double or float field as a decimal scaled to the pattern's
    /// maximum fraction digits, rounding half-down.
    pub fn get_decimal(&self) -> Result<Option<Decimal>, FieldError> {
        if !self.is_big_decimal() {
            return Err(self.type_mismatch(FieldType::Double));
        }
        self.ensure_valid()?;

        let Some(value) = self.parse_f64()? else {
            return Ok(None);
        };
        let decimal = Decimal::from_f64(value)
            .ok_or_else(|| self.malformed(FormatError::Unrepresentable(value.to_string())))?;
        let scale = self.decimal_format().map_or(0, |(format, _)| format.max_fraction_digits());
        Ok(Some(
            decimal.round_dp_with_strategy(scale, RoundingStrategy::MidpointTowardZero),
        ))
    }

    pub fn get_date(&self) -> Result<Option<NaiveDateTime>, FieldError> {
        self.expect_type(FieldType::Date)?;
        self.ensure_valid()?;
        self.parse_date()
    }

    pub fn get_boolean(&self) -> Result<Option<bool>, FieldError> {
        self.expect_type(FieldType::Boolean)?;
        self.ensure_valid()?;
        self.parse_boolean()
    }

    /// Reads the value with the accessor matching the field classification.
    pub fn get(&self) -> Result<Option<Value>, FieldError> {
        Ok(match self.field_type {
            FieldType::String => Some(Value::String(self.value_as_string()?)),
            FieldType::Long => self.get_long()?.map(Value::Long),
            FieldType::Integer => self.get_integer()?.map(Value::Integer),
            FieldType::Double => self.get_double()?.map(Value::Double),
            FieldType::Float => self.get_float()?.map(Value::Float),
            FieldType::Date => self.get_date()?.map(Value::Date),
            FieldType::Boolean => self.get_boolean()?.map(Value::Boolean),
        })
    }

    /// Decoded numeric text; `None` for numeric space.
    ///
    /// A value made only of pad digits decodes to nothing and reads as zero.
    fn numeric_text(&self) -> Option<&str> {
        if self.value.chars().all(char::is_whitespace) {
            return None;
        }
        match self.decoded() {
            "" => Some("0"),
            raw => Some(raw),
        }
    }

    fn parse_long(&self) -> Result<Option<i64>, FieldError> {
        self.numeric_text()
            .map(|text| text.parse::<i64>().map_err(|_| self.not_a_number(text)))
            .transpose()
    }

    fn parse_integer(&self) -> Result<Option<i32>, FieldError> {
        self.numeric_text()
            .map(|text| text.parse::<i32>().map_err(|_| self.not_a_number(text)))
            .transpose()
    }

    fn parse_f64(&self) -> Result<Option<f64>, FieldError> {
        let Some(text) = self.numeric_text() else {
            return Ok(None);
        };

        let parsed = match self.decimal_format() {
            Some((format, true)) => format.parse(&format.insert_separator(text)),
            Some((format, false)) => format.parse(text),
            None => text.parse::<f64>().map_err(|_| FormatError::Number {
                value: text.to_string(),
            }),
        };

        parsed.map(Some).map_err(|source| self.malformed(source))
    }

    fn parse_date(&self) -> Result<Option<NaiveDateTime>, FieldError> {
        let raw = self.decoded();
        match &self.format {
            Format::Date(_) if raw.is_empty() => Ok(None),
            Format::Date(format) => format.parse(raw).map(Some).map_err(|e| self.malformed(e)),
            _ => Err(self.type_mismatch(FieldType::Date)),
        }
    }

    fn parse_boolean(&self) -> Result<Option<bool>, FieldError> {
        let raw = self.decoded();
        match &self.format {
            Format::Boolean(_) if raw.is_empty() => Ok(None),
            Format::Boolean(format) => format.parse(raw).map(Some).map_err(|e| self.malformed(e)),
            _ => Err(self.type_mismatch(FieldType::Boolean)),
        }
    }

    /// Sets a logical string value, applying a custom format if attached.
    pub fn set_value(&mut self, value: &str) -> Result<(), FieldError> {
        match &self.format {
            Format::Custom(format) => {
                let formatted = format.format(value).map_err(|source| FieldError::Format {
                    field: self.name.clone(),
                    value: value.to_string(),
                    source,
                })?;
                self.encode(&formatted);
            }
            _ => self.encode(value),
        }
        Ok(())
    }

    /// Sets wire text as-is (no custom format), e.g. a slice of a parsed line.
    pub fn set_raw(&mut self, value: &str) {
        self.encode(value);
    }

    pub fn set_long(&mut self, value: impl Into<Option<i64>>) -> Result<(), FieldError> {
        let Some(value) = value.into() else {
            return Ok(());
        };
        self.expect_type(FieldType::Long)?;
        self.encode(&value.to_string());
        Ok(())
    }

    pub fn set_integer(&mut self, value: impl Into<Option<i32>>) -> Result<(), FieldError> {
        let Some(value) = value.into() else {
            return Ok(());
        };
        self.expect_type(FieldType::Integer)?;
        self.encode(&value.to_string());
        Ok(())
    }

    pub fn set_double(&mut self, value: impl Into<Option<f64>>) -> Result<(), FieldError> {
        let Some(value) = value.into() else {
            return Ok(());
        };
        self.expect_type(FieldType::Double)?;
        let decimal = Decimal::from_f64(value)
            .ok_or_else(|| self.malformed(FormatError::Unrepresentable(value.to_string())))?;
        let text = self.format_decimal(decimal);
        self.encode(&text);
        Ok(())
    }

    pub fn set_float(&mut self, value: impl Into<Option<f32>>) -> Result<(), FieldError> {
        let Some(value) = value.into() else {
            return Ok(());
        };
        self.expect_type(FieldType::Float)?;
        let decimal = Decimal::from_f32(value)
            .ok_or_else(|| self.malformed(FormatError::Unrepresentable(value.to_string())))?;
        let text = self.format_decimal(decimal);
        self.encode(&text);
        Ok(())
    }

    /// Sets a double or float field from a decimal.
    pub fn set_decimal(&mut self, value: impl Into<Option<Decimal>>) -> Result<(), FieldError> {
        let Some(value) = value.into() else {
            return Ok(());
        };
        if !self.is_big_decimal() {
            return Err(self.type_mismatch(FieldType::Double));
        }
        let text = self.format_decimal(value);
        self.encode(&text);
        Ok(())
    }

    pub fn set_date(&mut self, value: impl Into<Option<NaiveDateTime>>) -> Result<(), FieldError> {
        let Some(value) = value.into() else {
            return Ok(());
        };
        self.expect_type(FieldType::Date)?;
        let text = match &self.format {
            Format::Date(format) => format.format(&value).map_err(|e| self.malformed(e))?,
            _ => return Err(self.type_mismatch(FieldType::Date)),
        };
        self.encode(&text);
        Ok(())
    }

    pub fn set_boolean(&mut self, value: impl Into<Option<bool>>) -> Result<(), FieldError> {
        let Some(value) = value.into() else {
            return Ok(());
        };
        self.expect_type(FieldType::Boolean)?;
        let text = match &self.format {
            Format::Boolean(format) => format.format(value).to_string(),
            _ => return Err(self.type_mismatch(FieldType::Boolean)),
        };
        self.encode(&text);
        Ok(())
    }

    /// Writes a typed value through the matching setter.
    pub fn set(&mut self, value: Value) -> Result<(), FieldError> {
        match value {
            Value::String(v) => self.set_value(&v),
            Value::Long(v) => self.set_long(v),
            Value::Integer(v) => self.set_integer(v),
            Value::Double(v) => self.set_double(v),
            Value::Float(v) => self.set_float(v),
            Value::Decimal(v) => self.set_decimal(v),
            Value::Date(v) => self.set_date(v),
            Value::Boolean(v) => self.set_boolean(v),
        }
    }

    /// Maps every char of an alphanumeric value and re-encodes it.
    pub(crate) fn map_chars(&mut self, f: impl Fn(char) -> char) {
        if self.kind != FieldKind::Alphanumeric {
            return;
        }
        let mapped: String = self.value.chars().map(f).collect();
        if mapped != self.value {
            self.encode(&mapped);
        }
    }

    /// The value this field would hold if its typed content were written
    /// back through the typed setters.
    ///
    /// Fields in ERROR status, numeric space and empty values come back
    /// unchanged.
    pub(crate) fn canonical(&self) -> String {
        if self.validation.is_error() {
            return self.value.clone();
        }

        let mut copy = self.clone();
        let written = match self.field_type {
            FieldType::Double | FieldType::Float => match self.exact_decimal() {
                Ok(Some(decimal)) => copy.set_decimal(decimal).is_ok(),
                _ => false,
            },
            _ => match self.get() {
                Ok(Some(value)) => copy.set(value).is_ok(),
                _ => false,
            },
        };

        if written { copy.value } else { self.value.clone() }
    }

    /// Decimal reading without the `f64` step of [`Field::get_decimal`].
    fn exact_decimal(&self) -> Result<Option<Decimal>, FieldError> {
        let Some(text) = self.numeric_text() else {
            return Ok(None);
        };

        let parsed = match self.decimal_format() {
            Some((format, true)) => format.parse_decimal(&format.insert_separator(text)),
            Some((format, false)) => format.parse_decimal(text),
            None => text.parse::<Decimal>().map_err(|_| FormatError::Number {
                value: text.to_string(),
            }),
        };

        parsed.map(Some).map_err(|source| self.malformed(source))
    }

    fn decimal_format(&self) -> Option<(&DecimalFormat, bool)> {
        match &self.format {
            Format::Decimal {
                format,
                remove_separator,
            } => Some((format, *remove_separator)),
            _ => None,
        }
    }

    fn format_decimal(&self, value: Decimal) -> String {
        match self.decimal_format() {
            Some((format, true)) => {
                let separator = format.symbols().decimal_separator;
                format
                    .format_fixed(value)
                    .chars()
                    .filter(|c| *c != separator)
                    .collect()
            }
            Some((format, false)) => format.format(value),
            None => value.to_string(),
        }
    }

    fn expect_type(&self, expected: FieldType) -> Result<(), FieldError> {
        if self.field_type == expected {
            Ok(())
        } else {
            Err(self.type_mismatch(expected))
        }
    }

    fn type_mismatch(&self, expected: FieldType) -> FieldError {
        FieldError::TypeMismatch {
            field: self.name.clone(),
            expected,
            actual: self.field_type,
            value: self.value.clone(),
        }
    }

    fn malformed(&self, source: FormatError) -> FieldError {
        FieldError::Malformed {
            field: self.name.clone(),
            value: self.value.clone(),
            source,
        }
    }

    fn not_a_number(&self, text: &str) -> FieldError {
        self.malformed(FormatError::Number {
            value: text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::NaiveDate;

    use super::*;

    fn field(spec: FieldSpec) -> Field {
        Field::new(&spec, Way::Out).unwrap()
    }

    #[test]
    fn test_alphanumeric_padding() {
        let mut f = field(FieldSpec::alphanumeric("text", 20));
        f.set_value("Lorem ipsum").unwrap();
        assert_eq!(f.value(), "Lorem ipsum         ");
        assert_eq!(f.pad_added(), 9);
        assert_eq!(f.value_as_string().unwrap(), "Lorem ipsum");
    }

    #[test]
    fn test_negative_integer_zero_padding() {
        let mut f = field(FieldSpec::numeric("n", 5));
        f.set_integer(-123).unwrap();
        assert_eq!(f.value(), "0-123");
        assert_eq!(f.get_integer().unwrap(), Some(-123));
    }

    #[test]
    fn test_numeric_space_reads_none() {
        let mut f = field(FieldSpec::numeric("n", 5));
        f.set_value("     ").unwrap();
        assert_eq!(f.value(), "     ");
        assert_eq!(f.pad_added(), 0);
        assert_eq!(f.get_integer().unwrap(), None);
        assert!(f.validation().is_info());
    }

    #[test]
    fn test_short_numeric_space_is_right_justified() {
        let mut f = field(FieldSpec::numeric("n", 4));
        f.set_raw(" ");
        assert_eq!(f.value(), "    ");
    }

    #[test]
    fn test_all_zero_reads_zero() {
        let mut f = field(FieldSpec::numeric("n", 4));
        f.set_raw("0000");
        assert_eq!(f.decoded(), "");
        assert_eq!(f.get_integer().unwrap(), Some(0));
        f.set_integer(0).unwrap();
        assert_eq!(f.value(), "0000");
    }

    #[test]
    fn test_default_empty_values() {
        let a = field(FieldSpec::alphanumeric("a", 3));
        assert_eq!(a.value(), "   ");
        let n = field(FieldSpec::numeric("n", 3));
        assert_eq!(n.value(), "   ");
        assert!(n.is_empty());
    }

    #[test]
    fn test_default_value_is_encoded() {
        let f = field(FieldSpec::numeric("n", 4).default_value("7"));
        assert_eq!(f.value(), "0007");
        assert_eq!(f.get_integer().unwrap(), Some(7));
    }

    #[test]
    fn test_already_padded_value_is_stable() {
        let mut f = field(FieldSpec::alphanumeric("a", 6));
        f.set_value("abc   ").unwrap();
        assert_eq!(f.value(), "abc   ");
        assert_eq!(f.decoded(), "abc");
    }

    #[test]
    fn test_custom_pad() {
        let mut f = field(FieldSpec::alphanumeric("a", 5).pad_left("*"));
        f.set_value("ab").unwrap();
        assert_eq!(f.value(), "***ab");
        assert_eq!(f.pad_direction(), PadDirection::Left);
        assert_eq!(f.pad_char(), '*');
    }

    #[test]
    fn test_too_long_value_is_error() {
        let mut f = field(FieldSpec::alphanumeric("a", 3));
        f.set_value("abcd").unwrap();
        assert_eq!(f.value(), "abcd");
        assert!(f.validation().is_error());
        let err = f.value_as_string().unwrap_err();
        assert_eq!(err.code(), FieldErrorCode::Invalid);
        assert!(err.to_string().contains("abcd"));
    }

    #[test]
    fn test_inferred_length() {
        let mut f = field(FieldSpec::alphanumeric("a", 0));
        assert_eq!(f.length(), 0);
        f.set_value("hello").unwrap();
        assert_eq!(f.length(), 5);
        f.set_value("hi").unwrap();
        assert_eq!(f.value(), "hi   ");
    }

    #[test]
    fn test_unbounded_stores_verbatim() {
        let mut f = Field::unbounded(&FieldSpec::numeric("n", 0), Way::Out).unwrap();
        f.set_integer(10).unwrap();
        assert_eq!(f.value(), "10");
        f.set_integer(12345).unwrap();
        assert_eq!(f.value(), "12345");
        assert_eq!(f.get_integer().unwrap(), Some(12345));
        f.set_raw("");
        assert_eq!(f.get_integer().unwrap(), None);
    }

    #[test]
    fn test_classification() {
        assert!(field(FieldSpec::numeric("n", 10)).is_long());
        assert!(field(FieldSpec::numeric("n", 9)).is_integer());
        let decimal = DecimalFormat::new("0.00").unwrap();
        assert!(field(FieldSpec::numeric("n", 10).decimal(decimal.clone())).is_double());
        assert!(field(FieldSpec::numeric("n", 9).decimal(decimal)).is_float());
        assert!(field(FieldSpec::alphanumeric("a", 8).date(DateFormat::new("%Y%m%d").unwrap())).is_date());
        assert!(field(FieldSpec::alphanumeric("a", 1).boolean(BooleanFormat::new("Y", "N"))).is_boolean());
        assert!(field(FieldSpec::alphanumeric("a", 1)).is_string());
    }

    #[test]
    fn test_construction_errors() {
        let decimal = DecimalFormat::new("0.00").unwrap();
        let date = DateFormat::new("%Y%m%d").unwrap();
        let code = |spec: FieldSpec| Field::new(&spec, Way::In).unwrap_err().code();

        assert_eq!(code(FieldSpec::numeric("n", 20)), FieldErrorCode::NumericTooLong);
        assert_eq!(
            code(FieldSpec::alphanumeric("a", 5).decimal(decimal.clone())),
            FieldErrorCode::DecimalOnAlphanumeric
        );
        assert_eq!(code(FieldSpec::numeric("n", 8).date(date.clone())), FieldErrorCode::FormatOnNumeric);
        assert_eq!(
            code(FieldSpec::alphanumeric("a", 8).date(date).boolean(BooleanFormat::default())),
            FieldErrorCode::ConflictingFormats
        );
        assert_eq!(
            code(FieldSpec::numeric("n", 8).remove_decimal_separator()),
            FieldErrorCode::RemoveSeparatorWithoutDecimal
        );
        assert_eq!(code(FieldSpec::alphanumeric("a", 5).pad_left("ab")), FieldErrorCode::InvalidPad);
        assert_eq!(code(FieldSpec::alphanumeric("a", 5).pad_left("")), FieldErrorCode::InvalidPad);
        assert_eq!(
            code(FieldSpec::numeric("n", 5).decimal(decimal.clone()).decimal(decimal)),
            FieldErrorCode::DuplicateProperty
        );
    }

    #[test]
    fn test_type_mismatch() {
        let mut f = field(FieldSpec::numeric("n", 12));
        let err = f.set_float(1.5).unwrap_err();
        assert_eq!(err.code(), FieldErrorCode::TypeMismatch);
        assert!(f.get_integer().is_err());
        assert!(f.set_long(5).is_ok());
        assert_eq!(f.get_long().unwrap(), Some(5));
    }

    #[test]
    fn test_null_setter_is_noop() {
        let mut f = field(FieldSpec::numeric("n", 4));
        f.set_integer(42).unwrap();
        f.set_integer(None).unwrap();
        assert_eq!(f.value(), "0042");
        // A mismatched null is still a no-op.
        f.set_long(None).unwrap();
        assert_eq!(f.value(), "0042");
    }

    #[test]
    fn test_decimal_with_separator() {
        let mut f = field(FieldSpec::numeric("amount", 10).decimal(DecimalFormat::new("0.00").unwrap()));
        f.set_double(12.5).unwrap();
        assert_eq!(f.value(), "0000012.50");
        assert_eq!(f.get_double().unwrap(), Some(12.5));
        assert_eq!(f.get_decimal().unwrap(), Some(Decimal::from_str("12.50").unwrap()));
    }

    #[test]
    fn test_decimal_without_separator() {
        let mut f = field(
            FieldSpec::numeric("amount", 8)
                .decimal(DecimalFormat::new("0.##").unwrap())
                .remove_decimal_separator(),
        );
        f.set_float(12.5).unwrap();
        assert_eq!(f.value(), "00001250");
        assert_eq!(f.get_float().unwrap(), Some(12.5));

        f.set_float(-0.05).unwrap();
        assert_eq!(f.value(), "0000-005");
        assert_eq!(f.get_float().unwrap(), Some(-0.05));
    }

    #[test]
    fn test_decimal_rescales_half_down() {
        let mut f = field(FieldSpec::numeric("amount", 12).decimal(DecimalFormat::new("0.00").unwrap()));
        f.set_raw("12.345");
        assert_eq!(f.get_decimal().unwrap(), Some(Decimal::from_str("12.34").unwrap()));
    }

    #[test]
    fn test_malformed_numeric_is_error_status() {
        let mut f = field(FieldSpec::numeric("n", 4));
        f.set_raw("12a4");
        assert!(f.validation().is_error());
        assert_eq!(f.validation().code, 111);
        assert!(f.get_integer().is_err());
        f.reset_validation();
        assert_eq!(f.get_integer().unwrap_err().code(), FieldErrorCode::Malformed);
    }

    #[test]
    fn test_date_field() {
        let mut f = field(FieldSpec::alphanumeric("born", 8).date(DateFormat::new("%Y%m%d").unwrap()));
        assert_eq!(f.get_date().unwrap(), None);
        let date = NaiveDate::from_ymd_opt(1973, 5, 4).unwrap().and_hms_opt(0, 0, 0).unwrap();
        f.set_date(date).unwrap();
        assert_eq!(f.value(), "19730504");
        assert_eq!(f.get_date().unwrap(), Some(date));
        f.set_raw("19731304");
        assert!(f.validation().is_error());
    }

    #[test]
    fn test_boolean_field() {
        let mut f = field(FieldSpec::alphanumeric("flag", 1).boolean(BooleanFormat::new("Y", "N")));
        f.set_boolean(true).unwrap();
        assert_eq!(f.value(), "Y");
        assert_eq!(f.get_boolean().unwrap(), Some(true));
        assert_eq!(f.get().unwrap(), Some(Value::Boolean(true)));
    }

    #[test]
    fn test_mandatory_empty() {
        let spec = FieldSpec::alphanumeric("a", 3).mandatory(Mandatory::In);
        let inbound = Field::new(&spec, Way::In).unwrap();
        assert!(inbound.validation().is_error());
        let outbound = Field::new(&spec, Way::Out).unwrap();
        assert!(outbound.validation().is_info());

        let spec = FieldSpec::numeric("n", 3).mandatory(Mandatory::InOut);
        let mut n = Field::new(&spec, Way::Out).unwrap();
        assert!(n.validation().is_error());
        n.set_integer(7).unwrap();
        assert!(n.validation().is_info());
        n.set_value("   ").unwrap();
        assert!(n.validation().is_error());
    }

    #[test]
    fn test_mandatory_zero_is_empty() {
        let spec = FieldSpec::numeric("n", 3).mandatory(Mandatory::InOut);
        let mut n = Field::new(&spec, Way::Out).unwrap();
        n.set_integer(0).unwrap();
        assert_eq!(n.value(), "000");
        assert_eq!(n.decoded(), "");
        assert!(n.validation().is_error());
        assert_eq!(n.validation().code, 113);
        assert!(n.get_integer().is_err());

        let optional = FieldSpec::numeric("n", 3);
        let mut zero = Field::new(&optional, Way::Out).unwrap();
        zero.set_integer(0).unwrap();
        assert_eq!(zero.get_integer().unwrap(), Some(0));
    }

    #[test]
    fn test_canonical_rewrites_through_typed_value() {
        let mut n = Field::new(&FieldSpec::numeric("n", 5), Way::In).unwrap();
        n.set_raw("00123");
        assert_eq!(n.canonical(), "00123");
        n.set_raw("+0012");
        assert!(n.validation().is_info());
        assert_eq!(n.canonical(), "00012");
        n.set_raw("     ");
        assert_eq!(n.canonical(), "     ");

        let spec = FieldSpec::numeric("amount", 5).decimal(DecimalFormat::new("0.00").unwrap());
        let mut amount = Field::new(&spec, Way::In).unwrap();
        amount.set_raw("01.50");
        assert_eq!(amount.canonical(), "01.50");
        amount.set_raw("001.5");
        assert_eq!(amount.canonical(), "01.50");

        let wide = FieldSpec::numeric("wide", 19).decimal(DecimalFormat::new("0.00").unwrap());
        let mut wide = Field::new(&wide, Way::In).unwrap();
        wide.set_raw("1234567890123456.78");
        assert_eq!(wide.canonical(), "1234567890123456.78");

        let mut bad = Field::new(&FieldSpec::numeric("n", 3), Way::In).unwrap();
        bad.set_raw("5x1");
        assert_eq!(bad.canonical(), "5x1");
    }

    #[derive(Debug)]
    struct EvenOnly;

    impl Validator for EvenOnly {
        fn validate(&self, field: &FieldContext<'_>) -> ValidationInfo {
            match field.raw.parse::<i64>() {
                Ok(v) if v % 2 == 0 => ValidationInfo::info(),
                _ => ValidationInfo::warn(42, "odd value"),
            }
        }
    }

    #[test]
    fn test_validator_decides_outcome() {
        let mut f = field(FieldSpec::numeric("n", 4).validator(Arc::new(EvenOnly)));
        f.set_integer(3).unwrap();
        assert!(f.validation().is_warn());
        assert_eq!(f.validation().code, 42);
        assert_eq!(f.get_integer().unwrap(), Some(3));
        f.set_integer(4).unwrap();
        assert!(f.validation().is_info());
    }

    #[derive(Debug)]
    struct Reverse;

    impl CustomFormat for Reverse {
        fn format(&self, value: &str) -> Result<String, FormatError> {
            Ok(value.chars().rev().collect())
        }

        fn parse(&self, value: &str) -> Result<String, FormatError> {
            Ok(value.chars().rev().collect())
        }
    }

    #[test]
    fn test_custom_format() {
        let mut f = field(FieldSpec::alphanumeric("code", 6).custom(Arc::new(Reverse)));
        f.set_value("abc").unwrap();
        assert_eq!(f.value(), "cba   ");
        assert_eq!(f.value_as_string().unwrap(), "abc");
        f.set_raw("xyz");
        assert_eq!(f.value(), "xyz   ");
        assert_eq!(f.value_as_string().unwrap(), "zyx");
    }

    #[test]
    fn test_check_does_not_mutate() {
        let mut f = field(FieldSpec::numeric("n", 4));
        f.set_raw("abcd");
        f.reset_validation();
        assert!(f.check().is_error());
        assert!(f.validation().is_info());
        f.validate();
        assert!(f.validation().is_error());
    }
}
