//! Fixed-width records: ordered fields rendered as one undelimited line.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{
    compiled::Field,
    errors::RecordError,
    field::{FieldSpec, Way},
    field_set::FieldSet,
    pad::{self, PadDirection},
    property::{self, Property},
    validation::{ValidationInfo, Validator},
    value::Value,
};

/// Name of the synthetic field that pads a record to its declared length.
pub const FILLER: &str = "FILLER";

/// Schema of a record: its fields in wire order plus record-level properties.
///
/// Without an explicit [`RecordSpec::length`] the record is as long as its
/// fields. Record-level properties may only be pads and validators; they are
/// merged into every field that does not declare the same kind itself.
#[derive(Debug, Clone, Default)]
pub struct RecordSpec {
    pub name: String,
    pub length: Option<usize>,
    pub properties: Vec<Property>,
    pub fields: Vec<FieldSpec>,
}

impl RecordSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn pad_left(self, pad: impl Into<String>) -> Self {
        self.property(Property::PadLeft(pad.into()))
    }

    pub fn pad_right(self, pad: impl Into<String>) -> Self {
        self.property(Property::PadRight(pad.into()))
    }

    pub fn validator(self, validator: Arc<dyn Validator>) -> Self {
        self.property(Property::Validator(validator))
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Checks names and record-level properties.
    pub(crate) fn check(&self) -> Result<(), RecordError> {
        if let Some(kind) = property::illegal_record_property(&self.properties) {
            return Err(RecordError::IllegalRecordProperty {
                record: self.name.clone(),
                property: kind.to_string(),
            });
        }

        let mut seen: Vec<&str> = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            if field.name == FILLER {
                return Err(RecordError::ReservedName {
                    record: self.name.clone(),
                    name: field.name.clone(),
                });
            }
            if seen.contains(&field.name.as_str()) {
                return Err(RecordError::DuplicateName {
                    record: self.name.clone(),
                    name: field.name.clone(),
                });
            }
            seen.push(&field.name);
        }

        Ok(())
    }

    /// `field` with the record-level properties merged in.
    pub(crate) fn resolve(&self, field: &FieldSpec) -> FieldSpec {
        FieldSpec {
            properties: property::resolve(&self.properties, &field.properties),
            ..field.clone()
        }
    }
}

/// One row of a record layout dump.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldReport {
    pub name: String,
    pub index: usize,
    /// Char offset of the field in the line.
    pub offset: usize,
    pub length: usize,
    pub value: String,
    pub validation: ValidationInfo,
}

/// A fixed-width record.
#[derive(Debug, Clone)]
pub struct Record {
    name: String,
    way: Way,
    length: usize,
    fields: Vec<Field>,
    index: BTreeMap<String, usize>,
}

impl Record {
    /// Builds an empty record, appending a filler when the fields are
    /// shorter than the declared length.
    pub fn new(spec: &RecordSpec, way: Way) -> Result<Self, RecordError> {
        spec.check()?;

        let mut fields: Vec<Field> = Vec::with_capacity(spec.fields.len() + 1);
        for field_spec in &spec.fields {
            if field_spec.occurs != 1 {
                return Err(RecordError::UnknownOccurrence {
                    record: spec.name.clone(),
                    name: field_spec.name.clone(),
                    occurrence: field_spec.occurs,
                });
            }
            fields.push(Field::new(&spec.resolve(field_spec), way)?);
        }

        let used: usize = fields.iter().map(Field::length).sum();
        let length = match spec.length {
            Some(length) if used > length => {
                return Err(RecordError::FieldsExceedLength {
                    record: spec.name.clone(),
                    expected: length,
                    actual: used,
                });
            }
            Some(length) => length,
            None => used,
        };

        let filler = length - used;
        if filler > 0 {
            fields.push(Field::new(&FieldSpec::alphanumeric(FILLER, filler), way)?);
        }

        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect();

        tracing::debug!(record = %spec.name, length, filler, ?way, "built record");

        Ok(Self {
            name: spec.name.clone(),
            way,
            length,
            fields,
            index,
        })
    }

    /// Builds a record and fills it from `line`.
    pub fn from_line(spec: &RecordSpec, way: Way, line: &str) -> Result<Self, RecordError> {
        let mut record = Self::new(spec, way)?;
        record.parse(line)?;
        Ok(record)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn way(&self) -> Way {
        self.way
    }

    /// Declared length in chars.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Field names in wire order, filler included.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(Field::name)
    }

    /// Slices `line` into the fields.
    ///
    /// A short line is padded with spaces; a long one is rejected. Fields
    /// holding invalid text still take it and report ERROR status. The
    /// other fields are rendered again from their typed values, and the
    /// result must reproduce the line.
    pub fn parse(&mut self, line: &str) -> Result<(), RecordError> {
        let actual = pad::char_len(line);
        if actual > self.length {
            return Err(RecordError::LineTooLong {
                record: self.name.clone(),
                expected: self.length,
                actual,
            });
        }

        let line = pad::pad(line, self.length, ' ', PadDirection::Right).value;
        let mut rest = line.as_str();
        for field in &mut self.fields {
            let (slice, tail) = pad::split_chars(rest, field.length());
            field.set_raw(slice);
            rest = tail;
        }

        let rendered: String = self.fields.iter().map(Field::canonical).collect();
        if rendered != line {
            tracing::warn!(record = %self.name, "parsed line does not round-trip");
            return Err(RecordError::RoundTrip {
                record: self.name.clone(),
                expected: line,
                actual: rendered,
            });
        }

        tracing::debug!(record = %self.name, length = actual, "parsed line");
        Ok(())
    }

    /// Concatenates the formatted field values.
    pub fn render(&self) -> Result<String, RecordError> {
        if let Some(details) = self.error_summary() {
            tracing::warn!(record = %self.name, %details, "refusing to render invalid record");
            return Err(RecordError::InvalidFields {
                record: self.name.clone(),
                details,
            });
        }

        let line: String = self.fields.iter().map(Field::value).collect();
        let actual = pad::char_len(&line);
        if actual != self.length {
            return Err(RecordError::LengthMismatch {
                record: self.name.clone(),
                expected: self.length,
                actual,
            });
        }

        tracing::debug!(record = %self.name, length = actual, "rendered record");
        Ok(line)
    }

    pub fn field(&self, name: &str) -> Result<&Field, RecordError> {
        match self.index.get(name) {
            Some(&i) => Ok(&self.fields[i]),
            None => Err(self.unknown(name)),
        }
    }

    pub fn field_mut(&mut self, name: &str) -> Result<&mut Field, RecordError> {
        match self.index.get(name) {
            Some(&i) => Ok(&mut self.fields[i]),
            None => Err(self.unknown(name)),
        }
    }

    /// Typed read through the field's classification.
    pub fn get(&self, name: &str) -> Result<Option<Value>, RecordError> {
        Ok(self.field(name)?.get()?)
    }

    /// Typed write; the value must match the field's classification.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), RecordError> {
        Ok(self.field_mut(name)?.set(value.into())?)
    }

    /// Formatted (padded) value.
    pub fn value(&self, name: &str) -> Result<&str, RecordError> {
        Ok(self.field(name)?.value())
    }

    pub fn value_as_string(&self, name: &str) -> Result<String, RecordError> {
        Ok(self.field(name)?.value_as_string()?)
    }

    pub fn set_value(&mut self, name: &str, value: &str) -> Result<(), RecordError> {
        Ok(self.field_mut(name)?.set_value(value)?)
    }

    pub fn set_raw(&mut self, name: &str, value: &str) -> Result<(), RecordError> {
        self.field_mut(name)?.set_raw(value);
        Ok(())
    }

    /// Name, index, offset, length, value and status of every field.
    pub fn layout(&self) -> Vec<FieldReport> {
        let mut offset = 0;
        self.fields
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let report = FieldReport {
                    name: field.name().to_string(),
                    index,
                    offset,
                    length: field.length(),
                    value: field.value().to_string(),
                    validation: field.validation().clone(),
                };
                offset += report.length;
                report
            })
            .collect()
    }

    /// [`Record::layout`] as a text table.
    pub fn report(&self) -> String {
        let layout = self.layout();
        let width = layout
            .iter()
            .map(|r| pad::char_len(&r.name))
            .max()
            .unwrap_or(0)
            .max(4);

        let mut out = format!(
            "record {} ({:?}, length {})\n{:>5} {:<width$} {:>6} {:>6} {:<6} VALUE\n",
            self.name, self.way, self.length, "INDEX", "NAME", "OFFSET", "LENGTH", "STATUS"
        );
        for row in &layout {
            out.push_str(&format!(
                "{:>5} {:<width$} {:>6} {:>6} {:<6} [{}]",
                row.index,
                row.name,
                row.offset,
                row.length,
                row.validation.status.to_string(),
                row.value
            ));
            if !row.validation.is_info() {
                out.push_str(&format!(" {} {}", row.validation.code, row.validation.message));
            }
            out.push('\n');
        }
        out
    }

    /// `name=[value]` per line.
    pub fn values_report(&self) -> String {
        self.fields
            .iter()
            .map(|f| format!("{}=[{}]\n", f.name(), f.value()))
            .collect()
    }

    fn unknown(&self, name: &str) -> RecordError {
        RecordError::UnknownField {
            record: self.name.clone(),
            name: name.to_string(),
        }
    }
}

impl FieldSet for Record {
    fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    fn fields_mut(&mut self) -> impl Iterator<Item = &mut Field> {
        self.fields.iter_mut()
    }
}
