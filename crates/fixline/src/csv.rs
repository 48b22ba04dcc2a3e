//! Delimited records: fields (possibly repeated) joined by a separator,
//! optionally enclosed in quotes.

use std::collections::BTreeMap;
use std::fmt;
use std::iter;

use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};

use crate::{
    compiled::Field,
    errors::RecordError,
    field::Way,
    field_set::FieldSet,
    pad,
    record::RecordSpec,
    value::Value,
};

/// Column separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Separator {
    #[default]
    Comma,
    Semicolon,
    Space,
    Tab,
    Other(char),
}

impl Separator {
    pub fn as_char(self) -> char {
        match self {
            Separator::Comma => ',',
            Separator::Semicolon => ';',
            Separator::Space => ' ',
            Separator::Tab => '\t',
            Separator::Other(c) => c,
        }
    }
}

/// Quote character wrapped around enclosed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Enclosing {
    #[default]
    DoubleQuote,
    SingleQuote,
}

impl Enclosing {
    pub fn as_char(self) -> char {
        match self {
            Enclosing::DoubleQuote => '"',
            Enclosing::SingleQuote => '\'',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CsvOptions {
    pub separator: Separator,
    pub enclosing: Enclosing,
    /// Enclose every value, not only those that need it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub enclose_all: bool,
}

impl CsvOptions {
    pub fn separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    pub fn enclosing(mut self, enclosing: Enclosing) -> Self {
        self.enclosing = enclosing;
        self
    }

    pub fn enclose_all(mut self, enclose_all: bool) -> Self {
        self.enclose_all = enclose_all;
        self
    }

    /// Separator and enclosing as the single bytes a line is split on.
    fn delimiters(self) -> Result<(u8, u8), String> {
        let separator = self.separator.as_char();
        let quote = self.enclosing.as_char();
        if !separator.is_ascii() {
            return Err(format!("separator {separator:?} is not ASCII"));
        }
        if separator == quote {
            return Err(format!("separator {separator:?} is also the enclosing character"));
        }
        if separator == '\n' || separator == '\r' {
            return Err(format!("separator {separator:?} ends the line"));
        }
        Ok((separator as u8, quote as u8))
    }
}

/// A delimited record. Each schema field owns `occurs` consecutive columns.
///
/// Fields declared with length 0 are unbounded and store values verbatim.
/// The record has no declared length; [`CsvRecord::length`] is the length
/// of the rendered line.
#[derive(Debug, Clone)]
pub struct CsvRecord {
    name: String,
    way: Way,
    options: CsvOptions,
    delimiter: u8,
    quote: u8,
    columns: Vec<Vec<Field>>,
    index: BTreeMap<String, usize>,
}

impl CsvRecord {
    pub fn new(spec: &RecordSpec, way: Way, options: CsvOptions) -> Result<Self, RecordError> {
        spec.check()?;
        let (delimiter, quote) = options
            .delimiters()
            .map_err(|reason| RecordError::InvalidOptions {
                record: spec.name.clone(),
                reason,
            })?;

        let mut columns = Vec::with_capacity(spec.fields.len());
        let mut index = BTreeMap::new();
        for field_spec in &spec.fields {
            if field_spec.occurs == 0 {
                return Err(RecordError::UnknownOccurrence {
                    record: spec.name.clone(),
                    name: field_spec.name.clone(),
                    occurrence: 0,
                });
            }

            let resolved = spec.resolve(field_spec);
            let occurrences = (0..field_spec.occurs)
                .map(|_| Field::unbounded(&resolved, way))
                .collect::<Result<Vec<_>, _>>()?;
            index.insert(field_spec.name.clone(), columns.len());
            columns.push(occurrences);
        }

        let record = Self {
            name: spec.name.clone(),
            way,
            options,
            delimiter,
            quote,
            columns,
            index,
        };
        tracing::debug!(
            record = %record.name,
            columns = record.column_count(),
            separator = ?options.separator,
            "built csv record"
        );
        Ok(record)
    }

    /// Builds a record and fills it from `line`.
    pub fn from_line(
        spec: &RecordSpec,
        way: Way,
        options: CsvOptions,
        line: &str,
    ) -> Result<Self, RecordError> {
        let mut record = Self::new(spec, way, options)?;
        record.parse(line)?;
        Ok(record)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn way(&self) -> Way {
        self.way
    }

    pub fn options(&self) -> CsvOptions {
        self.options
    }

    /// Total number of columns, occurrences included.
    pub fn column_count(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    /// Char length of the rendered line.
    pub fn length(&self) -> Result<usize, RecordError> {
        Ok(pad::char_len(&self.render()?))
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn occurrences(&self, name: &str) -> Result<usize, RecordError> {
        Ok(self.column(name)?.len())
    }

    /// Splits `line` into columns and assigns them in schema order.
    ///
    /// Missing trailing columns leave their fields empty.
    pub fn parse(&mut self, line: &str) -> Result<(), RecordError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .quote(self.quote)
            .double_quote(true)
            .from_reader(line.as_bytes());

        let mut row = StringRecord::new();
        reader.read_record(&mut row).map_err(|e| self.malformed(e))?;
        let mut next = StringRecord::new();
        if reader.read_record(&mut next).map_err(|e| self.malformed(e))? {
            return Err(self.malformed("line holds more than one row"));
        }

        let expected = self.column_count();
        if row.len() > expected {
            return Err(RecordError::ColumnCount {
                record: self.name.clone(),
                expected,
                actual: row.len(),
            });
        }

        let columns = row.len();
        let values = row.iter().chain(iter::repeat(""));
        for (field, token) in self.fields_mut().zip(values) {
            field.set_raw(token);
        }

        tracing::debug!(record = %self.name, columns, "parsed csv line");
        Ok(())
    }

    /// Joins the unpadded values, enclosing those that need it.
    pub fn render(&self) -> Result<String, RecordError> {
        if let Some(details) = self.error_summary() {
            tracing::warn!(record = %self.name, %details, "refusing to render invalid record");
            return Err(RecordError::InvalidFields {
                record: self.name.clone(),
                details,
            });
        }

        let style = if self.options.enclose_all {
            QuoteStyle::Always
        } else {
            QuoteStyle::Necessary
        };
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote(self.quote)
            .double_quote(true)
            .quote_style(style)
            .from_writer(Vec::new());
        writer
            .write_record(self.fields().map(Field::unpadded))
            .map_err(|e| self.malformed(e))?;
        let bytes = writer
            .into_inner()
            .map_err(|e| self.malformed(e.into_error()))?;

        let mut line = String::from_utf8(bytes).map_err(|e| self.malformed(e))?;
        if line.ends_with('\n') {
            line.pop();
        }

        tracing::debug!(record = %self.name, length = line.len(), "rendered csv record");
        Ok(line)
    }

    /// First occurrence of `name`.
    pub fn field(&self, name: &str) -> Result<&Field, RecordError> {
        self.field_at(name, 0)
    }

    pub fn field_mut(&mut self, name: &str) -> Result<&mut Field, RecordError> {
        self.field_at_mut(name, 0)
    }

    pub fn field_at(&self, name: &str, occurrence: usize) -> Result<&Field, RecordError> {
        self.column(name)?
            .get(occurrence)
            .ok_or_else(|| self.unknown_occurrence(name, occurrence))
    }

    pub fn field_at_mut(
        &mut self,
        name: &str,
        occurrence: usize,
    ) -> Result<&mut Field, RecordError> {
        let missing = self.unknown_occurrence(name, occurrence);
        let i = *self.index.get(name).ok_or_else(|| self.unknown(name))?;
        self.columns[i].get_mut(occurrence).ok_or(missing)
    }

    pub fn get(&self, name: &str) -> Result<Option<Value>, RecordError> {
        self.get_at(name, 0)
    }

    pub fn get_at(&self, name: &str, occurrence: usize) -> Result<Option<Value>, RecordError> {
        Ok(self.field_at(name, occurrence)?.get()?)
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), RecordError> {
        self.set_at(name, 0, value)
    }

    pub fn set_at(
        &mut self,
        name: &str,
        occurrence: usize,
        value: impl Into<Value>,
    ) -> Result<(), RecordError> {
        Ok(self.field_at_mut(name, occurrence)?.set(value.into())?)
    }

    pub fn value(&self, name: &str) -> Result<String, RecordError> {
        self.value_at(name, 0)
    }

    /// Value of one occurrence, custom format reversed.
    pub fn value_at(&self, name: &str, occurrence: usize) -> Result<String, RecordError> {
        Ok(self.field_at(name, occurrence)?.value_as_string()?)
    }

    pub fn set_value(&mut self, name: &str, value: &str) -> Result<(), RecordError> {
        self.set_value_at(name, 0, value)
    }

    pub fn set_value_at(
        &mut self,
        name: &str,
        occurrence: usize,
        value: &str,
    ) -> Result<(), RecordError> {
        Ok(self.field_at_mut(name, occurrence)?.set_value(value)?)
    }

    pub fn set_raw(&mut self, name: &str, value: &str) -> Result<(), RecordError> {
        self.field_mut(name)?.set_raw(value);
        Ok(())
    }

    /// `name[occurrence]=[value]` per column.
    pub fn values_report(&self) -> String {
        self.columns
            .iter()
            .flat_map(|occurrences| occurrences.iter().enumerate())
            .map(|(n, f)| format!("{}[{}]=[{}]\n", f.name(), n, f.value()))
            .collect()
    }

    fn column(&self, name: &str) -> Result<&Vec<Field>, RecordError> {
        match self.index.get(name) {
            Some(&i) => Ok(&self.columns[i]),
            None => Err(self.unknown(name)),
        }
    }

    fn malformed(&self, message: impl fmt::Display) -> RecordError {
        RecordError::MalformedLine {
            record: self.name.clone(),
            message: message.to_string(),
        }
    }

    fn unknown(&self, name: &str) -> RecordError {
        RecordError::UnknownField {
            record: self.name.clone(),
            name: name.to_string(),
        }
    }

    fn unknown_occurrence(&self, name: &str, occurrence: usize) -> RecordError {
        RecordError::UnknownOccurrence {
            record: self.name.clone(),
            name: name.to_string(),
            occurrence,
        }
    }
}

impl FieldSet for CsvRecord {
    fn fields(&self) -> impl Iterator<Item = &Field> {
        self.columns.iter().flatten()
    }

    fn fields_mut(&mut self) -> impl Iterator<Item = &mut Field> {
        self.columns.iter_mut().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RecordErrorCode;
    use crate::field::FieldSpec;

    fn car() -> RecordSpec {
        RecordSpec::new("car")
            .field(FieldSpec::alphanumeric("brand", 0))
            .field(FieldSpec::alphanumeric("model", 0))
            .field(FieldSpec::numeric("year", 0))
            .field(FieldSpec::alphanumeric("city", 0))
    }

    #[test]
    fn test_render_unquoted_and_quoted() {
        let mut record = CsvRecord::new(&car(), Way::Out, CsvOptions::default()).unwrap();
        record.set("brand", "Citroen").unwrap();
        record.set("model", "C3 Picasso").unwrap();
        record.set("year", 2011).unwrap();
        record.set("city", "Paris, France").unwrap();
        assert_eq!(
            record.render().unwrap(),
            r#"Citroen,C3 Picasso,2011,"Paris, France""#
        );
        assert_eq!(record.length().unwrap(), 39);
    }

    #[test]
    fn test_quotes_are_doubled() {
        let mut record = CsvRecord::new(&car(), Way::Out, CsvOptions::default()).unwrap();
        record.set_value("model", r#"the "best""#).unwrap();
        assert_eq!(record.render().unwrap(), r#","the ""best""",,"#);

        let parsed = CsvRecord::from_line(&car(), Way::In, CsvOptions::default(), &record.render().unwrap())
            .unwrap();
        assert_eq!(parsed.value("model").unwrap(), r#"the "best""#);
    }

    #[test]
    fn test_enclose_all_with_other_options() {
        let options = CsvOptions::default()
            .separator(Separator::Semicolon)
            .enclosing(Enclosing::SingleQuote)
            .enclose_all(true);
        let mut record = CsvRecord::new(&car(), Way::Out, options).unwrap();
        record.set("brand", "Fiat").unwrap();
        record.set("model", "Panda 4x4").unwrap();
        record.set("year", 1990).unwrap();
        assert_eq!(record.render().unwrap(), "'Fiat';'Panda 4x4';'1990';''");
    }

    #[test]
    fn test_parse_enclosed_separator() {
        let record = CsvRecord::from_line(
            &car(),
            Way::In,
            CsvOptions::default(),
            r#"Renault,"Clio, RS",2019,Lyon"#,
        )
        .unwrap();
        assert_eq!(record.value("model").unwrap(), "Clio, RS");
        assert_eq!(record.get("year").unwrap(), Some(Value::Integer(2019)));
    }

    #[test]
    fn test_parse_fewer_columns() {
        let record = CsvRecord::from_line(&car(), Way::In, CsvOptions::default(), "Lancia,Delta").unwrap();
        assert_eq!(record.value("model").unwrap(), "Delta");
        assert_eq!(record.get("year").unwrap(), None);
        assert_eq!(record.value("city").unwrap(), "");
    }

    #[test]
    fn test_parse_errors() {
        let err = CsvRecord::from_line(&car(), Way::In, CsvOptions::default(), "a,b,1,c,d").unwrap_err();
        assert_eq!(err.code(), RecordErrorCode::ColumnCount);

        let err = CsvRecord::from_line(&car(), Way::In, CsvOptions::default(), "a,b\nc,d").unwrap_err();
        assert_eq!(err.code(), RecordErrorCode::MalformedLine);
        assert!(matches!(err, RecordError::MalformedLine { .. }));
    }

    #[test]
    fn test_embedded_line_break_is_enclosed() {
        let mut record = CsvRecord::new(&car(), Way::Out, CsvOptions::default()).unwrap();
        record.set_value("city", "Turin\nItaly").unwrap();
        let line = record.render().unwrap();
        assert_eq!(line, ",,,\"Turin\nItaly\"");

        let parsed = CsvRecord::from_line(&car(), Way::In, CsvOptions::default(), &line).unwrap();
        assert_eq!(parsed.value("city").unwrap(), "Turin\nItaly");
    }

    #[test]
    fn test_options_that_cannot_round_trip_are_rejected() {
        let unusable = [
            Separator::Other('"'),
            Separator::Other('\n'),
            Separator::Other('\r'),
            Separator::Other('§'),
        ];
        for separator in unusable {
            let options = CsvOptions::default().separator(separator);
            let err = CsvRecord::new(&car(), Way::Out, options).unwrap_err();
            assert_eq!(err.code(), RecordErrorCode::InvalidOptions);
            assert_eq!(err.code().as_u16(), 213);
        }

        let single = CsvOptions::default()
            .separator(Separator::Other('\''))
            .enclosing(Enclosing::SingleQuote);
        assert!(CsvRecord::new(&car(), Way::Out, single).is_err());

        let swapped = CsvOptions::default()
            .separator(Separator::Other('"'))
            .enclosing(Enclosing::SingleQuote);
        let mut record = CsvRecord::new(&car(), Way::Out, swapped).unwrap();
        record.set_value("brand", "a\"b").unwrap();
        let line = record.render().unwrap();
        let parsed = CsvRecord::from_line(&car(), Way::In, swapped, &line).unwrap();
        assert_eq!(parsed.value("brand").unwrap(), "a\"b");
    }

    #[test]
    fn test_tab_and_custom_separator() {
        let tab = CsvOptions::default().separator(Separator::Tab);
        let record = CsvRecord::from_line(&car(), Way::In, tab, "a\tb c\t7\td").unwrap();
        assert_eq!(record.value("model").unwrap(), "b c");

        let pipe = CsvOptions::default().separator(Separator::Other('|'));
        let mut record = CsvRecord::new(&car(), Way::Out, pipe).unwrap();
        record.set("city", "x|y").unwrap();
        assert_eq!(record.render().unwrap(), r#"|||"x|y""#);
    }

    #[test]
    fn test_occurrences() {
        let spec = RecordSpec::new("flags")
            .field(FieldSpec::alphanumeric("id", 0))
            .field(FieldSpec::numeric("flag", 1).occurs(3));
        let mut record = CsvRecord::from_line(&spec, Way::In, CsvOptions::default(), "x,1,0,1").unwrap();
        assert_eq!(record.column_count(), 4);
        assert_eq!(record.occurrences("flag").unwrap(), 3);
        assert_eq!(record.value_at("flag", 2).unwrap(), "1");
        assert_eq!(record.get_at("flag", 1).unwrap(), Some(Value::Integer(0)));

        record.set_value_at("flag", 1, "1").unwrap();
        record.set_at("flag", 0, 0).unwrap();
        assert_eq!(record.render().unwrap(), "x,0,1,1");

        let err = record.field_at("flag", 3).unwrap_err();
        assert_eq!(err.code(), RecordErrorCode::UnknownOccurrence);
        assert_eq!(record.values_report().lines().count(), 4);
    }

    #[test]
    fn test_zero_occurs_is_rejected() {
        let spec = RecordSpec::new("r").field(FieldSpec::alphanumeric("a", 0).occurs(0));
        let err = CsvRecord::new(&spec, Way::In, CsvOptions::default()).unwrap_err();
        assert_eq!(err.code(), RecordErrorCode::UnknownOccurrence);
    }

    #[test]
    fn test_invalid_field_blocks_render() {
        let mut record = CsvRecord::from_line(&car(), Way::In, CsvOptions::default(), "a,b,19x0,c").unwrap();
        assert!(record.has_errors());
        assert_eq!(record.render().unwrap_err().code(), RecordErrorCode::InvalidFields);
        record.set("year", 1990).unwrap();
        assert_eq!(record.render().unwrap(), "a,b,1990,c");
    }

    #[test]
    fn test_fixed_length_columns_render_unpadded() {
        let spec = RecordSpec::new("r")
            .field(FieldSpec::alphanumeric("a", 5))
            .field(FieldSpec::numeric("n", 4));
        let mut record = CsvRecord::new(&spec, Way::Out, CsvOptions::default()).unwrap();
        record.set("a", "ab").unwrap();
        record.set("n", 12).unwrap();
        assert_eq!(record.field("n").unwrap().value(), "0012");
        assert_eq!(record.render().unwrap(), "ab,12");
    }

    #[test]
    fn test_text_operations() {
        let mut record = CsvRecord::from_line(&car(), Way::In, CsvOptions::default(), "škoda,fábia,2005,brno").unwrap();
        record.normalize();
        assert_eq!(record.render().unwrap(), "SKODA,FABIA,2005,BRNO");
    }
}
