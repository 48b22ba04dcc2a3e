//! Operations shared by fixed-width and CSV records.

use crate::compiled::Field;
use crate::text;
use crate::validation::ValidationInfo;

/// A record viewed as its ordered fields.
///
/// Text operations only touch alphanumeric fields and go through the raw
/// path, so custom formats are not re-applied.
pub trait FieldSet {
    /// Fields in wire order.
    fn fields(&self) -> impl Iterator<Item = &Field>;

    fn fields_mut(&mut self) -> impl Iterator<Item = &mut Field>;

    /// Any field in ERROR status.
    fn has_errors(&self) -> bool {
        self.fields().any(|f| f.validation().is_error())
    }

    /// Any field in WARN status.
    fn has_warnings(&self) -> bool {
        self.fields().any(|f| f.validation().is_warn())
    }

    /// No field in ERROR status.
    fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// Every field in INFO status.
    fn all_info(&self) -> bool {
        self.fields().all(|f| f.validation().is_info())
    }

    fn reset_validation(&mut self) {
        self.fields_mut().for_each(Field::reset_validation);
    }

    /// Re-runs validation on every field.
    fn validate(&mut self) {
        self.fields_mut().for_each(|f| {
            f.validate();
        });
    }

    /// Name and outcome of every field that is not INFO.
    fn validation_issues(&self) -> Vec<(&str, &ValidationInfo)> {
        self.fields()
            .filter(|f| !f.validation().is_info())
            .map(|f| (f.name(), f.validation()))
            .collect()
    }

    /// One message per field that fails [`Field::ensure_valid`], joined with `; `.
    fn error_summary(&self) -> Option<String> {
        let details: Vec<String> = self
            .fields()
            .filter_map(|f| f.ensure_valid().err())
            .map(|e| e.to_string())
            .collect();

        if details.is_empty() {
            None
        } else {
            Some(details.join("; "))
        }
    }

    fn to_upper_case(&mut self) {
        self.map_text(text::to_upper);
    }

    fn to_lower_case(&mut self) {
        self.map_text(text::to_lower);
    }

    fn remove_accents(&mut self) {
        self.map_text(text::remove_accent);
    }

    fn to_ascii(&mut self) {
        self.map_text(text::to_ascii);
    }

    /// Accents removed, ASCII coerced, upper-cased.
    fn normalize(&mut self) {
        self.map_text(text::normalize);
    }

    fn map_text(&mut self, f: fn(char) -> char) {
        self.fields_mut().for_each(|field| field.map_chars(f));
    }
}
