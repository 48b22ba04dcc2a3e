//! Extended properties: pad, format and validator plugins attached to a
//! field, either directly or inherited from the record.

use std::fmt;
use std::sync::Arc;

use crate::format::{BooleanFormat, CustomFormat, DateFormat, DecimalFormat};
use crate::validation::Validator;

/// One attached plugin.
#[derive(Debug, Clone)]
pub enum Property {
    /// Pad on the left with the given (single character) string.
    PadLeft(String),
    /// Pad on the right with the given (single character) string.
    PadRight(String),
    Decimal(DecimalFormat),
    /// Drop the decimal separator from the wire form (numeric + decimal only).
    RemoveDecimalSeparator,
    Date(DateFormat),
    Boolean(BooleanFormat),
    Custom(Arc<dyn CustomFormat>),
    Validator(Arc<dyn Validator>),
}

/// Property kinds used for merging and duplicate detection.
///
/// Left and right pads share the [`PropertyKind::Pad`] kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Pad,
    Decimal,
    RemoveDecimalSeparator,
    Date,
    Boolean,
    Custom,
    Validator,
}

impl PropertyKind {
    /// Kinds that may be declared once for a whole record.
    pub fn allowed_at_record_level(self) -> bool {
        matches!(self, PropertyKind::Pad | PropertyKind::Validator)
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PropertyKind::Pad => "pad",
            PropertyKind::Decimal => "decimal",
            PropertyKind::RemoveDecimalSeparator => "remove-decimal-separator",
            PropertyKind::Date => "date",
            PropertyKind::Boolean => "boolean",
            PropertyKind::Custom => "custom",
            PropertyKind::Validator => "validator",
        };
        f.write_str(s)
    }
}

impl Property {
    pub fn kind(&self) -> PropertyKind {
        match self {
            Property::PadLeft(_) | Property::PadRight(_) => PropertyKind::Pad,
            Property::Decimal(_) => PropertyKind::Decimal,
            Property::RemoveDecimalSeparator => PropertyKind::RemoveDecimalSeparator,
            Property::Date(_) => PropertyKind::Date,
            Property::Boolean(_) => PropertyKind::Boolean,
            Property::Custom(_) => PropertyKind::Custom,
            Property::Validator(_) => PropertyKind::Validator,
        }
    }
}

/// First record-level property whose kind is not allowed there.
pub fn illegal_record_property(record_properties: &[Property]) -> Option<PropertyKind> {
    record_properties
        .iter()
        .map(Property::kind)
        .find(|kind| !kind.allowed_at_record_level())
}

/// Merges record-level properties into a field's own list.
///
/// Every record-level kind the field does not declare itself is appended;
/// a kind the field declares keeps the field's instance.
pub fn resolve(record_properties: &[Property], field_properties: &[Property]) -> Vec<Property> {
    let mut resolved = field_properties.to_vec();
    for property in record_properties {
        let kind = property.kind();
        if !field_properties.iter().any(|p| p.kind() == kind) {
            resolved.push(property.clone());
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{FieldContext, ValidationInfo};

    #[derive(Debug)]
    struct AlwaysWarn;

    impl Validator for AlwaysWarn {
        fn validate(&self, _field: &FieldContext<'_>) -> ValidationInfo {
            ValidationInfo::warn(1, "warn")
        }
    }

    #[test]
    fn test_record_properties_are_injected() {
        let record = vec![
            Property::PadLeft("*".to_string()),
            Property::Validator(Arc::new(AlwaysWarn)),
        ];
        let resolved = resolve(&record, &[]);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].kind(), PropertyKind::Pad);
        assert_eq!(resolved[1].kind(), PropertyKind::Validator);
    }

    #[test]
    fn test_field_beats_record() {
        let record = vec![Property::PadLeft("*".to_string())];
        let field = vec![Property::PadRight("_".to_string())];
        let resolved = resolve(&record, &field);
        assert_eq!(resolved.len(), 1);
        assert!(matches!(&resolved[0], Property::PadRight(pad) if pad == "_"));
    }

    #[test]
    fn test_illegal_record_property() {
        let record = vec![
            Property::PadRight(" ".to_string()),
            Property::Boolean(BooleanFormat::default()),
        ];
        assert_eq!(illegal_record_property(&record), Some(PropertyKind::Boolean));
        assert_eq!(illegal_record_property(&record[..1]), None);
    }
}
