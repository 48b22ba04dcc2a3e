//! Field definitions used to build a [crate::record::RecordSpec].

use std::sync::Arc;

use crate::format::{BooleanFormat, CustomFormat, DateFormat, DecimalFormat};
use crate::property::Property;
use crate::validation::Validator;

/// Alphanumeric or numeric content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldKind {
    Alphanumeric,
    Numeric,
}

/// Direction a record travels; decides which mandatory policies apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Way {
    #[default]
    In,
    Out,
}

/// When an empty value is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mandatory {
    #[default]
    No,
    In,
    Out,
    InOut,
}

impl Mandatory {
    /// Whether the policy applies to a record travelling `way`.
    pub fn applies_to(self, way: Way) -> bool {
        match self {
            Mandatory::No => false,
            Mandatory::InOut => true,
            Mandatory::In => way == Way::In,
            Mandatory::Out => way == Way::Out,
        }
    }
}

/// Immutable schema of one field.
///
/// A length of 0 means the length is taken from the first value (fixed-width
/// records) or is unconstrained (CSV records).
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub length: usize,
    pub mandatory: Mandatory,
    pub default_value: Option<String>,
    /// Number of consecutive columns this field occupies (CSV records only).
    pub occurs: usize,
    pub properties: Vec<Property>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind, length: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            length,
            mandatory: Mandatory::No,
            default_value: None,
            occurs: 1,
            properties: Vec::new(),
        }
    }

    pub fn alphanumeric(name: impl Into<String>, length: usize) -> Self {
        Self::new(name, FieldKind::Alphanumeric, length)
    }

    pub fn numeric(name: impl Into<String>, length: usize) -> Self {
        Self::new(name, FieldKind::Numeric, length)
    }

    pub fn mandatory(mut self, mandatory: Mandatory) -> Self {
        self.mandatory = mandatory;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn occurs(mut self, occurs: usize) -> Self {
        self.occurs = occurs;
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

    pub fn decimal(self, format: DecimalFormat) -> Self {
        self.property(Property::Decimal(format))
    }

    pub fn remove_decimal_separator(self) -> Self {
        self.property(Property::RemoveDecimalSeparator)
    }

    pub fn date(self, format: DateFormat) -> Self {
        self.property(Property::Date(format))
    }

    pub fn boolean(self, format: BooleanFormat) -> Self {
        self.property(Property::Boolean(format))
    }

    pub fn custom(self, format: Arc<dyn CustomFormat>) -> Self {
        self.property(Property::Custom(format))
    }

    pub fn validator(self, validator: Arc<dyn Validator>) -> Self {
        self.property(Property::Validator(validator))
    }
}
