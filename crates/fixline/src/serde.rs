//! JSON-deserializable record description.
//!
//! These types describe the *layout* of a record. They are intended to be
//! loaded from a schema file shipped with your application and then
//! converted into [`RecordSpec`] / [`FieldSpec`] with `TryFrom`.
//!
//! Custom formats and validators are code and have no JSON form; attach
//! them to the converted specs with the builder methods.

use serde::{Deserialize, Serialize};

use crate::errors::FormatError;
use crate::field::{FieldKind, FieldSpec, Mandatory};
use crate::format::{BooleanFormat, DateFormat, DecimalFormat, DecimalSymbols};
use crate::property::Property;
use crate::record::RecordSpec;

/// Top-level record definition.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RecordDef {
    pub name: String,
    /// Declared line length; defaults to the sum of the field lengths.
    #[serde(default)]
    pub length: Option<usize>,
    /// Record-level properties (pads only in JSON).
    #[serde(default)]
    pub properties: Vec<PropertyDef>,
    /// Fields in wire order.
    pub fields: Vec<FieldDef>,
}

/// Description of a single field.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
    /// Length in chars; 0 infers it (fixed-width) or leaves it free (CSV).
    #[serde(default)]
    pub length: usize,
    #[serde(default)]
    pub mandatory: Mandatory,
    #[serde(default)]
    pub default_value: Option<String>,
    /// Number of repeated columns (CSV only).
    #[serde(default = "one")]
    pub occurs: usize,
    #[serde(default)]
    pub properties: Vec<PropertyDef>,
}

fn one() -> usize {
    1
}

/// Pad and format properties.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum PropertyDef {
    PadLeft {
        pad: String,
    },
    PadRight {
        pad: String,
    },
    /// Decimal pattern; separators default to `.` and `,`.
    Decimal {
        pattern: String,
        #[serde(default)]
        decimal_separator: Option<char>,
        #[serde(default)]
        grouping_separator: Option<char>,
    },
    RemoveDecimalSeparator,
    Date {
        pattern: String,
    },
    Boolean {
        true_value: String,
        false_value: String,
    },
}

impl TryFrom<&PropertyDef> for Property {
    type Error = FormatError;

    fn try_from(def: &PropertyDef) -> Result<Self, Self::Error> {
        Ok(match def {
            PropertyDef::PadLeft { pad } => Property::PadLeft(pad.clone()),
            PropertyDef::PadRight { pad } => Property::PadRight(pad.clone()),
            PropertyDef::Decimal {
                pattern,
                decimal_separator,
                grouping_separator,
            } => {
                let defaults = DecimalSymbols::default();
                let symbols = DecimalSymbols::new(
                    decimal_separator.unwrap_or(defaults.decimal_separator),
                    grouping_separator.unwrap_or(defaults.grouping_separator),
                );
                Property::Decimal(DecimalFormat::with_symbols(pattern, symbols)?)
            }
            PropertyDef::RemoveDecimalSeparator => Property::RemoveDecimalSeparator,
            PropertyDef::Date { pattern } => Property::Date(DateFormat::new(pattern)?),
            PropertyDef::Boolean {
                true_value,
                false_value,
            } => Property::Boolean(BooleanFormat::new(true_value, false_value)),
        })
    }
}

impl TryFrom<&FieldDef> for FieldSpec {
    type Error = FormatError;

    fn try_from(def: &FieldDef) -> Result<Self, Self::Error> {
        Ok(FieldSpec {
            name: def.name.clone(),
            kind: def.kind,
            length: def.length,
            mandatory: def.mandatory,
            default_value: def.default_value.clone(),
            occurs: def.occurs,
            properties: def
                .properties
                .iter()
                .map(Property::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl TryFrom<&RecordDef> for RecordSpec {
    type Error = FormatError;

    fn try_from(def: &RecordDef) -> Result<Self, Self::Error> {
        Ok(RecordSpec {
            name: def.name.clone(),
            length: def.length,
            properties: def
                .properties
                .iter()
                .map(Property::try_from)
                .collect::<Result<_, _>>()?,
            fields: def
                .fields
                .iter()
                .map(FieldSpec::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}
