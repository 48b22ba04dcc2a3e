//! # fixline
//!
//! A bidirectional codec for flat text records described by typed field
//! schemas.
//!
//! Declare fields with a length, a kind (alphanumeric or numeric), padding
//! and optional format plugins, then render typed values into one line of
//! text or parse a line back into typed values. Fixed-width records are
//! undelimited and have an exact length; CSV records join (possibly
//! repeated) fields with a separator and quote values when needed. Parsing
//! a fixed-width line and rendering it again reproduces the line exactly.
//!
//! ## Example
//!
//! ```
//! use fixline::field::{FieldSpec, Way};
//! use fixline::record::{Record, RecordSpec};
//! use fixline::value::Value;
//!
//! let spec = RecordSpec::new("person")
//!     .field(FieldSpec::alphanumeric("firstName", 10))
//!     .field(FieldSpec::numeric("age", 3));
//!
//! let mut record = Record::new(&spec, Way::Out).unwrap();
//! record.set("firstName", "Paolo").unwrap();
//! record.set("age", 51).unwrap();
//! assert_eq!(record.render().unwrap(), "Paolo     051");
//!
//! let parsed = Record::from_line(&spec, Way::In, "Mario     007").unwrap();
//! assert_eq!(parsed.get("age").unwrap(), Some(Value::Integer(7)));
//! ```

pub mod compiled;
pub mod csv;
pub mod errors;
pub mod field;
pub mod field_set;
pub mod format;
pub mod pad;
pub mod property;
pub mod record;
#[cfg(feature = "serde")]
pub mod serde;
pub mod text;
pub mod validation;
pub mod value;

pub use compiled::Field;
pub use csv::{CsvOptions, CsvRecord, Enclosing, Separator};
pub use errors::{FieldError, FormatError, RecordError};
pub use field::{FieldKind, FieldSpec, Mandatory, Way};
pub use field_set::FieldSet;
pub use record::{Record, RecordSpec};
pub use value::{FieldType, Value};
