//! Format plugins turning typed values into field text and back.
//!
//! - [`DecimalFormat`]: numeric pattern with locale symbols, used by numeric
//!   fields classified as double/float.
//! - [`DateFormat`]: strftime-style pattern over [`NaiveDateTime`].
//! - [`BooleanFormat`]: a pair of literals for `true` and `false`.
//! - [`CustomFormat`]: any user supplied string transform.
//!
//! Plugins are immutable once built and are shared between fields by
//! cloning (the custom trait objects sit behind an `Arc`).

use std::fmt::{self, Write as _};

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::FormatError;
use crate::pad;

/// Locale characters used by a [`DecimalFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalSymbols {
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl DecimalSymbols {
    pub const US: DecimalSymbols = DecimalSymbols {
        decimal_separator: '.',
        grouping_separator: ',',
    };

    pub const ITALY: DecimalSymbols = DecimalSymbols {
        decimal_separator: ',',
        grouping_separator: '.',
    };

    pub fn new(decimal_separator: char, grouping_separator: char) -> Self {
        Self {
            decimal_separator,
            grouping_separator,
        }
    }
}

impl Default for DecimalSymbols {
    fn default() -> Self {
        Self::US
    }
}

/// Numeric pattern such as `#,##0.00`.
///
/// `0` is a required digit, `#` an optional one, `,` marks the grouping
/// size and `.` the decimal point. The pattern is always written with `,`
/// and `.`; the characters that appear in formatted text come from the
/// [`DecimalSymbols`]. Formatting rounds half-even.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalFormat {
    pattern: String,
    min_integer_digits: usize,
    min_fraction_digits: u32,
    max_fraction_digits: u32,
    grouping_size: Option<usize>,
    symbols: DecimalSymbols,
}

impl DecimalFormat {
    /// Compiles `pattern` with US symbols.
    pub fn new(pattern: &str) -> Result<Self, FormatError> {
        Self::with_symbols(pattern, DecimalSymbols::US)
    }

    pub fn with_symbols(pattern: &str, symbols: DecimalSymbols) -> Result<Self, FormatError> {
        let invalid = || FormatError::InvalidDecimalPattern(pattern.to_string());

        if pattern.is_empty() {
            return Err(invalid());
        }

        let (int_part, frac_part) = match pattern.split_once('.') {
            Some((i, f)) => (i, f),
            None => (pattern, ""),
        };

        // Integer part: optional digits first, then required ones.
        let mut min_integer_digits = 0;
        let mut seen_zero = false;
        for c in int_part.chars() {
            match c {
                '#' if seen_zero => return Err(invalid()),
                '#' | ',' => {}
                '0' => {
                    seen_zero = true;
                    min_integer_digits += 1;
                }
                _ => return Err(invalid()),
            }
        }

        let grouping_size = match int_part.rfind(',') {
            Some(pos) => {
                let size = int_part[pos + 1..].len();
                if size == 0 {
                    return Err(invalid());
                }
                Some(size)
            }
            None => None,
        };

        // Fraction part: required digits first, then optional ones.
        let mut min_fraction_digits = 0u32;
        let mut max_fraction_digits = 0u32;
        let mut seen_hash = false;
        for c in frac_part.chars() {
            match c {
                '0' if seen_hash => return Err(invalid()),
                '0' => {
                    min_fraction_digits += 1;
                    max_fraction_digits += 1;
                }
                '#' => {
                    seen_hash = true;
                    max_fraction_digits += 1;
                }
                _ => return Err(invalid()),
            }
        }

        if int_part.chars().all(|c| c == ',') && max_fraction_digits == 0 {
            return Err(invalid());
        }

        Ok(Self {
            pattern: pattern.to_string(),
            min_integer_digits,
            min_fraction_digits,
            max_fraction_digits,
            grouping_size,
            symbols,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn symbols(&self) -> DecimalSymbols {
        self.symbols
    }

    pub fn min_fraction_digits(&self) -> u32 {
        self.min_fraction_digits
    }

    pub fn max_fraction_digits(&self) -> u32 {
        self.max_fraction_digits
    }

    /// Formats `value` according to the pattern.
    pub fn format(&self, value: Decimal) -> String {
        self.format_with(value, self.min_fraction_digits)
    }

    /// Formats `value` always showing `max_fraction_digits` fraction digits.
    ///
    /// Used when the decimal separator is dropped from the wire form, so the
    /// separator position can be recovered from the digit count alone.
    pub fn format_fixed(&self, value: Decimal) -> String {
        self.format_with(value, self.max_fraction_digits)
    }

    fn format_with(&self, value: Decimal, min_fraction_digits: u32) -> String {
        let rounded = value.round_dp_with_strategy(
            self.max_fraction_digits,
            RoundingStrategy::MidpointNearestEven,
        );
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let text = rounded.abs().to_string();
        let (int_text, frac_text) = text.split_once('.').unwrap_or((text.as_str(), ""));

        let mut frac = frac_text.to_string();
        while frac.len() > min_fraction_digits as usize && frac.ends_with('0') {
            frac.pop();
        }
        while frac.len() < min_fraction_digits as usize {
            frac.push('0');
        }

        let mut int = int_text.trim_start_matches('0').to_string();
        while int.len() < self.min_integer_digits {
            int.insert(0, '0');
        }
        if int.is_empty() && frac.is_empty() {
            int.push('0');
        }

        let mut out = String::with_capacity(int.len() + frac.len() + 4);
        if negative {
            out.push('-');
        }
        match self.grouping_size {
            Some(size) => {
                let digits = int.len();
                for (i, c) in int.chars().enumerate() {
                    if i > 0 && (digits - i) % size == 0 {
                        out.push(self.symbols.grouping_separator);
                    }
                    out.push(c);
                }
            }
            None => out.push_str(&int),
        }
        if !frac.is_empty() {
            out.push(self.symbols.decimal_separator);
            out.push_str(&frac);
        }
        out
    }

    /// Parses text produced by this format (grouping separators allowed).
    pub fn parse(&self, text: &str) -> Result<f64, FormatError> {
        self.plain_number(text)?
            .parse::<f64>()
            .map_err(|_| FormatError::Number {
                value: text.to_string(),
            })
    }

    /// Like [`DecimalFormat::parse`], keeping every digit.
    pub fn parse_decimal(&self, text: &str) -> Result<Decimal, FormatError> {
        self.plain_number(text)?
            .parse::<Decimal>()
            .map_err(|_| FormatError::Number {
                value: text.to_string(),
            })
    }

    /// Rewrites `text` as `[-]digits[.digits]`, dropping grouping separators.
    fn plain_number(&self, text: &str) -> Result<String, FormatError> {
        let mut normalized = String::with_capacity(text.len());
        for c in text.chars() {
            if c == self.symbols.decimal_separator {
                normalized.push('.');
            } else if self.grouping_size.is_some() && c == self.symbols.grouping_separator {
                continue;
            } else {
                normalized.push(c);
            }
        }

        let (sign, unsigned) = match normalized.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", normalized.strip_prefix('+').unwrap_or(&normalized)),
        };
        let (int, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let well_formed = !(int.is_empty() && frac.is_empty())
            && int.chars().all(|c| c.is_ascii_digit())
            && frac.chars().all(|c| c.is_ascii_digit());
        if !well_formed {
            return Err(FormatError::Number {
                value: text.to_string(),
            });
        }

        let int = if int.is_empty() { "0" } else { int };
        Ok(if frac.is_empty() {
            format!("{sign}{int}")
        } else {
            format!("{sign}{int}.{frac}")
        })
    }

    /// Puts the decimal separator back `max_fraction_digits` from the end.
    ///
    /// The sign is split off first so that `-5` with two fraction digits
    /// becomes `-0.05`, not `0-.05`.
    pub fn insert_separator(&self, text: &str) -> String {
        let frac = self.max_fraction_digits as usize;
        if frac == 0 {
            return text.to_string();
        }

        let (sign, digits) = match text.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", text.strip_prefix('+').unwrap_or(text)),
        };

        let mut digits = digits.to_string();
        while pad::char_len(&digits) <= frac {
            digits.insert(0, '0');
        }
        let (int, fraction) = pad::split_chars(&digits, pad::char_len(&digits) - frac);
        format!("{sign}{int}{}{fraction}", self.symbols.decimal_separator)
    }
}

/// Date pattern using strftime specifiers (`%Y%m%d`, `%d/%m/%Y %H:%M`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pattern: String,
}

impl DateFormat {
    pub fn new(pattern: &str) -> Result<Self, FormatError> {
        if pattern.is_empty() || StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            return Err(FormatError::InvalidDatePattern(pattern.to_string()));
        }

        Ok(Self {
            pattern: pattern.to_string(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn format(&self, value: &NaiveDateTime) -> Result<String, FormatError> {
        let mut out = String::new();
        write!(out, "{}", value.format(&self.pattern))
            .map_err(|_| FormatError::Unrepresentable(value.to_string()))?;
        Ok(out)
    }

    /// Parses a date-time, or a bare date at midnight when the pattern has no time.
    pub fn parse(&self, text: &str) -> Result<NaiveDateTime, FormatError> {
        if let Ok(value) = NaiveDateTime::parse_from_str(text, &self.pattern) {
            return Ok(value);
        }

        NaiveDate::parse_from_str(text, &self.pattern)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or_else(|| FormatError::Date {
                value: text.to_string(),
                pattern: self.pattern.clone(),
            })
    }
}

/// Literals written for `true` and `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanFormat {
    true_value: String,
    false_value: String,
}

impl BooleanFormat {
    pub fn new(true_value: impl Into<String>, false_value: impl Into<String>) -> Self {
        Self {
            true_value: true_value.into(),
            false_value: false_value.into(),
        }
    }

    pub fn true_value(&self) -> &str {
        &self.true_value
    }

    pub fn false_value(&self) -> &str {
        &self.false_value
    }

    pub fn format(&self, value: bool) -> &str {
        if value {
            &self.true_value
        } else {
            &self.false_value
        }
    }

    pub fn parse(&self, text: &str) -> Result<bool, FormatError> {
        if text == self.true_value {
            Ok(true)
        } else if text == self.false_value {
            Ok(false)
        } else {
            Err(FormatError::Boolean {
                value: text.to_string(),
                true_value: self.true_value.clone(),
                false_value: self.false_value.clone(),
            })
        }
    }
}

impl Default for BooleanFormat {
    fn default() -> Self {
        Self::new("true", "false")
    }
}

/// A user supplied transform between a logical string and its wire text.
pub trait CustomFormat: fmt::Debug + Send + Sync {
    /// Logical value to wire text, before padding.
    fn format(&self, value: &str) -> Result<String, FormatError>;

    /// Wire text, after padding is removed, back to the logical value.
    fn parse(&self, value: &str) -> Result<String, FormatError>;
}
