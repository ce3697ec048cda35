//! scalar values and cell coercion
//!
//! The tfvars output model contains the following scalar types
//! - boolean (true/false)
//! - integer (signed, currently: i64 - may change)
//! - decimal (currently: f64 - may change)
//! - string (utf-8)
//!
//! Additionally:
//! - there is no `null`/`None` value. An empty cell coerces to the empty string.
//! - coercion is total: every cell maps to exactly one scalar and never errors.
//!
//! Cells that arrive typed from the workbook keep their native kind. Textual
//! cells are re-read: `"20"` becomes integer 20, `"True"` boolean true,
//! `"gp3"` stays a string. Comparisons are case-insensitive on trimmed text.
use calamine::Data;
use serde::Serializer;

/// All scalar value types
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    String(String),
}

impl Scalar {
    /// Coerce cell text into the most specific scalar kind.
    ///
    /// Applied in order: boolean, integer, decimal, string. The string
    /// fallback keeps the trimmed text as-is; escaping happens at render
    /// time, not here.
    pub fn coerce(text: &str) -> Self {
        let trimmed = text.trim();

        if trimmed.eq_ignore_ascii_case("true") {
            return Scalar::Boolean(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Scalar::Boolean(false);
        }
        if let Ok(int) = trimmed.parse::<i64>() {
            return Scalar::Integer(int);
        }
        if let Ok(dec) = trimmed.parse::<f64>() {
            return Scalar::Decimal(dec);
        }

        Scalar::String(trimmed.to_string())
    }

    /// Plain (unquoted, unescaped) text form of the scalar
    pub fn to_plain_string(&self) -> String {
        match self {
            Scalar::Boolean(value) => value.to_string(),
            Scalar::Integer(value) => value.to_string(),
            Scalar::Decimal(value) => value.to_string(),
            Scalar::String(value) => value.clone(),
        }
    }
}

impl From<&Data> for Scalar {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Bool(value) => Scalar::Boolean(*value),
            Data::Int(value) => Scalar::Integer(*value),
            Data::Float(value) => Scalar::Decimal(*value),
            Data::String(text) => Scalar::coerce(text),
            Data::Empty => Scalar::String(String::new()),
            // dates, durations and cell errors degrade to their display form
            other => Scalar::coerce(&other.to_string()),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Boolean(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Decimal(value)
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl serde::ser::Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Scalar::Boolean(value) => serializer.serialize_bool(*value),
            Scalar::Integer(value) => serializer.serialize_i64(*value),
            Scalar::Decimal(value) => serializer.serialize_f64(*value),
            Scalar::String(value) => serializer.serialize_str(value),
        }
    }
}
