// ARFF (Attribute-Relation File Format) loading for Weka experimenter results
//
// The experimenter writes one row per (dataset, scheme, run, fold) with the
// classifier identity in `Key_Scheme` and the accuracy in `Percent_correct`.
// Dataset keys sometimes carry filter options with embedded commas inside the
// nominal declaration; `repair` rewrites that one literal before parsing.
//
// Supported subset:
// - @relation / @attribute / @data directives (case-insensitive)
// - numeric, real, integer, string, date and nominal attribute types
// - dense rows and sparse `{index value, ...}` rows
// - quoted values with backslash escapes, `?` for missing values

mod parser;
mod repair;

pub use parser::parse;
pub use repair::{repair_dataset_commas, Repair};

use std::fmt;
use thiserror::Error;

/// Errors raised while parsing ARFF text
///
/// Every variant tied to a location carries the 1-based line number.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArffError {
    #[error("line {line}: unexpected content outside @data: '{content}'")]
    UnexpectedContent { line: usize, content: String },

    #[error("line {line}: malformed @attribute declaration: {reason}")]
    BadAttribute { line: usize, reason: String },

    #[error("line {line}: unsupported attribute type '{kind}'")]
    UnsupportedType { line: usize, kind: String },

    #[error("line {line}: duplicate attribute '{name}'")]
    DuplicateAttribute { line: usize, name: String },

    #[error("line {line}: unterminated quoted value")]
    UnterminatedQuote { line: usize },

    #[error("line {line}: trailing characters after quoted value")]
    TrailingCharacters { line: usize },

    #[error("line {line}: expected {expected} values, found {found}")]
    BadDataFormat {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: '{value}' is not a valid number for attribute '{attribute}'")]
    BadNumeric {
        line: usize,
        attribute: String,
        value: String,
    },

    #[error("line {line}: '{value}' is not a declared value of nominal attribute '{attribute}'")]
    BadNominal {
        line: usize,
        attribute: String,
        value: String,
    },

    #[error("line {line}: malformed sparse entry '{entry}'")]
    BadSparseEntry { line: usize, entry: String },

    #[error("no @relation declaration found")]
    MissingRelation,

    #[error("no attributes declared before @data")]
    NoAttributes,

    #[error("no @data section found")]
    MissingData,
}

/// Declared type of an attribute
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeType {
    /// `numeric`, `real` or `integer`
    Numeric,
    /// `string`
    String,
    /// `date` with an optional format pattern
    Date(Option<String>),
    /// `{a, b, c}`
    Nominal(Vec<String>),
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeType::Numeric => write!(f, "numeric"),
            AttributeType::String => write!(f, "string"),
            AttributeType::Date(Some(format)) => write!(f, "date '{}'", format),
            AttributeType::Date(None) => write!(f, "date"),
            AttributeType::Nominal(values) => write!(f, "{{{}}}", values.join(",")),
        }
    }
}

/// Attribute descriptor: name and declared type
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeType,
}

/// A single cell of a data row
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Numeric(f64),
    Nominal(String),
    String(String),
    Date(String),
    Missing,
}

impl Value {
    /// Numeric payload, if any
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    /// Textual payload of nominal, string and date values
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Nominal(s) | Value::String(s) | Value::Date(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Numeric(v) => write!(f, "{}", v),
            Value::Nominal(s) | Value::String(s) | Value::Date(s) => write!(f, "{}", s),
            Value::Missing => write!(f, "?"),
        }
    }
}

/// Parsed ARFF file
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub relation: String,
    pub attributes: Vec<Attribute>,
    /// Rows positionally aligned with `attributes`
    pub rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// Index of the attribute with exactly this name
    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests;
