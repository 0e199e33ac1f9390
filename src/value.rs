use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;

/// A typed literal carried by a compiled predicate.
///
/// # Type Preservation
///
/// The variant records the type the literal was coerced to, not the type of
/// the attribute it targets. The two differ only when the query forced a type
/// with a suffix (`2L`); a backend is free to reject such a comparison.
///
/// # Examples
///
/// ```
/// use fiql_predicate::Value;
///
/// assert_eq!(Value::Integer(2).to_string(), "2");
/// assert_eq!(Value::Long(2).to_string(), "2L");
/// assert_eq!(Value::String("Max".into()).to_string(), "'Max'");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 32-bit integer
    Integer(i32),

    /// 64-bit integer
    Long(i64),

    /// Double precision float
    Double(f64),

    /// Exact decimal
    Decimal(Decimal),

    /// UTF-8 string
    String(String),

    Boolean(bool),

    /// Calendar date
    Date(NaiveDate),

    /// Instant normalized to UTC
    DateTime(DateTime<Utc>),

    /// Symbolic enum constant
    Enum(String),
}

impl Value {
    /// Human-readable type name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Long(_) => "long",
            Value::Double(_) => "double",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Date(_) => "date",
            Value::DateTime(_) => "date-time",
            Value::Enum(_) => "enum",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Enum(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Long(n) => write!(f, "{}L", n),
            Value::Double(n) => write!(f, "{:?}D", n),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::String(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::DateTime(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Enum(name) => f.write_str(name),
        }
    }
}
