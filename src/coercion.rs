//! Reading untyped literals as values of a declared attribute type.
//!
//! Coercion never narrows: text that would lose information when read as the
//! declared type is an error, not a best-effort conversion. An explicit type
//! suffix is the one exception to "the attribute decides"; it is honoured as
//! written and left for the backend to accept or reject.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::trace;

use crate::{
    ast::{Literal, TypeSuffix},
    model::AttributeType,
    predicate::LikePattern,
    value::Value,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

const OFFSET_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];

const NAIVE_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// A literal that cannot be read as the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot read '{text}' as {expected}: {reason}")]
pub struct CoercionError {
    pub text: String,
    pub expected: String,
    pub reason: String,
}

impl CoercionError {
    fn new(literal: &Literal, expected: impl ToString, reason: impl Into<String>) -> Self {
        CoercionError {
            text: literal.text.clone(),
            expected: expected.to_string(),
            reason: reason.into(),
        }
    }
}

/// Read `literal` as a value of `ty`.
///
/// # Examples
///
/// ```
/// use fiql_predicate::{ast::Literal, coercion::coerce, model::AttributeType, Value};
///
/// let value = coerce(&Literal::bare("2"), &AttributeType::Long).unwrap();
/// assert_eq!(value, Value::Long(2));
///
/// assert!(coerce(&Literal::bare("2.5"), &AttributeType::Integer).is_err());
/// ```
pub fn coerce(literal: &Literal, ty: &AttributeType) -> Result<Value, CoercionError> {
    let value = match ty {
        AttributeType::String => Ok(Value::String(verbatim(literal))),
        AttributeType::Integer
        | AttributeType::Long
        | AttributeType::Double
        | AttributeType::Decimal => coerce_number(literal, ty),
        AttributeType::Boolean => {
            reject_suffix(literal, ty)?;
            coerce_boolean(literal)
        }
        AttributeType::Date => {
            reject_suffix(literal, ty)?;
            coerce_date(literal)
        }
        AttributeType::DateTime => {
            reject_suffix(literal, ty)?;
            parse_date_time(&literal.text)
                .map(Value::DateTime)
                .ok_or_else(|| CoercionError::new(literal, ty, "not an ISO-8601 date or date-time"))
        }
        AttributeType::Enum { name, variants } => {
            reject_suffix(literal, ty)?;
            if variants.iter().any(|v| *v == literal.text) {
                Ok(Value::Enum(literal.text.clone()))
            } else {
                Err(CoercionError::new(
                    literal,
                    ty,
                    format!("no constant of {} is named '{}'", name, literal.text),
                ))
            }
        }
        AttributeType::Entity { .. } => Err(CoercionError::new(
            literal,
            ty,
            "entities cannot be written as literals",
        )),
    }?;

    trace!(literal = %literal, target = %ty, value = %value, "coerced literal");
    Ok(value)
}

/// Read `literal` as a collection size.
///
/// The text must be integral. Without a suffix it becomes an `Integer`; an
/// `L` suffix is kept as `Long` even though backends count with 32-bit
/// integers.
pub fn coerce_count(literal: &Literal) -> Result<Value, CoercionError> {
    const EXPECTED: &str = "a collection size";

    let count = literal
        .text
        .parse::<i64>()
        .map_err(|_| CoercionError::new(literal, EXPECTED, "not an integral number"))?;

    match literal.suffix {
        Some(TypeSuffix::Long) => Ok(Value::Long(count)),
        Some(TypeSuffix::Double) => Err(CoercionError::new(
            literal,
            EXPECTED,
            "a size cannot be a double",
        )),
        None => i32::try_from(count)
            .map(Value::Integer)
            .map_err(|_| CoercionError::new(literal, EXPECTED, "out of range for an integer")),
    }
}

/// Translate a string literal into a like pattern, or `None` when the
/// comparison is an exact match.
///
/// `*` becomes `%`; characters the pattern syntax reserves are escaped. With
/// `always_wildcard` the literal is wrapped into a "contains" pattern.
///
/// # Examples
/// ```text
/// '*ucky'  → %ucky
/// '*uck*'  → %uck%
/// 'uck'    → None, or %uck% when always_wildcard
/// '50%'    → None, or %50\%% when always_wildcard
/// ```
pub fn wildcard_pattern(literal: &Literal, always_wildcard: bool) -> Option<LikePattern> {
    let text = verbatim(literal);

    if always_wildcard {
        let core = translate_wildcards(text.trim_matches('*'));
        let pattern = if core.is_empty() {
            "%".to_string()
        } else {
            format!("%{}%", core)
        };
        return Some(LikePattern::new(pattern));
    }

    if literal.has_wildcard() {
        Some(LikePattern::new(translate_wildcards(&text)))
    } else {
        None
    }
}

fn translate_wildcards(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '*' => pattern.push('%'),
            c if c == LikePattern::ESCAPE || c == '%' || c == '_' => {
                pattern.push(LikePattern::ESCAPE);
                pattern.push(c);
            }
            c => pattern.push(c),
        }
    }
    pattern
}

/// The literal as typed, suffix included.
fn verbatim(literal: &Literal) -> String {
    match literal.suffix {
        Some(suffix) => format!("{}{}", literal.text, suffix.as_char()),
        None => literal.text.clone(),
    }
}

fn reject_suffix(literal: &Literal, ty: &AttributeType) -> Result<(), CoercionError> {
    match literal.suffix {
        Some(suffix) => Err(CoercionError::new(
            literal,
            ty,
            format!("type suffix '{}' only applies to numbers", suffix.as_char()),
        )),
        None => Ok(()),
    }
}

fn coerce_number(literal: &Literal, ty: &AttributeType) -> Result<Value, CoercionError> {
    let text = literal.text.as_str();

    match (literal.suffix, ty) {
        (Some(TypeSuffix::Long), _) | (None, AttributeType::Long) => text
            .parse::<i64>()
            .map(Value::Long)
            .map_err(|_| CoercionError::new(literal, "long", "not a 64-bit integer")),
        (Some(TypeSuffix::Double), _) | (None, AttributeType::Double) => match text.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Value::Double(n)),
            _ => Err(CoercionError::new(literal, "double", "not a finite number")),
        },
        (None, AttributeType::Integer) => text
            .parse::<i32>()
            .map(Value::Integer)
            .map_err(|_| CoercionError::new(literal, ty, "not a 32-bit integer")),
        (None, AttributeType::Decimal) => Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .map(Value::Decimal)
            .map_err(|_| CoercionError::new(literal, ty, "not a decimal number")),
        (None, other) => Err(CoercionError::new(literal, other, "not a numeric type")),
    }
}

fn coerce_boolean(literal: &Literal) -> Result<Value, CoercionError> {
    if literal.text.eq_ignore_ascii_case("true") {
        Ok(Value::Boolean(true))
    } else if literal.text.eq_ignore_ascii_case("false") {
        Ok(Value::Boolean(false))
    } else {
        Err(CoercionError::new(
            literal,
            AttributeType::Boolean,
            "expected 'true' or 'false'",
        ))
    }
}

fn coerce_date(literal: &Literal) -> Result<Value, CoercionError> {
    if literal.text.contains('T') {
        return Err(CoercionError::new(
            literal,
            AttributeType::Date,
            "a date-time would lose its time of day",
        ));
    }
    NaiveDate::parse_from_str(&literal.text, DATE_FORMAT)
        .map(Value::Date)
        .map_err(|e| CoercionError::new(literal, AttributeType::Date, e.to_string()))
}

/// Parse an ISO-8601 date-time, or a date read as the start of that day.
///
/// Offsets are honoured and the result is normalized to UTC; a date-time
/// without an offset is taken to be UTC already.
pub fn parse_date_time(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_DATE_TIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    let naive = text.strip_suffix('Z').unwrap_or(text);
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(dt.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}
