use std::{
    cmp::Ordering,
    collections::HashMap,
    str::FromStr,
    sync::{Mutex, PoisonError},
};

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value as Json;
use thiserror::Error;
use tracing::debug;

use crate::{
    coercion::parse_date_time,
    model::AttributeType,
    path::{AttributePath, PathSegment},
    predicate::{CompareOp, LikePattern, Predicate},
    value::Value,
};

/// Errors raised while executing a compiled predicate.
///
/// These are the failures a compile deliberately does not check for: the
/// predicate is well formed, but this backend cannot evaluate it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionError {
    /// Attribute and literal have different value types
    #[error("type mismatch on '{path}': cannot compare {field} with {literal}")]
    TypeMismatch {
        path: String,
        field: &'static str,
        literal: &'static str,
    },

    /// Collection sizes are counted as integers
    #[error("size of '{path}' must be compared with an integer, got {literal}")]
    InvalidSizeArgument { path: String, literal: &'static str },

    /// Stored data does not match the declared attribute type
    #[error("field '{path}' is declared as {expected} but holds {found}")]
    InvalidField {
        path: String,
        expected: String,
        found: String,
    },

    #[error("invalid like pattern {pattern}: {reason}")]
    Pattern { pattern: String, reason: String },
}

/// Three-valued truth, as used by SQL backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truth {
    True,
    False,
    /// A comparison involved a missing value
    Unknown,
}

impl Truth {
    pub fn and(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::False, _) | (_, Truth::False) => Truth::False,
            (Truth::True, Truth::True) => Truth::True,
            _ => Truth::Unknown,
        }
    }

    pub fn or(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::True, _) | (_, Truth::True) => Truth::True,
            (Truth::False, Truth::False) => Truth::False,
            _ => Truth::Unknown,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Truth {
        match self {
            Truth::True => Truth::False,
            Truth::False => Truth::True,
            Truth::Unknown => Truth::Unknown,
        }
    }

    /// True if any item is true; otherwise unknown if any is unknown.
    fn any<I: IntoIterator<Item = Result<Truth, ExecutionError>>>(
        items: I,
    ) -> Result<Truth, ExecutionError> {
        let mut result = Truth::False;
        for item in items {
            result = result.or(item?);
            if result == Truth::True {
                break;
            }
        }
        Ok(result)
    }
}

impl From<bool> for Truth {
    fn from(b: bool) -> Self {
        if b { Truth::True } else { Truth::False }
    }
}

/// Reference backend that runs predicates against JSON records.
///
/// Records are JSON objects keyed by attribute name. A record matches when
/// its predicate evaluates to [`Truth::True`]: hops through collections are
/// existential, and comparisons with missing values are unknown.
///
/// Comparisons are strictly typed. A field is read with its declared type and
/// must meet a literal of the same value type; anything else fails here, at
/// execution, rather than at compile time.
///
/// # Examples
///
/// ```
/// use fiql_predicate::{Evaluator, PredicateVisitor, VisitorConfig};
/// use fiql_predicate::model::{AttributeType, EntityType, Schema};
/// use serde_json::json;
///
/// let schema = Schema::new().register(
///     EntityType::new("Pet").attribute("name", AttributeType::String),
/// );
/// let visitor = PredicateVisitor::new(&schema, "Pet");
/// let predicate = visitor.compile("name=='*uck*'", &VisitorConfig::new(["name"])).unwrap();
///
/// let pets = vec![json!({"name": "Chuck"}), json!({"name": "Max"})];
/// let matched = Evaluator::new().filter(&predicate, &pets).unwrap();
/// assert_eq!(matched, vec![&pets[0]]);
/// ```
/// One evaluator can be shared between threads; compiled patterns are
/// cached behind a lock.
#[derive(Default)]
pub struct Evaluator {
    /// Compiled like patterns, keyed by pattern text
    patterns: Mutex<HashMap<String, Regex>>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `record` satisfies `predicate`.
    pub fn matches(&self, predicate: &Predicate, record: &Json) -> Result<bool, ExecutionError> {
        Ok(self.eval(predicate, record)? == Truth::True)
    }

    /// The records that satisfy `predicate`, in input order.
    pub fn filter<'r>(
        &self,
        predicate: &Predicate,
        records: &'r [Json],
    ) -> Result<Vec<&'r Json>, ExecutionError> {
        let mut matched = Vec::new();
        for record in records {
            if self.matches(predicate, record)? {
                matched.push(record);
            }
        }
        debug!(predicate = %predicate, records = records.len(), matched = matched.len(), "filtered records");
        Ok(matched)
    }

    /// Evaluate `predicate` against `record` with three-valued logic.
    pub fn eval(&self, predicate: &Predicate, record: &Json) -> Result<Truth, ExecutionError> {
        match predicate {
            Predicate::And(left, right) => {
                let left = self.eval(left, record)?;
                if left == Truth::False {
                    return Ok(Truth::False);
                }
                Ok(left.and(self.eval(right, record)?))
            }
            Predicate::Or(left, right) => {
                let left = self.eval(left, record)?;
                if left == Truth::True {
                    return Ok(Truth::True);
                }
                Ok(left.or(self.eval(right, record)?))
            }
            Predicate::Not(inner) => Ok(self.eval(inner, record)?.not()),
            Predicate::Compare { path, op, value } => {
                let fields = reach_values(record, path)?;
                Truth::any(fields.into_iter().map(|field| {
                    compare_field(field, path, |field| compare(field, *op, value, path))
                }))
            }
            Predicate::Contains {
                path,
                value,
                negated,
            } => {
                let fields = reach_values(record, path)?;
                let found = Truth::any(fields.into_iter().map(|field| {
                    compare_field(field, path, |field| compare(field, CompareOp::Eq, value, path))
                }))?;
                Ok(if *negated { found.not() } else { found })
            }
            Predicate::Like {
                path,
                pattern,
                negated,
            } => {
                let regex = self.regex(pattern)?;
                let fields = reach_values(record, path)?;
                let found = Truth::any(fields.into_iter().map(|field| {
                    compare_field(field, path, |field| match field {
                        Value::String(s) => Ok(regex.is_match(&s)),
                        other => Err(ExecutionError::TypeMismatch {
                            path: path.selector(),
                            field: other.type_name(),
                            literal: "string pattern",
                        }),
                    })
                }))?;
                Ok(if *negated { found.not() } else { found })
            }
            Predicate::Size { path, op, value } => {
                let expected = match value {
                    Value::Integer(n) => i64::from(*n),
                    other => {
                        return Err(ExecutionError::InvalidSizeArgument {
                            path: path.selector(),
                            literal: other.type_name(),
                        });
                    }
                };
                let counts = reach_collections(record, path)?;
                Truth::any(counts.into_iter().map(|count| {
                    Ok(Truth::from(ordering_holds(*op, count.cmp(&expected))))
                }))
            }
        }
    }

    fn regex(&self, pattern: &LikePattern) -> Result<Regex, ExecutionError> {
        let mut patterns = self.patterns.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(regex) = patterns.get(pattern.as_str()) {
            return Ok(regex.clone());
        }
        let regex = Regex::new(&pattern.to_regex()).map_err(|e| ExecutionError::Pattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        patterns.insert(pattern.as_str().to_string(), regex.clone());
        Ok(regex)
    }
}

/// Read a reached JSON value with the target's declared type and apply `test`.
fn compare_field<F>(field: Option<&Json>, path: &AttributePath, test: F) -> Result<Truth, ExecutionError>
where
    F: FnOnce(Value) -> Result<bool, ExecutionError>,
{
    match field {
        None => Ok(Truth::Unknown),
        Some(json) => match read_field(json, path)? {
            None => Ok(Truth::Unknown),
            Some(value) => test(value).map(Truth::from),
        },
    }
}

/// Objects reached by following the hops of `path`; `None` marks a null hop.
///
/// Only null or missing fields end a hop. Any other value that is not an
/// object (or, for collections, an array of objects) is invalid data.
fn reach_parents<'r>(
    record: &'r Json,
    path: &AttributePath,
) -> Result<Vec<Option<&'r Json>>, ExecutionError> {
    let mut frontier = vec![Some(record)];
    for hop in path.hops() {
        let mut next = Vec::new();
        for object in frontier {
            let field = object.and_then(|o| o.get(&hop.name)).filter(|f| !f.is_null());
            match field {
                None if hop.is_collection() => {}
                None => next.push(None),
                Some(Json::Array(items)) if hop.is_collection() => {
                    for item in items {
                        next.push(entity(item, hop, path)?);
                    }
                }
                Some(value) if hop.is_collection() => {
                    return Err(invalid_field(path, collection_of(&hop.ty), value));
                }
                Some(value) => next.push(entity(value, hop, path)?),
            }
        }
        frontier = next;
    }
    Ok(frontier)
}

fn entity<'r>(
    value: &'r Json,
    hop: &PathSegment,
    path: &AttributePath,
) -> Result<Option<&'r Json>, ExecutionError> {
    match value {
        Json::Null => Ok(None),
        Json::Object(_) => Ok(Some(value)),
        other => Err(invalid_field(path, hop.ty.to_string(), other)),
    }
}

/// Values of the target attribute; collection targets contribute each element.
fn reach_values<'r>(
    record: &'r Json,
    path: &AttributePath,
) -> Result<Vec<Option<&'r Json>>, ExecutionError> {
    let name = &path.target().name;
    let mut values = Vec::new();
    for parent in reach_parents(record, path)? {
        let field = parent.and_then(|p| p.get(name)).filter(|f| !f.is_null());
        if !path.is_collection_valued() {
            values.push(field);
            continue;
        }
        match field {
            None => {}
            Some(Json::Array(items)) => values.extend(items.iter().map(Some)),
            Some(other) => {
                return Err(invalid_field(path, collection_of(path.target_type()), other));
            }
        }
    }
    Ok(values)
}

/// Sizes of the target collection, one per reached parent. Null counts as empty.
fn reach_collections(record: &Json, path: &AttributePath) -> Result<Vec<i64>, ExecutionError> {
    let name = &path.target().name;
    let mut counts = Vec::new();
    for parent in reach_parents(record, path)?.into_iter().flatten() {
        let count = match parent.get(name) {
            None | Some(Json::Null) => 0,
            Some(Json::Array(items)) => items.len() as i64,
            Some(other) => {
                return Err(invalid_field(path, collection_of(path.target_type()), other));
            }
        };
        counts.push(count);
    }
    Ok(counts)
}

fn collection_of(ty: &AttributeType) -> String {
    format!("a collection of {}", ty)
}

fn invalid_field(path: &AttributePath, expected: String, found: &Json) -> ExecutionError {
    ExecutionError::InvalidField {
        path: path.selector(),
        expected,
        found: found.to_string(),
    }
}

/// Read a stored JSON value as the declared type of the path's target.
fn read_field(json: &Json, path: &AttributePath) -> Result<Option<Value>, ExecutionError> {
    let ty = path.target_type();
    let invalid = || invalid_field(path, ty.to_string(), json);

    let value = match (ty, json) {
        (_, Json::Null) => return Ok(None),
        (AttributeType::String, Json::String(s)) => Value::String(s.clone()),
        (AttributeType::Integer, Json::Number(n)) => n
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Value::Integer)
            .ok_or_else(invalid)?,
        (AttributeType::Long, Json::Number(n)) => n.as_i64().map(Value::Long).ok_or_else(invalid)?,
        (AttributeType::Double, Json::Number(n)) => {
            n.as_f64().map(Value::Double).ok_or_else(invalid)?
        }
        (AttributeType::Decimal, Json::Number(n)) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .map(Value::Decimal)
            .map_err(|_| invalid())?,
        (AttributeType::Decimal, Json::String(s)) => {
            Decimal::from_str(s).map(Value::Decimal).map_err(|_| invalid())?
        }
        (AttributeType::Boolean, Json::Bool(b)) => Value::Boolean(*b),
        (AttributeType::Date, Json::String(s)) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Value::Date)
            .map_err(|_| invalid())?,
        (AttributeType::DateTime, Json::String(s)) => {
            parse_date_time(s).map(Value::DateTime).ok_or_else(invalid)?
        }
        (AttributeType::Enum { variants, .. }, Json::String(s)) if variants.contains(s) => {
            Value::Enum(s.clone())
        }
        _ => return Err(invalid()),
    };
    Ok(Some(value))
}

fn compare(field: Value, op: CompareOp, literal: &Value, path: &AttributePath) -> Result<bool, ExecutionError> {
    let ordering = match (&field, literal) {
        (Value::Integer(a), Value::Integer(b)) => a.partial_cmp(b),
        (Value::Long(a), Value::Long(b)) => a.partial_cmp(b),
        (Value::Double(a), Value::Double(b)) => a.partial_cmp(b),
        (Value::Decimal(a), Value::Decimal(b)) => a.partial_cmp(b),
        (Value::String(a), Value::String(b)) => a.partial_cmp(b),
        (Value::Boolean(a), Value::Boolean(b)) => a.partial_cmp(b),
        (Value::Date(a), Value::Date(b)) => a.partial_cmp(b),
        (Value::DateTime(a), Value::DateTime(b)) => a.partial_cmp(b),
        (Value::Enum(a), Value::Enum(b)) if matches!(op, CompareOp::Eq | CompareOp::Ne) => {
            a.partial_cmp(b)
        }
        _ => {
            return Err(ExecutionError::TypeMismatch {
                path: path.selector(),
                field: field.type_name(),
                literal: literal.type_name(),
            });
        }
    };

    // Only NaN is unordered, and it equals nothing.
    Ok(ordering.is_some_and(|o| ordering_holds(op, o)) || (ordering.is_none() && op == CompareOp::Ne))
}

fn ordering_holds(op: CompareOp, ordering: Ordering) -> bool {
    match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Ne => ordering != Ordering::Equal,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Ge => ordering != Ordering::Less,
        CompareOp::Le => ordering != Ordering::Greater,
    }
}
