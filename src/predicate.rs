use std::fmt;

use crate::{ast::ComparisonOp, path::AttributePath, value::Value};

/// Relational operator of a compiled comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl CompareOp {
    pub fn name(self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Ne => "ne",
            CompareOp::Gt => "gt",
            CompareOp::Lt => "lt",
            CompareOp::Ge => "ge",
            CompareOp::Le => "le",
        }
    }
}

impl From<ComparisonOp> for CompareOp {
    fn from(op: ComparisonOp) -> Self {
        match op {
            ComparisonOp::Equal => CompareOp::Eq,
            ComparisonOp::NotEqual => CompareOp::Ne,
            ComparisonOp::GreaterThan => CompareOp::Gt,
            ComparisonOp::LessThan => CompareOp::Lt,
            ComparisonOp::GreaterEqual => CompareOp::Ge,
            ComparisonOp::LessEqual => CompareOp::Le,
        }
    }
}

/// A case-sensitive SQL `LIKE` pattern.
///
/// `%` matches any run of characters, `_` exactly one, and
/// [`LikePattern::ESCAPE`] makes the following character literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LikePattern(String);

impl LikePattern {
    pub const ESCAPE: char = '\\';

    pub fn new(pattern: impl Into<String>) -> Self {
        LikePattern(pattern.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Equivalent anchored regular expression source.
    pub fn to_regex(&self) -> String {
        let mut out = String::from("^");
        let mut chars = self.0.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '%' => out.push_str("(?s:.*)"),
                '_' => out.push_str("(?s:.)"),
                c if c == Self::ESCAPE => {
                    if let Some(next) = chars.next() {
                        out.push_str(&regex::escape(&next.to_string()));
                    }
                }
                c => out.push_str(&regex::escape(&c.to_string())),
            }
        }
        out.push('$');
        out
    }
}

impl fmt::Display for LikePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.0.replace('\'', "\\'"))
    }
}

/// Backend-agnostic boolean expression over entity attributes.
///
/// Leaves reference attributes through resolved [`AttributePath`]s. Hops
/// through collections are existential: an entity matches a leaf when some
/// element reached through the collection satisfies it.
///
/// # Examples
///
/// ```
/// use fiql_predicate::{Predicate, Value};
/// # use fiql_predicate::{path::{AttributePath, PathSegment}, model::{AttributeType, Multiplicity}, CompareOp};
/// # let name = AttributePath::new(vec![], PathSegment {
/// #     name: "name".into(), ty: AttributeType::String, multiplicity: Multiplicity::Single });
/// let chuck = Predicate::compare(name.clone(), CompareOp::Eq, Value::String("Chuck".into()));
/// let leo = Predicate::compare(name, CompareOp::Eq, Value::String("Leo".into()));
///
/// assert_eq!(
///     Predicate::or(chuck, leo).to_string(),
///     "or(eq(name, 'Chuck'), eq(name, 'Leo'))"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Conjunction
    And(Box<Predicate>, Box<Predicate>),

    /// Disjunction
    Or(Box<Predicate>, Box<Predicate>),

    /// Negation
    Not(Box<Predicate>),

    /// Attribute compared with a value
    ///
    /// # Example
    /// ```text
    /// eq(name, 'Max')
    /// gt(birthDate, 2012-08-31)
    /// ```
    Compare {
        path: AttributePath,
        op: CompareOp,
        value: Value,
    },

    /// String attribute matched against a pattern
    ///
    /// # Example
    /// ```text
    /// like(nicknames, '%ucky')
    /// ```
    Like {
        path: AttributePath,
        pattern: LikePattern,
        negated: bool,
    },

    /// Collection attribute holding an element equal to the value
    ///
    /// # Example
    /// ```text
    /// contains(nicknames, 'Chucky')
    /// ```
    Contains {
        path: AttributePath,
        value: Value,
        negated: bool,
    },

    /// Number of elements of a collection attribute compared with a value
    ///
    /// # Example
    /// ```text
    /// ge(size(visits), 2)
    /// ```
    Size {
        path: AttributePath,
        op: CompareOp,
        value: Value,
    },
}

impl Predicate {
    pub fn and(left: Predicate, right: Predicate) -> Self {
        Predicate::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Predicate, right: Predicate) -> Self {
        Predicate::Or(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }

    pub fn compare(path: AttributePath, op: CompareOp, value: Value) -> Self {
        Predicate::Compare { path, op, value }
    }

    /// Number of attribute comparisons in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Predicate::And(l, r) | Predicate::Or(l, r) => l.leaf_count() + r.leaf_count(),
            Predicate::Not(inner) => inner.leaf_count(),
            Predicate::Compare { .. }
            | Predicate::Like { .. }
            | Predicate::Contains { .. }
            | Predicate::Size { .. } => 1,
        }
    }

    /// Every attribute path referenced by the tree, left to right.
    pub fn paths(&self) -> Vec<&AttributePath> {
        let mut out = Vec::new();
        self.collect_paths(&mut out);
        out
    }

    fn collect_paths<'a>(&'a self, out: &mut Vec<&'a AttributePath>) {
        match self {
            Predicate::And(l, r) | Predicate::Or(l, r) => {
                l.collect_paths(out);
                r.collect_paths(out);
            }
            Predicate::Not(inner) => inner.collect_paths(out),
            Predicate::Compare { path, .. }
            | Predicate::Like { path, .. }
            | Predicate::Contains { path, .. }
            | Predicate::Size { path, .. } => out.push(path),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::And(l, r) => write!(f, "and({}, {})", l, r),
            Predicate::Or(l, r) => write!(f, "or({}, {})", l, r),
            Predicate::Not(inner) => write!(f, "not({})", inner),
            Predicate::Compare { path, op, value } => {
                write!(f, "{}({}, {})", op.name(), path, value)
            }
            Predicate::Like {
                path,
                pattern,
                negated,
            } => {
                let name = if *negated { "not_like" } else { "like" };
                write!(f, "{}({}, {})", name, path, pattern)
            }
            Predicate::Contains {
                path,
                value,
                negated,
            } => {
                let name = if *negated { "not_contains" } else { "contains" };
                write!(f, "{}({}, {})", name, path, value)
            }
            Predicate::Size { path, op, value } => {
                write!(f, "{}(size({}), {})", op.name(), path, value)
            }
        }
    }
}
