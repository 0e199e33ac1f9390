use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    ast::{ComparisonOp, Literal, LogicalOp, Node},
    coercion::{self, CoercionError},
    config::VisitorConfig,
    model::{AttributeType, EntityModel},
    parser::{self, MAX_DEPTH, ParseError},
    path::{self, AttributePath},
    predicate::Predicate,
};

/// Broad class of a compile failure.
///
/// Every class is an invalid argument from the caller's point of view; the
/// distinction is kept for logging and for API error mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Selector outside the allow-list
    Authorization,
    /// Selector that does not name an attribute
    Resolution,
    /// Literal that cannot be read as the attribute's type
    Coercion,
    /// Operator that has no meaning for the attribute's type
    Unsupported,
    /// Tree too deep to compile
    Limit,
}

/// Errors that abort a compile. No partial predicate is ever returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VisitError {
    #[error("selector '{selector}' is not allowed")]
    SelectorNotAllowed { selector: String },

    #[error("entity '{0}' is not registered")]
    UnknownEntity(String),

    #[error("selector '{selector}': {entity} has no attribute '{segment}'")]
    UnknownAttribute {
        selector: String,
        entity: String,
        segment: String,
    },

    #[error("selector '{selector}': '{segment}' is a {ty} and cannot be traversed")]
    NotTraversable {
        selector: String,
        segment: String,
        ty: AttributeType,
    },

    #[error("selector '{selector}': {source}")]
    Coercion {
        selector: String,
        #[source]
        source: CoercionError,
    },

    #[error("selector '{selector}': operator {op} is not supported on {target}")]
    UnsupportedOperator {
        selector: String,
        op: ComparisonOp,
        target: String,
    },

    #[error("filter is {depth} levels deep, at most {} are supported", MAX_DEPTH)]
    TooDeep { depth: usize },
}

impl VisitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VisitError::SelectorNotAllowed { .. } => ErrorKind::Authorization,
            VisitError::UnknownEntity(_)
            | VisitError::UnknownAttribute { .. }
            | VisitError::NotTraversable { .. } => ErrorKind::Resolution,
            VisitError::Coercion { .. } => ErrorKind::Coercion,
            VisitError::UnsupportedOperator { .. } => ErrorKind::Unsupported,
            VisitError::TooDeep { .. } => ErrorKind::Limit,
        }
    }

    fn coercion(selector: &str, source: CoercionError) -> Self {
        VisitError::Coercion {
            selector: selector.to_string(),
            source,
        }
    }

    fn unsupported(selector: &str, op: ComparisonOp, path: &AttributePath) -> Self {
        let target = if path.is_collection_valued() {
            format!("a collection of {}", path.target_type())
        } else {
            path.target_type().to_string()
        };
        VisitError::UnsupportedOperator {
            selector: selector.to_string(),
            op,
            target,
        }
    }
}

/// Failure of [`PredicateVisitor::compile`]: either the text or the tree is invalid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("invalid filter: {0}")]
    Visit(#[from] VisitError),
}

/// Compiles filter trees into [`Predicate`]s over one root entity.
///
/// The visitor holds no mutable state. Everything that may change between
/// compiles lives in the [`VisitorConfig`] passed to [`start`](Self::start),
/// so one visitor can serve concurrent compiles.
///
/// # Examples
///
/// ```
/// use fiql_predicate::{parse, PredicateVisitor, VisitorConfig};
/// use fiql_predicate::model::{AttributeType, EntityType, Schema};
///
/// let schema = Schema::new().register(
///     EntityType::new("Pet")
///         .attribute("name", AttributeType::String)
///         .collection("nicknames", AttributeType::String),
/// );
/// let visitor = PredicateVisitor::new(&schema, "Pet");
/// let config = VisitorConfig::new(["name", "nicknames"]);
///
/// let node = parse("name=='Max';nicknames=='*ucky'").unwrap();
/// let predicate = visitor.start(&node, &config).unwrap();
/// assert_eq!(
///     predicate.to_string(),
///     "or(eq(name, 'Max'), like(nicknames, '%ucky'))"
/// );
/// ```
pub struct PredicateVisitor<'m, M: EntityModel + ?Sized> {
    model: &'m M,
    root: String,
}

impl<'m, M: EntityModel + ?Sized> PredicateVisitor<'m, M> {
    pub fn new(model: &'m M, root: impl Into<String>) -> Self {
        PredicateVisitor {
            model,
            root: root.into(),
        }
    }

    /// The entity selectors are resolved from.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Compile `node` into a predicate.
    ///
    /// Walks the tree once, top-down. Any invalid selector, literal or
    /// operator aborts the whole compile, as does a tree deeper than
    /// [`MAX_DEPTH`].
    pub fn start(&self, node: &Node, config: &VisitorConfig) -> Result<Predicate, VisitError> {
        let depth = node.depth();
        if depth > MAX_DEPTH {
            return Err(VisitError::TooDeep { depth });
        }
        debug!(root = %self.root, filter = %node, always_wildcard = config.always_wildcard, "compiling filter");
        let predicate = self.visit(node, config)?;
        debug!(predicate = %predicate, "compiled filter");
        Ok(predicate)
    }

    /// Parse `query` and compile the resulting tree.
    pub fn compile(&self, query: &str, config: &VisitorConfig) -> Result<Predicate, CompileError> {
        let node = parser::parse(query)?;
        Ok(self.start(&node, config)?)
    }

    fn visit(&self, node: &Node, config: &VisitorConfig) -> Result<Predicate, VisitError> {
        match node {
            Node::Comparison {
                selector,
                op,
                argument,
            } => self.visit_comparison(selector, *op, argument, config),
            Node::Logical { op, left, right } => {
                let left = self.visit(left, config)?;
                let right = self.visit(right, config)?;
                Ok(compose(*op, left, right))
            }
        }
    }

    fn visit_comparison(
        &self,
        selector: &str,
        op: ComparisonOp,
        argument: &Literal,
        config: &VisitorConfig,
    ) -> Result<Predicate, VisitError> {
        let path = path::resolve(selector, config, self.model, &self.root)?;
        trace!(selector, %op, argument = %argument, "compiling comparison");

        if path.is_collection_valued() {
            compile_collection(selector, path, op, argument, config)
        } else {
            compile_single(selector, path, op, argument, config)
        }
    }
}

/// Combine two compiled operands.
///
/// Nand and nor negate each operand individually (`and(not(a), not(b))`,
/// `or(not(a), not(b))`) instead of negating the combined clause.
pub fn compose(op: LogicalOp, left: Predicate, right: Predicate) -> Predicate {
    match op {
        LogicalOp::And => Predicate::and(left, right),
        LogicalOp::Or => Predicate::or(left, right),
        LogicalOp::Nand => Predicate::and(Predicate::not(left), Predicate::not(right)),
        LogicalOp::Nor => Predicate::or(Predicate::not(left), Predicate::not(right)),
    }
}

fn compile_single(
    selector: &str,
    path: AttributePath,
    op: ComparisonOp,
    argument: &Literal,
    config: &VisitorConfig,
) -> Result<Predicate, VisitError> {
    let ty = path.target_type();

    if matches!(ty, AttributeType::Entity { .. }) || (op.is_ordering() && !ty.is_ordered()) {
        return Err(VisitError::unsupported(selector, op, &path));
    }

    if *ty == AttributeType::String
        && !op.is_ordering()
        && let Some(pattern) = coercion::wildcard_pattern(argument, config.always_wildcard)
    {
        return Ok(Predicate::Like {
            path,
            pattern,
            negated: op == ComparisonOp::NotEqual,
        });
    }

    let value = coercion::coerce(argument, ty).map_err(|e| VisitError::coercion(selector, e))?;
    Ok(Predicate::Compare {
        path,
        op: op.into(),
        value,
    })
}

/// Ordering operators count the elements; equality looks for a matching element.
fn compile_collection(
    selector: &str,
    path: AttributePath,
    op: ComparisonOp,
    argument: &Literal,
    config: &VisitorConfig,
) -> Result<Predicate, VisitError> {
    if op.is_ordering() {
        let value = coercion::coerce_count(argument).map_err(|e| VisitError::coercion(selector, e))?;
        return Ok(Predicate::Size {
            path,
            op: op.into(),
            value,
        });
    }

    let negated = op == ComparisonOp::NotEqual;
    let ty = path.target_type();

    if matches!(ty, AttributeType::Entity { .. }) {
        return Err(VisitError::unsupported(selector, op, &path));
    }

    if *ty == AttributeType::String
        && let Some(pattern) = coercion::wildcard_pattern(argument, config.always_wildcard)
    {
        return Ok(Predicate::Like {
            path,
            pattern,
            negated,
        });
    }

    let value = coercion::coerce(argument, ty).map_err(|e| VisitError::coercion(selector, e))?;
    Ok(Predicate::Contains {
        path,
        value,
        negated,
    })
}
