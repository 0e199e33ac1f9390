use std::fmt;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    /// Equal (`==`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Greater than (`=gt=`)
    GreaterThan,
    /// Less than (`=lt=`)
    LessThan,
    /// Greater than or equal (`=ge=`)
    GreaterEqual,
    /// Less than or equal (`=le=`)
    LessEqual,
}

impl ComparisonOp {
    /// Whether this is one of the ordering operators (`=gt=`, `=lt=`, `=ge=`, `=le=`).
    pub fn is_ordering(self) -> bool {
        !matches!(self, ComparisonOp::Equal | ComparisonOp::NotEqual)
    }

    /// The operator as written in a query.
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Equal => "==",
            ComparisonOp::NotEqual => "!=",
            ComparisonOp::GreaterThan => "=gt=",
            ComparisonOp::LessThan => "=lt=",
            ComparisonOp::GreaterEqual => "=ge=",
            ComparisonOp::LessEqual => "=le=",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Logical connectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    /// Conjunction (`,`)
    And,
    /// Disjunction (`;`)
    Or,
    /// Conjunction of the negated operands (`.`)
    Nand,
    /// Disjunction of the negated operands (`:`)
    Nor,
}

impl LogicalOp {
    pub fn symbol(self) -> char {
        match self {
            LogicalOp::And => ',',
            LogicalOp::Or => ';',
            LogicalOp::Nand => '.',
            LogicalOp::Nor => ':',
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
