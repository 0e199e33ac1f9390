use crate::ast::{ComparisonOp, Literal, LogicalOp};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Dot-separated attribute path
    ///
    /// Must start with a letter or underscore; every segment follows the same rule.
    ///
    /// # Examples
    /// ```text
    /// name
    /// owner.firstName
    /// visits.date
    /// ```
    Selector(String),

    /// Comparison operator
    ///
    /// # Examples
    /// ```text
    /// ==
    /// !=
    /// =gt=
    /// =le=
    /// ```
    Comparison(ComparisonOp),

    /// Argument of a comparison
    ///
    /// # Examples
    /// ```text
    /// 'Chuck'
    /// 2L
    /// 2012-08-31
    /// 2013-01-04T09:15:00.000+01:00
    /// SCHEDULED
    /// ```
    Argument(Literal),

    /// Logical connector
    ///
    /// # Examples
    /// ```text
    /// ,   // and
    /// ;   // or
    /// .   // nand
    /// :   // nor
    /// ```
    Logical(LogicalOp),

    /// Left parenthesis for grouping
    LParen,

    /// Right parenthesis
    RParen,

    /// End of input
    Eof,
}
