//! # Filter Expression - Abstract Syntax Tree
//!
//! This module defines the tree a filter string is parsed into before it is
//! compiled into a [`Predicate`](crate::Predicate).
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[node]** - Comparison and logical nodes
//! - **[operators]** - Comparison operators and logical connectors
//! - **[literal]** - Untyped arguments with optional type suffix
//!
//! ## Quick Start
//!
//! ```text
//! name=='Chuck',owner.firstName=='Jeff'
//! ```
//!
//! Pets named Chuck whose owner's first name is Jeff.
//!
//! ## Core Concepts
//!
//! ### Comparisons
//!
//! ```text
//! selector OP argument
//! ```
//!
//! | Operator | Meaning               |
//! |----------|-----------------------|
//! | `==`     | equal                 |
//! | `!=`     | not equal             |
//! | `=gt=`   | greater than          |
//! | `=lt=`   | less than             |
//! | `=ge=`   | greater than or equal |
//! | `=le=`   | less than or equal    |
//!
//! ### Connectors
//!
//! | Connector | Meaning                      | Precedence |
//! |-----------|------------------------------|------------|
//! | `,`       | and                          | high       |
//! | `.`       | nand (and of the negations)  | high       |
//! | `;`       | or                           | low        |
//! | `:`       | nor (or of the negations)    | low        |
//!
//! Connectors of the same precedence associate to the left. Parentheses group.
//!
//! ### Arguments
//!
//! Arguments stay untyped until compile time. `'quoted'` text, numbers with an
//! optional `L`/`D` suffix, ISO dates and date-times, and bare words are all
//! recorded as [`Literal`]s; the attribute they are compared against decides
//! their type.
//!
//! ## Examples
//!
//! ```text
//! visits=ge=2                         // at least two visits
//! nicknames=='*ucky'                  // some nickname ends with "ucky"
//! name!='Leo':owner.firstName=='Jeff' // nor
//! (name=='Max';name=='Leo'),visits.type==SCHEDULED
//! ```
pub mod literal;
pub mod node;
pub mod operators;
pub mod tokens;

pub use literal::{Literal, TypeSuffix};
pub use node::Node;
pub use operators::{ComparisonOp, LogicalOp};
pub use tokens::Token;
