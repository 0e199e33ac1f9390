//! Compiles FIQL filter expressions into typed predicates.
//!
//! ```text
//! query string ──parse──▶ Node ──PredicateVisitor::start──▶ Predicate ──backend──▶ rows
//! ```
//!
//! The visitor resolves every selector against a registered entity model,
//! restricted by an allow-list, and coerces each literal to the attribute's
//! declared type. It never executes anything; [`Evaluator`] is a reference
//! backend that runs predicates over JSON records.
pub mod ast;
pub mod coercion;
pub mod config;
pub mod evaluator;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod path;
pub mod predicate;
pub mod value;
pub mod visitor;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{ComparisonOp, Literal, LogicalOp, Node, Token, TypeSuffix};
pub use config::{ConfigError, VisitorConfig};
pub use evaluator::{Evaluator, ExecutionError, Truth};
pub use lexer::{LexError, Lexer, Position};
pub use model::{Attribute, AttributeType, EntityModel, EntityType, Multiplicity, Schema};
pub use parser::{ParseError, Parser, parse};
pub use path::AttributePath;
pub use predicate::{CompareOp, LikePattern, Predicate};
pub use value::Value;
pub use visitor::{CompileError, ErrorKind, PredicateVisitor, VisitError, compose};
