use std::fmt;

use crate::ast::{ComparisonOp, Literal, LogicalOp};

/// A node of a parsed filter expression.
///
/// The tree is immutable once built. The visitor walks it without
/// modifying it, so the same tree can be compiled any number of times.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Comparison of one selector against one literal
    ///
    /// # Examples
    /// ```text
    /// name=='Max'
    /// visits=ge=2
    /// owner.firstName!='Jeff'
    /// ```
    Comparison {
        selector: String,
        op: ComparisonOp,
        argument: Literal,
    },

    /// Binary logical connector
    ///
    /// # Examples
    /// ```text
    /// name=='Chuck',owner.firstName=='Jeff'
    /// name=='Leo';owner.firstName=='Jeff'
    /// ```
    Logical {
        op: LogicalOp,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn comparison(selector: impl Into<String>, op: ComparisonOp, argument: Literal) -> Self {
        Node::Comparison {
            selector: selector.into(),
            op,
            argument,
        }
    }

    pub fn logical(op: LogicalOp, left: Node, right: Node) -> Self {
        Node::Logical {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Every selector referenced by the tree, left to right.
    pub fn selectors(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Node::Comparison { selector, .. } => out.push(selector.as_str()),
                Node::Logical { left, right, .. } => {
                    stack.push(right.as_ref());
                    stack.push(left.as_ref());
                }
            }
        }
        out
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            if let Node::Logical { left, right, .. } = node {
                stack.push(left.as_ref());
                stack.push(right.as_ref());
            }
        }
        count
    }

    /// Number of levels in the tree; a single comparison is one level deep.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let Node::Logical { left, right, .. } = node {
                stack.push((left.as_ref(), depth + 1));
                stack.push((right.as_ref(), depth + 1));
            }
        }
        deepest
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Comparison {
                selector,
                op,
                argument,
            } => write!(f, "{}{}{}", selector, op, argument),
            Node::Logical { op, left, right } => {
                write_operand(f, left)?;
                write!(f, "{}", op)?;
                write_operand(f, right)
            }
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, node: &Node) -> fmt::Result {
    match node {
        Node::Comparison { .. } => write!(f, "{}", node),
        Node::Logical { .. } => write!(f, "({})", node),
    }
}
