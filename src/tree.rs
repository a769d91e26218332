//! Postfix-encoded expression trees.
//!
//! A tree is an ordered sequence of nodes in postfix order: every operator
//! is immediately preceded by its operand subtrees. Construction validates
//! that the sequence encodes exactly one well-formed expression, and the
//! node sequence is immutable afterwards; genetic operators derive new trees
//! instead of splicing in place, so existing trees stay valid for concurrent
//! evaluation.

mod node;

pub use node::{Node, Op};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A validated, immutable-shape expression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Node>", into = "Vec<Node>")]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Build a tree from nodes in postfix order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Syntax`] if the sequence is empty, an operator
    /// arity does not match its declared operator, an operator lacks
    /// operands, or operands are left dangling at the end. The reported
    /// position is the index of the offending node.
    pub fn from_postfix(nodes: Vec<Node>) -> EngineResult<Self> {
        if nodes.is_empty() {
            return Err(EngineError::Syntax {
                position: 0,
                message: "empty node sequence".to_string(),
            });
        }

        let mut available = 0usize;
        for (position, node) in nodes.iter().enumerate() {
            if let Node::Op { op, arity } = node {
                let arity = usize::from(*arity);
                let valid = if op.is_variadic() {
                    arity >= 2
                } else {
                    arity == usize::from(op.default_arity())
                };
                if !valid {
                    return Err(EngineError::Syntax {
                        position,
                        message: format!("operator {} cannot take {arity} operands", op.name()),
                    });
                }
                if available < arity {
                    return Err(EngineError::Syntax {
                        position,
                        message: format!(
                            "operator {} needs {arity} operands, {available} available",
                            op.name()
                        ),
                    });
                }
                available -= arity;
            }
            available += 1;
        }

        if available != 1 {
            return Err(EngineError::Syntax {
                position: nodes.len(),
                message: format!("sequence encodes {available} expressions, expected 1"),
            });
        }

        Ok(Self { nodes })
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a validated tree has at least one node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in postfix order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The root node (last in postfix order).
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.nodes[self.nodes.len() - 1]
    }

    /// Height of the tree; a single leaf has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut stack: Vec<usize> = Vec::new();
        for node in &self.nodes {
            let arity = node.arity();
            if arity == 0 {
                stack.push(1);
            } else {
                let mut deepest = 0;
                for _ in 0..arity {
                    deepest = deepest.max(stack.pop().unwrap_or(0));
                }
                stack.push(deepest + 1);
            }
        }
        stack.pop().unwrap_or(0)
    }

    /// Number of nodes in the subtree rooted at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[must_use]
    pub fn subtree_len(&self, index: usize) -> usize {
        assert!(index < self.nodes.len(), "node index out of range");
        let mut count = 0usize;
        let mut pending = 1usize;
        while pending > 0 {
            let node = &self.nodes[index - count];
            pending = pending - 1 + node.arity();
            count += 1;
        }
        count
    }

    /// Postfix span of the subtree rooted at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[must_use]
    pub fn subtree_range(&self, index: usize) -> std::ops::Range<usize> {
        let len = self.subtree_len(index);
        index + 1 - len..index + 1
    }

    /// Hashes of the variables referenced by this tree, deduplicated in
    /// first-occurrence order.
    #[must_use]
    pub fn variable_hashes(&self) -> Vec<u64> {
        let mut hashes = Vec::new();
        for node in &self.nodes {
            if let Node::Variable(hash) = node {
                if !hashes.contains(hash) {
                    hashes.push(*hash);
                }
            }
        }
        hashes
    }

    /// Whether any leaf references the given variable hash.
    #[must_use]
    pub fn contains_variable(&self, hash: u64) -> bool {
        self.nodes
            .iter()
            .any(|n| matches!(n, Node::Variable(h) if *h == hash))
    }
}

impl TryFrom<Vec<Node>> for Tree {
    type Error = EngineError;

    fn try_from(nodes: Vec<Node>) -> EngineResult<Self> {
        Self::from_postfix(nodes)
    }
}

impl From<Tree> for Vec<Node> {
    fn from(tree: Tree) -> Self {
        tree.nodes
    }
}
