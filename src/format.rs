//! Textual rendering of expression trees.
//!
//! Two renderings share one contract: every variable leaf must resolve to a
//! name, and constants are written with a caller-chosen number of decimal
//! digits. [`infix`] emits conventional operator notation with minimal
//! parenthesization; [`prefix`] emits function-call notation. Both re-parse
//! to a structurally identical tree as long as every constant is exactly
//! representable at the chosen precision.

use std::collections::HashMap;

use crate::data::Dataset;
use crate::error::{EngineError, EngineResult, VariableQuery};
use crate::tree::{Node, Op, Tree};

/// Binding strength of an atomic fragment (leaf, call, parenthesized group).
const ATOM: u8 = u8::MAX;

/// Binding strength of a unary minus fragment.
const NEG: u8 = 3;

/// Resolves variable hashes back to names.
///
/// Implemented by [`Dataset`] (resolving against its current registry) and
/// by a plain hash-to-name map, collapsing the two lookup sources into one
/// formatting entry point.
pub trait ResolveNames {
    /// The name for `hash`, if one is known.
    fn resolve(&self, hash: u64) -> Option<&str>;
}

impl ResolveNames for Dataset<'_> {
    fn resolve(&self, hash: u64) -> Option<&str> {
        self.variable_by_hash(hash).ok().map(|v| v.name.as_str())
    }
}

impl ResolveNames for HashMap<u64, String> {
    fn resolve(&self, hash: u64) -> Option<&str> {
        self.get(&hash).map(String::as_str)
    }
}

fn name_for<N: ResolveNames + ?Sized>(names: &N, hash: u64) -> EngineResult<String> {
    names
        .resolve(hash)
        .map(ToString::to_string)
        .ok_or_else(|| EngineError::NotFound(VariableQuery::Hash(hash)))
}

/// Render a tree as an infix expression.
///
/// `precision` is the number of decimal digits for constant leaves.
///
/// # Errors
///
/// Returns [`EngineError::NotFound`] if a variable leaf's hash does not
/// resolve to a name.
pub fn infix<N: ResolveNames + ?Sized>(
    tree: &Tree,
    names: &N,
    precision: usize,
) -> EngineResult<String> {
    // Fragments carry the binding strength of their top-level construct so
    // parent operators know when parentheses are required.
    let mut stack: Vec<(String, u8)> = Vec::new();

    for node in tree.nodes() {
        match node {
            Node::Constant(value) => {
                let prec = if *value < 0.0 { NEG } else { ATOM };
                stack.push((format!("{value:.precision$}"), prec));
            }
            Node::Variable(hash) => {
                stack.push((name_for(names, *hash)?, ATOM));
            }
            Node::Op { op, arity } => {
                let fragment = match (op.symbol(), *arity) {
                    (Some(symbol), 2) => {
                        let prec = op.precedence().unwrap_or(ATOM);
                        let (rhs, rp) = stack.pop().unwrap_or_default();
                        let (lhs, lp) = stack.pop().unwrap_or_default();
                        let right_assoc = op.is_right_associative();
                        let lhs = wrap(lhs, lp < prec || (lp == prec && right_assoc));
                        let rhs = wrap(rhs, rp < prec || (rp == prec && !right_assoc));
                        (format!("{lhs} {symbol} {rhs}"), prec)
                    }
                    (_, 1) if *op == Op::Neg => {
                        let (operand, prec) = stack.pop().unwrap_or_default();
                        // Parenthesize a constant so `-(2.00)` does not fold
                        // back into the literal `-2.00` when re-parsed.
                        let needs_parens = prec <= NEG || operand.starts_with(|c: char| c.is_ascii_digit());
                        (format!("-{}", wrap(operand, needs_parens)), NEG)
                    }
                    _ => (call(op.name(), stack.drain(stack.len() - usize::from(*arity)..)), ATOM),
                };
                stack.push(fragment);
            }
        }
    }

    Ok(stack.pop().unwrap_or_default().0)
}

/// Render a tree in prefix (function-call) notation, e.g.
/// `add(x, mul(y, 2.00))`.
///
/// # Errors
///
/// Returns [`EngineError::NotFound`] if a variable leaf's hash does not
/// resolve to a name.
pub fn prefix<N: ResolveNames + ?Sized>(
    tree: &Tree,
    names: &N,
    precision: usize,
) -> EngineResult<String> {
    let mut stack: Vec<String> = Vec::new();

    for node in tree.nodes() {
        match node {
            Node::Constant(value) => stack.push(format!("{value:.precision$}")),
            Node::Variable(hash) => stack.push(name_for(names, *hash)?),
            Node::Op { op, arity } => {
                let args = stack.drain(stack.len() - usize::from(*arity)..);
                let rendered = call(op.name(), args.map(|a| (a, ATOM)));
                stack.push(rendered);
            }
        }
    }

    Ok(stack.pop().unwrap_or_default())
}

fn wrap(fragment: String, parenthesize: bool) -> String {
    if parenthesize {
        format!("({fragment})")
    } else {
        fragment
    }
}

fn call<I: Iterator<Item = (String, u8)>>(name: &str, args: I) -> String {
    let args: Vec<String> = args.map(|(text, _)| text).collect();
    format!("{name}({})", args.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Variable;

    fn mapping(names: &[&str]) -> HashMap<u64, String> {
        names
            .iter()
            .map(|n| (Variable::hash_name(n), (*n).to_string()))
            .collect()
    }

    fn var(name: &str) -> Node {
        Node::Variable(Variable::hash_name(name))
    }

    #[test]
    fn test_infix_simple() {
        let tree = Tree::from_postfix(vec![
            var("x"),
            var("y"),
            Node::Constant(2.0),
            Node::op(Op::Mul),
            Node::op(Op::Add),
        ])
        .unwrap();
        let names = mapping(&["x", "y"]);
        assert_eq!(infix(&tree, &names, 2).unwrap(), "x + y * 2.00");
    }

    #[test]
    fn test_infix_precedence_parens() {
        // (x + y) * 2
        let tree = Tree::from_postfix(vec![
            var("x"),
            var("y"),
            Node::op(Op::Add),
            Node::Constant(2.0),
            Node::op(Op::Mul),
        ])
        .unwrap();
        let names = mapping(&["x", "y"]);
        assert_eq!(infix(&tree, &names, 0).unwrap(), "(x + y) * 2");
    }

    #[test]
    fn test_infix_right_operand_of_sub() {
        // x - (y + 1)
        let tree = Tree::from_postfix(vec![
            var("x"),
            var("y"),
            Node::Constant(1.0),
            Node::op(Op::Add),
            Node::op(Op::Sub),
        ])
        .unwrap();
        let names = mapping(&["x", "y"]);
        assert_eq!(infix(&tree, &names, 0).unwrap(), "x - (y + 1)");
    }

    #[test]
    fn test_infix_pow_associativity() {
        // (x ^ y) ^ 2: left child of right-associative ^ needs parens
        let tree = Tree::from_postfix(vec![
            var("x"),
            var("y"),
            Node::op(Op::Pow),
            Node::Constant(2.0),
            Node::op(Op::Pow),
        ])
        .unwrap();
        let names = mapping(&["x", "y"]);
        assert_eq!(infix(&tree, &names, 0).unwrap(), "(x ^ y) ^ 2");
    }

    #[test]
    fn test_infix_negation() {
        // -(x * y)
        let tree = Tree::from_postfix(vec![var("x"), var("y"), Node::op(Op::Mul), Node::op(Op::Neg)])
            .unwrap();
        let names = mapping(&["x", "y"]);
        assert_eq!(infix(&tree, &names, 0).unwrap(), "-(x * y)");
    }

    #[test]
    fn test_infix_functions() {
        let tree = Tree::from_postfix(vec![
            var("x"),
            Node::op(Op::Sin),
            var("y"),
            Node::Constant(1.5),
            Node::nary(Op::Min, 3),
        ])
        .unwrap();
        let names = mapping(&["x", "y"]);
        assert_eq!(infix(&tree, &names, 1).unwrap(), "min(sin(x), y, 1.5)");
    }

    #[test]
    fn test_prefix_rendering() {
        let tree = Tree::from_postfix(vec![
            var("x"),
            var("y"),
            Node::Constant(2.0),
            Node::op(Op::Mul),
            Node::op(Op::Add),
        ])
        .unwrap();
        let names = mapping(&["x", "y"]);
        assert_eq!(prefix(&tree, &names, 2).unwrap(), "add(x, mul(y, 2.00))");
    }

    #[test]
    fn test_unresolvable_hash_fails() {
        let tree = Tree::from_postfix(vec![var("ghost")]).unwrap();
        let names = mapping(&["x"]);
        assert!(matches!(
            infix(&tree, &names, 2),
            Err(EngineError::NotFound(_))
        ));
    }

    #[test]
    fn test_dataset_as_name_source() {
        let ds = Dataset::from_columns(&[vec![1.0], vec![2.0]])
            .and_then(|d| d.with_names(["x", "y"]))
            .unwrap();
        let tree = Tree::from_postfix(vec![var("x"), var("y"), Node::op(Op::Div)]).unwrap();
        assert_eq!(infix(&tree, &ds, 0).unwrap(), "x / y");
    }

    #[test]
    fn test_negative_constant_under_operator() {
        // x * -2.5 formats with the sign attached to the literal
        let tree =
            Tree::from_postfix(vec![var("x"), Node::Constant(-2.5), Node::op(Op::Mul)]).unwrap();
        let names = mapping(&["x"]);
        assert_eq!(infix(&tree, &names, 1).unwrap(), "x * -2.5");
    }

    #[test]
    fn test_neg_of_constant_is_parenthesized() {
        let tree = Tree::from_postfix(vec![Node::Constant(2.0), Node::op(Op::Neg)]).unwrap();
        let names = mapping(&[]);
        assert_eq!(infix(&tree, &names, 0).unwrap(), "-(2)");
    }
}
