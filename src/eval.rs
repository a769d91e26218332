//! Tree evaluation over datasets.
//!
//! A postfix tree doubles as a stack-machine program: leaves push a column
//! of values, operators pop operand columns and push results. Evaluation is
//! vectorized over the requested row range and uses plain IEEE semantics
//! (division by zero yields infinity, not an error).
//!
//! Single-tree evaluation is synchronous and single-threaded; the batch
//! entry point parallelizes across trees, which is sound because dataset
//! reads take `&self`.

use rayon::prelude::*;

use crate::data::{Dataset, Range, Scalar};
use crate::error::{EngineError, EngineResult};
use crate::tree::{Node, Op, Tree};

/// Evaluate one tree over the rows of `range`, producing one value per row.
///
/// # Errors
///
/// Returns [`EngineError::NotFound`] if a variable leaf's hash is not
/// defined by the dataset, and [`EngineError::Shape`] if the range exceeds
/// the dataset's row count.
pub fn evaluate(tree: &Tree, dataset: &Dataset<'_>, range: Range) -> EngineResult<Vec<Scalar>> {
    if range.end() > dataset.rows() {
        return Err(EngineError::Shape {
            expected: dataset.rows(),
            got: range.end(),
        });
    }

    let n = range.size();
    let mut stack: Vec<Vec<Scalar>> = Vec::new();

    for node in tree.nodes() {
        match node {
            Node::Constant(value) => stack.push(vec![*value; n]),
            Node::Variable(hash) => {
                let column = dataset.values_by_hash(*hash)?;
                stack.push(column[range.start()..range.end()].to_vec());
            }
            Node::Op { op, arity } => {
                let arity = usize::from(*arity);
                let result = apply(*op, &mut stack, arity);
                stack.push(result);
            }
        }
    }

    Ok(stack.pop().unwrap_or_default())
}

/// Evaluate many trees over the same rows, in parallel across trees.
///
/// # Errors
///
/// Fails with the first error any single evaluation reports; see
/// [`evaluate`].
pub fn evaluate_population(
    trees: &[Tree],
    dataset: &Dataset<'_>,
    range: Range,
) -> EngineResult<Vec<Vec<Scalar>>> {
    trees
        .par_iter()
        .map(|tree| evaluate(tree, dataset, range))
        .collect()
}

/// Pop `arity` operand columns and combine them elementwise.
fn apply(op: Op, stack: &mut Vec<Vec<Scalar>>, arity: usize) -> Vec<Scalar> {
    if arity == 1 {
        let mut operand = stack.pop().unwrap_or_default();
        for value in &mut operand {
            *value = unary(op, *value);
        }
        return operand;
    }

    // Binary and variadic: fold the remaining operands into the first.
    let mut operands = stack.split_off(stack.len() - arity);
    let mut accumulator = operands.remove(0);
    for operand in &operands {
        for (acc, value) in accumulator.iter_mut().zip(operand) {
            *acc = binary(op, *acc, *value);
        }
    }
    accumulator
}

fn unary(op: Op, value: Scalar) -> Scalar {
    match op {
        Op::Neg => -value,
        Op::Abs => value.abs(),
        Op::Sin => value.sin(),
        Op::Cos => value.cos(),
        Op::Tan => value.tan(),
        Op::Exp => value.exp(),
        Op::Log => value.ln(),
        Op::Sqrt => value.sqrt(),
        _ => value,
    }
}

fn binary(op: Op, lhs: Scalar, rhs: Scalar) -> Scalar {
    match op {
        Op::Add => lhs + rhs,
        Op::Sub => lhs - rhs,
        Op::Mul => lhs * rhs,
        Op::Div => lhs / rhs,
        Op::Pow => lhs.powf(rhs),
        Op::Min => lhs.min(rhs),
        Op::Max => lhs.max(rhs),
        _ => lhs,
    }
}
