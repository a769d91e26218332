// Allow unwraps and float comparisons in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::float_cmp))]
//! Arbor: a symbolic-expression engine for genetic programming.
//!
//! This crate provides the data core a symbolic-regression pipeline is built
//! around:
//! - Columnar, hash-addressable datasets with zero-copy ingestion
//! - Postfix-encoded expression trees with validated shape
//! - Bidirectional text serialization (infix and prefix)
//! - Vectorized evaluation of trees over dataset rows
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   External evolutionary driver      │
//! ├─────────────────────────────────────┤
//! │  Parser │ Formatter │ Evaluator     │
//! ├─────────────────────────────────────┤
//! │  ExpressionTree (postfix nodes)     │
//! ├─────────────────────────────────────┤
//! │  Dataset (column-major, hashed)     │
//! └─────────────────────────────────────┘
//! ```
//!
//! Trees reference dataset columns by a content hash of the column name, so
//! a tree parsed against one dataset evaluates against any other dataset
//! that defines the same names.
//!
//! # Example
//!
//! ```
//! use arbor::data::{Dataset, Range};
//! use arbor::{eval, format, parse};
//!
//! let ds = Dataset::from_csv_str("x,y\n1,2\n3,4\n5,6\n", true)?;
//! let vars = ds
//!     .variables()
//!     .iter()
//!     .map(|v| (v.name.clone(), v.hash))
//!     .collect();
//!
//! let tree = parse::parse("x + y * 2", &vars)?;
//! let out = eval::evaluate(&tree, &ds, Range::new(0, 3))?;
//! assert_eq!(out, vec![5.0, 11.0, 17.0]);
//!
//! let text = format::infix(&tree, &ds, 2)?;
//! assert_eq!(text, "x + y * 2.00");
//! # Ok::<(), arbor::EngineError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod eval;
pub mod format;
pub mod individual;
pub mod parse;
pub mod tree;

pub use error::{EngineError, EngineResult, VariableQuery};

// Re-export key types at crate root for convenience
pub use config::GeneticAlgorithmConfig;
pub use data::{Dataset, Range, Scalar, Variable};
pub use individual::Individual;
pub use tree::{Node, Op, Tree};
