//! Error types for the expression engine.

use std::fmt;

/// How a variable was looked up when the lookup failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableQuery {
    /// Lookup by variable name.
    Name(String),
    /// Lookup by content hash.
    Hash(u64),
    /// Lookup by column index.
    Index(usize),
}

impl fmt::Display for VariableQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableQuery::Name(name) => write!(f, "name {name:?}"),
            VariableQuery::Hash(hash) => write!(f, "hash {hash:#018x}"),
            VariableQuery::Index(index) => write!(f, "index {index}"),
        }
    }
}

/// Failures reported by datasets, trees, parsers and formatters.
///
/// Every failure is synchronous and caller-recoverable; a failed construction
/// leaves no partially built object behind.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A buffer or nested sequence does not describe a 2-D matrix of the
    /// expected size.
    Shape {
        /// Number of elements the shape requires.
        expected: usize,
        /// Number of elements actually provided.
        got: usize,
    },
    /// Malformed file contents (inconsistent column counts, non-numeric cells).
    Format {
        /// 1-based line number of the offending row.
        line: usize,
        /// What was wrong with it.
        message: String,
    },
    /// A variable name, hash or index did not match any column.
    NotFound(VariableQuery),
    /// Malformed expression text or node sequence.
    Syntax {
        /// Byte offset of the offending token (node index for sequences).
        position: usize,
        /// What was wrong with it.
        message: String,
    },
    /// Two distinct variable names hash to the same value.
    HashCollision {
        /// The name being registered.
        name: String,
        /// The previously registered name with the same hash.
        existing: String,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Shape { expected, got } => {
                write!(f, "shape mismatch: expected {expected} elements, got {got}")
            }
            EngineError::Format { line, message } => {
                write!(f, "malformed data at line {line}: {message}")
            }
            EngineError::NotFound(query) => {
                write!(f, "no variable matches {query}")
            }
            EngineError::Syntax { position, message } => {
                write!(f, "syntax error at offset {position}: {message}")
            }
            EngineError::HashCollision { name, existing } => {
                write!(f, "variable {name:?} collides with {existing:?} under the name hash")
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_not_found_by_name() {
        let err = EngineError::NotFound(VariableQuery::Name("pressure".into()));
        assert_eq!(err.to_string(), "no variable matches name \"pressure\"");
    }

    #[test]
    fn test_display_format_error() {
        let err = EngineError::Format {
            line: 7,
            message: "expected 3 columns, found 2".into(),
        };
        let text = err.to_string();
        assert!(text.contains("line 7"));
        assert!(text.contains("3 columns"));
    }
}
