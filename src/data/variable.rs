//! Variable identity and the per-dataset registry.
//!
//! A variable is a named column. Its identity across datasets and serialized
//! trees is a content hash of the name, so trees can reference columns
//! without holding a pointer into any particular dataset.

use std::collections::HashMap;

use crate::error::{EngineError, EngineResult, VariableQuery};

/// A named input column with a stable content hash and its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// Column name.
    pub name: String,
    /// Deterministic content hash of the name (FNV-1a, 64-bit).
    pub hash: u64,
    /// Zero-based column position within the owning dataset.
    pub index: usize,
}

impl Variable {
    /// Create a variable, deriving its hash from the name.
    #[must_use]
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        let name = name.into();
        let hash = Self::hash_name(&name);
        Self { name, hash, index }
    }

    /// Hash a variable name.
    ///
    /// FNV-1a over the UTF-8 bytes. A pure function of the name: equal names
    /// yield equal hashes within and across processes.
    #[must_use]
    pub fn hash_name(name: &str) -> u64 {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for &byte in name.as_bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        hash
    }
}

/// Ordered collection of variables with hash-based lookup.
///
/// Invariants: hashes are unique, and `variables[i].index == i` for every
/// entry. Both are re-established by [`VariableRegistry::set_names`], the
/// only operation that changes variable identity after construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariableRegistry {
    variables: Vec<Variable>,
    by_hash: HashMap<u64, usize>,
}

impl VariableRegistry {
    /// Build a registry from column names in index order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::HashCollision`] if two distinct names hash to
    /// the same value. Identical names collide by definition and are
    /// rejected the same way.
    pub fn from_names<I, S>(names: I) -> EngineResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::default();
        for name in names {
            registry.push(name.into())?;
        }
        Ok(registry)
    }

    /// Generate placeholder names `X1..Xn` for unnamed columns.
    #[must_use]
    pub fn default_names(cols: usize) -> Vec<String> {
        (1..=cols).map(|i| format!("X{i}")).collect()
    }

    fn push(&mut self, name: String) -> EngineResult<()> {
        let variable = Variable::new(name, self.variables.len());
        if let Some(&existing) = self.by_hash.get(&variable.hash) {
            return Err(EngineError::HashCollision {
                name: variable.name,
                existing: self.variables[existing].name.clone(),
            });
        }
        self.by_hash.insert(variable.hash, variable.index);
        self.variables.push(variable);
        Ok(())
    }

    /// Number of registered variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// All variables in index order.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Variable names in index order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.name.clone()).collect()
    }

    /// Look up a variable by column index.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if the index is out of range.
    pub fn by_index(&self, index: usize) -> EngineResult<&Variable> {
        self.variables
            .get(index)
            .ok_or_else(|| EngineError::NotFound(VariableQuery::Index(index)))
    }

    /// Look up a variable by name.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if no column has this name.
    pub fn by_name(&self, name: &str) -> EngineResult<&Variable> {
        self.by_hash(Variable::hash_name(name))
            .map_err(|_| EngineError::NotFound(VariableQuery::Name(name.to_string())))
    }

    /// Look up a variable by content hash.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if no column has this hash.
    pub fn by_hash(&self, hash: u64) -> EngineResult<&Variable> {
        self.by_hash
            .get(&hash)
            .map(|&index| &self.variables[index])
            .ok_or_else(|| EngineError::NotFound(VariableQuery::Hash(hash)))
    }

    /// Replace every variable name, re-deriving every hash.
    ///
    /// Hashes captured before the rename no longer resolve; callers holding
    /// trees that reference renamed columns must re-resolve them.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Shape`] if the name count differs from the
    /// registry size, or [`EngineError::HashCollision`] if the new names
    /// collide. The registry is unchanged on error.
    pub fn set_names<I, S>(&mut self, names: I) -> EngineResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() != self.variables.len() {
            return Err(EngineError::Shape {
                expected: self.variables.len(),
                got: names.len(),
            });
        }
        let replacement = Self::from_names(names)?;
        *self = replacement;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let a = Variable::hash_name("temperature");
        let b = Variable::hash_name("temperature");
        assert_eq!(a, b);
        assert_ne!(a, Variable::hash_name("pressure"));
    }

    #[test]
    fn test_hash_known_value() {
        // FNV-1a of the empty string is the offset basis.
        assert_eq!(Variable::hash_name(""), 0xcbf2_9ce4_8422_2325);
    }

    #[test]
    fn test_registry_indices_are_contiguous() {
        let registry = VariableRegistry::from_names(["x", "y", "z"]).unwrap();
        for (i, var) in registry.variables().iter().enumerate() {
            assert_eq!(var.index, i);
        }
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_lookup_by_name_and_hash() {
        let registry = VariableRegistry::from_names(["x", "y"]).unwrap();
        let x = registry.by_name("x").unwrap();
        assert_eq!(x.index, 0);
        assert_eq!(registry.by_hash(x.hash).unwrap().name, "x");
        assert!(registry.by_name("missing").is_err());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = VariableRegistry::from_names(["x", "x"]);
        assert!(matches!(result, Err(EngineError::HashCollision { .. })));
    }

    #[test]
    fn test_set_names_rederives_hashes() {
        let mut registry = VariableRegistry::from_names(["x", "y"]).unwrap();
        let old_hash = registry.by_name("x").unwrap().hash;

        registry.set_names(["a", "b"]).unwrap();

        assert!(registry.by_hash(old_hash).is_err());
        assert_eq!(registry.by_name("a").unwrap().index, 0);
    }

    #[test]
    fn test_set_names_wrong_count() {
        let mut registry = VariableRegistry::from_names(["x", "y"]).unwrap();
        let result = registry.set_names(["only"]);
        assert!(matches!(result, Err(EngineError::Shape { expected: 2, got: 1 })));
    }
}
