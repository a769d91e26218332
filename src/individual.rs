//! Individuals: a genotype plus its fitness vector.
//!
//! Fitness is minimized; objective values start at infinity until the
//! driver's evaluator assigns them.

use serde::{Deserialize, Serialize};

use crate::data::Scalar;
use crate::tree::Tree;

/// A candidate solution: an expression tree and one fitness value per
/// objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    /// The expression tree.
    pub genotype: Tree,
    fitness: Vec<Scalar>,
}

impl Individual {
    /// Wrap a tree with `objectives` unevaluated fitness slots.
    #[must_use]
    pub fn new(genotype: Tree, objectives: usize) -> Self {
        Self {
            genotype,
            fitness: vec![Scalar::INFINITY; objectives],
        }
    }

    /// All objective values.
    #[must_use]
    pub fn fitness(&self) -> &[Scalar] {
        &self.fitness
    }

    /// The value of one objective.
    ///
    /// # Panics
    ///
    /// Panics if `objective` is out of range.
    #[must_use]
    pub fn fitness_at(&self, objective: usize) -> Scalar {
        self.fitness[objective]
    }

    /// Assign one objective value.
    ///
    /// # Panics
    ///
    /// Panics if `objective` is out of range.
    pub fn set_fitness(&mut self, value: Scalar, objective: usize) {
        self.fitness[objective] = value;
    }

    /// Epsilon Pareto dominance: no objective worse by more than `epsilon`,
    /// at least one better by more than `epsilon`. Lower is better.
    #[must_use]
    pub fn dominates(&self, other: &Self, epsilon: Scalar) -> bool {
        let mut strictly_better = false;
        for (a, b) in self.fitness.iter().zip(&other.fitness) {
            if *a > b + epsilon {
                return false;
            }
            if *a < b - epsilon {
                strictly_better = true;
            }
        }
        strictly_better
    }
}

/// Orders individuals by a single objective with an epsilon tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleObjectiveComparison {
    /// Index of the objective to compare.
    pub objective: usize,
    /// Differences at most this large compare equal.
    pub epsilon: Scalar,
}

impl SingleObjectiveComparison {
    /// Compare two individuals on the configured objective (lower is
    /// better).
    ///
    /// # Panics
    ///
    /// Panics if either individual lacks the configured objective.
    #[must_use]
    pub fn compare(&self, a: &Individual, b: &Individual) -> std::cmp::Ordering {
        let (fa, fb) = (a.fitness_at(self.objective), b.fitness_at(self.objective));
        if (fa - fb).abs() <= self.epsilon {
            std::cmp::Ordering::Equal
        } else if fa < fb {
            std::cmp::Ordering::Less
        } else {
            std::cmp::Ordering::Greater
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Node, Tree};

    fn leaf(value: Scalar) -> Tree {
        Tree::from_postfix(vec![Node::Constant(value)]).unwrap()
    }

    #[test]
    fn test_new_individual_is_unevaluated() {
        let ind = Individual::new(leaf(1.0), 2);
        assert_eq!(ind.fitness().len(), 2);
        assert!(ind.fitness_at(0).is_infinite());
    }

    #[test]
    fn test_set_and_get_fitness() {
        let mut ind = Individual::new(leaf(1.0), 1);
        ind.set_fitness(0.25, 0);
        assert_eq!(ind.fitness_at(0), 0.25);
    }

    #[test]
    fn test_dominance() {
        let mut a = Individual::new(leaf(1.0), 2);
        let mut b = Individual::new(leaf(2.0), 2);
        a.set_fitness(0.1, 0);
        a.set_fitness(0.1, 1);
        b.set_fitness(0.5, 0);
        b.set_fitness(0.1, 1);

        assert!(a.dominates(&b, 1e-9));
        assert!(!b.dominates(&a, 1e-9));
        // Equal within epsilon on every objective: no dominance either way.
        assert!(!a.dominates(&a.clone(), 1e-9));
    }

    #[test]
    fn test_single_objective_comparison() {
        let mut a = Individual::new(leaf(1.0), 1);
        let mut b = Individual::new(leaf(2.0), 1);
        a.set_fitness(0.100, 0);
        b.set_fitness(0.105, 0);

        let coarse = SingleObjectiveComparison { objective: 0, epsilon: 0.01 };
        assert_eq!(coarse.compare(&a, &b), std::cmp::Ordering::Equal);

        let fine = SingleObjectiveComparison { objective: 0, epsilon: 1e-6 };
        assert_eq!(fine.compare(&a, &b), std::cmp::Ordering::Less);
    }
}
