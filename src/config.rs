//! Configuration consumed by an external evolutionary driver.

use serde::{Deserialize, Serialize};

use crate::data::Scalar;

/// Plain-value knobs for a genetic-algorithm run.
///
/// The engine attaches no semantics to these fields; validation (for
/// example, keeping probabilities inside `[0, 1]`) is the driver's
/// responsibility, as is any defaulting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneticAlgorithmConfig {
    /// Number of generations to run.
    pub generations: usize,
    /// Total fitness-evaluation budget.
    pub evaluations: usize,
    /// Local-search iterations per individual.
    pub iterations: usize,
    /// Number of individuals in the population.
    pub population_size: usize,
    /// Number of offspring generated per generation.
    pub pool_size: usize,
    /// Probability that an offspring is produced by crossover.
    pub crossover_probability: Scalar,
    /// Probability that an offspring is mutated.
    pub mutation_probability: Scalar,
    /// Tolerance used when comparing fitness values.
    pub epsilon: Scalar,
    /// Seed for the driver's random engine.
    pub seed: u64,
    /// Wall-clock limit for the whole run, in seconds.
    pub time_limit: u64,
}
