//! Parent selection strategies.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic
//!   Algorithm: NSGA-II" (crowded comparison)

use super::multi_objective::crowded_cmp;
use super::types::{Fitness, Individual};
use rand::Rng;
use std::cmp::Ordering;

/// Selection strategy for choosing parents.
///
/// All strategies treat **higher fitness as better**.
///
/// ```
/// use u_modular::ga::Selection;
///
/// assert_eq!(Selection::default(), Selection::Tournament(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Draws `k` individuals with replacement and keeps the fittest. On ties
    /// the first drawn wins.
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),

    /// Fitness-proportionate selection over `fitness - min + ε`.
    ///
    /// # Complexity
    /// O(n) per selection
    Roulette,

    /// Linear ranking: the i-th best of n gets weight `n - i`.
    ///
    /// Reference: Baker (1985), "Adaptive Selection Methods for Genetic
    /// Algorithms"
    ///
    /// # Complexity
    /// O(n log n) per selection
    Rank,

    /// Tournament under the crowded comparison: lower Pareto front wins,
    /// then larger crowding distance. Individuals without a Pareto rank
    /// are compared by fitness.
    CrowdedTournament(usize),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Selects a parent index.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select<I: Individual, R: Rng>(&self, population: &[I], rng: &mut R) -> usize {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );

        match self {
            Selection::Tournament(k) => tournament(population, *k, rng, |a, b| {
                a.fitness().partial_cmp(&b.fitness()).unwrap_or(Ordering::Equal)
            }),
            Selection::Roulette => roulette(population, rng),
            Selection::Rank => rank(population, rng),
            Selection::CrowdedTournament(k) => tournament(population, *k, rng, preference),
        }
    }
}

/// `Greater` when `a` is preferred over `b`.
pub(crate) fn preference<I: Individual>(a: &I, b: &I) -> Ordering {
    match (a.pareto_rank(), b.pareto_rank()) {
        (Some(ra), Some(rb)) => crowded_cmp(ra, rb),
        _ => a.fitness().partial_cmp(&b.fitness()).unwrap_or(Ordering::Equal),
    }
}

fn tournament<I, R, F>(population: &[I], k: usize, rng: &mut R, better: F) -> usize
where
    I: Individual,
    R: Rng,
    F: Fn(&I, &I) -> Ordering,
{
    let n = population.len();
    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k.max(1) {
        let idx = rng.random_range(0..n);
        if better(&population[idx], &population[best_idx]) == Ordering::Greater {
            best_idx = idx;
        }
    }
    best_idx
}

fn roulette<I: Individual, R: Rng>(population: &[I], rng: &mut R) -> usize {
    let n = population.len();
    if n == 1 {
        return 0;
    }

    let fitnesses: Vec<f64> = population
        .iter()
        .map(|ind| ind.fitness().to_f64())
        .collect();
    let min_fitness = fitnesses
        .iter()
        .copied()
        .filter(|f| f.is_finite())
        .fold(f64::INFINITY, f64::min);
    if !min_fitness.is_finite() {
        return rng.random_range(0..n);
    }

    let epsilon = 1e-10;
    let weights: Vec<f64> = fitnesses
        .iter()
        .map(|&f| {
            if f.is_finite() {
                f - min_fitness + epsilon
            } else {
                epsilon
            }
        })
        .collect();

    let total: f64 = weights.iter().sum();
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }
    n - 1
}

fn rank<I: Individual, R: Rng>(population: &[I], rng: &mut R) -> usize {
    let n = population.len();
    if n == 1 {
        return 0;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        population[b]
            .fitness()
            .partial_cmp(&population[a].fitness())
            .unwrap_or(Ordering::Equal)
    });

    let total = (n * (n + 1)) as f64 / 2.0;
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (position, &idx) in order.iter().enumerate() {
        cumulative += (n - position) as f64;
        if cumulative > threshold {
            return idx;
        }
    }
    order[n - 1]
}
