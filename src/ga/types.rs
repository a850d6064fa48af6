//! Core trait definitions for the GA engine.
//!
//! [`Individual`] and [`GaProblem`] are the contract between the generic
//! evolutionary loop and a concrete problem such as module recovery.

use rand::Rng;

/// Fitness values compared by the engine.
///
/// Higher fitness is better (maximization). Problems that minimize a cost
/// report its negation.
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// The value of an individual that has not been evaluated yet.
    fn worst() -> Self;

    /// Converts the fitness to `f64` for history and logging.
    fn to_f64(self) -> f64;
}

impl Fitness for f64 {
    fn worst() -> Self {
        f64::NEG_INFINITY
    }

    fn to_f64(self) -> f64 {
        self
    }
}

impl Fitness for f32 {
    fn worst() -> Self {
        f32::NEG_INFINITY
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

/// A candidate solution in the population.
///
/// Besides its scalar fitness an individual may carry an objective vector
/// and its Pareto standing; the default methods make both optional, so
/// single-objective problems only implement the first two.
pub trait Individual: Clone + Send + Sync {
    type Fitness: Fitness;

    fn fitness(&self) -> Self::Fitness;

    /// Called by the engine after evaluation.
    fn set_fitness(&mut self, fitness: Self::Fitness);

    /// Objective vector, oriented for minimization.
    fn objectives(&self) -> Option<&[f64]> {
        None
    }

    fn set_objectives(&mut self, _objectives: Vec<f64>) {}

    /// Pareto front index (0 = non-dominated) and crowding distance.
    fn pareto_rank(&self) -> Option<(usize, f64)> {
        None
    }

    fn set_pareto_rank(&mut self, _front: usize, _crowding: f64) {}
}

/// A problem the GA engine can optimize.
///
/// # Thread Safety
///
/// `GaProblem` must be `Send + Sync`: evaluation of one generation may run
/// on the rayon pool.
pub trait GaProblem: Send + Sync {
    type Individual: Individual;

    /// Creates a member of the initial population.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Scalar fitness of an individual; higher is better.
    fn evaluate(&self, individual: &Self::Individual) -> <Self::Individual as Individual>::Fitness;

    /// Objective vector for Pareto ranking, oriented for minimization.
    ///
    /// Returning `None` (the default) keeps the run single-objective.
    fn evaluate_objectives(&self, _individual: &Self::Individual) -> Option<Vec<f64>> {
        None
    }

    /// Produces one or two offspring. The parents must not be modified.
    ///
    /// The default implementation clones `parent1`.
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        _parent2: &Self::Individual,
        _rng: &mut R,
    ) -> Vec<Self::Individual> {
        vec![parent1.clone()]
    }

    /// Mutates an offspring the engine owns exclusively.
    ///
    /// The default implementation is a no-op.
    fn mutate<R: Rng>(&self, _individual: &mut Self::Individual, _rng: &mut R) {}

    /// Called at the end of each generation with the best fitness so far.
    fn on_generation(
        &self,
        _generation: usize,
        _best_fitness: <Self::Individual as Individual>::Fitness,
    ) {
    }
}
