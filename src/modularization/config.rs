//! Run parameters.

use crate::error::{ModularError, Result};
use crate::ga::{GaConfig, Selection};
use crate::objective::{FitnessFunction, ObjectiveWeights};
use crate::operators::MutationWeights;

/// How the seed partition of a run is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Initializer {
    /// Greedy edge-priority partition.
    #[default]
    Greedy,
    /// One module per connected component.
    ConnectedComponents,
}

/// How parents are drawn from each generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParentSelection {
    /// Tournament of `tournament_size`; crowded tournament in Pareto runs.
    #[default]
    Tournament,
    /// Fitness-proportionate over the weighted-sum fitness.
    Roulette,
    /// Linear ranking by weighted-sum fitness.
    Rank,
}

/// Parameters of a modularization run.
///
/// # Defaults
///
/// ```
/// use u_modular::modularization::{Initializer, RunParameters};
///
/// let params = RunParameters::default();
/// assert_eq!(params.population_size, 100);
/// assert_eq!(params.tournament_size, 3);
/// assert_eq!(params.seed, Some(12345));
/// assert_eq!(params.initializer, Initializer::Greedy);
/// assert!(params.use_weighted_sum);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunParameters {
    pub population_size: usize,

    /// Probability of recombining a selected pair, in `[0, 1]`.
    pub crossover_rate: f64,

    /// Probability of mutating an offspring, in `[0, 1]`.
    pub mutation_rate: f64,

    pub max_generations: usize,

    pub tournament_size: usize,

    pub selection: ParentSelection,

    /// Scalar weighted-sum fitness when `true`; Pareto ranking over the
    /// objective vector otherwise.
    pub use_weighted_sum: bool,

    pub mutation_weights: MutationWeights,

    pub objective_weights: ObjectiveWeights,

    /// Fraction of each generation carried over unchanged.
    pub elite_ratio: f64,

    /// Generations without improvement before stopping; 0 runs all
    /// `max_generations`.
    pub stagnation_limit: usize,

    /// `None` draws a random seed.
    pub seed: Option<u64>,

    /// Evaluate each generation on the rayon pool.
    pub parallel: bool,

    /// Worker count of a dedicated pool; `None` uses the global pool.
    pub threads: Option<usize>,

    pub initializer: Initializer,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            population_size: 100,
            crossover_rate: 0.8,
            mutation_rate: 0.2,
            max_generations: 200,
            tournament_size: 3,
            selection: ParentSelection::default(),
            use_weighted_sum: true,
            mutation_weights: MutationWeights::default(),
            objective_weights: ObjectiveWeights::default(),
            elite_ratio: 0.1,
            stagnation_limit: 0,
            seed: Some(12345),
            parallel: true,
            threads: None,
            initializer: Initializer::default(),
        }
    }
}

impl RunParameters {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    pub fn with_selection(mut self, selection: ParentSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_weighted_sum(mut self, enabled: bool) -> Self {
        self.use_weighted_sum = enabled;
        self
    }

    pub fn with_mutation_weights(mut self, weights: MutationWeights) -> Self {
        self.mutation_weights = weights;
        self
    }

    pub fn with_objective_weights(mut self, weights: ObjectiveWeights) -> Self {
        self.objective_weights = weights;
        self
    }

    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio;
        self
    }

    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_random_seed(mut self) -> Self {
        self.seed = None;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_initializer(mut self, initializer: Initializer) -> Self {
        self.initializer = initializer;
        self
    }

    /// Checks every parameter, including both weight sets.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(ModularError::InvalidParameters(msg));

        for (name, rate) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
            ("elite_ratio", self.elite_ratio),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return invalid(format!("{name} must be in [0, 1], got {rate}"));
            }
        }
        if self.tournament_size == 0 {
            return invalid("tournament_size must be at least 1".into());
        }
        if self.threads == Some(0) {
            return invalid("threads must be at least 1 when set".into());
        }
        self.mutation_weights.validate()?;
        FitnessFunction::from_weights(&self.objective_weights)?;
        self.ga_config()
            .validate()
            .map_err(ModularError::InvalidParameters)
    }

    /// The GA configuration these parameters describe.
    ///
    /// Mutation is always offered to the operator, which applies its own
    /// probability (`mutation_rate`). Tournaments in Pareto runs use the
    /// crowded comparison; roulette and rank always read the weighted-sum
    /// fitness.
    pub fn ga_config(&self) -> GaConfig {
        let selection = match self.selection {
            ParentSelection::Tournament if self.use_weighted_sum => {
                Selection::Tournament(self.tournament_size)
            }
            ParentSelection::Tournament => Selection::CrowdedTournament(self.tournament_size),
            ParentSelection::Roulette => Selection::Roulette,
            ParentSelection::Rank => Selection::Rank,
        };
        let mut config = GaConfig::default()
            .with_population_size(self.population_size)
            .with_max_generations(self.max_generations)
            .with_selection(selection)
            .with_elite_ratio(self.elite_ratio)
            .with_crossover_rate(self.crossover_rate)
            .with_mutation_rate(1.0)
            .with_stagnation_limit(self.stagnation_limit)
            .with_parallel(self.parallel);
        config.seed = self.seed;
        config
    }
}
