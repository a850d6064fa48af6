//! Scalar and vector fitness over a set of weighted objectives.

use super::measures::{CohesionObjective, CouplingObjective, ModularityObjective};
use super::types::{Direction, Objective};
use crate::error::{ModularError, Result};
use crate::graph::Graph;
use crate::module::Module;

/// Relative weights of the built-in objectives.
///
/// Objectives with weight 0 are left out of the fitness function.
///
/// # Defaults
///
/// ```
/// use u_modular::objective::ObjectiveWeights;
///
/// let w = ObjectiveWeights::default();
/// assert_eq!(w.cohesion, 1.0);
/// assert_eq!(w.coupling, 1.0);
/// assert_eq!(w.modularity, 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectiveWeights {
    pub cohesion: f64,
    pub coupling: f64,
    pub modularity: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            cohesion: 1.0,
            coupling: 1.0,
            modularity: 0.0,
        }
    }
}

impl ObjectiveWeights {
    pub fn with_cohesion(mut self, w: f64) -> Self {
        self.cohesion = w;
        self
    }

    pub fn with_coupling(mut self, w: f64) -> Self {
        self.coupling = w;
        self
    }

    pub fn with_modularity(mut self, w: f64) -> Self {
        self.modularity = w;
        self
    }
}

struct WeightedObjective {
    objective: Box<dyn Objective>,
    /// Normalised so that all weights sum to 1.
    weight: f64,
}

/// Combines objectives into a fitness value where higher is better.
///
/// In weighted-sum form each objective contributes `weight / Σ weights`
/// times its value, negated for minimized objectives. The vector form keeps
/// one entry per objective, oriented for minimization, as expected by
/// [`non_dominated_sort`](crate::ga::multi_objective::non_dominated_sort).
pub struct FitnessFunction {
    objectives: Vec<WeightedObjective>,
}

impl FitnessFunction {
    /// Builds a weighted-sum fitness function.
    ///
    /// Rejects an empty list, negative or non-finite weights, and weights
    /// summing to zero.
    pub fn weighted_sum(objectives: Vec<(Box<dyn Objective>, f64)>) -> Result<Self> {
        if objectives.is_empty() {
            return Err(ModularError::InvalidObjectiveWeights(
                "at least one objective is required".into(),
            ));
        }
        if let Some((objective, w)) = objectives
            .iter()
            .find(|(_, w)| !w.is_finite() || *w < 0.0)
        {
            return Err(ModularError::InvalidObjectiveWeights(format!(
                "weight of `{}` must be finite and non-negative, got {w}",
                objective.name()
            )));
        }
        let total: f64 = objectives.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return Err(ModularError::InvalidObjectiveWeights(
                "weights must not sum to zero".into(),
            ));
        }

        Ok(Self {
            objectives: objectives
                .into_iter()
                .map(|(objective, w)| WeightedObjective {
                    objective,
                    weight: w / total,
                })
                .collect(),
        })
    }

    /// Fitness over the built-in objectives with non-zero weight.
    pub fn from_weights(weights: &ObjectiveWeights) -> Result<Self> {
        let candidates: [(Box<dyn Objective>, f64); 3] = [
            (Box::new(CohesionObjective), weights.cohesion),
            (Box::new(CouplingObjective), weights.coupling),
            (Box::new(ModularityObjective), weights.modularity),
        ];
        let mut chosen = Vec::new();
        for (objective, w) in candidates {
            if !w.is_finite() || w < 0.0 {
                return Err(ModularError::InvalidObjectiveWeights(format!(
                    "weight of `{}` must be finite and non-negative, got {w}",
                    objective.name()
                )));
            }
            if w > 0.0 {
                chosen.push((objective, w));
            }
        }
        Self::weighted_sum(chosen)
    }

    /// Number of objectives, i.e. the length of [`evaluate_vector`](Self::evaluate_vector).
    pub fn objective_count(&self) -> usize {
        self.objectives.len()
    }

    pub fn names(&self) -> Vec<&str> {
        self.objectives.iter().map(|o| o.objective.name()).collect()
    }

    /// Weighted-sum fitness; higher is better.
    pub fn evaluate(&self, graph: &Graph, modules: &[Module]) -> f64 {
        self.objectives
            .iter()
            .map(|o| {
                let value = o.objective.evaluate(graph, modules);
                match o.objective.direction() {
                    Direction::Maximize => o.weight * value,
                    Direction::Minimize => -o.weight * value,
                }
            })
            .sum()
    }

    /// Objective values oriented for minimization (maximized ones negated).
    pub fn evaluate_vector(&self, graph: &Graph, modules: &[Module]) -> Vec<f64> {
        self.objectives
            .iter()
            .map(|o| {
                let value = o.objective.evaluate(graph, modules);
                match o.objective.direction() {
                    Direction::Maximize => -value,
                    Direction::Minimize => value,
                }
            })
            .collect()
    }

    /// Raw objective values keyed by objective name.
    pub fn objective_values(&self, graph: &Graph, modules: &[Module]) -> Vec<(String, f64)> {
        self.objectives
            .iter()
            .map(|o| {
                (
                    o.objective.name().to_string(),
                    o.objective.evaluate(graph, modules),
                )
            })
            .collect()
    }
}

impl std::fmt::Debug for FitnessFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(
                self.objectives
                    .iter()
                    .map(|o| (o.objective.name(), o.weight)),
            )
            .finish()
    }
}
