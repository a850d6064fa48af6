//! Binds the linear linkage encoding to the GA engine.

use crate::encoding::LinearLinkageEncoding;
use crate::ga::{Fitness, GaProblem, Individual};
use crate::objective::FitnessFunction;
use crate::operators::{GraftMutator, GroupCrossover, MutationKind};
use rand::Rng;

/// A partition under evolution.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub encoding: LinearLinkageEncoding,
    fitness: f64,
    objectives: Option<Vec<f64>>,
    front: Option<(usize, f64)>,
}

impl Candidate {
    pub fn new(encoding: LinearLinkageEncoding) -> Self {
        Self {
            encoding,
            fitness: f64::worst(),
            objectives: None,
            front: None,
        }
    }
}

impl Individual for Candidate {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    fn objectives(&self) -> Option<&[f64]> {
        self.objectives.as_deref()
    }

    fn set_objectives(&mut self, objectives: Vec<f64>) {
        self.objectives = Some(objectives);
    }

    fn pareto_rank(&self) -> Option<(usize, f64)> {
        self.front
    }

    fn set_pareto_rank(&mut self, front: usize, crowding: f64) {
        self.front = Some((front, crowding));
    }
}

/// Module recovery as a [`GaProblem`].
///
/// Every initial individual is the seed partition after one forced
/// mutation: a divide with probability 1/3, otherwise a combine when more
/// than two non-isolated modules exist, otherwise a relocate.
#[derive(Debug)]
pub struct ModularizationProblem {
    seed: LinearLinkageEncoding,
    fitness: FitnessFunction,
    crossover: GroupCrossover,
    mutator: GraftMutator,
    pareto: bool,
}

impl ModularizationProblem {
    pub fn new(
        seed: LinearLinkageEncoding,
        fitness: FitnessFunction,
        mutator: GraftMutator,
        use_weighted_sum: bool,
    ) -> Self {
        Self {
            seed,
            fitness,
            crossover: GroupCrossover::default(),
            mutator,
            pareto: !use_weighted_sum,
        }
    }

    pub fn seed(&self) -> &LinearLinkageEncoding {
        &self.seed
    }

    pub fn fitness_function(&self) -> &FitnessFunction {
        &self.fitness
    }
}

impl GaProblem for ModularizationProblem {
    type Individual = Candidate;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> Candidate {
        let mut encoding = self.seed.clone();
        let kind = if rng.random_bool(1.0 / 3.0) {
            MutationKind::Divide
        } else if encoding.non_isolated_module_count() > 2 {
            MutationKind::Combine
        } else {
            MutationKind::Relocate
        };
        self.mutator.apply(kind, &mut encoding, rng);
        Candidate::new(encoding)
    }

    fn evaluate(&self, individual: &Candidate) -> f64 {
        let encoding = &individual.encoding;
        self.fitness.evaluate(encoding.graph(), encoding.modules())
    }

    fn evaluate_objectives(&self, individual: &Candidate) -> Option<Vec<f64>> {
        if !self.pareto {
            return None;
        }
        let encoding = &individual.encoding;
        Some(
            self.fitness
                .evaluate_vector(encoding.graph(), encoding.modules()),
        )
    }

    fn crossover<R: Rng>(&self, parent1: &Candidate, parent2: &Candidate, rng: &mut R) -> Vec<Candidate> {
        let (a, b) = self
            .crossover
            .crossover(&parent1.encoding, &parent2.encoding, rng);
        vec![Candidate::new(a), Candidate::new(b)]
    }

    fn mutate<R: Rng>(&self, individual: &mut Candidate, rng: &mut R) {
        self.mutator.mutate_in_place(&mut individual.encoding, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::init::from_components;
    use crate::graph::ElementIndexing;
    use crate::objective::ObjectiveWeights;
    use crate::operators::MutationWeights;
    use crate::testing::disjoint_paths;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn problem(use_weighted_sum: bool) -> ModularizationProblem {
        let seed = from_components(disjoint_paths(3, 6, ElementIndexing::VerticesOnly)).unwrap();
        ModularizationProblem::new(
            seed,
            FitnessFunction::from_weights(&ObjectiveWeights::default()).unwrap(),
            GraftMutator::new(1.0, MutationWeights::default()).unwrap(),
            use_weighted_sum,
        )
    }

    #[test]
    fn test_initial_individuals_are_valid() {
        let p = problem(true);
        let mut rng = StdRng::seed_from_u64(12345);
        for _ in 0..20 {
            let ind = p.create_individual(&mut rng);
            assert!(ind.encoding.is_valid(), "{:?}", ind.encoding.validity());
            assert_eq!(ind.fitness(), f64::NEG_INFINITY);
            assert!(ind.objectives().is_none());
        }
    }

    #[test]
    fn test_seed_evaluation() {
        // three paths of 6: cohesion 3 * 5 * 2 = 30, coupling 0
        let p = problem(true);
        let seed = Candidate::new(p.seed().clone());
        assert!((p.evaluate(&seed) - 15.0).abs() < 1e-12);
        assert!(p.evaluate_objectives(&seed).is_none());

        let pareto = problem(false);
        assert_eq!(pareto.evaluate_objectives(&seed), Some(vec![-30.0, 0.0]));
    }

    #[test]
    fn test_crossover_yields_two_unevaluated_children() {
        let p = problem(true);
        let mut rng = StdRng::seed_from_u64(4);
        let a = p.create_individual(&mut rng);
        let b = p.create_individual(&mut rng);
        let children = p.crossover(&a, &b, &mut rng);
        assert_eq!(children.len(), 2);
        for child in &children {
            assert!(child.encoding.is_valid());
            assert!(child.pareto_rank().is_none());
        }
    }
}
