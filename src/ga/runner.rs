//! GA evolutionary loop execution.
//!
//! [`GaRunner`] runs initialization → evaluation → selection → crossover →
//! mutation → evaluation, one synchronous generation at a time.

use super::config::GaConfig;
use super::multi_objective::rank_population;
use super::selection::preference;
use super::types::{Fitness, GaProblem, Individual};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::time::{Duration, Instant};
use tracing::trace;

/// Outcome of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// The fittest individual seen during the run.
    pub best: I,

    pub best_fitness: I::Fitness,

    /// Number of generations executed.
    pub generations: usize,

    /// Whether the stagnation limit ended the run.
    pub stagnated: bool,

    /// Whether the time limit ended the run.
    pub timed_out: bool,

    /// Best fitness after initialization and after each generation.
    pub fitness_history: Vec<f64>,

    /// Non-dominated members of the final population. Empty unless the
    /// problem reports objective vectors.
    pub pareto_front: Vec<I>,

    pub elapsed: Duration,
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```ignore
/// let config = GaConfig::default().with_seed(42);
/// let result = GaRunner::run(&problem, &config);
/// println!("best fitness: {:?}", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA to completion.
    ///
    /// When the problem reports objective vectors, every generation is
    /// ranked into Pareto fronts; elites are then chosen by crowded
    /// comparison instead of fitness.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`GaConfig::validate`]
    /// first for a descriptive error).
    pub fn run<P: GaProblem>(problem: &P, config: &GaConfig) -> GaResult<P::Individual> {
        config.validate().expect("invalid GaConfig");
        let started = Instant::now();
        let deadline = config
            .time_limit_ms
            .map(|ms| started + Duration::from_millis(ms));

        let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random::<u64>));

        let mut population: Vec<P::Individual> = (0..config.population_size)
            .map(|_| problem.create_individual(&mut rng))
            .collect();
        evaluate(problem, &mut population, config.parallel);
        let mut multi_objective = assign_fronts(&mut population);

        let mut best = find_best(&population).clone();
        let mut fitness_history = Vec::with_capacity(config.max_generations.min(1024) + 1);
        fitness_history.push(best.fitness().to_f64());

        let elite_count = config.elite_count();
        let mut stagnation = 0usize;
        let mut generations = 0usize;
        let mut stagnated = false;
        let mut timed_out = false;

        for gen in 0..config.max_generations {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                timed_out = true;
                break;
            }

            if multi_objective {
                population.sort_by(|a, b| preference(b, a));
            } else {
                population.sort_by(|a, b| {
                    b.fitness()
                        .partial_cmp(&a.fitness())
                        .unwrap_or(Ordering::Equal)
                });
            }
            let mut next_gen: Vec<P::Individual> = population[..elite_count].to_vec();

            while next_gen.len() < config.population_size {
                let p1 = config.selection.select(&population, &mut rng);
                let p2 = config.selection.select(&population, &mut rng);

                let children = if rng.random_range(0.0..1.0) < config.crossover_rate {
                    problem.crossover(&population[p1], &population[p2], &mut rng)
                } else {
                    vec![population[p1].clone()]
                };

                for mut child in children {
                    if next_gen.len() >= config.population_size {
                        break;
                    }
                    if rng.random_range(0.0..1.0) < config.mutation_rate {
                        problem.mutate(&mut child, &mut rng);
                    }
                    next_gen.push(child);
                }
            }

            evaluate(problem, &mut next_gen[elite_count..], config.parallel);
            population = next_gen;
            multi_objective = assign_fronts(&mut population);
            generations = gen + 1;

            let gen_best = find_best(&population);
            if gen_best.fitness() > best.fitness() {
                let old = best.fitness().to_f64();
                let new = gen_best.fitness().to_f64();
                if improved_enough(old, new, config.convergence_threshold) {
                    stagnation = 0;
                } else {
                    stagnation += 1;
                }
                best = gen_best.clone();
            } else {
                stagnation += 1;
            }

            fitness_history.push(best.fitness().to_f64());
            trace!(
                generation = generations,
                best = best.fitness().to_f64(),
                stagnation,
                "generation complete"
            );
            problem.on_generation(generations, best.fitness());

            if config.stagnation_limit > 0 && stagnation >= config.stagnation_limit {
                stagnated = true;
                break;
            }
        }

        let pareto_front = if multi_objective {
            population
                .iter()
                .filter(|ind| matches!(ind.pareto_rank(), Some((0, _))))
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        GaResult {
            best_fitness: best.fitness(),
            best,
            generations,
            stagnated,
            timed_out,
            fitness_history,
            pareto_front,
            elapsed: started.elapsed(),
        }
    }
}

fn evaluate<P: GaProblem>(problem: &P, individuals: &mut [P::Individual], parallel: bool) {
    let evaluate_one = |ind: &mut P::Individual| {
        let f = problem.evaluate(ind);
        ind.set_fitness(f);
        if let Some(objectives) = problem.evaluate_objectives(ind) {
            ind.set_objectives(objectives);
        }
    };
    if parallel {
        individuals.par_iter_mut().for_each(evaluate_one);
    } else {
        individuals.iter_mut().for_each(evaluate_one);
    }
}

/// Ranks the population into Pareto fronts if every member carries an
/// objective vector. Returns whether it did.
fn assign_fronts<I: Individual>(population: &mut [I]) -> bool {
    let objectives: Option<Vec<Vec<f64>>> = population
        .iter()
        .map(|ind| ind.objectives().map(<[f64]>::to_vec))
        .collect();
    let Some(objectives) = objectives else {
        return false;
    };
    if objectives.is_empty() {
        return false;
    }

    let ranking = rank_population(&objectives);
    for (i, ind) in population.iter_mut().enumerate() {
        ind.set_pareto_rank(ranking.rank[i], ranking.crowding[i]);
    }
    true
}

fn improved_enough(old: f64, new: f64, threshold: f64) -> bool {
    if threshold <= 0.0 || !old.is_finite() || old == 0.0 {
        return true;
    }
    (new - old).abs() / old.abs() >= threshold
}

/// The individual with the highest fitness; the first one on ties.
fn find_best<I: Individual>(population: &[I]) -> &I {
    let mut best = population.first().expect("population must not be empty");
    for ind in &population[1..] {
        if ind.fitness() > best.fitness() {
            best = ind;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::Selection;

    // ---- OneMax: maximize the number of set bits ----

    #[derive(Clone, Debug)]
    struct BitString {
        bits: Vec<bool>,
        fitness: f64,
    }

    impl Individual for BitString {
        type Fitness = f64;
        fn fitness(&self) -> f64 {
            self.fitness
        }
        fn set_fitness(&mut self, f: f64) {
            self.fitness = f;
        }
    }

    struct OneMax {
        n: usize,
    }

    impl GaProblem for OneMax {
        type Individual = BitString;

        fn create_individual<R: Rng>(&self, rng: &mut R) -> BitString {
            BitString {
                bits: (0..self.n).map(|_| rng.random_bool(0.5)).collect(),
                fitness: f64::worst(),
            }
        }

        fn evaluate(&self, ind: &BitString) -> f64 {
            ind.bits.iter().filter(|&&b| b).count() as f64
        }

        fn crossover<R: Rng>(&self, p1: &BitString, p2: &BitString, rng: &mut R) -> Vec<BitString> {
            let point = rng.random_range(0..self.n);
            let (mut a, mut b) = (p1.bits.clone(), p2.bits.clone());
            a[point..].copy_from_slice(&p2.bits[point..]);
            b[point..].copy_from_slice(&p1.bits[point..]);
            vec![
                BitString { bits: a, fitness: f64::worst() },
                BitString { bits: b, fitness: f64::worst() },
            ]
        }

        fn mutate<R: Rng>(&self, ind: &mut BitString, rng: &mut R) {
            let idx = rng.random_range(0..self.n);
            ind.bits[idx] = !ind.bits[idx];
        }
    }

    fn sequential() -> GaConfig {
        GaConfig::default().with_seed(12345).with_parallel(false)
    }

    #[test]
    fn test_onemax_convergence() {
        let config = sequential()
            .with_population_size(50)
            .with_max_generations(200)
            .with_mutation_rate(0.3);
        let result = GaRunner::run(&OneMax { n: 20 }, &config);
        assert!(
            result.best_fitness >= 15.0,
            "expected at least 15 set bits, got {}",
            result.best_fitness
        );
        assert!(result.pareto_front.is_empty());
    }

    #[test]
    fn test_fitness_history_monotone_with_elitism() {
        let config = sequential()
            .with_population_size(20)
            .with_max_generations(30)
            .with_elite_ratio(0.2);
        let result = GaRunner::run(&OneMax { n: 10 }, &config);
        assert_eq!(result.generations, 30);
        assert_eq!(result.fitness_history.len(), 31);
        for w in result.fitness_history.windows(2) {
            assert!(w[1] >= w[0], "best fitness decreased: {} -> {}", w[0], w[1]);
        }
    }

    #[test]
    fn test_stagnation_termination() {
        let config = sequential()
            .with_population_size(20)
            .with_max_generations(1000)
            .with_stagnation_limit(10);
        let result = GaRunner::run(&OneMax { n: 5 }, &config);
        assert!(result.stagnated);
        assert!(result.generations < 1000);
    }

    #[test]
    fn test_same_seed_same_result() {
        let config = sequential().with_population_size(30).with_max_generations(40);
        let a = GaRunner::run(&OneMax { n: 16 }, &config);
        let b = GaRunner::run(&OneMax { n: 16 }, &config);
        assert_eq!(a.best.bits, b.best.bits);
        assert_eq!(a.fitness_history, b.fitness_history);
    }

    #[test]
    fn test_all_selection_strategies() {
        for selection in [
            Selection::Tournament(3),
            Selection::Roulette,
            Selection::Rank,
            Selection::CrowdedTournament(2),
        ] {
            let config = sequential()
                .with_population_size(30)
                .with_max_generations(50)
                .with_selection(selection);
            let result = GaRunner::run(&OneMax { n: 10 }, &config);
            assert!(result.best_fitness >= 6.0, "{selection:?}: {}", result.best_fitness);
        }
    }

    #[test]
    fn test_parallel_evaluation() {
        let config = GaConfig::default()
            .with_population_size(50)
            .with_max_generations(100)
            .with_seed(12345)
            .with_parallel(true);
        let result = GaRunner::run(&OneMax { n: 20 }, &config);
        assert!(result.best_fitness >= 12.0, "got {}", result.best_fitness);
    }

    #[test]
    fn test_time_limit() {
        let config = sequential()
            .with_population_size(20)
            .with_max_generations(usize::MAX)
            .with_time_limit_ms(20);
        let result = GaRunner::run(&OneMax { n: 8 }, &config);
        assert!(result.timed_out);
        assert!(result.elapsed >= Duration::from_millis(20));
    }

    // ---- Two objectives: ones in the first half, zeros in the second ----

    #[derive(Clone, Debug)]
    struct Tradeoff {
        bits: Vec<bool>,
        fitness: f64,
        objectives: Option<Vec<f64>>,
        front: Option<(usize, f64)>,
    }

    impl Individual for Tradeoff {
        type Fitness = f64;
        fn fitness(&self) -> f64 {
            self.fitness
        }
        fn set_fitness(&mut self, f: f64) {
            self.fitness = f;
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

    struct TradeoffProblem;

    impl TradeoffProblem {
        fn scores(ind: &Tradeoff) -> (f64, f64) {
            let ones = ind.bits.iter().filter(|&&b| b).count() as f64;
            let ones_first = ind.bits[..4].iter().filter(|&&b| b).count() as f64;
            (ones_first, ones - ones_first)
        }
    }

    impl GaProblem for TradeoffProblem {
        type Individual = Tradeoff;

        fn create_individual<R: Rng>(&self, rng: &mut R) -> Tradeoff {
            Tradeoff {
                bits: (0..8).map(|_| rng.random_bool(0.5)).collect(),
                fitness: f64::worst(),
                objectives: None,
                front: None,
            }
        }

        fn evaluate(&self, ind: &Tradeoff) -> f64 {
            let (good, bad) = Self::scores(ind);
            good - bad
        }

        fn evaluate_objectives(&self, ind: &Tradeoff) -> Option<Vec<f64>> {
            let (good, bad) = Self::scores(ind);
            Some(vec![-good, bad])
        }

        fn mutate<R: Rng>(&self, ind: &mut Tradeoff, rng: &mut R) {
            let idx = rng.random_range(0..8);
            ind.bits[idx] = !ind.bits[idx];
        }
    }

    #[test]
    fn test_pareto_front_reported() {
        let config = sequential()
            .with_population_size(30)
            .with_max_generations(60)
            .with_mutation_rate(0.5)
            .with_selection(Selection::CrowdedTournament(2));
        let result = GaRunner::run(&TradeoffProblem, &config);

        assert!(!result.pareto_front.is_empty());
        for member in &result.pareto_front {
            assert_eq!(member.pareto_rank().map(|r| r.0), Some(0));
            assert!(member.objectives().is_some());
        }
        assert!(result.best_fitness >= 2.0, "got {}", result.best_fitness);
    }
}
