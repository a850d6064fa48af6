//! Module recovery runs.
//!
//! [`run`] labels the graph greedily (or by connected component), encodes
//! the labelling as the seed partition, and evolves it with the GA engine,
//! [`GroupCrossover`](crate::operators::GroupCrossover), and
//! [`GraftMutator`](crate::operators::GraftMutator).
//!
//! # Example
//!
//! ```
//! use u_modular::graph::{GraphBuilder, RelationKind};
//! use u_modular::modularization::{run, RunParameters};
//!
//! let mut builder = GraphBuilder::new();
//! for name in ["A", "B", "C", "D", "E", "F"] {
//!     builder.add_function(name).unwrap();
//! }
//! builder.add_relation(RelationKind::Conjunction, "A", "B").unwrap();
//! builder.add_relation(RelationKind::Conjunction, "B", "C").unwrap();
//! builder.add_relation(RelationKind::Read, "D", "E").unwrap();
//! builder.add_relation(RelationKind::Read, "E", "F").unwrap();
//! let mut graph = builder.build().unwrap();
//!
//! let params = RunParameters::default()
//!     .with_population_size(20)
//!     .with_max_generations(10)
//!     .with_parallel(false);
//! let result = run(&mut graph, &params).unwrap();
//! assert_eq!(result.module_count(), 2);
//! println!("{}", result.summary(&graph));
//! ```

mod config;
mod problem;
mod result;

pub use config::{Initializer, ParentSelection, RunParameters};
pub use problem::{Candidate, ModularizationProblem};
pub use result::{ModularizationResult, ParetoSolution};

use crate::encoding::init::{from_components, from_greedy};
use crate::encoding::{fix, LinearLinkageEncoding};
use crate::error::{ModularError, Result};
use crate::ga::{GaResult, GaRunner};
use crate::graph::Graph;
use crate::greedy::GreedyPartitioner;
use crate::objective::FitnessFunction;
use crate::operators::GraftMutator;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Recovers modules of `graph`.
///
/// With [`Initializer::Greedy`] the greedy component labels are written onto
/// `graph` before evolution starts, so they remain available to callers
/// afterwards.
///
/// # Errors
///
/// Invalid parameters or weights, a graph without modularisable elements,
/// a greedy pass over a graph without participating relations, and a
/// worker pool that cannot be built.
pub fn run(graph: &mut Graph, params: &RunParameters) -> Result<ModularizationResult> {
    params.validate()?;
    if graph.element_count() == 0 {
        return Err(ModularError::EmptyGraph);
    }

    let labels = match params.initializer {
        Initializer::Greedy => Some(GreedyPartitioner::apply(graph)?),
        Initializer::ConnectedComponents => None,
    };
    let shared = Arc::new(graph.clone());
    let mut seed = match &labels {
        Some(labels) => from_greedy(shared.clone(), labels)?,
        None => from_components(shared.clone())?,
    };
    let mut rng = StdRng::seed_from_u64(params.seed.unwrap_or_else(rand::random::<u64>));
    if !seed.is_valid() {
        debug!(validity = ?seed.validity(), "repairing seed partition");
        fix(&mut seed, &mut rng);
    }

    let fitness = FitnessFunction::from_weights(&params.objective_weights)?;
    let mutator = GraftMutator::new(params.mutation_rate, params.mutation_weights)?;
    let problem = ModularizationProblem::new(seed, fitness, mutator, params.use_weighted_sum);
    let config = params.ga_config();

    info!(
        elements = shared.element_count(),
        seed_modules = problem.seed().module_count(),
        population = params.population_size,
        generations = params.max_generations,
        weighted_sum = params.use_weighted_sum,
        "starting modularization"
    );

    let ga = match params.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| ModularError::ThreadPool(e.to_string()))?;
            pool.install(|| GaRunner::run(&problem, &config))
        }
        None => GaRunner::run(&problem, &config),
    };

    let result = collect(&problem, ga);
    info!(
        modules = result.module_count(),
        fitness = result.best_fitness,
        generations = result.generations,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "modularization finished"
    );
    Ok(result)
}

fn collect(problem: &ModularizationProblem, ga: GaResult<Candidate>) -> ModularizationResult {
    let fitness = problem.fitness_function();
    let best = &ga.best.encoding;
    let objective_values = fitness.objective_values(best.graph(), best.modules());

    let mut seen: HashSet<Vec<usize>> = HashSet::new();
    let pareto_front = ga
        .pareto_front
        .iter()
        .filter(|c| seen.insert(c.encoding.to_genes()))
        .map(|c| solution(fitness, &c.encoding))
        .collect();

    ModularizationResult {
        best_modules: best.modules().to_vec(),
        best_genes: best.to_genes(),
        best_fitness: ga.best_fitness,
        objective_values,
        pareto_front,
        generations: ga.generations,
        elapsed: ga.elapsed,
        fitness_history: ga.fitness_history,
    }
}

fn solution(fitness: &FitnessFunction, encoding: &LinearLinkageEncoding) -> ParetoSolution {
    let (graph, modules) = (encoding.graph(), encoding.modules());
    ParetoSolution {
        genes: encoding.to_genes(),
        modules: modules.to_vec(),
        fitness: fitness.evaluate(graph, modules),
        objectives: fitness
            .objective_values(graph, modules)
            .into_iter()
            .map(|(_, value)| value)
            .collect(),
    }
}
