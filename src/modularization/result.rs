//! Run outcome and its textual summary.

use crate::graph::Graph;
use crate::module::Module;
use std::fmt::Write;
use std::time::Duration;

/// A non-dominated partition of a Pareto run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParetoSolution {
    pub genes: Vec<usize>,
    pub modules: Vec<Module>,
    /// Weighted-sum fitness.
    pub fitness: f64,
    /// Raw objective values, in the order of `objective_values` of the
    /// enclosing result.
    pub objectives: Vec<f64>,
}

/// Outcome of [`run`](super::run).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModularizationResult {
    /// Modules of the best partition, ordered by smallest index.
    pub best_modules: Vec<Module>,

    pub best_genes: Vec<usize>,

    /// Weighted-sum fitness of the best partition; higher is better.
    pub best_fitness: f64,

    /// Raw value of every objective for the best partition.
    pub objective_values: Vec<(String, f64)>,

    /// First front of the final population, without duplicate genomes.
    /// Empty for weighted-sum runs.
    pub pareto_front: Vec<ParetoSolution>,

    pub generations: usize,

    pub elapsed: Duration,

    pub fitness_history: Vec<f64>,
}

impl ModularizationResult {
    pub fn module_count(&self) -> usize {
        self.best_modules.len()
    }

    pub fn largest_module_size(&self) -> usize {
        self.best_modules.iter().map(Module::len).max().unwrap_or(0)
    }

    pub fn smallest_module_size(&self) -> usize {
        self.best_modules.iter().map(Module::len).min().unwrap_or(0)
    }

    /// Member names of module `k`, in index order.
    ///
    /// # Panics
    /// Panics if `k` is out of range or `graph` is not the graph of the run.
    pub fn member_names(&self, graph: &Graph, k: usize) -> Vec<String> {
        self.best_modules[k]
            .iter()
            .map(|i| graph.element_name(i))
            .collect()
    }

    /// Human-readable report of the best partition.
    ///
    /// Lists every module with its members, then module statistics,
    /// objective values, fitness, and elapsed time.
    pub fn summary(&self, graph: &Graph) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Modules: {}", self.module_count());
        for k in 0..self.best_modules.len() {
            let _ = writeln!(
                out,
                "  Module {} ({}): {}",
                k + 1,
                self.best_modules[k].len(),
                self.member_names(graph, k).join(", ")
            );
        }
        let _ = writeln!(out, "Largest module: {}", self.largest_module_size());
        let _ = writeln!(out, "Smallest module: {}", self.smallest_module_size());
        let _ = writeln!(out, "Total elements: {}", self.best_genes.len());
        for (name, value) in &self.objective_values {
            let _ = writeln!(out, "{name}: {value:.4}");
        }
        let _ = writeln!(out, "Fitness: {:.4}", self.best_fitness);
        let _ = writeln!(out, "Generations: {}", self.generations);
        if !self.pareto_front.is_empty() {
            let _ = writeln!(out, "Pareto front: {} solutions", self.pareto_front.len());
        }
        let _ = write!(out, "Elapsed: {} ms", self.elapsed.as_millis());
        out
    }
}
