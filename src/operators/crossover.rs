//! Group crossover for linear linkage encodings.

use crate::encoding::{fix, LinearLinkageEncoding};
use crate::module::Module;
use rand::Rng;
use std::collections::BTreeMap;

/// Recombines module boundaries of two parents.
///
/// # Algorithm
///
/// 1. Pick the inherited ending nodes: an index is one when both parents
///    end a chain there, when one parent does and a coin with probability
///    `inherit_probability` lands for that parent, or when the element is
///    an isolated vertex. Each seeds a new module.
/// 2. For each parent independently, walk the remaining indices in order.
///    An index joins the module seeded by its parent module's ending node
///    if that module exists; otherwise a random module already holding an
///    adjacent element; otherwise it opens a module of its own.
/// 3. Write the modules as a genome and repair it if it fails validation.
///
/// # Complexity
/// O(N + A) per offspring before repair, with A the element adjacency size.
///
/// # Panics
/// Panics if the parents have different lengths.
#[derive(Debug, Clone, Copy)]
pub struct GroupCrossover {
    /// Chance that a single parent's ending node is inherited.
    pub inherit_probability: f64,
}

impl Default for GroupCrossover {
    fn default() -> Self {
        Self {
            inherit_probability: 0.5,
        }
    }
}

impl GroupCrossover {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produces two offspring, one shaped by each parent.
    pub fn crossover<R: Rng>(
        &self,
        parent1: &LinearLinkageEncoding,
        parent2: &LinearLinkageEncoding,
        rng: &mut R,
    ) -> (LinearLinkageEncoding, LinearLinkageEncoding) {
        assert_eq!(
            parent1.len(),
            parent2.len(),
            "parents must encode the same graph"
        );

        let seeds = self.inherited_seeds(parent1, parent2, rng);
        let child1 = build_offspring(parent1, &seeds, rng);
        let child2 = build_offspring(parent2, &seeds, rng);
        (child1, child2)
    }

    fn inherited_seeds<R: Rng>(
        &self,
        parent1: &LinearLinkageEncoding,
        parent2: &LinearLinkageEncoding,
        rng: &mut R,
    ) -> BTreeMap<usize, Module> {
        let graph = parent1.graph();
        let p = self.inherit_probability.clamp(0.0, 1.0);
        (0..parent1.len())
            .filter(|&i| {
                let e1 = parent1.is_ending_node(i);
                let e2 = parent2.is_ending_node(i);
                graph.is_isolated_element(i)
                    || (e1 && e2)
                    || (e1 && rng.random_bool(p))
                    || (e2 && rng.random_bool(p))
            })
            .map(|i| (i, Module::singleton(i)))
            .collect()
    }
}

fn build_offspring<R: Rng>(
    parent: &LinearLinkageEncoding,
    seeds: &BTreeMap<usize, Module>,
    rng: &mut R,
) -> LinearLinkageEncoding {
    let graph = parent.graph().clone();
    let n = parent.len();
    let mut modules = seeds.clone();
    let mut key_of: Vec<Option<usize>> = vec![None; n];
    for &s in seeds.keys() {
        key_of[s] = Some(s);
    }

    for i in 0..n {
        if key_of[i].is_some() {
            continue;
        }
        let ending = parent.ending_node_of(parent.module_index_of(i));
        let key = if modules.contains_key(&ending) {
            ending
        } else {
            let mut candidates: Vec<usize> = graph
                .element_neighbors(i)
                .filter_map(|j| key_of[j])
                .collect();
            candidates.sort_unstable();
            candidates.dedup();
            if candidates.is_empty() {
                modules.insert(i, Module::new());
                i
            } else {
                candidates[rng.random_range(0..candidates.len())]
            }
        };
        if let Some(module) = modules.get_mut(&key) {
            module.add_index(i);
        }
        key_of[i] = Some(key);
    }

    let modules: Vec<Module> = modules.into_values().collect();
    let mut child = LinearLinkageEncoding::from_modules(graph, &modules)
        .expect("crossover assigns every index to exactly one module");
    if !child.is_valid() {
        fix(&mut child, rng);
    }
    child
}
