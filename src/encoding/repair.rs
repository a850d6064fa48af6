//! Repair pipeline restoring the four encoding invariants.
//!
//! [`fix`] runs the steps in a fixed order (connectivity, degenerate
//! modules, allele cardinality, monolith), each guarded by its own check,
//! and repeats the sequence until the encoding validates. Every step
//! rewrites only the modules it touches. When the rounds run out the
//! encoding is reset to one module per connected component, split once if
//! that leaves a monolith.
//!
//! Some graphs admit no valid partition at all (a single short chain, for
//! instance); `fix` then returns the best effort without failing.

use super::lle::LinearLinkageEncoding;
use crate::module::{
    bisect_module, check_connectivity, connected_pieces, is_isolated, merge_modules,
    split_module_random_walk, Module,
};
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Hard bound on connectivity repair iterations.
pub const CONNECTIVITY_ITERATION_LIMIT: usize = 100;

/// Number of full pipeline passes before falling back to components.
pub const MAX_REPAIR_ROUNDS: usize = 10;

/// Repairs `encoding` in place until it validates or the fallback applies.
pub fn fix<R: Rng>(encoding: &mut LinearLinkageEncoding, rng: &mut R) {
    for round in 0..MAX_REPAIR_ROUNDS {
        let validity = encoding.validity();
        if validity.is_valid() {
            return;
        }
        trace!(round, ?validity, "repairing encoding");

        repair_connectivity(encoding, rng);
        repair_degenerate(encoding, rng);
        repair_cardinality(encoding, rng);
        repair_monolith(encoding, rng);
    }
    if encoding.is_valid() {
        return;
    }

    debug!(
        rounds = MAX_REPAIR_ROUNDS,
        validity = ?encoding.validity(),
        "repair did not converge, resetting to connected components"
    );
    reset_to_components(encoding, rng);
}

/// Reassigns stray pieces of disconnected modules.
///
/// For each disconnected module the largest connected piece stays; every
/// other piece moves wholesale into a random module adjacent to it, or
/// becomes a module of its own when nothing borders it. Each pass fixes one
/// module, so the loop is bounded by the module count; the
/// [`CONNECTIVITY_ITERATION_LIMIT`] guard resets to components if exceeded.
pub fn repair_connectivity<R: Rng>(encoding: &mut LinearLinkageEncoding, rng: &mut R) {
    let graph = encoding.graph().clone();

    for _ in 0..CONNECTIVITY_ITERATION_LIMIT {
        let Some(k) = encoding
            .modules()
            .iter()
            .position(|m| !check_connectivity(m, &graph))
        else {
            return;
        };

        let mut pieces = connected_pieces(encoding.module(k), &graph);
        let largest = pieces
            .iter()
            .enumerate()
            .max_by_key(|(i, p)| (p.len(), std::cmp::Reverse(*i)))
            .map_or(0, |(i, _)| i);
        let kept = pieces.swap_remove(largest);

        let mut grown: BTreeMap<usize, Module> = BTreeMap::new();
        let mut updated = vec![kept];
        for piece in pieces {
            let mut targets: Vec<usize> = piece
                .iter()
                .flat_map(|i| encoding.incident_modules(i))
                .filter(|&t| t != k)
                .collect();
            targets.sort_unstable();
            targets.dedup();

            if targets.is_empty() {
                updated.push(piece);
                continue;
            }
            let t = targets[rng.random_range(0..targets.len())];
            let base = grown
                .remove(&t)
                .unwrap_or_else(|| encoding.module(t).clone());
            grown.insert(t, merge_modules(&base, &piece));
        }
        updated.extend(grown.into_values());
        encoding.set_modules(&updated);
    }

    if encoding
        .modules()
        .iter()
        .any(|m| !check_connectivity(m, &graph))
    {
        debug!(
            limit = CONNECTIVITY_ITERATION_LIMIT,
            "connectivity repair hit its iteration limit"
        );
        reset_to_components(encoding, rng);
    }
}

/// Merges every non-isolated module of two elements or fewer into a
/// randomly chosen neighbouring module. Modules without neighbours stay.
pub fn repair_degenerate<R: Rng>(encoding: &mut LinearLinkageEncoding, rng: &mut R) {
    loop {
        let graph = encoding.graph().clone();
        let candidate = (0..encoding.module_count()).find_map(|k| {
            let module = encoding.module(k);
            if module.len() > 2 || is_isolated(module, &graph) {
                return None;
            }
            let neighbors = encoding.neighbor_modules(k);
            (!neighbors.is_empty()).then_some((k, neighbors))
        });
        let Some((k, neighbors)) = candidate else {
            return;
        };

        let t = neighbors[rng.random_range(0..neighbors.len())];
        let merged = merge_modules(encoding.module(k), encoding.module(t));
        encoding.set_modules(&[merged]);
    }
}

/// Caps every allele value at two occurrences.
///
/// Excess positions pointing at an over-subscribed value are redirected to
/// values nobody points at, preferring one adjacent to the position, else
/// the position itself (a new ending node), else any unused value. The
/// self-loop occurrence of a value is never redirected.
pub fn repair_cardinality<R: Rng>(encoding: &mut LinearLinkageEncoding, rng: &mut R) {
    let n = encoding.len();
    let mut genes = encoding.to_genes();
    let mut counts = vec![0usize; n];
    for &g in &genes {
        counts[g] += 1;
    }
    if counts.iter().all(|&c| c <= 2) {
        return;
    }

    let graph = encoding.graph().clone();
    for value in 0..n {
        if counts[value] <= 2 {
            continue;
        }
        let mut pointing: Vec<usize> = (0..n)
            .filter(|&p| genes[p] == value && p != value)
            .collect();
        let keep = if genes[value] == value { 1 } else { 2 };
        while pointing.len() > keep {
            let p = pointing.remove(rng.random_range(0..pointing.len()));

            let mut adjacent: Vec<usize> = graph
                .element_neighbors(p)
                .filter(|&u| counts[u] == 0)
                .collect();
            adjacent.sort_unstable();
            let replacement = if !adjacent.is_empty() {
                adjacent[rng.random_range(0..adjacent.len())]
            } else if counts[p] == 0 {
                p
            } else {
                let unused: Vec<usize> = (0..n).filter(|&u| counts[u] == 0).collect();
                unused[rng.random_range(0..unused.len())]
            };

            genes[p] = replacement;
            counts[value] -= 1;
            counts[replacement] += 1;
        }
    }
    encoding.replace_genes(genes);
}

/// Splits the only non-isolated module when the partition is a monolith.
///
/// Prefers a spanning-tree bisection into two connected halves of at least
/// three elements; falls back to the random-walk splitter.
pub fn repair_monolith<R: Rng>(encoding: &mut LinearLinkageEncoding, rng: &mut R) {
    if encoding.non_isolated_module_count() != 1 {
        return;
    }
    let graph = encoding.graph().clone();
    let candidates: Vec<usize> = (0..encoding.module_count())
        .filter(|&k| encoding.module(k).len() > 1)
        .collect();
    if candidates.is_empty() {
        return;
    }

    let k = candidates[rng.random_range(0..candidates.len())];
    let module = encoding.module(k).clone();
    let pieces = match bisect_module(&module, &graph, rng) {
        Some((a, b)) => vec![a, b],
        None => split_module_random_walk(&module, &graph, rng),
    };
    trace!(size = module.len(), pieces = pieces.len(), "split monolith");
    encoding.set_modules(&pieces);
}

fn reset_to_components<R: Rng>(encoding: &mut LinearLinkageEncoding, rng: &mut R) {
    let modules: Vec<Module> = encoding
        .graph()
        .element_components()
        .into_iter()
        .map(Module::from_indices)
        .collect();
    encoding.set_modules(&modules);
    repair_monolith(encoding, rng);
}
