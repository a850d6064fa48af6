//! Graft mutation: divide, combine, or relocate.

use crate::encoding::{fix, LinearLinkageEncoding};
use crate::error::{ModularError, Result};
use crate::module::{check_connectivity, is_isolated, merge_modules, split_module_random_walk};
use rand::Rng;
use tracing::trace;

/// Relative weights of the three graft operators.
///
/// Weights are normalised by their sum when drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MutationWeights {
    pub split: f64,
    pub combine: f64,
    pub relocate: f64,
}

impl Default for MutationWeights {
    fn default() -> Self {
        Self {
            split: 1.0,
            combine: 1.0,
            relocate: 1.0,
        }
    }
}

impl MutationWeights {
    pub fn new(split: f64, combine: f64, relocate: f64) -> Self {
        Self {
            split,
            combine,
            relocate,
        }
    }

    /// Rejects negative or non-finite weights and an all-zero set.
    pub fn validate(&self) -> Result<()> {
        for (name, w) in [
            ("split", self.split),
            ("combine", self.combine),
            ("relocate", self.relocate),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(ModularError::InvalidMutationWeights(format!(
                    "{name} weight must be finite and non-negative, got {w}"
                )));
            }
        }
        if self.total() <= 0.0 {
            return Err(ModularError::InvalidMutationWeights(
                "at least one weight must be positive".into(),
            ));
        }
        Ok(())
    }

    fn total(&self) -> f64 {
        self.split + self.combine + self.relocate
    }

    /// Draws an operator proportionally to the weights.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> MutationKind {
        let roll = rng.random_range(0.0..1.0) * self.total();
        if roll < self.split {
            MutationKind::Divide
        } else if roll < self.split + self.combine {
            MutationKind::Combine
        } else {
            MutationKind::Relocate
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Random-walk split of a module with more than one element.
    Divide,
    /// Merge of a module with one of its neighbours.
    Combine,
    /// Move of one boundary element into a neighbouring module.
    Relocate,
}

/// Mutation operator over linear linkage encodings.
///
/// With probability `probability` one operator is drawn from the weights and
/// applied; the result is repaired if it no longer validates. Combine is
/// skipped while fewer than three non-isolated modules exist, since merging
/// would leave a monolith.
///
/// # Example
///
/// ```
/// use u_modular::operators::{GraftMutator, MutationWeights};
///
/// let mutator = GraftMutator::new(0.2, MutationWeights::default()).unwrap();
/// assert_eq!(mutator.probability(), 0.2);
/// assert!(GraftMutator::new(0.2, MutationWeights::new(0.0, 0.0, 0.0)).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct GraftMutator {
    probability: f64,
    weights: MutationWeights,
}

impl GraftMutator {
    /// Validates the weights; `probability` is clamped to `[0, 1]`.
    pub fn new(probability: f64, weights: MutationWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self {
            probability: probability.clamp(0.0, 1.0),
            weights,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn weights(&self) -> &MutationWeights {
        &self.weights
    }

    /// Returns a mutated copy; `encoding` is left as is.
    pub fn mutate<R: Rng>(
        &self,
        encoding: &LinearLinkageEncoding,
        rng: &mut R,
    ) -> LinearLinkageEncoding {
        let mut child = encoding.clone();
        self.mutate_in_place(&mut child, rng);
        child
    }

    /// Mutates an encoding nobody else holds, subject to the probability.
    pub fn mutate_in_place<R: Rng>(&self, encoding: &mut LinearLinkageEncoding, rng: &mut R) {
        if rng.random_bool(self.probability) {
            self.graft(encoding, rng);
        }
    }

    /// Always applies one drawn operator, then repairs.
    pub fn graft<R: Rng>(&self, encoding: &mut LinearLinkageEncoding, rng: &mut R) -> MutationKind {
        let kind = self.weights.draw(rng);
        self.apply(kind, encoding, rng);
        kind
    }

    /// Applies `kind` and repairs the encoding if needed.
    ///
    /// Returns whether the operator found something to change.
    pub fn apply<R: Rng>(
        &self,
        kind: MutationKind,
        encoding: &mut LinearLinkageEncoding,
        rng: &mut R,
    ) -> bool {
        let changed = match kind {
            MutationKind::Divide => divide(encoding, rng),
            MutationKind::Combine => combine(encoding, rng),
            MutationKind::Relocate => relocate(encoding, rng),
        };
        trace!(?kind, changed, "graft mutation");
        if !encoding.is_valid() {
            fix(encoding, rng);
        }
        changed
    }
}

fn divide<R: Rng>(encoding: &mut LinearLinkageEncoding, rng: &mut R) -> bool {
    let graph = encoding.graph().clone();
    let candidates: Vec<usize> = (0..encoding.module_count())
        .filter(|&k| {
            let m = encoding.module(k);
            m.len() > 1 && check_connectivity(m, &graph)
        })
        .collect();
    if candidates.is_empty() {
        return false;
    }
    let k = candidates[rng.random_range(0..candidates.len())];
    let pieces = split_module_random_walk(encoding.module(k), &graph, rng);
    encoding.set_modules(&pieces);
    true
}

fn combine<R: Rng>(encoding: &mut LinearLinkageEncoding, rng: &mut R) -> bool {
    if encoding.non_isolated_module_count() < 3 {
        return false;
    }
    let candidates: Vec<(usize, Vec<usize>)> = (0..encoding.module_count())
        .map(|k| (k, encoding.neighbor_modules(k)))
        .filter(|(_, neighbors)| !neighbors.is_empty())
        .collect();
    if candidates.is_empty() {
        return false;
    }
    let (k, neighbors) = &candidates[rng.random_range(0..candidates.len())];
    let other = neighbors[rng.random_range(0..neighbors.len())];
    let merged = merge_modules(encoding.module(*k), encoding.module(other));
    encoding.update_module(&merged);
    true
}

fn relocate<R: Rng>(encoding: &mut LinearLinkageEncoding, rng: &mut R) -> bool {
    let graph = encoding.graph().clone();
    let donors: Vec<usize> = (0..encoding.module_count())
        .filter(|&k| !is_isolated(encoding.module(k), &graph))
        .filter(|&k| !encoding.neighbor_modules(k).is_empty())
        .collect();
    if donors.is_empty() {
        return false;
    }
    let k = donors[rng.random_range(0..donors.len())];

    let movable: Vec<(usize, Vec<usize>)> = encoding
        .module(k)
        .iter()
        .map(|i| (i, encoding.incident_modules(i)))
        .filter(|(_, targets)| !targets.is_empty())
        .collect();
    let (i, targets) = &movable[rng.random_range(0..movable.len())];
    let target = targets[rng.random_range(0..targets.len())];

    let mut donor = encoding.module(k).clone();
    let mut receiver = encoding.module(target).clone();
    if donor.remove_index(*i).is_err() {
        return false;
    }
    receiver.add_index(*i);

    let mut rewritten = vec![receiver];
    if !donor.is_empty() && !check_connectivity(&donor, &graph) {
        rewritten.extend(split_module_random_walk(&donor, &graph, rng));
    } else {
        rewritten.push(donor);
    }
    encoding.set_modules(&rewritten);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::init::from_components;
    use crate::graph::ElementIndexing;
    use crate::module::Module;
    use crate::testing::{disjoint_paths, index_sets};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn three_paths() -> LinearLinkageEncoding {
        from_components(disjoint_paths(3, 6, ElementIndexing::VerticesOnly)).unwrap()
    }

    fn covers_all(encoding: &LinearLinkageEncoding) -> bool {
        let mut covered: Vec<usize> = encoding.modules().iter().flat_map(|m| m.iter()).collect();
        covered.sort_unstable();
        covered == (0..encoding.len()).collect::<Vec<_>>()
    }

    #[test]
    fn test_weights_validate() {
        assert!(MutationWeights::default().validate().is_ok());
        assert!(MutationWeights::new(0.0, 0.0, 1.0).validate().is_ok());
        assert!(matches!(
            MutationWeights::new(0.0, 0.0, 0.0).validate(),
            Err(ModularError::InvalidMutationWeights(_))
        ));
        assert!(MutationWeights::new(-1.0, 1.0, 1.0).validate().is_err());
        assert!(MutationWeights::new(f64::NAN, 1.0, 1.0).validate().is_err());
    }

    #[test]
    fn test_draw_honours_zero_weights() {
        let mut rng = StdRng::seed_from_u64(3);
        let only_relocate = MutationWeights::new(0.0, 0.0, 2.0);
        for _ in 0..100 {
            assert_eq!(only_relocate.draw(&mut rng), MutationKind::Relocate);
        }
        let only_divide = MutationWeights::new(5.0, 0.0, 0.0);
        for _ in 0..100 {
            assert_eq!(only_divide.draw(&mut rng), MutationKind::Divide);
        }
    }

    #[test]
    fn test_mutate_keeps_parent_and_validity() {
        let parent = three_paths();
        let before = parent.to_genes();
        let mutator = GraftMutator::new(1.0, MutationWeights::default()).unwrap();
        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            let child = mutator.mutate(&parent, &mut rng);
            assert!(child.is_valid(), "{:?}", child.validity());
            assert!(covers_all(&child));
        }
        assert_eq!(parent.genes(), before.as_slice());
    }

    #[test]
    fn test_zero_probability_is_identity() {
        let parent = three_paths();
        let mutator = GraftMutator::new(0.0, MutationWeights::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(mutator.mutate(&parent, &mut rng), parent);
    }

    #[test]
    fn test_combine_merges_neighbours() {
        let g = disjoint_paths(1, 9, ElementIndexing::VerticesOnly);
        let mut enc = LinearLinkageEncoding::from_modules(
            g,
            &[
                Module::from_indices(0..3),
                Module::from_indices(3..6),
                Module::from_indices(6..9),
            ],
        )
        .unwrap();
        let mutator = GraftMutator::new(1.0, MutationWeights::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        assert!(mutator.apply(MutationKind::Combine, &mut enc, &mut rng));
        assert_eq!(enc.module_count(), 2);
        assert!(enc.is_valid());
    }

    #[test]
    fn test_combine_skipped_with_two_modules() {
        let g = disjoint_paths(2, 4, ElementIndexing::VerticesOnly);
        let mut enc = from_components(g).unwrap();
        let before = index_sets(enc.modules());
        let mutator = GraftMutator::new(1.0, MutationWeights::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(!mutator.apply(MutationKind::Combine, &mut enc, &mut rng));
        assert_eq!(index_sets(enc.modules()), before);
    }

    #[test]
    fn test_relocate_moves_boundary_element() {
        let g = disjoint_paths(1, 8, ElementIndexing::VerticesOnly);
        let mut enc = LinearLinkageEncoding::from_modules(
            g.clone(),
            &[Module::from_indices(0..4), Module::from_indices(4..8)],
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        assert!(relocate(&mut enc, &mut rng));
        let sets = index_sets(enc.modules());
        assert!(
            sets == vec![vec![0, 1, 2], vec![3, 4, 5, 6, 7]]
                || sets == vec![vec![0, 1, 2, 3, 4], vec![5, 6, 7]],
            "{sets:?}"
        );
        for m in enc.modules() {
            assert!(check_connectivity(m, &g));
        }
    }

    #[test]
    fn test_divide_yields_connected_pieces() {
        let g = disjoint_paths(2, 8, ElementIndexing::VerticesOnly);
        let mut enc = from_components(g.clone()).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        assert!(divide(&mut enc, &mut rng));
        assert!(enc.module_count() >= 3);
        assert!(covers_all(&enc));
        for m in enc.modules() {
            assert!(check_connectivity(m, &g));
        }
    }
}
