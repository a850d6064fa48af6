//! The linear linkage chromosome.

use crate::error::{ModularError, Result};
use crate::graph::Graph;
use crate::module::{check_connectivity, is_isolated, Module};
use std::fmt;
use std::sync::Arc;

const UNASSIGNED: usize = usize::MAX;
const ON_CHAIN: usize = usize::MAX - 1;

/// Outcome of [`LinearLinkageEncoding::validity`]: either valid or the first
/// invariant that failed.
///
/// Checks run in the order allele cardinality, connectivity, degenerate
/// module, monolith.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Valid,
    /// An allele value occurs more than twice, so some chain branches.
    AlleleOverflow { allele: usize, count: usize },
    /// A module does not induce a connected structure.
    Disconnected { module: usize },
    /// A non-isolated module has two elements or fewer.
    Degenerate { module: usize },
    /// Fewer than two non-isolated modules.
    Monolith { non_isolated: usize },
}

impl Validity {
    pub fn is_valid(self) -> bool {
        self == Validity::Valid
    }
}

/// A partition of the graph's elements stored as successor links.
///
/// `genes[i]` is the element following `i` in its module's chain;
/// `genes[i] == i` marks an ending node. The decoded modules are cached
/// alongside the genes and refreshed on every write, together with an
/// element → module map.
///
/// Cloning copies genes and modules; only the graph is shared.
#[derive(Clone)]
pub struct LinearLinkageEncoding {
    graph: Arc<Graph>,
    genes: Vec<usize>,
    modules: Vec<Module>,
    owner: Vec<usize>,
}

impl LinearLinkageEncoding {
    /// Wraps a raw genome.
    ///
    /// The genome must have one gene per modularisable element and every
    /// value must be an element index.
    pub fn from_genes(graph: Arc<Graph>, genes: Vec<usize>) -> Result<Self> {
        let n = graph.element_count();
        if genes.len() != n {
            return Err(ModularError::LengthMismatch {
                expected: n,
                actual: genes.len(),
            });
        }
        if let Some((position, &value)) = genes.iter().enumerate().find(|&(_, &g)| g >= n) {
            return Err(ModularError::GeneOutOfRange {
                position,
                value,
                length: n,
            });
        }
        let (modules, owner) = decode_with_owner(&genes);
        Ok(Self {
            graph,
            genes,
            modules,
            owner,
        })
    }

    /// Builds the canonical genome of a partition: each module becomes an
    /// ascending chain ending at its largest index.
    ///
    /// Fails when an index is out of range, assigned twice, or not covered.
    pub fn from_modules(graph: Arc<Graph>, modules: &[Module]) -> Result<Self> {
        let n = graph.element_count();
        let mut genes = vec![UNASSIGNED; n];
        for module in modules {
            for i in module.iter() {
                match genes.get(i) {
                    None => return Err(ModularError::ElementNotFound(i)),
                    Some(&UNASSIGNED) => {}
                    Some(_) => return Err(ModularError::ElementAssignedTwice(i)),
                }
                genes[i] = i;
            }
            write_chain(&mut genes, module);
        }
        if let Some(i) = genes.iter().position(|&g| g == UNASSIGNED) {
            return Err(ModularError::AlleleNotCovered(i));
        }
        Self::from_genes(graph, genes)
    }

    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    /// Chromosome length.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn genes(&self) -> &[usize] {
        &self.genes
    }

    pub fn to_genes(&self) -> Vec<usize> {
        self.genes.clone()
    }

    /// Decoded modules, ordered by smallest index.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module(&self, k: usize) -> &Module {
        &self.modules[k]
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Position in [`modules`](Self::modules) of the module holding `i`.
    ///
    /// # Panics
    /// Panics if `i` is not an element index of this encoding.
    pub fn module_index_of(&self, i: usize) -> usize {
        match self.owner.get(i) {
            Some(&k) => k,
            None => panic!(
                "allele {i} is not covered by any module (encoding length {})",
                self.genes.len()
            ),
        }
    }

    /// The module holding allele `i`.
    ///
    /// # Panics
    /// Panics if `i` is not covered; a decoded encoding always covers
    /// `0..len`, so this indicates a genome/graph mismatch.
    pub fn module_of_allele(&self, i: usize) -> &Module {
        &self.modules[self.module_index_of(i)]
    }

    pub fn try_module_of_allele(&self, i: usize) -> Result<&Module> {
        self.owner
            .get(i)
            .map(|&k| &self.modules[k])
            .ok_or(ModularError::AlleleNotCovered(i))
    }

    pub fn is_ending_node(&self, i: usize) -> bool {
        self.genes[i] == i
    }

    /// Ending node of module `k`: its self-loop, or its largest index when
    /// the chain closes in a cycle.
    pub fn ending_node_of(&self, k: usize) -> usize {
        let module = &self.modules[k];
        module
            .iter()
            .find(|&i| self.genes[i] == i)
            .or_else(|| module.ending_node())
            .unwrap_or(UNASSIGNED)
    }

    /// Rewrites the genes of `module` as one ascending chain
    /// (`G[idx[j]] = idx[j+1]`, `G[last] = last`) and re-decodes.
    ///
    /// Only positions inside `module` change.
    ///
    /// # Panics
    /// Panics if the module holds an index outside the chromosome.
    pub fn update_module(&mut self, module: &Module) {
        write_chain(&mut self.genes, module);
        self.redecode();
    }

    /// Rewrites every given module, then re-decodes once.
    pub fn set_modules(&mut self, modules: &[Module]) {
        for module in modules {
            write_chain(&mut self.genes, module);
        }
        self.redecode();
    }

    pub fn non_isolated_module_count(&self) -> usize {
        self.modules
            .iter()
            .filter(|m| !is_isolated(m, &self.graph))
            .count()
    }

    /// Modules, other than `k`, owning an element adjacent to one of the
    /// elements of module `k`. Ascending, without duplicates.
    pub fn neighbor_modules(&self, k: usize) -> Vec<usize> {
        let mut found: Vec<usize> = self.modules[k]
            .iter()
            .flat_map(|i| self.graph.element_neighbors(i))
            .map(|j| self.owner[j])
            .filter(|&other| other != k)
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }

    /// Modules, other than the one holding `i`, that own an element adjacent
    /// to `i`. Ascending, without duplicates.
    pub fn incident_modules(&self, i: usize) -> Vec<usize> {
        let own = self.module_index_of(i);
        let mut found: Vec<usize> = self
            .graph
            .element_neighbors(i)
            .map(|j| self.owner[j])
            .filter(|&other| other != own)
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }

    /// Names the first violated invariant, if any.
    pub fn validity(&self) -> Validity {
        let mut counts = vec![0usize; self.genes.len()];
        for &g in &self.genes {
            counts[g] += 1;
        }
        if let Some((allele, &count)) = counts.iter().enumerate().find(|&(_, &c)| c > 2) {
            return Validity::AlleleOverflow { allele, count };
        }

        if let Some(module) = self
            .modules
            .iter()
            .position(|m| !check_connectivity(m, &self.graph))
        {
            return Validity::Disconnected { module };
        }

        if let Some(module) = self
            .modules
            .iter()
            .position(|m| m.len() <= 2 && !is_isolated(m, &self.graph))
        {
            return Validity::Degenerate { module };
        }

        let non_isolated = self.non_isolated_module_count();
        if non_isolated <= 1 {
            return Validity::Monolith { non_isolated };
        }
        Validity::Valid
    }

    pub fn is_valid(&self) -> bool {
        self.validity().is_valid()
    }

    /// Replaces the whole genome of an already checked length.
    pub(crate) fn replace_genes(&mut self, genes: Vec<usize>) {
        debug_assert_eq!(genes.len(), self.genes.len());
        self.genes = genes;
        self.redecode();
    }

    fn redecode(&mut self) {
        let (modules, owner) = decode_with_owner(&self.genes);
        self.modules = modules;
        self.owner = owner;
    }
}

impl PartialEq for LinearLinkageEncoding {
    fn eq(&self, other: &Self) -> bool {
        self.genes == other.genes
    }
}

impl fmt::Debug for LinearLinkageEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearLinkageEncoding")
            .field("genes", &self.genes)
            .field("modules", &self.modules.len())
            .finish()
    }
}

/// Decodes a genome into modules ordered by smallest index.
///
/// Each unvisited index starts a walk along its successor chain. The walk
/// ends at a self-loop, at an index already on the walk (a cycle), or at an
/// index discovered earlier, in which case the walk joins that index's
/// module. The result is the set of weakly connected components of the
/// successor function, so it does not depend on how the chains are laid
/// out.
///
/// # Panics
/// Panics if a gene value is not an index of `genes`.
pub fn decode(genes: &[usize]) -> Vec<Module> {
    decode_with_owner(genes).0
}

fn decode_with_owner(genes: &[usize]) -> (Vec<Module>, Vec<usize>) {
    let n = genes.len();
    let mut owner = vec![UNASSIGNED; n];
    let mut modules: Vec<Module> = Vec::new();
    let mut chain = Vec::new();

    for start in 0..n {
        if owner[start] != UNASSIGNED {
            continue;
        }
        chain.clear();
        let mut current = start;
        let target = loop {
            match owner[current] {
                UNASSIGNED => {}
                ON_CHAIN => break modules.len(),
                k => break k,
            }
            owner[current] = ON_CHAIN;
            chain.push(current);
            let next = genes[current];
            if next == current {
                break modules.len();
            }
            current = next;
        };

        if target == modules.len() {
            modules.push(Module::new());
        }
        for &i in &chain {
            owner[i] = target;
        }
        modules[target].add_indices(chain.iter().copied());
    }
    (modules, owner)
}

fn write_chain(genes: &mut [usize], module: &Module) {
    for pair in module.indices().windows(2) {
        genes[pair[0]] = pair[1];
    }
    if let Some(last) = module.ending_node() {
        genes[last] = last;
    }
}
