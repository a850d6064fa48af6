//! The [`Module`] index set.

use crate::error::{ModularError, Result};
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// One cluster of a partition: an ascending, duplicate-free list of element
/// indices with O(1) membership.
///
/// The last (largest) index is the module's ending node when the module is
/// written back into a genome.
#[derive(Debug, Clone, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<usize>", into = "Vec<usize>")
)]
pub struct Module {
    indices: Vec<usize>,
    members: HashSet<usize>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    /// Module holding a single element.
    pub fn singleton(index: usize) -> Self {
        let mut m = Self::new();
        m.add_index(index);
        m
    }

    pub fn from_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        let mut m = Self::new();
        m.add_indices(indices);
        m
    }

    /// Inserts `index` in sorted position. Returns `false` if already present.
    pub fn add_index(&mut self, index: usize) -> bool {
        if !self.members.insert(index) {
            return false;
        }
        match self.indices.last() {
            Some(&last) if last < index => self.indices.push(index),
            _ => {
                let pos = self.indices.partition_point(|&x| x < index);
                self.indices.insert(pos, index);
            }
        }
        true
    }

    pub fn add_indices<I: IntoIterator<Item = usize>>(&mut self, indices: I) {
        for i in indices {
            self.add_index(i);
        }
    }

    pub fn remove_index(&mut self, index: usize) -> Result<()> {
        if !self.members.remove(&index) {
            return Err(ModularError::IndexNotInModule(index));
        }
        let pos = self.indices.partition_point(|&x| x < index);
        self.indices.remove(pos);
        Ok(())
    }

    pub fn contains(&self, index: usize) -> bool {
        self.members.contains(&index)
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Largest index, the ending node of the module's canonical chain.
    pub fn ending_node(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }
}

impl PartialEq for Module {
    fn eq(&self, other: &Self) -> bool {
        self.indices == other.indices
    }
}

impl Eq for Module {}

impl Hash for Module {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.indices.hash(state);
    }
}

impl From<Vec<usize>> for Module {
    fn from(indices: Vec<usize>) -> Self {
        Self::from_indices(indices)
    }
}

impl From<Module> for Vec<usize> {
    fn from(module: Module) -> Self {
        module.indices
    }
}
