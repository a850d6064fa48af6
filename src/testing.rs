//! Graph fixtures shared by unit tests.

use crate::graph::{ElementIndexing, Graph, GraphBuilder, RelationKind};
use crate::module::Module;
use std::sync::Arc;

/// Path `v0 - v1 - ... - v(n-1)` joined by conjunctions.
pub(crate) fn path(n: usize, indexing: ElementIndexing) -> Arc<Graph> {
    disjoint_paths(1, n, indexing)
}

/// `count` disjoint paths of `len` vertices each. Path `p` holds vertices
/// `p*len .. (p+1)*len`.
pub(crate) fn disjoint_paths(count: usize, len: usize, indexing: ElementIndexing) -> Arc<Graph> {
    let mut b = GraphBuilder::new().with_indexing(indexing);
    for i in 0..count * len {
        b.add_function(&format!("v{i}")).unwrap();
    }
    for p in 0..count {
        for j in 1..len {
            let (s, t) = (p * len + j - 1, p * len + j);
            b.add_relation(RelationKind::Conjunction, &format!("v{s}"), &format!("v{t}"))
                .unwrap();
        }
    }
    Arc::new(b.build().unwrap())
}

/// Six functions in two chains: A-B-C (conjunctions, weight 2) and
/// D-E-F (reads, weight 1).
pub(crate) fn two_chains(indexing: ElementIndexing) -> Arc<Graph> {
    let mut b = GraphBuilder::new().with_indexing(indexing);
    for name in ["A", "B", "C", "D", "E", "F"] {
        b.add_function(name).unwrap();
    }
    b.add_relation(RelationKind::Conjunction, "A", "B").unwrap();
    b.add_relation(RelationKind::Conjunction, "B", "C").unwrap();
    b.add_relation(RelationKind::Read, "D", "E").unwrap();
    b.add_relation(RelationKind::Read, "E", "F").unwrap();
    Arc::new(b.build().unwrap())
}

/// Sorted index lists of a module slice, for assertions.
pub(crate) fn index_sets(modules: &[Module]) -> Vec<Vec<usize>> {
    let mut sets: Vec<Vec<usize>> = modules.iter().map(|m| m.indices().to_vec()).collect();
    sets.sort();
    sets
}
