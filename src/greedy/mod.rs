//! Edge-weight-priority greedy partition.
//!
//! Produces the component labelling that seeds the first encoding. Edges of
//! the participating subgraph are visited from strongest to weakest and
//! labels spread along them, like a union-find that never merges two
//! existing sets.
//!
//! # Ordering
//!
//! The priority list is sorted by a fixed sequence of keys, each consulted
//! only when the previous one ties:
//!
//! 1. edge weight, descending
//! 2. sum of endpoint vertex weights, descending
//! 3. edge id, ascending
//!
//! The last key makes the labelling deterministic for a given graph.

use crate::error::{ModularError, Result};
use crate::graph::{ComponentId, EdgeId, Graph, VertexId};
use std::cmp::Reverse;
use tracing::{debug, warn};

/// Component labels produced by [`GreedyPartitioner::partition`].
///
/// Labels start at 1. Vertices untouched by any participating edge, and
/// information objects, stay unlabelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentLabels {
    vertices: Vec<Option<ComponentId>>,
    edges: Vec<Option<ComponentId>>,
    count: usize,
}

impl ComponentLabels {
    pub fn vertex(&self, v: VertexId) -> Option<ComponentId> {
        self.vertices[v]
    }

    pub fn edge(&self, e: EdgeId) -> Option<ComponentId> {
        self.edges[e]
    }

    /// Number of distinct labels handed out.
    pub fn count(&self) -> usize {
        self.count
    }
}

/// Greedy partitioner over a borrowed graph.
pub struct GreedyPartitioner<'g> {
    graph: &'g Graph,
}

impl<'g> GreedyPartitioner<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    /// Participating edges in processing order.
    pub fn priority_list(&self) -> Vec<EdgeId> {
        let g = self.graph;
        let mut edges = g.participating_edges().to_vec();
        edges.sort_by_key(|&e| {
            let edge = g.edge(e);
            let endpoint_weight = g.vertex(edge.source).weight + g.vertex(edge.target).weight;
            (Reverse(edge.weight), Reverse(endpoint_weight), e)
        });
        edges
    }

    /// Computes component labels.
    ///
    /// Fails with [`ModularError::EmptyGraph`] when no participating edge
    /// exists. Relations leaving external vertices are reported but
    /// otherwise treated like any other relation.
    pub fn partition(&self) -> Result<ComponentLabels> {
        let g = self.graph;
        if g.participating_edges().is_empty() {
            return Err(ModularError::EmptyGraph);
        }
        for e in g.external_relations() {
            let edge = g.edge(e);
            warn!(
                source = %g.vertex(edge.source).name,
                target = %g.vertex(edge.target).name,
                "relation leaves an external vertex"
            );
        }

        let order = self.priority_list();
        let mut vertices: Vec<Option<ComponentId>> = vec![None; g.vertices().len()];
        let mut next_label: ComponentId = 1;

        for &e in &order {
            let edge = g.edge(e);
            match (vertices[edge.source], vertices[edge.target]) {
                (None, None) => {
                    vertices[edge.source] = Some(next_label);
                    vertices[edge.target] = Some(next_label);
                    next_label += 1;
                }
                (Some(label), None) => vertices[edge.target] = Some(label),
                (None, Some(label)) => vertices[edge.source] = Some(label),
                (Some(_), Some(_)) => {}
            }
        }

        let mut edges: Vec<Option<ComponentId>> = vec![None; g.edges().len()];
        for &e in &order {
            let edge = g.edge(e);
            let (s, t) = (vertices[edge.source], vertices[edge.target]);
            edges[e] = if s == t || g.vertex(edge.source).weight >= g.vertex(edge.target).weight {
                s
            } else {
                t
            };
        }

        let count = next_label - 1;
        debug!(
            edges = order.len(),
            components = count,
            "greedy partition finished"
        );
        Ok(ComponentLabels {
            vertices,
            edges,
            count,
        })
    }

    /// Computes labels and writes them onto the graph's vertices and edges.
    pub fn apply(graph: &mut Graph) -> Result<ComponentLabels> {
        let labels = GreedyPartitioner::new(graph).partition()?;
        for (v, label) in labels.vertices.iter().enumerate() {
            if let Some(c) = *label {
                graph.set_vertex_component(v, c);
            }
        }
        for (e, label) in labels.edges.iter().enumerate() {
            if let Some(c) = *label {
                graph.set_edge_component(e, c);
            }
        }
        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ElementIndexing, GraphBuilder, RelationKind};

    fn sample() -> Graph {
        let mut b = GraphBuilder::new().with_indexing(ElementIndexing::VerticesOnly);
        for name in ["A", "B", "C", "D", "E", "Solo"] {
            b.add_function(name).unwrap();
        }
        b.add_information("Ledger").unwrap();
        b.add_relation(RelationKind::Read, "A", "B").unwrap(); // 0: w1
        b.add_relation(RelationKind::Update, "B", "C").unwrap(); // 1: w3
        b.add_relation(RelationKind::Conjunction, "D", "E").unwrap(); // 2: w2
        b.add_relation(RelationKind::Disjunction, "C", "D").unwrap(); // 3: w1
        b.add_relation(RelationKind::Create, "E", "Ledger").unwrap(); // 4: info
        b.build().unwrap()
    }

    #[test]
    fn test_priority_list_order() {
        let g = sample();
        // weights: e1=3, e2=2, e0=1, e3=1. Endpoint sums: e0 = A(1)+B(4) = 5,
        // e3 = C(4)+D(3) = 7, so e3 precedes e0.
        assert_eq!(GreedyPartitioner::new(&g).priority_list(), vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_labels() {
        let g = sample();
        let labels = GreedyPartitioner::new(&g).partition().unwrap();
        // e1 labels B,C with 1; e2 labels D,E with 2; e3 joins two labelled
        // vertices; e0 spreads 1 to A.
        assert_eq!(labels.vertex(0), Some(1));
        assert_eq!(labels.vertex(1), Some(1));
        assert_eq!(labels.vertex(2), Some(1));
        assert_eq!(labels.vertex(3), Some(2));
        assert_eq!(labels.vertex(4), Some(2));
        assert_eq!(labels.vertex(5), None);
        assert_eq!(labels.count(), 2);

        // C-D disagrees; C is heavier (4 vs 3) so the edge follows C.
        assert_eq!(labels.edge(3), Some(1));
        assert_eq!(labels.edge(2), Some(2));
        // relations to information objects never participate
        assert_eq!(labels.edge(4), None);
    }

    #[test]
    fn test_deterministic() {
        let g = sample();
        let first = GreedyPartitioner::new(&g).partition().unwrap();
        let second = GreedyPartitioner::new(&g).partition().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_apply_writes_labels() {
        let mut g = sample();
        GreedyPartitioner::apply(&mut g).unwrap();
        assert_eq!(g.vertex(0).component, Some(1));
        assert_eq!(g.vertex(5).component, None);
        assert_eq!(g.edge(3).component, Some(1));
    }

    #[test]
    fn test_no_participating_edges() {
        let mut b = GraphBuilder::new();
        b.add_function("A").unwrap();
        b.add_information("I").unwrap();
        b.add_relation(RelationKind::Read, "A", "I").unwrap();
        let g = b.build().unwrap();
        assert_eq!(
            GreedyPartitioner::new(&g).partition().unwrap_err(),
            ModularError::EmptyGraph
        );
    }
}
