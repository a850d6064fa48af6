//! Cohesion, coupling, and modularity.

use super::types::{Direction, Objective};
use crate::graph::{EdgeId, Graph};
use crate::module::{boundary_edges, holds_vertex, incident_edges, is_isolated, Module};
use std::collections::{BTreeSet, HashMap};

/// Weighted strength inside modules (maximize).
///
/// For every non-isolated module, each distinct participating edge touching
/// one of its vertices counts once: at full weight when both endpoints are
/// inside the module, at half weight when only one is.
#[derive(Debug, Clone, Copy, Default)]
pub struct CohesionObjective;

impl Objective for CohesionObjective {
    fn name(&self) -> &str {
        "cohesion"
    }

    fn direction(&self) -> Direction {
        Direction::Maximize
    }

    fn evaluate(&self, graph: &Graph, modules: &[Module]) -> f64 {
        modules
            .iter()
            .filter(|m| !is_isolated(m, graph))
            .map(|m| {
                incident_edges(m, graph)
                    .into_iter()
                    .map(|e| {
                        let edge = graph.edge(e);
                        let inside = holds_vertex(m, graph, edge.source)
                            && holds_vertex(m, graph, edge.target);
                        let w = f64::from(edge.weight);
                        if inside {
                            w
                        } else {
                            w / 2.0
                        }
                    })
                    .sum::<f64>()
            })
            .sum()
    }
}

/// Weight of edges crossing module boundaries (minimize).
///
/// Boundary edges of all non-isolated modules are collected into one set,
/// so an edge bordering two modules counts once.
#[derive(Debug, Clone, Copy, Default)]
pub struct CouplingObjective;

impl Objective for CouplingObjective {
    fn name(&self) -> &str {
        "coupling"
    }

    fn direction(&self) -> Direction {
        Direction::Minimize
    }

    fn evaluate(&self, graph: &Graph, modules: &[Module]) -> f64 {
        let crossing: BTreeSet<EdgeId> = modules
            .iter()
            .filter(|m| !is_isolated(m, graph))
            .flat_map(|m| boundary_edges(m, graph))
            .collect();
        crossing
            .into_iter()
            .map(|e| f64::from(graph.edge(e).weight))
            .sum()
    }
}

/// Newman modularity of the vertex partition (maximize).
///
/// Treats the participating subgraph as undirected and weighted:
/// `Q = Σ_c [ w_c / W - (d_c / 2W)² ]` with `w_c` the weight inside module
/// `c`, `d_c` the weighted degree of its vertices, and `W` the total edge
/// weight. A graph without edge weight scores 0.
///
/// # Reference
/// Newman (2004), "Analysis of weighted networks", Phys. Rev. E 70, 056131
#[derive(Debug, Clone, Copy, Default)]
pub struct ModularityObjective;

impl Objective for ModularityObjective {
    fn name(&self) -> &str {
        "modularity"
    }

    fn direction(&self) -> Direction {
        Direction::Maximize
    }

    fn evaluate(&self, graph: &Graph, modules: &[Module]) -> f64 {
        let total: f64 = graph
            .participating_edges()
            .iter()
            .map(|&e| f64::from(graph.edge(e).weight))
            .sum();
        if total <= 0.0 {
            return 0.0;
        }

        let mut community: HashMap<usize, usize> = HashMap::new();
        for (k, m) in modules.iter().enumerate() {
            for i in m.iter() {
                if let Some(v) = graph.element_vertex(i) {
                    community.insert(v, k);
                }
            }
        }

        let mut inside = vec![0.0f64; modules.len()];
        let mut degree = vec![0.0f64; modules.len()];
        for &e in graph.participating_edges() {
            let edge = graph.edge(e);
            let w = f64::from(edge.weight);
            let (Some(&cs), Some(&ct)) = (community.get(&edge.source), community.get(&edge.target))
            else {
                continue;
            };
            degree[cs] += w;
            degree[ct] += w;
            if cs == ct {
                inside[cs] += w;
            }
        }

        inside
            .iter()
            .zip(&degree)
            .map(|(&w_c, &d_c)| w_c / total - (d_c / (2.0 * total)).powi(2))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::init::from_components;
    use crate::graph::ElementIndexing;
    use crate::testing::{path, two_chains};

    #[test]
    fn test_two_chain_scores() {
        for indexing in [ElementIndexing::VerticesOnly, ElementIndexing::VerticesAndEdges] {
            let g = two_chains(indexing);
            let enc = from_components(g.clone()).unwrap();
            assert_eq!(enc.modules().len(), 2);
            assert!((CohesionObjective.evaluate(&g, enc.modules()) - 6.0).abs() < 1e-12);
            assert!(CouplingObjective.evaluate(&g, enc.modules()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_split_path_scores() {
        // path of 6, weight 2 per edge, cut between v2 and v3
        let g = path(6, ElementIndexing::VerticesOnly);
        let modules = [Module::from_indices([0, 1, 2]), Module::from_indices([3, 4, 5])];
        // each side: two inner edges (4) plus half of the cut edge (1)
        assert!((CohesionObjective.evaluate(&g, &modules) - 10.0).abs() < 1e-12);
        assert!((CouplingObjective.evaluate(&g, &modules) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_isolated_modules_ignored() {
        let g = path(3, ElementIndexing::VerticesOnly);
        let modules = [Module::singleton(0), Module::from_indices([1, 2])];
        // v0 is not isolated, so its module counts
        assert!((CouplingObjective.evaluate(&g, &modules) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_modularity() {
        let g = two_chains(ElementIndexing::VerticesOnly);
        let enc = from_components(g.clone()).unwrap();
        let q = ModularityObjective.evaluate(&g, enc.modules());
        assert!((q - 4.0 / 9.0).abs() < 1e-12, "q = {q}");

        let whole = [Module::from_indices(0..6)];
        assert!(ModularityObjective.evaluate(&g, &whole).abs() < 1e-12);
    }

    #[test]
    fn test_directions() {
        assert_eq!(CohesionObjective.direction(), Direction::Maximize);
        assert_eq!(CouplingObjective.direction(), Direction::Minimize);
        assert_eq!(ModularityObjective.name(), "modularity");
    }
}
