//! Seed encodings for the initial population.

use super::lle::LinearLinkageEncoding;
use crate::error::{ModularError, Result};
use crate::graph::{ComponentId, Element, Graph};
use crate::greedy::ComponentLabels;
use crate::module::Module;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One module per connected component of the element adjacency.
pub fn from_components(graph: Arc<Graph>) -> Result<LinearLinkageEncoding> {
    let modules: Vec<Module> = graph
        .element_components()
        .into_iter()
        .map(Module::from_indices)
        .collect();
    LinearLinkageEncoding::from_modules(graph, &modules)
}

/// One module per greedy component label.
///
/// Isolated vertices carry no label and become singleton modules. Any other
/// unlabelled element means the labels do not belong to this graph and is
/// reported as [`ModularError::NotPartitioned`].
pub fn from_greedy(graph: Arc<Graph>, labels: &ComponentLabels) -> Result<LinearLinkageEncoding> {
    let mut grouped: BTreeMap<ComponentId, Module> = BTreeMap::new();
    let mut singletons = Vec::new();

    for i in 0..graph.element_count() {
        let label = match graph.element(i) {
            Element::Vertex(v) => labels.vertex(v),
            Element::Edge(e) => labels.edge(e),
        };
        match label {
            Some(c) => {
                grouped.entry(c).or_default().add_index(i);
            }
            None if graph.is_isolated_element(i) => singletons.push(Module::singleton(i)),
            None => return Err(ModularError::NotPartitioned(graph.element_name(i))),
        }
    }

    let modules: Vec<Module> = grouped.into_values().chain(singletons).collect();
    LinearLinkageEncoding::from_modules(graph, &modules)
}
