//! Arena graph of functions, information objects, and their relations.
//!
//! Vertices and edges live in flat arenas addressed by integer ids. All
//! cross-references (edge endpoints, incident relations, module membership)
//! are ids, never owned pointers.
//!
//! The **participating** subgraph holds function objects and every relation
//! whose endpoints are both function objects. Only participating items are
//! modularisable; information objects contribute vertex weight and nothing
//! else. Each modularisable item receives a dense *element index*, shared
//! between vertices and edges according to [`ElementIndexing`].
//!
//! Element adjacency is a `petgraph` [`UnGraph`] whose node index equals the
//! element index; traversals restricted to a module run on it through
//! `petgraph::visit` adaptors.
//!
//! # Key Types
//!
//! - [`Graph`]: immutable arena plus element index and adjacency
//! - [`GraphBuilder`]: validated construction from names and relation kinds
//! - [`Element`]: vertex-or-edge tag behind an element index

mod builder;
mod types;

pub use builder::GraphBuilder;
pub use types::{
    ComponentId, Edge, EdgeId, Element, ElementIndexing, ObjectKind, RelationKind, Vertex,
    VertexId,
};

use crate::error::{ModularError, Result};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use std::collections::{BTreeSet, HashMap};

/// Weighted directed multigraph with an element arena.
///
/// Built through [`GraphBuilder`]. After construction only the component
/// labels may change, and only during the greedy pass.
#[derive(Debug, Clone)]
pub struct Graph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    indexing: ElementIndexing,
    elements: Vec<Element>,
    vertex_element: Vec<Option<usize>>,
    edge_element: Vec<Option<usize>>,
    participating_edges: Vec<EdgeId>,
    incident: Vec<Vec<EdgeId>>,
    adjacency: UnGraph<usize, ()>,
}

impl Graph {
    pub(crate) fn assemble(
        vertices: Vec<Vertex>,
        edges: Vec<Edge>,
        indexing: ElementIndexing,
    ) -> Self {
        let participating_edges: Vec<EdgeId> = edges
            .iter()
            .filter(|e| {
                !vertices[e.source].is_information_object()
                    && !vertices[e.target].is_information_object()
            })
            .map(|e| e.index)
            .collect();

        let mut incident = vec![Vec::new(); vertices.len()];
        for &e in &participating_edges {
            let edge = &edges[e];
            incident[edge.source].push(e);
            incident[edge.target].push(e);
        }

        let mut elements = Vec::new();
        let mut vertex_element = vec![None; vertices.len()];
        let mut edge_element = vec![None; edges.len()];

        for v in vertices.iter().filter(|v| !v.is_information_object()) {
            vertex_element[v.index] = Some(elements.len());
            elements.push(Element::Vertex(v.index));
        }
        if indexing == ElementIndexing::VerticesAndEdges {
            for &e in &participating_edges {
                edge_element[e] = Some(elements.len());
                elements.push(Element::Edge(e));
            }
        }

        let mut adjacency = UnGraph::with_capacity(elements.len(), 0);
        for i in 0..elements.len() {
            adjacency.add_node(i);
        }
        for &e in &participating_edges {
            let edge = &edges[e];
            let (Some(s), Some(t)) = (vertex_element[edge.source], vertex_element[edge.target])
            else {
                continue;
            };
            let (s, t) = (NodeIndex::new(s), NodeIndex::new(t));
            match edge_element[e] {
                Some(el) => {
                    let el = NodeIndex::new(el);
                    adjacency.update_edge(el, s, ());
                    adjacency.update_edge(el, t, ());
                }
                None => {
                    adjacency.update_edge(s, t, ());
                }
            }
        }

        Self {
            vertices,
            edges,
            indexing,
            elements,
            vertex_element,
            edge_element,
            participating_edges,
            incident,
            adjacency,
        }
    }

    pub fn indexing(&self) -> ElementIndexing {
        self.indexing
    }

    /// All vertices, information objects included.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// All edges, including those touching information objects.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn vertex(&self, v: VertexId) -> &Vertex {
        &self.vertices[v]
    }

    pub fn edge(&self, e: EdgeId) -> &Edge {
        &self.edges[e]
    }

    /// Edges with two function-object endpoints.
    pub fn participating_edges(&self) -> &[EdgeId] {
        &self.participating_edges
    }

    /// Function-object vertices, ascending by id.
    pub fn participating_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices
            .iter()
            .filter(|v| !v.is_information_object())
            .map(|v| v.index)
    }

    /// Number of modularisable elements (the chromosome length).
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Resolves an element index.
    ///
    /// # Panics
    /// Panics if `i` is not assigned; that can only happen when a genome
    /// and its graph disagree.
    pub fn element(&self, i: usize) -> Element {
        match self.elements.get(i) {
            Some(&el) => el,
            None => panic!(
                "element index {i} is not assigned (graph has {} elements)",
                self.elements.len()
            ),
        }
    }

    pub fn try_element(&self, i: usize) -> Result<Element> {
        self.elements
            .get(i)
            .copied()
            .ok_or(ModularError::ElementNotFound(i))
    }

    pub fn element_of_vertex(&self, v: VertexId) -> Option<usize> {
        self.vertex_element.get(v).copied().flatten()
    }

    pub fn element_of_edge(&self, e: EdgeId) -> Option<usize> {
        self.edge_element.get(e).copied().flatten()
    }

    /// Vertex behind an element index, if it is a vertex.
    pub fn element_vertex(&self, i: usize) -> Option<VertexId> {
        match self.element(i) {
            Element::Vertex(v) => Some(v),
            Element::Edge(_) => None,
        }
    }

    /// Elements adjacent to `i`: vertices joined by an edge, or, when edges
    /// are indexed, the incidence between a vertex and its edges. Each
    /// neighbour is yielded once, in no particular order.
    pub fn element_neighbors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency.neighbors(NodeIndex::new(i)).map(|n| n.index())
    }

    /// Element adjacency as an undirected graph; node `i` is element `i`.
    pub fn element_graph(&self) -> &UnGraph<usize, ()> {
        &self.adjacency
    }

    /// Participating edges incident to `v`.
    pub fn edges_incident_to_vertex(&self, v: VertexId) -> &[EdgeId] {
        &self.incident[v]
    }

    /// A vertex is isolated when no participating edge touches it.
    pub fn is_isolated_vertex(&self, v: VertexId) -> bool {
        self.incident[v].is_empty()
    }

    /// True when element `i` is an isolated vertex.
    pub fn is_isolated_element(&self, i: usize) -> bool {
        matches!(self.element(i), Element::Vertex(v) if self.is_isolated_vertex(v))
    }

    /// Undirected connected components of the participating subgraph,
    /// ordered by their smallest vertex id.
    pub fn connected_components(&self) -> Vec<BTreeSet<VertexId>> {
        let mut sets = UnionFind::<VertexId>::new(self.vertices.len());
        for &e in &self.participating_edges {
            sets.union(self.edges[e].source, self.edges[e].target);
        }
        group_by_root(self.participating_vertices(), |v| sets.find(v))
            .into_iter()
            .map(|members| members.into_iter().collect())
            .collect()
    }

    /// Connected components of the element adjacency, each sorted ascending,
    /// ordered by their smallest element index.
    ///
    /// Matches [`connected_components`](Self::connected_components) with the
    /// indexed edges added to their component.
    pub fn element_components(&self) -> Vec<Vec<usize>> {
        let mut sets = UnionFind::<usize>::new(self.elements.len());
        for edge in self.adjacency.raw_edges() {
            sets.union(edge.source().index(), edge.target().index());
        }
        group_by_root(0..self.elements.len(), |i| sets.find(i))
    }

    /// Case-insensitive vertex lookup.
    pub fn vertex_by_name(&self, name: &str) -> Option<VertexId> {
        self.vertices
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(name))
            .map(|v| v.index)
    }

    /// Display name of an element: the vertex name, or `source->target`.
    pub fn element_name(&self, i: usize) -> String {
        match self.element(i) {
            Element::Vertex(v) => self.vertices[v].name.clone(),
            Element::Edge(e) => {
                let edge = &self.edges[e];
                format!(
                    "{}->{}",
                    self.vertices[edge.source].name, self.vertices[edge.target].name
                )
            }
        }
    }

    /// Relations leaving an external vertex toward an internal one.
    pub fn external_relations(&self) -> Vec<EdgeId> {
        self.edges
            .iter()
            .filter(|e| self.vertices[e.source].is_external && !self.vertices[e.target].is_external)
            .map(|e| e.index)
            .collect()
    }

    pub(crate) fn set_vertex_component(&mut self, v: VertexId, component: ComponentId) {
        self.vertices[v].component = Some(component);
    }

    pub(crate) fn set_edge_component(&mut self, e: EdgeId, component: ComponentId) {
        self.edges[e].component = Some(component);
    }
}

/// Groups ascending `items` by their union-find root. Groups come out
/// ordered by their smallest member, members ascending.
fn group_by_root(
    items: impl Iterator<Item = usize>,
    mut root: impl FnMut(usize) -> usize,
) -> Vec<Vec<usize>> {
    let mut slot: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for item in items {
        let k = *slot.entry(root(item)).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[k].push(item);
    }
    groups
}
