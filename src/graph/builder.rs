//! Validated graph construction.

use super::types::{Edge, EdgeId, ElementIndexing, ObjectKind, RelationKind, Vertex, VertexId};
use super::Graph;
use crate::error::{ModularError, Result};
use std::collections::HashMap;

/// Builds a [`Graph`] from named vertices and typed relations.
///
/// Vertex names are matched case-insensitively. Malformed input fails at
/// the offending call; nothing is silently defaulted.
///
/// # Examples
///
/// ```
/// use u_modular::graph::{GraphBuilder, RelationKind};
///
/// let mut b = GraphBuilder::new();
/// b.add_function("Place order").unwrap();
/// b.add_function("Check stock").unwrap();
/// b.add_relation(RelationKind::Conjunction, "Place order", "Check stock").unwrap();
/// let graph = b.build().unwrap();
/// assert_eq!(graph.participating_edges().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    names: HashMap<String, VertexId>,
    indexing: ElementIndexing,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets which items become modularisable elements.
    pub fn with_indexing(mut self, indexing: ElementIndexing) -> Self {
        self.indexing = indexing;
        self
    }

    /// Registers a vertex.
    pub fn add_vertex(
        &mut self,
        name: &str,
        short_name: &str,
        kind: ObjectKind,
        is_external: bool,
    ) -> Result<VertexId> {
        let key = name.to_lowercase();
        if self.names.contains_key(&key) {
            return Err(ModularError::DuplicateVertex(name.to_string()));
        }
        let index = self.vertices.len();
        self.vertices.push(Vertex {
            index,
            kind,
            name: name.to_string(),
            short_name: short_name.to_string(),
            is_external,
            weight: 0,
            component: None,
            relations: Vec::new(),
        });
        self.names.insert(key, index);
        Ok(index)
    }

    /// Registers an internal function object whose short name is its name.
    pub fn add_function(&mut self, name: &str) -> Result<VertexId> {
        self.add_vertex(name, name, ObjectKind::FunctionObject, false)
    }

    /// Registers an internal information object whose short name is its name.
    pub fn add_information(&mut self, name: &str) -> Result<VertexId> {
        self.add_vertex(name, name, ObjectKind::InformationObject, false)
    }

    /// Adds a relation between two registered vertices.
    ///
    /// Both endpoints accumulate the relation weight. Relations between two
    /// information objects, and relations from a vertex to itself, are
    /// rejected.
    pub fn add_relation(&mut self, kind: RelationKind, source: &str, target: &str) -> Result<EdgeId> {
        let s = self.lookup(source)?;
        let t = self.lookup(target)?;

        if s == t {
            return Err(ModularError::SelfRelation(self.vertices[s].name.clone()));
        }

        if self.vertices[s].is_information_object() && self.vertices[t].is_information_object() {
            return Err(ModularError::InformationToInformation {
                source_name: self.vertices[s].name.clone(),
                target_name: self.vertices[t].name.clone(),
            });
        }

        let index = self.edges.len();
        let weight = kind.weight();
        self.edges.push(Edge {
            index,
            kind,
            source: s,
            target: t,
            weight,
            component: None,
        });

        self.vertices[s].weight += weight;
        self.vertices[s].relations.push(index);
        self.vertices[t].weight += weight;
        self.vertices[t].relations.push(index);
        Ok(index)
    }

    /// Adds a relation given its numeric code (see [`RelationKind::from_code`]).
    pub fn add_relation_code(&mut self, code: u8, source: &str, target: &str) -> Result<EdgeId> {
        let kind = RelationKind::from_code(code)?;
        self.add_relation(kind, source, target)
    }

    /// Finalises the graph.
    ///
    /// Fails with [`ModularError::EmptyGraph`] when there is no function
    /// object to modularise.
    pub fn build(self) -> Result<Graph> {
        if !self
            .vertices
            .iter()
            .any(|v| v.kind == ObjectKind::FunctionObject)
        {
            return Err(ModularError::EmptyGraph);
        }
        Ok(Graph::assemble(self.vertices, self.edges, self.indexing))
    }

    fn lookup(&self, name: &str) -> Result<VertexId> {
        self.names
            .get(&name.to_lowercase())
            .copied()
            .ok_or_else(|| ModularError::UnknownVertex(name.to_string()))
    }
}
