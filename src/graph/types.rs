//! Vertex, edge, and element types of the arena graph.

use crate::error::{ModularError, Result};

/// Arena id of a vertex.
pub type VertexId = usize;

/// Arena id of an edge.
pub type EdgeId = usize;

/// Component label written by the greedy partition.
pub type ComponentId = usize;

/// Kind of a vertex in the system description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectKind {
    /// Data carrier. Contributes weight but is never placed in a module.
    InformationObject,
    /// Function. The unit of modularisation.
    FunctionObject,
}

/// Kind of a relation between two vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RelationKind {
    Conjunction,
    Disjunction,
    ExclusiveDisjunction,
    Create,
    Read,
    Update,
    RelatedTo,
    PartOf,
    IsA,
}

impl RelationKind {
    /// Fixed coupling strength of the relation kind.
    pub fn weight(self) -> u32 {
        match self {
            RelationKind::Conjunction => 2,
            RelationKind::Disjunction => 1,
            RelationKind::ExclusiveDisjunction => 3,
            RelationKind::Create => 3,
            RelationKind::Read => 1,
            RelationKind::Update => 3,
            RelationKind::RelatedTo | RelationKind::PartOf | RelationKind::IsA => 0,
        }
    }

    /// Maps the numeric relation code used by system descriptions.
    ///
    /// Code 6 is unassigned; it and any code above 9 are rejected.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(RelationKind::Conjunction),
            1 => Ok(RelationKind::Disjunction),
            2 => Ok(RelationKind::ExclusiveDisjunction),
            3 => Ok(RelationKind::Create),
            4 => Ok(RelationKind::Read),
            5 => Ok(RelationKind::Update),
            7 => Ok(RelationKind::RelatedTo),
            8 => Ok(RelationKind::PartOf),
            9 => Ok(RelationKind::IsA),
            other => Err(ModularError::UnknownRelationCode(other)),
        }
    }
}

/// A function or information object.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub index: VertexId,
    pub kind: ObjectKind,
    pub name: String,
    pub short_name: String,
    pub is_external: bool,
    /// Sum of the weights of every relation attached to this vertex.
    pub weight: u32,
    pub component: Option<ComponentId>,
    /// Every relation touching this vertex, participating or not.
    pub relations: Vec<EdgeId>,
}

impl Vertex {
    pub fn is_information_object(&self) -> bool {
        self.kind == ObjectKind::InformationObject
    }
}

/// A directed relation between two vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub index: EdgeId,
    pub kind: RelationKind,
    pub source: VertexId,
    pub target: VertexId,
    pub weight: u32,
    pub component: Option<ComponentId>,
}

impl Edge {
    /// Returns the endpoint opposite to `v`.
    pub fn other(&self, v: VertexId) -> VertexId {
        if self.source == v {
            self.target
        } else {
            self.source
        }
    }

    pub fn touches(&self, v: VertexId) -> bool {
        self.source == v || self.target == v
    }
}

/// A modularisable element resolved through the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Vertex(VertexId),
    Edge(EdgeId),
}

/// Which graph items receive element indices.
///
/// Fixed once per graph; every module, encoding, and operator built on the
/// graph follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementIndexing {
    /// Participating vertices take indices `0..V`, participating edges
    /// follow at `V..V+E`.
    #[default]
    VerticesAndEdges,
    /// Only participating vertices are modularisable.
    VerticesOnly,
}
