//! Error taxonomy.
//!
//! Only construction and configuration problems surface as [`ModularError`].
//! An encoding that fails validation is not an error: the repair pipeline
//! resolves it. Lookups that can only fail on an inconsistent genome panic
//! on the hot path; their `try_*` counterparts return the variants below.

use thiserror::Error;

/// Errors raised while building graphs, encodings, or run parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModularError {
    #[error("graph has no function objects to modularise")]
    EmptyGraph,

    #[error("vertex `{0}` is already registered")]
    DuplicateVertex(String),

    #[error("relation references unknown vertex `{0}`")]
    UnknownVertex(String),

    #[error("relation code {0} does not name a relation kind")]
    UnknownRelationCode(u8),

    #[error("relation between two information objects `{source_name}` -> `{target_name}`")]
    InformationToInformation {
        source_name: String,
        target_name: String,
    },

    #[error("relation from `{0}` to itself")]
    SelfRelation(String),

    #[error("element index {0} is not assigned in the graph")]
    ElementNotFound(usize),

    #[error("allele {0} is not covered by any module")]
    AlleleNotCovered(usize),

    #[error("index {0} is not part of the module")]
    IndexNotInModule(usize),

    #[error("element {0} is assigned to more than one module")]
    ElementAssignedTwice(usize),

    #[error("gene at position {position} has value {value}, outside 0..{length}")]
    GeneOutOfRange {
        position: usize,
        value: usize,
        length: usize,
    },

    #[error("genome length {actual} does not match {expected} modularisable elements")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("element `{0}` carries no component label; run the greedy partition first")]
    NotPartitioned(String),

    #[error("invalid objective weights: {0}")]
    InvalidObjectiveWeights(String),

    #[error("invalid mutation weights: {0}")]
    InvalidMutationWeights(String),

    #[error("invalid run parameters: {0}")]
    InvalidParameters(String),

    #[error("worker pool could not be built: {0}")]
    ThreadPool(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ModularError>;
