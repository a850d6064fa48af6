//! Genetic operators over linear linkage encodings.
//!
//! Both operators take their inputs by reference and return fresh
//! encodings, repaired when they fail validation.
//!
//! # Operators
//!
//! - [`GroupCrossover`]: inherits module ending nodes from two parents and
//!   regrows modules around them
//! - [`GraftMutator`]: one of [`MutationKind::Divide`],
//!   [`MutationKind::Combine`] or [`MutationKind::Relocate`], drawn by
//!   [`MutationWeights`]
//!
//! # Reference
//!
//! Ülker, Özcan & Korkmaz (2007), "Linear linkage encoding in grouping
//! problems: applications on graph coloring and timetabling"

mod crossover;
mod mutation;

pub use crossover::GroupCrossover;
pub use mutation::{GraftMutator, MutationKind, MutationWeights};
