//! Linear linkage encoding of module partitions.
//!
//! The chromosome is a fixed-length array `G` over element indices where
//! `G[i]` names the next element in `i`'s module and `G[i] == i` ends the
//! chain. Decoding follows the chains; writing a module lays it out as an
//! ascending chain ending at its largest index.
//!
//! A valid encoding satisfies four invariants:
//!
//! 1. no allele value occurs more than twice
//! 2. every module induces a connected structure
//! 3. no non-isolated module has two elements or fewer
//! 4. at least two modules are non-isolated
//!
//! Genetic operators routinely break them; [`repair::fix`] restores them.
//!
//! # Key Types
//!
//! - [`LinearLinkageEncoding`]: genes plus decoded modules
//! - [`Validity`]: first failed invariant, for diagnostics
//!
//! # Submodules
//!
//! - [`repair`]: the repair pipeline
//! - [`init`]: seed encodings from components or greedy labels
//!
//! # References
//!
//! - Ülker, Özcan & Korkmaz (2007), "Linear Linkage Encoding in Grouping
//!   Problems: Applications on Graph Coloring and Timetabling"

pub mod init;
mod lle;
pub mod repair;

pub use lle::{decode, LinearLinkageEncoding, Validity};
pub use repair::fix;
