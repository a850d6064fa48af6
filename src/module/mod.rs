//! Modules: clusters of element indices and the set algebra over them.
//!
//! A [`Module`] is only an index set; every structural question
//! (connectivity, boundary, isolation) is answered against a
//! [`Graph`](crate::graph::Graph) through the functions in this module.
//!
//! # Key Types
//!
//! - [`Module`]: sorted index list with O(1) membership
//!
//! # Operations
//!
//! - [`check_connectivity`], [`is_isolated`]
//! - [`incident_edges`], [`boundary_edges`]
//! - [`merge_modules`], [`connected_pieces`]
//! - [`split_module_random_walk`], [`bisect_module`]

mod algebra;
mod types;

pub use algebra::{
    bisect_module, boundary_edges, check_connectivity, connected_pieces, holds_vertex,
    incident_edges, is_isolated, merge_modules, split_module_random_walk, vertices_of,
};
pub use types::Module;
