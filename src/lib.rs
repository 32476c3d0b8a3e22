//! In-memory hierarchical index over flat, parent-linked items.
//!
//! [`domain::TreeStore`] keeps a root-to-node path materialized for every item
//! and answers ancestry and descendant queries. [`grid`] exposes the two inputs
//! a tree-data grid needs; the CLI layer is a thin consumer on top.

pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod grid;
pub mod tree_traits;
pub mod util;

pub use domain::{Item, ItemId, ItemPatch, StoreError, StoreResult, TreeStore};
