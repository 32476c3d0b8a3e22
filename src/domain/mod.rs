//! Domain layer: items, identifiers and the tree store
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod id;
pub mod item;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use id::ItemId;
pub use item::{Item, ItemPatch, RESERVED_FIELDS};
pub use store::TreeStore;
