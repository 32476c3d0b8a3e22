//! Row feed for tree-data grid widgets
//!
//! A grid consumes two things: the flat row list and an accessor returning the
//! hierarchy path of a row. Neither needs to know about parent links.

use itertools::Itertools;

use crate::domain::{Item, TreeStore};

/// Flat row list, in store order.
pub fn row_data(store: &TreeStore) -> Vec<Item> {
    store.get_all()
}

/// Hierarchy path of a row, stringified for display.
pub fn data_path(row: &Item) -> Vec<String> {
    row.path.iter().map(ToString::to_string).collect()
}

/// Path of a row joined with `separator`.
pub fn path_label(row: &Item, separator: &str) -> String {
    row.path.iter().join(separator)
}
