//! Item records and partial updates

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::id::ItemId;

/// Keys owned by the store; never carried in the open field map.
pub const RESERVED_FIELDS: [&str; 3] = ["id", "parent", "path"];

/// A node of the forest: identity, parent link, derived path and opaque fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// `None` marks a root
    pub parent: Option<ItemId>,
    /// Root-first ancestor ids ending with `id`. Maintained by the store;
    /// whatever the input carries here is not read.
    #[serde(default, skip_deserializing)]
    pub path: Vec<ItemId>,
    /// Additional named attributes, passed through unchanged
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, parent: Option<ItemId>) -> Self {
        Self {
            id: id.into(),
            parent,
            path: Vec::new(),
            fields: Map::new(),
        }
    }

    pub fn root(id: impl Into<ItemId>) -> Self {
        Self::new(id, None)
    }

    pub fn child(id: impl Into<ItemId>, parent: impl Into<ItemId>) -> Self {
        Self::new(id, Some(parent.into()))
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// The conventional display field, if it is a string.
    pub fn label(&self) -> Option<&str> {
        self.fields.get("label").and_then(Value::as_str)
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Drop caller-supplied derived state before the store takes ownership.
    pub(crate) fn sanitize(&mut self) {
        self.path.clear();
        strip_reserved(&mut self.fields);
    }
}

/// Partial update merged field-by-field onto an existing item.
///
/// `parent` distinguishes an absent key (`None`, no re-parenting) from an
/// explicit `null` (`Some(None)`, move to root).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    pub id: ItemId,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_parent"
    )]
    pub parent: Option<Option<ItemId>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ItemPatch {
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            parent: None,
            fields: Map::new(),
        }
    }

    pub fn with_parent(mut self, parent: Option<ItemId>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

fn present_parent<'de, D>(deserializer: D) -> Result<Option<Option<ItemId>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<ItemId>::deserialize(deserializer).map(Some)
}

pub(crate) fn strip_reserved(fields: &mut Map<String, Value>) {
    for key in RESERVED_FIELDS {
        fields.remove(key);
    }
}
