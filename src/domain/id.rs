//! Item identifiers

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of an item: either an integer or a string.
///
/// Serialized untagged, so `1` and `"91064cee"` are both valid JSON ids.
/// `Int(1)` and `Str("1")` are distinct identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Str(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(n) => write!(f, "{}", n),
            ItemId::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Numeric text becomes `Int`, anything else `Str`.
impl FromStr for ItemId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map(ItemId::Int)
            .unwrap_or_else(|_| ItemId::Str(s.to_string())))
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        ItemId::Int(n)
    }
}

impl From<i32> for ItemId {
    fn from(n: i32) -> Self {
        ItemId::Int(n.into())
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::Str(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId::Str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_numeric_text_when_parsing_then_yields_int() {
        assert_eq!("42".parse::<ItemId>().unwrap(), ItemId::Int(42));
        assert_eq!(
            "91064cee".parse::<ItemId>().unwrap(),
            ItemId::Str("91064cee".into())
        );
    }

    #[test]
    fn given_mixed_json_ids_when_deserializing_then_keeps_kind() {
        let ids: Vec<ItemId> = serde_json::from_str(r#"[1, "1", "abc"]"#).unwrap();
        assert_eq!(
            ids,
            vec![ItemId::Int(1), ItemId::Str("1".into()), ItemId::Str("abc".into())]
        );
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn given_ids_when_displaying_then_renders_bare_value() {
        assert_eq!(ItemId::Int(7).to_string(), "7");
        assert_eq!(ItemId::from("x").to_string(), "x");
    }
}
