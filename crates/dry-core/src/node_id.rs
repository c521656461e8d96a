//! Strongly-typed node identifier wrapper.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Unique identifier of a manifest node (e.g. `model.shop.stg_orders`).
///
/// Prevents accidental mixing of node ids with table aliases, column names,
/// or other string types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a new `NodeId`, panicking in debug builds if the id is empty.
    ///
    /// Prefer [`try_new`](Self::try_new) when handling untrusted input.
    pub fn new(id: impl Into<String>) -> Self {
        let s = id.into();
        debug_assert!(!s.is_empty(), "NodeId must not be empty");
        Self(s)
    }

    /// Try to create a new `NodeId`, returning `None` if the id is empty.
    pub fn try_new(id: impl Into<String>) -> Option<Self> {
        let s = id.into();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    /// Return the underlying id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for NodeId {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_display() {
        let id = NodeId::new("model.shop.stg_orders");
        assert_eq!(id.to_string(), "model.shop.stg_orders");
    }

    #[test]
    fn test_node_id_try_new_rejects_empty() {
        assert!(NodeId::try_new("").is_none());
        assert!(NodeId::try_new("seed.shop.raw").is_some());
    }

    #[test]
    fn test_node_id_borrow_lookup() {
        use std::collections::HashMap;
        let mut map: HashMap<NodeId, i32> = HashMap::new();
        map.insert(NodeId::new("model.a"), 1);
        // Can look up by &str thanks to Borrow<str>
        assert_eq!(map.get("model.a"), Some(&1));
    }

    #[test]
    fn test_node_id_serde_transparent() {
        let id = NodeId::new("model.a");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""model.a""#);
        let back: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
