//! Order-preserving JSON values
//!
//! WCF "stand-alone JSON" requires the `__type` discriminator to be the
//! first key of any polymorphic object, and the OWA endpoint is sensitive
//! to key order in general, so the generic tree representation offered by
//! `serde_json::Value` is not usable on the emission path. [`OrderedObject`]
//! is a small associative container that preserves insertion order,
//! supports in-place update, and can pull a key to the front; [`JsonValue`]
//! is the value tree built around it. Numbers are carried as
//! [`serde_json::Number`] so that their lexical form survives serialization
//! unchanged.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Number;
use std::collections::HashMap;

/// A JSON value whose object members keep insertion order
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    /// JSON `null`
    Null,
    /// JSON boolean
    Bool(bool),
    /// JSON number, preserved in its original lexical form
    Number(Number),
    /// JSON string
    String(String),
    /// JSON array
    Array(Vec<JsonValue>),
    /// JSON object with ordered keys
    Object(OrderedObject),
}

impl From<bool> for JsonValue {
    fn from(v: bool) -> Self {
        JsonValue::Bool(v)
    }
}

impl From<i64> for JsonValue {
    fn from(v: i64) -> Self {
        JsonValue::Number(Number::from(v))
    }
}

impl From<u64> for JsonValue {
    fn from(v: u64) -> Self {
        JsonValue::Number(Number::from(v))
    }
}

impl From<&str> for JsonValue {
    fn from(v: &str) -> Self {
        JsonValue::String(v.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(v: String) -> Self {
        JsonValue::String(v)
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(v: Vec<JsonValue>) -> Self {
        JsonValue::Array(v)
    }
}

impl From<OrderedObject> for JsonValue {
    fn from(v: OrderedObject) -> Self {
        JsonValue::Object(v)
    }
}

impl Serialize for JsonValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            JsonValue::Null => serializer.serialize_unit(),
            JsonValue::Bool(b) => serializer.serialize_bool(*b),
            JsonValue::Number(n) => n.serialize(serializer),
            JsonValue::String(s) => serializer.serialize_str(s),
            JsonValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            JsonValue::Object(obj) => obj.serialize(serializer),
        }
    }
}

/// A single key/value member of an [`OrderedObject`]
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// Member key
    pub key: String,
    /// Member value
    pub value: JsonValue,
}

/// An associative container that keeps members in insertion order
///
/// Updating an existing key keeps its position. Serializes as a JSON
/// object emitting keys in insertion order.
#[derive(Debug, Clone, Default)]
pub struct OrderedObject {
    members: Vec<Member>,
    index: HashMap<String, usize>,
}

impl OrderedObject {
    /// Create an empty object
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the object has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Look up a member value by key
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.index.get(key).map(|&i| &self.members[i].value)
    }

    /// Look up a member value by key for in-place update
    pub fn get_mut(&mut self, key: &str) -> Option<&mut JsonValue> {
        self.index.get(key).map(|&i| &mut self.members[i].value)
    }

    /// Insert a member, or overwrite an existing one preserving its
    /// position. Returns true when a new member was added.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> bool {
        let key = key.into();
        match self.index.get(&key) {
            Some(&i) => {
                self.members[i].value = value.into();
                false
            }
            None => {
                self.index.insert(key.clone(), self.members.len());
                self.members.push(Member {
                    key,
                    value: value.into(),
                });
                true
            }
        }
    }

    /// Place a member at position zero, replacing the value if the key is
    /// already present (moving it to the front if needed).
    ///
    /// Used to force `__type` to be the first key after an object has been
    /// built.
    pub fn set_front(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(0) => {
                self.members[0].value = value;
            }
            Some(&i) => {
                self.members.remove(i);
                self.members.insert(0, Member { key, value });
                self.rebuild_index();
            }
            None => {
                self.members.insert(0, Member { key, value });
                self.rebuild_index();
            }
        }
    }

    /// Iterate members in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (i, m) in self.members.iter().enumerate() {
            self.index.insert(m.key.clone(), i);
        }
    }
}

// Structural equality: same members in the same order. The lookup index is
// derived state and excluded.
impl PartialEq for OrderedObject {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl Serialize for OrderedObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.members.len()))?;
        for m in &self.members {
            map.serialize_entry(&m.key, &m.value)?;
        }
        map.end()
    }
}
