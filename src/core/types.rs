use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Plain attribute mapping, in insertion order.
pub type Attributes = Map<String, Value>;

pub const ID_FIELD: &str = "id";
pub const ID_HASH_FIELD: &str = "idHash";

/// Lifecycle state of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityState {
    /// Never persisted to any data source (or destroyed from the last one).
    Orphan,
    /// An operation against a data source has been dispatched.
    Syncing,
    /// Attributes match at least one data source as of the last completed operation.
    Sync,
}

impl EntityState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityState::Orphan => "orphan",
            EntityState::Syncing => "syncing",
            EntityState::Sync => "sync",
        }
    }

    pub fn is_orphan(&self) -> bool {
        matches!(self, EntityState::Orphan)
    }
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity lookup sent to an adapter: `{ id }`, where `id` is the entity's
/// identifier in that data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UidQuery {
    pub id: Option<Value>,
}

impl UidQuery {
    pub fn new(id: impl Into<Value>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }

    pub fn empty() -> Self {
        Self { id: None }
    }

    /// The identifier rendered as a string key, if present.
    pub fn id_key(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Fills every key of `defaults` missing from `target`. Nested objects present
/// on both sides are filled recursively; existing values are never replaced.
pub fn apply_defaults(target: &mut Attributes, defaults: &Attributes) {
    for (key, default) in defaults {
        match target.get_mut(key) {
            None => {
                target.insert(key.clone(), default.clone());
            }
            Some(Value::Object(existing)) => {
                if let Value::Object(nested) = default {
                    apply_defaults(existing, nested);
                }
            }
            Some(_) => {}
        }
    }
}

/// Describes a JSON value kind for error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
