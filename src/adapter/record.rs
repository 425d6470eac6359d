use crate::core::{Attributes, ID_FIELD, ID_HASH_FIELD};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An adapter's representation of one persisted entity, for exactly one data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    source: String,
    attributes: Attributes,
}

impl CanonicalRecord {
    pub fn new(source: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            source: source.into(),
            attributes,
        }
    }

    /// Name of the data source that owns this record.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Flattens the record into a detached attribute mapping, identity fields included.
    pub fn to_object(&self) -> Attributes {
        self.attributes.clone()
    }

    pub fn into_object(self) -> Attributes {
        self.attributes
    }

    pub fn id(&self) -> Option<&Value> {
        self.attributes.get(ID_FIELD)
    }

    /// This source's entry in the record's `idHash`.
    pub fn source_id(&self) -> Option<&Value> {
        self.attributes
            .get(ID_HASH_FIELD)
            .and_then(Value::as_object)
            .and_then(|hash| hash.get(&self.source))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}
