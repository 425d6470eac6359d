//! Entities
//!
//! An entity wraps one model's attribute data together with its lifecycle
//! state and one reconciliation slot per configured data source.
//!
//! - `factory.rs` - entity types and construction/validation
//! - `lifecycle.rs` - persist / fetch / destroy and the state machine
//! - `projection.rs` - flat field access over attributes and operation names
//! - `reserved.rs` - the lifecycle operation name registry
//! - `config.rs` - per-model behavior switches

mod config;
mod factory;
mod lifecycle;
mod projection;
pub(crate) mod reserved;

pub use config::{EntityConfig, FailurePolicy, SchemaPolicy};
pub use factory::{EntitySource, EntityType, build_entity_type};
pub use projection::Field;
pub use reserved::{LifecycleOperation, is_reserved, reserved_names};

use crate::adapter::CanonicalRecord;
use crate::core::{Attributes, EntityState, ID_FIELD, ID_HASH_FIELD};
use crate::model::Model;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One reconciliation slot per configured data source.
///
/// The key set is fixed when the entity is built; only values change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSourceSlots {
    slots: BTreeMap<String, Option<CanonicalRecord>>,
}

impl DataSourceSlots {
    fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            slots: names.into_iter().map(|name| (name.to_string(), None)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CanonicalRecord> {
        self.slots.get(name).and_then(Option::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Reassigns an existing slot. Returns false for a name with no slot.
    fn assign(&mut self, name: &str, record: Option<CanonicalRecord>) -> bool {
        match self.slots.get_mut(name) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&CanonicalRecord>)> {
        self.slots
            .iter()
            .map(|(name, record)| (name.as_str(), record.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// A lifecycle-aware instance of one model.
#[derive(Debug, Clone)]
pub struct Entity {
    entity_type: Arc<EntityType>,
    attributes: Attributes,
    state: EntityState,
    last_data_source: Option<String>,
    data_sources: DataSourceSlots,
}

impl Entity {
    pub fn state(&self) -> EntityState {
        self.state
    }

    pub fn last_data_source(&self) -> Option<&str> {
        self.last_data_source.as_deref()
    }

    pub fn entity_type(&self) -> &Arc<EntityType> {
        &self.entity_type
    }

    pub fn entity_type_name(&self) -> &str {
        self.entity_type.name()
    }

    pub fn model(&self) -> &Arc<Model> {
        self.entity_type.model()
    }

    pub fn data_sources(&self) -> &DataSourceSlots {
        &self.data_sources
    }

    /// The record last reconciled from `name`, if any.
    pub fn data_source(&self, name: &str) -> Option<&CanonicalRecord> {
        self.data_sources.get(name)
    }

    /// Detached copy of the attributes.
    pub fn to_object(&self) -> Attributes {
        self.attributes
            .iter()
            .filter(|(key, _)| !is_reserved(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub fn id(&self) -> Option<&Value> {
        self.attributes.get(ID_FIELD)
    }

    pub fn id_hash(&self) -> Option<&serde_json::Map<String, Value>> {
        self.attributes.get(ID_HASH_FIELD).and_then(Value::as_object)
    }
}
