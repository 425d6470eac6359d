use super::reserved::{reserved_among, reserved_names};
use super::{DataSourceSlots, Entity, EntityConfig};
use crate::adapter::CanonicalRecord;
use crate::core::{
    Attributes, EntityState, ID_FIELD, ID_HASH_FIELD, Result, StoreError, apply_defaults,
    value_kind,
};
use crate::model::Model;
use serde_json::Value;
use std::sync::Arc;
use tracing::{Level, event};

/// Input accepted by [`EntityType::create`].
#[derive(Debug, Clone)]
pub enum EntitySource {
    /// Raw attributes for a new, never persisted entity.
    Attributes(Attributes),
    /// A record already persisted in one data source.
    Record(CanonicalRecord),
}

impl From<Attributes> for EntitySource {
    fn from(attributes: Attributes) -> Self {
        EntitySource::Attributes(attributes)
    }
}

impl From<&Attributes> for EntitySource {
    fn from(attributes: &Attributes) -> Self {
        EntitySource::Attributes(attributes.clone())
    }
}

impl From<CanonicalRecord> for EntitySource {
    fn from(record: CanonicalRecord) -> Self {
        EntitySource::Record(record)
    }
}

/// Constructor for the entities of one model.
#[derive(Debug)]
pub struct EntityType {
    name: String,
    model_name: String,
    defaults: Attributes,
    model: Arc<Model>,
}

/// Builds the entity type for a model. No validation happens here; sources
/// are checked when each entity is constructed.
pub fn build_entity_type(
    model_name: &str,
    defaults: Attributes,
    model: Arc<Model>,
) -> Arc<EntityType> {
    Arc::new(EntityType {
        name: format!("{}Entity", model_name),
        model_name: model_name.to_string(),
        defaults,
        model,
    })
}

impl EntityType {
    /// Display name, `<Model>Entity`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    pub fn defaults(&self) -> &Attributes {
        &self.defaults
    }

    pub fn config(&self) -> EntityConfig {
        self.model.config()
    }

    pub fn reserved_names() -> Vec<&'static str> {
        reserved_names()
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.defaults.contains_key(name)
    }

    /// Builds an entity from a JSON object.
    pub fn create_from_json(self: &Arc<Self>, source: Value) -> Result<Entity> {
        match source {
            Value::Object(attributes) => self.create(attributes),
            other => Err(StoreError::NotAnObject(value_kind(&other).to_string())),
        }
    }

    /// Builds a new entity.
    ///
    /// A plain mapping yields an `orphan` entity; a canonical record yields a
    /// `sync` entity whose slot for the record's source holds the record.
    pub fn create(self: &Arc<Self>, source: impl Into<EntitySource>) -> Result<Entity> {
        let mut state = EntityState::Orphan;
        let mut last_data_source = None;
        let mut data_sources = DataSourceSlots::new(self.model.data_source_names());

        let (mut attributes, from_record) = match source.into() {
            EntitySource::Attributes(attributes) => (attributes, false),
            EntitySource::Record(record) => {
                let source_name = record.source().to_string();
                let attributes = record.to_object();
                if !data_sources.assign(&source_name, Some(record)) {
                    return Err(StoreError::DataSourceNotFound(source_name));
                }
                state = EntityState::Sync;
                last_data_source = Some(source_name);
                (attributes, true)
            }
        };

        self.validate_keys(&attributes, from_record)?;
        apply_defaults(&mut attributes, &self.defaults);

        event!(
            Level::DEBUG,
            entity = %self.name,
            state = %state,
            "entity constructed"
        );

        Ok(Entity {
            entity_type: Arc::clone(self),
            attributes,
            state,
            last_data_source,
            data_sources,
        })
    }

    /// Rejects reserved names first, then names outside the declared schema.
    /// Identity fields are accepted only from canonical records.
    fn validate_keys(&self, attributes: &Attributes, from_record: bool) -> Result<()> {
        let reserved = reserved_among(attributes.keys());
        if !reserved.is_empty() {
            return Err(StoreError::ReservedKeys(reserved));
        }

        let mut unknown: Vec<String> = attributes
            .keys()
            .filter(|key| !self.is_declared(key))
            .filter(|key| !(from_record && is_identity_field(key)))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            unknown.sort();
            return Err(StoreError::UnknownKeys(unknown));
        }
        Ok(())
    }
}

pub(crate) fn is_identity_field(name: &str) -> bool {
    name == ID_FIELD || name == ID_HASH_FIELD
}
