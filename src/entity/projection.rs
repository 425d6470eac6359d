use super::config::SchemaPolicy;
use super::factory::is_identity_field;
use super::reserved::LifecycleOperation;
use super::Entity;
use crate::core::{Result, StoreError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Result of a flat field read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<'a> {
    /// The name is a lifecycle operation bound on the entity.
    Operation(LifecycleOperation),
    Attribute(&'a Value),
    Absent,
}

impl<'a> Field<'a> {
    pub fn as_attribute(&self) -> Option<&'a Value> {
        match self {
            Field::Attribute(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_operation(&self) -> bool {
        matches!(self, Field::Operation(_))
    }
}

impl Entity {
    /// Reads `name` as a flat field: operation names resolve to the bound
    /// operation, anything else to the attribute of that name.
    pub fn field(&self, name: &str) -> Field<'_> {
        if let Some(op) = LifecycleOperation::from_name(name) {
            return Field::Operation(op);
        }
        match self.attributes.get(name) {
            Some(value) => Field::Attribute(value),
            None => Field::Absent,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.field(name).as_attribute()
    }

    /// Deserializes the attribute `name` into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self.get(name) {
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|err| StoreError::TypeMismatch(format!("attribute '{}': {}", name, err))),
            None => Ok(None),
        }
    }

    /// Writes the attribute `name`. Writes to an operation name are ignored
    /// with a warning and return false; so are writes of undeclared names
    /// under [`SchemaPolicy::Strict`].
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> bool {
        let name = name.into();
        if LifecycleOperation::from_name(&name).is_some() {
            warn!(
                entity = %self.entity_type_name(),
                key = %name,
                "Trying to define read-only key"
            );
            return false;
        }
        if self.entity_type.config().schema_policy == SchemaPolicy::Strict
            && !self.entity_type.is_declared(&name)
            && !is_identity_field(&name)
        {
            warn!(
                entity = %self.entity_type_name(),
                key = %name,
                "Trying to define undeclared key"
            );
            return false;
        }
        self.attributes.insert(name, value.into());
        true
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        if LifecycleOperation::from_name(name).is_some() {
            return None;
        }
        self.attributes.remove(name)
    }

    /// Attribute keys followed by every operation name.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .keys()
            .map(String::as_str)
            .chain(LifecycleOperation::ALL.into_iter().map(|op| op.as_str()))
    }

    /// Membership covers attributes only; operation names are not entity data.
    pub fn contains_key(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}
