//! Model declarations
//!
//! A [`Model`] holds the resolved attribute defaults of one entity kind and
//! the named data sources it may be stored in. [`ModelRegistry`] builds each
//! model's entity type once, at registration.

mod registry;

pub use registry::ModelRegistry;

use crate::adapter::DataSourceAdapter;
use crate::core::{Attributes, Result, StoreError};
use crate::entity::EntityConfig;
use crate::entity::reserved::reserved_among;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub struct Model {
    name: String,
    defaults: Attributes,
    data_sources: BTreeMap<String, Arc<dyn DataSourceAdapter>>,
    config: EntityConfig,
}

impl Model {
    pub fn builder(name: impl Into<String>) -> ModelBuilder {
        ModelBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields mapped to their default values.
    pub fn defaults(&self) -> &Attributes {
        &self.defaults
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.defaults.contains_key(name)
    }

    pub fn config(&self) -> EntityConfig {
        self.config
    }

    /// Looks up a configured data source by name.
    pub fn data_source(&self, name: &str) -> Result<Arc<dyn DataSourceAdapter>> {
        self.data_sources
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::DataSourceNotFound(name.to_string()))
    }

    /// Every configured data source name, sorted.
    pub fn data_source_names(&self) -> Vec<&str> {
        self.data_sources.keys().map(String::as_str).collect()
    }

    pub fn data_source_count(&self) -> usize {
        self.data_sources.len()
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("name", &self.name)
            .field("defaults", &self.defaults)
            .field("data_sources", &self.data_source_names())
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for [`Model`].
pub struct ModelBuilder {
    name: String,
    defaults: Attributes,
    data_sources: BTreeMap<String, Arc<dyn DataSourceAdapter>>,
    config: EntityConfig,
}

impl ModelBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            defaults: Attributes::new(),
            data_sources: BTreeMap::new(),
            config: EntityConfig::default(),
        }
    }

    /// Declares a field with its default value.
    pub fn attribute(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.defaults.insert(name.into(), default.into());
        self
    }

    pub fn attributes(mut self, defaults: Attributes) -> Self {
        self.defaults.extend(defaults);
        self
    }

    /// Registers `adapter` under `name`, which must equal `adapter.name()`.
    pub fn data_source(
        mut self,
        name: impl Into<String>,
        adapter: Arc<dyn DataSourceAdapter>,
    ) -> Self {
        self.data_sources.insert(name.into(), adapter);
        self
    }

    pub fn config(mut self, config: EntityConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Model> {
        if self.name.trim().is_empty() {
            return Err(StoreError::InvalidModel(
                "model name must not be empty".to_string(),
            ));
        }
        if self.data_sources.is_empty() {
            return Err(StoreError::InvalidModel(format!(
                "model '{}' has no data sources",
                self.name
            )));
        }
        if let Some((key, adapter)) = self
            .data_sources
            .iter()
            .find(|(key, adapter)| adapter.name() != key.as_str())
        {
            return Err(StoreError::InvalidModel(format!(
                "model '{}' registers data source '{}' under name '{}'",
                self.name,
                adapter.name(),
                key
            )));
        }
        let reserved = reserved_among(self.defaults.keys());
        if !reserved.is_empty() {
            return Err(StoreError::InvalidModel(format!(
                "model '{}' declares reserved attributes: {:?}",
                self.name, reserved
            )));
        }

        Ok(Model {
            name: self.name,
            defaults: self.defaults,
            data_sources: self.data_sources,
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::InMemoryAdapter;
    use serde_json::json;

    fn memory() -> Arc<dyn DataSourceAdapter> {
        Arc::new(InMemoryAdapter::new("memory"))
    }

    #[test]
    fn test_build_model() {
        let model = Model::builder("User")
            .attribute("name", "")
            .attribute("age", 0)
            .data_source("memory", memory())
            .build()
            .unwrap();

        assert_eq!(model.name(), "User");
        assert_eq!(model.defaults().get("age"), Some(&json!(0)));
        assert!(model.has_attribute("name"));
        assert_eq!(model.data_source_names(), vec!["memory"]);
        assert!(model.data_source("memory").is_ok());
    }

    #[test]
    fn test_unknown_data_source() {
        let model = Model::builder("User")
            .data_source("memory", memory())
            .build()
            .unwrap();
        let err = model.data_source("redis").err().unwrap();
        assert_eq!(err, StoreError::DataSourceNotFound("redis".to_string()));
    }

    #[test]
    fn test_reserved_attribute_rejected_at_declaration() {
        let err = Model::builder("User")
            .attribute("persist", true)
            .attribute("name", "")
            .data_source("memory", memory())
            .build()
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidModel(msg) if msg.contains("persist")));
    }

    #[test]
    fn test_data_source_key_must_match_adapter_name() {
        let err = Model::builder("User")
            .data_source("primary", memory())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::InvalidModel(
                "model 'User' registers data source 'memory' under name 'primary'".to_string()
            )
        );

        let primary: Arc<dyn DataSourceAdapter> = Arc::new(InMemoryAdapter::new("primary"));
        let model = Model::builder("User")
            .data_source("primary", primary)
            .build()
            .unwrap();
        assert_eq!(model.data_source_names(), vec!["primary"]);
    }

    #[test]
    fn test_model_requires_name_and_source() {
        assert!(Model::builder("  ").data_source("memory", memory()).build().is_err());
        assert!(Model::builder("User").build().is_err());
    }
}
