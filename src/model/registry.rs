use super::Model;
use crate::core::{Result, StoreError};
use crate::entity::{EntityType, build_entity_type};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{Level, event};

/// Registered models and the entity type built for each of them.
#[derive(Default)]
pub struct ModelRegistry {
    entity_types: HashMap<String, Arc<EntityType>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `model` and builds its entity type. Names are unique.
    pub fn register(&mut self, model: Model) -> Result<Arc<EntityType>> {
        if self.entity_types.contains_key(model.name()) {
            return Err(StoreError::ModelExists(model.name().to_string()));
        }

        let name = model.name().to_string();
        let defaults = model.defaults().clone();
        let entity_type = build_entity_type(&name, defaults, Arc::new(model));
        self.entity_types.insert(name.clone(), entity_type.clone());
        event!(Level::DEBUG, model = %name, "model registered");
        Ok(entity_type)
    }

    pub fn entity_type(&self, name: &str) -> Result<Arc<EntityType>> {
        self.entity_types
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::ModelNotFound(name.to_string()))
    }

    pub fn model(&self, name: &str) -> Result<Arc<Model>> {
        Ok(self.entity_type(name)?.model().clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entity_types.contains_key(name)
    }

    /// Registered model names, sorted.
    pub fn model_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entity_types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::InMemoryAdapter;

    fn user_model() -> Model {
        Model::builder("User")
            .attribute("name", "")
            .data_source("memory", Arc::new(InMemoryAdapter::new("memory")))
            .build()
            .unwrap()
    }

    #[test]
    fn test_register_caches_entity_type() {
        let mut registry = ModelRegistry::new();
        let built = registry.register(user_model()).unwrap();

        let cached = registry.entity_type("User").unwrap();
        assert!(Arc::ptr_eq(&built, &cached));
        assert_eq!(cached.name(), "UserEntity");
        assert_eq!(registry.model("User").unwrap().name(), "User");
        assert_eq!(registry.model_names(), vec!["User"]);
    }

    #[test]
    fn test_duplicate_model_rejected() {
        let mut registry = ModelRegistry::new();
        registry.register(user_model()).unwrap();
        let err = registry.register(user_model()).unwrap_err();
        assert_eq!(err, StoreError::ModelExists("User".to_string()));
    }

    #[test]
    fn test_unknown_model() {
        let registry = ModelRegistry::new();
        assert!(!registry.contains("User"));
        assert_eq!(
            registry.entity_type("User").unwrap_err(),
            StoreError::ModelNotFound("User".to_string())
        );
    }
}
