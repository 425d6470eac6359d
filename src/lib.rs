// ============================================================================
// Polystore Library
// ============================================================================

//! Entity layer over pluggable data sources.
//!
//! A [`Model`] declares attribute defaults and named [`DataSourceAdapter`]s.
//! Registering it builds an [`EntityType`], whose entities validate and
//! default their attributes at construction, expose them as flat fields, and
//! move through an `orphan` / `syncing` / `sync` lifecycle as they are
//! persisted to, fetched from, and destroyed in those data sources.
//!
//! # Examples
//!
//! ```
//! use polystore::{EntityState, InMemoryAdapter, Model, ModelRegistry};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> polystore::Result<()> {
//! let model = Model::builder("User")
//!     .attribute("name", "")
//!     .data_source("memory", Arc::new(InMemoryAdapter::new("memory")))
//!     .build()?;
//!
//! let mut registry = ModelRegistry::new();
//! let users = registry.register(model)?;
//!
//! let mut alice = users.create_from_json(json!({"name": "Alice"}))?;
//! assert_eq!(alice.state(), EntityState::Orphan);
//!
//! alice.persist("memory").await?;
//! assert_eq!(alice.state(), EntityState::Sync);
//! assert!(alice.id().is_some());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod core;
pub mod entity;
pub mod model;

pub use adapter::{AdapterStats, CanonicalRecord, DataSourceAdapter, InMemoryAdapter};
pub use crate::core::{Attributes, EntityState, Result, StoreError, UidQuery};
pub use entity::{
    DataSourceSlots, Entity, EntityConfig, EntitySource, EntityType, FailurePolicy, Field,
    LifecycleOperation, SchemaPolicy, build_entity_type,
};
pub use model::{Model, ModelBuilder, ModelRegistry};
