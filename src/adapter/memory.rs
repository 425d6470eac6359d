use super::{CanonicalRecord, DataSourceAdapter};
use crate::core::{Attributes, ID_FIELD, ID_HASH_FIELD, Result, StoreError, UidQuery};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{Level, event};
use uuid::Uuid;

type Table = HashMap<String, Attributes>;

/// Per-primitive call counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdapterStats {
    pub inserts: u64,
    pub updates: u64,
    pub finds: u64,
    pub deletes: u64,
}

impl AdapterStats {
    pub fn total(&self) -> u64 {
        self.inserts + self.updates + self.finds + self.deletes
    }
}

/// Data source keeping every table in process memory.
///
/// Rows are keyed by a generated UUID stored under `id`; returned records carry
/// `idHash` with this adapter's entry filled in.
pub struct InMemoryAdapter {
    name: String,
    tables: RwLock<HashMap<String, Table>>,
    inserts: AtomicU64,
    updates: AtomicU64,
    finds: AtomicU64,
    deletes: AtomicU64,
}

impl InMemoryAdapter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: RwLock::new(HashMap::new()),
            inserts: AtomicU64::new(0),
            updates: AtomicU64::new(0),
            finds: AtomicU64::new(0),
            deletes: AtomicU64::new(0),
        }
    }

    pub fn stats(&self) -> AdapterStats {
        AdapterStats {
            inserts: self.inserts.load(Ordering::SeqCst),
            updates: self.updates.load(Ordering::SeqCst),
            finds: self.finds.load(Ordering::SeqCst),
            deletes: self.deletes.load(Ordering::SeqCst),
        }
    }

    /// Number of rows currently stored in `table`.
    pub async fn len(&self, table: &str) -> usize {
        let tables = self.tables.read().await;
        tables.get(table).map(HashMap::len).unwrap_or(0)
    }

    pub async fn is_empty(&self, table: &str) -> bool {
        self.len(table).await == 0
    }

    fn require_id(&self, query: &UidQuery) -> Result<String> {
        query.id_key().ok_or_else(|| StoreError::MissingIdentifier {
            data_source: self.name.clone(),
        })
    }

    fn not_found(table: &str, id: String) -> StoreError {
        StoreError::RecordNotFound {
            table: table.to_string(),
            id,
        }
    }

    /// Writes this source's identity into a row: `id` plus its `idHash` entry.
    fn stamp_identity(&self, row: &mut Attributes, id: &str) {
        row.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        let hash = row
            .entry(ID_HASH_FIELD.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !hash.is_object() {
            *hash = Value::Object(Map::new());
        }
        if let Value::Object(hash) = hash {
            hash.insert(self.name.clone(), Value::String(id.to_string()));
        }
    }

    fn record(&self, row: Attributes) -> CanonicalRecord {
        CanonicalRecord::new(self.name.clone(), row)
    }
}

#[async_trait]
impl DataSourceAdapter for InMemoryAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn insert_one(&self, table: &str, attributes: Attributes) -> Result<CanonicalRecord> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        let id = Uuid::new_v4().to_string();
        let mut row = attributes;
        self.stamp_identity(&mut row, &id);

        let mut tables = self.tables.write().await;
        tables
            .entry(table.to_string())
            .or_default()
            .insert(id.clone(), row.clone());
        event!(Level::DEBUG, source = %self.name, table, id = %id, "memory row inserted");
        Ok(self.record(row))
    }

    async fn update_one(
        &self,
        table: &str,
        query: &UidQuery,
        attributes: Attributes,
    ) -> Result<CanonicalRecord> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        let id = self.require_id(query)?;

        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.get_mut(&id))
            .ok_or_else(|| Self::not_found(table, id.clone()))?;
        for (key, value) in attributes {
            row.insert(key, value);
        }
        self.stamp_identity(row, &id);
        event!(Level::DEBUG, source = %self.name, table, id = %id, "memory row updated");
        Ok(self.record(row.clone()))
    }

    async fn find_one(&self, table: &str, query: &UidQuery) -> Result<CanonicalRecord> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        let id = self.require_id(query)?;

        let tables = self.tables.read().await;
        let row = tables
            .get(table)
            .and_then(|rows| rows.get(&id))
            .ok_or_else(|| Self::not_found(table, id.clone()))?;
        Ok(self.record(row.clone()))
    }

    async fn delete_one(&self, table: &str, query: &UidQuery) -> Result<CanonicalRecord> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        let id = self.require_id(query)?;

        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.remove(&id))
            .ok_or_else(|| Self::not_found(table, id.clone()))?;
        event!(Level::DEBUG, source = %self.name, table, id = %id, "memory row deleted");
        Ok(self.record(row))
    }
}
