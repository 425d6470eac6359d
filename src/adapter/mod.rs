//! Data source adapters
//!
//! Every pluggable backend implements [`DataSourceAdapter`]: four
//! asynchronous CRUD primitives keyed by table name, each resolving to a
//! [`CanonicalRecord`] tagged with the adapter's data source name.
//!
//! - `record.rs` - the canonical record type
//! - `memory.rs` - reference in-memory adapter

mod memory;
mod record;

pub use memory::{AdapterStats, InMemoryAdapter};
pub use record::CanonicalRecord;

use crate::core::{Attributes, Result, UidQuery};
use async_trait::async_trait;

/// Contract satisfied by every data source backend.
///
/// Rejections are surfaced to callers of entity lifecycle operations unchanged.
#[async_trait]
pub trait DataSourceAdapter: Send + Sync {
    /// Name used to tag returned records and their `idHash` entries.
    fn name(&self) -> &str;

    /// Stores a new row and returns its canonical representation.
    async fn insert_one(&self, table: &str, attributes: Attributes) -> Result<CanonicalRecord>;

    /// Updates the row matched by `query` with `attributes`.
    async fn update_one(
        &self,
        table: &str,
        query: &UidQuery,
        attributes: Attributes,
    ) -> Result<CanonicalRecord>;

    /// Loads the row matched by `query`.
    async fn find_one(&self, table: &str, query: &UidQuery) -> Result<CanonicalRecord>;

    /// Removes the row matched by `query`, returning its last representation.
    async fn delete_one(&self, table: &str, query: &UidQuery) -> Result<CanonicalRecord>;
}
