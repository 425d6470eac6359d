use super::config::FailurePolicy;
use super::reserved::is_reserved;
use super::Entity;
use crate::adapter::CanonicalRecord;
use crate::core::{EntityState, ID_FIELD, ID_HASH_FIELD, Result, StoreError, UidQuery};
use serde_json::Value;
use tracing::{Level, event};

/// State captured right before an operation marks the entity `syncing`.
struct Checkpoint {
    state: EntityState,
    last_data_source: Option<String>,
}

impl Entity {
    /// Writes the entity to `source_name`: an insert while `orphan`, an update
    /// keyed by the source's `idHash` entry otherwise. On success attributes are
    /// replaced by the returned record.
    pub async fn persist(&mut self, source_name: &str) -> Result<&mut Self> {
        let adapter = self.model().data_source(source_name)?;
        let table = self.table(source_name).to_string();
        let snapshot = self.to_object();
        let query = self.uid_query(source_name);

        let checkpoint = self.begin_sync(source_name);
        let outcome = if checkpoint.state.is_orphan() {
            event!(
                Level::DEBUG,
                entity = %self.entity_type_name(),
                source = %source_name,
                "persist dispatched as insert"
            );
            adapter.insert_one(&table, snapshot).await
        } else {
            event!(
                Level::DEBUG,
                entity = %self.entity_type_name(),
                source = %source_name,
                "persist dispatched as update"
            );
            adapter.update_one(&table, &query, snapshot).await
        };

        let record = self.settle(source_name, checkpoint, outcome)?;
        self.reconcile(source_name, record);
        Ok(self)
    }

    /// Reloads the entity from `source_name`. Fails without calling the
    /// adapter while the entity is `orphan`.
    pub async fn fetch(&mut self, source_name: &str) -> Result<&mut Self> {
        let adapter = self.model().data_source(source_name)?;
        self.ensure_backed("fetch")?;
        let table = self.table(source_name).to_string();
        let query = self.uid_query(source_name);

        let checkpoint = self.begin_sync(source_name);
        let outcome = adapter.find_one(&table, &query).await;

        let record = self.settle(source_name, checkpoint, outcome)?;
        self.reconcile(source_name, record);
        Ok(self)
    }

    /// Deletes the entity from `source_name`. With a single configured source
    /// the entity returns to `orphan` and loses `id` and `idHash`; otherwise it
    /// stays `sync` and loses only that source's `idHash` entry.
    pub async fn destroy(&mut self, source_name: &str) -> Result<&mut Self> {
        let adapter = self.model().data_source(source_name)?;
        self.ensure_backed("destroy")?;
        let table = self.table(source_name).to_string();
        let query = self.uid_query(source_name);

        let checkpoint = self.begin_sync(source_name);
        let outcome = adapter.delete_one(&table, &query).await;
        self.settle(source_name, checkpoint, outcome)?;

        if self.model().data_source_count() == 1 {
            self.state = EntityState::Orphan;
            self.attributes.remove(ID_FIELD);
            self.attributes.remove(ID_HASH_FIELD);
        } else {
            self.state = EntityState::Sync;
            if let Some(Value::Object(hash)) = self.attributes.get_mut(ID_HASH_FIELD) {
                hash.remove(source_name);
            }
        }
        self.data_sources.assign(source_name, None);

        event!(
            Level::DEBUG,
            entity = %self.entity_type_name(),
            source = %source_name,
            state = %self.state,
            "entity destroyed"
        );
        Ok(self)
    }

    /// Identity lookup for `source_name`: `{ id: idHash[source_name] }`.
    pub fn uid_query(&self, source_name: &str) -> UidQuery {
        UidQuery {
            id: self
                .id_hash()
                .and_then(|hash| hash.get(source_name))
                .cloned(),
        }
    }

    /// Table used in every data source: the model name.
    pub fn table(&self, _source_name: &str) -> &str {
        self.entity_type.model_name()
    }

    fn ensure_backed(&self, operation: &'static str) -> Result<()> {
        if self.state.is_orphan() {
            return Err(StoreError::OrphanEntity { operation });
        }
        Ok(())
    }

    fn begin_sync(&mut self, source_name: &str) -> Checkpoint {
        let checkpoint = Checkpoint {
            state: self.state,
            last_data_source: self.last_data_source.take(),
        };
        self.state = EntityState::Syncing;
        self.last_data_source = Some(source_name.to_string());
        checkpoint
    }

    fn settle<T>(
        &mut self,
        source_name: &str,
        checkpoint: Checkpoint,
        outcome: Result<T>,
    ) -> Result<T> {
        let err = match outcome {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        match self.entity_type.config().failure_policy {
            FailurePolicy::KeepSyncing => {
                event!(
                    Level::WARN,
                    entity = %self.entity_type_name(),
                    source = %source_name,
                    error = %err,
                    "adapter rejected operation, entity left syncing"
                );
            }
            FailurePolicy::Rollback => {
                self.state = checkpoint.state;
                self.last_data_source = checkpoint.last_data_source;
                event!(
                    Level::WARN,
                    entity = %self.entity_type_name(),
                    source = %source_name,
                    error = %err,
                    state = %self.state,
                    "adapter rejected operation, state rolled back"
                );
            }
        }
        Err(err)
    }

    fn reconcile(&mut self, source_name: &str, record: CanonicalRecord) {
        let mut attributes = record.to_object();
        attributes.retain(|key, _| !is_reserved(key));

        self.state = EntityState::Sync;
        self.attributes = attributes;
        self.data_sources.assign(source_name, Some(record));
        event!(
            Level::DEBUG,
            entity = %self.entity_type_name(),
            source = %source_name,
            "entity reconciled"
        );
    }
}
