/// How attribute writes made after construction are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaPolicy {
    /// The closed schema is enforced at construction only.
    #[default]
    ValidateOnce,
    /// Writes of undeclared names are refused after construction too.
    Strict,
}

/// What happens to entity state when an adapter rejects an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// The entity stays `syncing` until a later operation succeeds.
    #[default]
    KeepSyncing,
    /// The state and last data source from before the call are restored.
    Rollback,
}

/// Per-model entity behavior
///
/// Similar to a connection config: built with chained setters and carried
/// by every entity of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntityConfig {
    /// Post-construction attribute write checking
    pub schema_policy: SchemaPolicy,

    /// Adapter failure handling
    pub failure_policy: FailurePolicy,
}

impl EntityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the schema policy
    pub fn schema_policy(mut self, policy: SchemaPolicy) -> Self {
        self.schema_policy = policy;
        self
    }

    /// Set the failure policy
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Shorthand for `SchemaPolicy::Strict`
    pub fn strict(self) -> Self {
        self.schema_policy(SchemaPolicy::Strict)
    }

    /// Shorthand for `FailurePolicy::Rollback`
    pub fn rollback_on_failure(self) -> Self {
        self.failure_policy(FailurePolicy::Rollback)
    }
}
