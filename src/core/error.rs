use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Source has reserved keys: {0:?}")]
    ReservedKeys(Vec<String>),

    #[error("Source has unknown keys: {0:?}")]
    UnknownKeys(Vec<String>),

    #[error("Can't {operation} an orphan entity")]
    OrphanEntity { operation: &'static str },

    #[error("Data source '{0}' not found")]
    DataSourceNotFound(String),

    #[error("Record '{id}' not found in table '{table}'")]
    RecordNotFound { table: String, id: String },

    #[error("Uid query for data source '{data_source}' has no identifier")]
    MissingIdentifier { data_source: String },

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Model '{0}' already exists")]
    ModelExists(String),

    #[error("Model '{0}' not found")]
    ModelNotFound(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Expected a JSON object, got {0}")]
    NotAnObject(String),

    #[error("Adapter error: {0}")]
    Adapter(String),
}

impl StoreError {
    /// True for construction-time validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ReservedKeys(_) | Self::UnknownKeys(_))
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
