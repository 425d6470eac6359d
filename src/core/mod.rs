pub mod error;
pub mod types;

pub use error::{Result, StoreError};
pub use types::{
    Attributes, EntityState, ID_FIELD, ID_HASH_FIELD, UidQuery, apply_defaults, value_kind,
};
