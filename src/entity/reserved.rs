use lazy_static::lazy_static;
use std::collections::HashSet;
use std::fmt;

/// Operation names bound on every entity. None of them may be used as an attribute name.
///
/// Accessor operations keep a `get_` prefix in this namespace so that common
/// field names such as `state` or `table` stay available to models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleOperation {
    Model,
    DataSources,
    ToObject,
    Persist,
    Fetch,
    Destroy,
    State,
    LastDataSource,
    UidQuery,
    Table,
}

impl LifecycleOperation {
    pub const ALL: [LifecycleOperation; 10] = [
        LifecycleOperation::Model,
        LifecycleOperation::DataSources,
        LifecycleOperation::ToObject,
        LifecycleOperation::Persist,
        LifecycleOperation::Fetch,
        LifecycleOperation::Destroy,
        LifecycleOperation::State,
        LifecycleOperation::LastDataSource,
        LifecycleOperation::UidQuery,
        LifecycleOperation::Table,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleOperation::Model => "model",
            LifecycleOperation::DataSources => "data_sources",
            LifecycleOperation::ToObject => "to_object",
            LifecycleOperation::Persist => "persist",
            LifecycleOperation::Fetch => "fetch",
            LifecycleOperation::Destroy => "destroy",
            LifecycleOperation::State => "get_state",
            LifecycleOperation::LastDataSource => "get_last_data_source",
            LifecycleOperation::UidQuery => "get_uid_query",
            LifecycleOperation::Table => "get_table",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.as_str() == name)
    }
}

impl fmt::Display for LifecycleOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

lazy_static! {
    static ref RESERVED_NAMES: HashSet<&'static str> = LifecycleOperation::ALL
        .iter()
        .map(LifecycleOperation::as_str)
        .collect();
}

pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(name)
}

/// Every reserved name, in declaration order.
pub fn reserved_names() -> Vec<&'static str> {
    LifecycleOperation::ALL
        .iter()
        .map(LifecycleOperation::as_str)
        .collect()
}

/// Returns the reserved names among `keys`, sorted and deduplicated.
pub(crate) fn reserved_among<'a>(keys: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    let mut found: Vec<String> = keys
        .into_iter()
        .filter(|key| is_reserved(key))
        .cloned()
        .collect();
    found.sort();
    found.dedup();
    found
}
