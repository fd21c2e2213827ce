use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error(
    "Invalid id {value:?}: ids must be a single path segment (no '/', '\\\\', NUL, '.' or '..')"
)]
pub struct IdError {
    value: String,
}

/// Opaque identifier for assets and trades.
///
/// Ids double as directory names in the file-backed store, so they must be
/// safe path segments (no slashes).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

impl Id {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create an ID from an arbitrary string.
    /// Note: The string must be a valid path segment (no slashes).
    pub fn from_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Create an ID from an arbitrary string, validating that it is a safe path segment.
    pub fn from_string_checked(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        if Self::is_path_safe(&value) {
            Ok(Self(value))
        } else {
            Err(IdError { value })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the string is safe to use as a single path segment.
    pub fn is_path_safe(value: &str) -> bool {
        if value.is_empty() || value == "." || value == ".." {
            return false;
        }
        !value.chars().any(|c| c == '/' || c == '\\' || c == '\0')
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Source of ids for newly registered assets and recorded trades.
///
/// The ledger service takes this as an injected collaborator, so tests can pin
/// the ids that registration and trade recording hand out.
pub trait IdGenerator: Send + Sync {
    fn new_id(&self) -> Id;
}

/// Random v4 ids; what production code uses.
#[derive(Debug, Clone, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn new_id(&self) -> Id {
        Id::new()
    }
}

/// Serves a seeded sequence of ids in order, then panics. Running out mid-test
/// means the fixture under-counted how many assets and trades it creates.
#[derive(Debug, Default)]
pub struct FixedIdGenerator {
    queue: Mutex<VecDeque<Id>>,
}

impl FixedIdGenerator {
    pub fn new(ids: impl IntoIterator<Item = Id>) -> Self {
        Self {
            queue: Mutex::new(ids.into_iter().collect()),
        }
    }
}

impl IdGenerator for FixedIdGenerator {
    fn new_id(&self) -> Id {
        let mut queue = self.queue.lock().expect("id queue lock poisoned");
        queue.pop_front().expect("ran out of seeded ids")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(Id::new(), Id::new());
    }

    #[test]
    fn from_string_keeps_value() {
        let id = Id::from_string("asset-id-123");
        assert_eq!(id.as_str(), "asset-id-123");
    }

    #[test]
    fn from_string_checked_rejects_unsafe_values() {
        assert!(Id::from_string_checked("../escape").is_err());
        assert!(Id::from_string_checked("..").is_err());
        assert!(Id::from_string_checked(".").is_err());
        assert!(Id::from_string_checked("foo/bar").is_err());
        assert!(Id::from_string_checked("foo\\bar").is_err());
        assert!(Id::from_string_checked("bad\0id").is_err());
    }

    #[test]
    fn seeded_generator_serves_ids_in_order() {
        let ids = FixedIdGenerator::new([Id::from_string("asset-1"), Id::from_string("trade-1")]);
        assert_eq!(ids.new_id().as_str(), "asset-1");
        assert_eq!(ids.new_id().as_str(), "trade-1");
    }

    #[test]
    #[should_panic(expected = "ran out of seeded ids")]
    fn seeded_generator_panics_when_exhausted() {
        let ids = FixedIdGenerator::new([Id::from_string("only-one")]);
        ids.new_id();
        ids.new_id();
    }
}
