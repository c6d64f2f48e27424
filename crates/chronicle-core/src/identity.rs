//! Versioned aggregate identity.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable aggregate identifier paired with a version number.
///
/// Two values are equal only when both the identifier and the version match.
/// Deriving a new version never mutates the original value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionedId {
    /// Stable identifier shared by every version of the aggregate.
    pub id: Uuid,
    /// Number of events the aggregate has (or is expected to have) applied.
    pub version: i64,
}

impl VersionedId {
    /// Creates an identity with the given identifier and version.
    #[must_use]
    pub fn new(id: Uuid, version: i64) -> Self {
        Self { id, version }
    }

    /// Creates an identity for a brand-new aggregate: random id, version 0.
    #[must_use]
    pub fn random() -> Self {
        Self::for_id(Uuid::new_v4())
    }

    /// Creates version 0 of the given identifier.
    #[must_use]
    pub fn for_id(id: Uuid) -> Self {
        Self { id, version: 0 }
    }

    /// Returns an identity with the same identifier and the given version.
    #[must_use]
    pub fn with_version(self, version: i64) -> Self {
        Self {
            id: self.id,
            version,
        }
    }

    /// Returns an identity with the version incremented by one.
    #[must_use]
    pub fn next_version(self) -> Self {
        self.with_version(self.version + 1)
    }

    /// Returns `true` if both identities refer to the same aggregate,
    /// regardless of version.
    #[must_use]
    pub fn is_for_same_aggregate(&self, other: &VersionedId) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for VersionedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.id, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_with_version_keeps_id_and_replaces_version() {
        // Arrange
        let original = VersionedId::random();

        // Act
        let versioned = original.with_version(7);

        // Assert
        assert_eq!(versioned.id, original.id);
        assert_eq!(versioned.version, 7);
        assert_eq!(original.version, 0);
    }

    #[test]
    fn test_next_version_increments_by_one() {
        let id = VersionedId::random().with_version(2);

        let next = id.next_version();

        assert_eq!(next.version, 3);
        assert!(next.is_for_same_aggregate(&id));
        assert_ne!(next, id);
    }

    #[test]
    fn test_equality_requires_id_and_version() {
        let id = Uuid::new_v4();

        assert_eq!(VersionedId::new(id, 1), VersionedId::new(id, 1));
        assert_ne!(VersionedId::new(id, 1), VersionedId::new(id, 2));
        assert_ne!(VersionedId::new(id, 1), VersionedId::new(Uuid::new_v4(), 1));
    }

    #[test]
    fn test_hash_is_structural() {
        let id = VersionedId::random();
        let mut set = HashSet::new();

        set.insert(id);
        set.insert(id.with_version(0));
        set.insert(id.next_version());

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display_joins_id_and_version() {
        let id = Uuid::nil();

        assert_eq!(
            VersionedId::new(id, 4).to_string(),
            "00000000-0000-0000-0000-000000000000#4"
        );
    }
}
