//! Ownership overlay
//!
//! Archives carry no owner metadata of their own. The overlay attaches a
//! `user:group` pair to entries for the lifetime of a session. Nothing is
//! enforced: ownership is only reported by `ls -l`.
//!
//! Records are keyed by the full normalized entry path, so same-named
//! entries in different directories keep separate owners.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A `user:group` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnershipRecord {
    pub user: String,
    pub group: String,
}

impl OwnershipRecord {
    pub fn new(user: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            group: group.into(),
        }
    }

    /// The implicit owner of every entry: `username:username_group`.
    pub fn default_for(username: &str) -> Self {
        Self::new(username, format!("{}_group", username))
    }
}

impl fmt::Display for OwnershipRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.user, self.group)
    }
}

/// Malformed `USER:GROUP` argument.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid owner '{0}': expected USER:GROUP")]
pub struct OwnerSpecError(pub String);

impl FromStr for OwnershipRecord {
    type Err = OwnerSpecError;

    /// Parse `USER:GROUP`. Exactly one `:` is required and neither side may
    /// be empty.
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let mut parts = spec.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(user), Some(group), None) if !user.is_empty() && !group.is_empty() => {
                Ok(Self::new(user, group))
            }
            _ => Err(OwnerSpecError(spec.to_string())),
        }
    }
}

/// Session-scoped map from entry path to owner.
#[derive(Debug, Clone)]
pub struct OwnershipOverlay {
    default: OwnershipRecord,
    records: HashMap<String, OwnershipRecord>,
}

impl OwnershipOverlay {
    /// Empty overlay whose fallback owner is derived from `username`.
    pub fn new(username: &str) -> Self {
        Self {
            default: OwnershipRecord::default_for(username),
            records: HashMap::new(),
        }
    }

    /// Overlay with an explicit default record for each of `paths`.
    pub fn seeded<'a, I>(username: &str, paths: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut overlay = Self::new(username);
        for path in paths {
            overlay
                .records
                .insert(path.to_string(), overlay.default.clone());
        }
        overlay
    }

    /// Owner of `path`: the explicit record, or the session default.
    ///
    /// Entries created after the overlay was seeded fall back to the default.
    pub fn get(&self, path: &str) -> &OwnershipRecord {
        self.records.get(path).unwrap_or(&self.default)
    }

    /// The explicit record for `path`, if one was seeded or set.
    pub fn explicit(&self, path: &str) -> Option<&OwnershipRecord> {
        self.records.get(path)
    }

    /// Insert or overwrite the record for `path`, returning the previous one.
    ///
    /// No existence check is made here; callers resolve the path first.
    pub fn set(&mut self, path: impl Into<String>, record: OwnershipRecord) -> Option<OwnershipRecord> {
        self.records.insert(path.into(), record)
    }

    /// The fallback record.
    pub fn default_record(&self) -> &OwnershipRecord {
        &self.default
    }

    /// Number of explicit records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_owner_spec() {
        let record: OwnershipRecord = "alice:staff".parse().unwrap();
        assert_eq!(record, OwnershipRecord::new("alice", "staff"));
        assert_eq!(record.to_string(), "alice:staff");
    }

    #[test]
    fn test_parse_owner_spec_rejects_malformed() {
        for spec in ["bad_format_without_colon", "a:b:c", ":group", "user:", ":", ""] {
            assert!(spec.parse::<OwnershipRecord>().is_err(), "accepted {:?}", spec);
        }
    }

    #[test]
    fn test_default_record() {
        let record = OwnershipRecord::default_for("test_user");
        assert_eq!(record.to_string(), "test_user:test_user_group");
    }

    #[test]
    fn test_seeded_overlay() {
        let overlay = OwnershipOverlay::seeded("bob", ["file1.txt", "docs/a.md"]);
        assert_eq!(overlay.len(), 2);
        assert_eq!(overlay.explicit("file1.txt").unwrap().to_string(), "bob:bob_group");
        assert!(overlay.explicit("later.txt").is_none());
        assert_eq!(overlay.get("later.txt").to_string(), "bob:bob_group");
    }

    #[test]
    fn test_set_overwrites() {
        let mut overlay = OwnershipOverlay::seeded("bob", ["file1.txt"]);
        let previous = overlay.set("file1.txt", OwnershipRecord::new("u1", "g1"));
        assert_eq!(previous, Some(OwnershipRecord::default_for("bob")));
        overlay.set("file1.txt", OwnershipRecord::new("u2", "g2"));
        assert_eq!(overlay.get("file1.txt").to_string(), "u2:g2");
        assert_eq!(overlay.len(), 1);
    }

    #[test]
    fn test_same_name_different_directories() {
        let mut overlay = OwnershipOverlay::seeded("bob", ["a/notes.txt", "b/notes.txt"]);
        overlay.set("a/notes.txt", OwnershipRecord::new("carol", "ops"));
        assert_eq!(overlay.get("a/notes.txt").to_string(), "carol:ops");
        assert_eq!(overlay.get("b/notes.txt").to_string(), "bob:bob_group");
    }

    #[test]
    fn test_set_without_existence_check() {
        let mut overlay = OwnershipOverlay::new("bob");
        assert!(overlay.is_empty());
        overlay.set("ghost.txt", OwnershipRecord::new("x", "y"));
        assert_eq!(overlay.get("ghost.txt").to_string(), "x:y");
    }
}
