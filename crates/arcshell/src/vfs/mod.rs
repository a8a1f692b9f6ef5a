//! Virtual tree over archive entries
//!
//! Archives store a flat list of names. [`ArchiveTree`] turns that list into
//! a hierarchy: directories exist if they are explicit markers or if any
//! entry lives below them, and the root always exists.

mod resolve;

pub use resolve::{ResolveError, resolve};

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::archive::{ArchiveEntry, EntryKind};

/// Kind of a node in the virtual tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Directory,
    File,
}

/// A position in the archive namespace.
///
/// The root is the empty path. Any other path is slash-separated without
/// leading or trailing separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VirtualNode {
    path: String,
    kind: NodeKind,
}

impl VirtualNode {
    /// The archive root.
    pub fn root() -> Self {
        Self {
            path: String::new(),
            kind: NodeKind::Directory,
        }
    }

    pub(crate) fn new(path: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Normalized path, empty for the root.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory)
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File)
    }

    /// Terminal segment of the path, empty for the root.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }

    /// Containing directory, `None` for the root.
    pub fn parent(&self) -> Option<VirtualNode> {
        if self.is_root() {
            return None;
        }
        let parent = match self.path.rfind('/') {
            Some(idx) => &self.path[..idx],
            None => "",
        };
        Some(VirtualNode::new(parent, NodeKind::Directory))
    }

    /// Path of a direct child named `segment`.
    pub fn child_path(&self, segment: &str) -> String {
        if self.is_root() {
            segment.to_string()
        } else {
            format!("{}/{}", self.path, segment)
        }
    }
}

impl fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path)
    }
}

/// Navigable hierarchy built from an archive's entry list.
#[derive(Debug, Clone, Default)]
pub struct ArchiveTree {
    /// Explicit entries by normalized path.
    entries: BTreeMap<String, EntryKind>,
    /// Every non-root directory, explicit marker or implied by a descendant.
    directories: BTreeSet<String>,
}

impl ArchiveTree {
    /// Create an empty tree (root only).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from indexed archive entries.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = ArchiveEntry>,
    {
        let mut tree = Self::new();
        for entry in entries {
            tree.insert(entry);
        }
        tree
    }

    /// Add an entry, creating the directories it implies.
    pub fn insert(&mut self, entry: ArchiveEntry) {
        let mut end = 0;
        while let Some(idx) = entry.path[end..].find('/') {
            end += idx;
            self.directories.insert(entry.path[..end].to_string());
            end += 1;
        }
        if entry.is_directory_marker() {
            self.directories.insert(entry.path.clone());
        }
        self.entries.insert(entry.path, entry.kind);
    }

    /// All explicit entry paths, in lexicographic order.
    pub fn list_entries(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of explicit entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if `path` names the root or an existing directory.
    pub fn is_dir(&self, path: &str) -> bool {
        path.is_empty() || self.directories.contains(path)
    }

    /// Check if `path` names an existing directory or file.
    pub fn exists(&self, path: &str) -> bool {
        self.is_dir(path) || self.entries.contains_key(path)
    }

    /// Look up the node at a normalized path.
    ///
    /// A name that is both a file entry and a prefix of other entries is
    /// reported as a directory.
    pub fn node(&self, path: &str) -> Option<VirtualNode> {
        if self.is_dir(path) {
            Some(VirtualNode::new(path, NodeKind::Directory))
        } else if self.entries.contains_key(path) {
            Some(VirtualNode::new(path, NodeKind::File))
        } else {
            None
        }
    }

    /// Direct children of a directory node, ordered by name.
    ///
    /// Files have no children.
    pub fn children_of(&self, node: &VirtualNode) -> Vec<VirtualNode> {
        if !node.is_dir() {
            return Vec::new();
        }

        let prefix = if node.is_root() {
            String::new()
        } else {
            format!("{}/", node.path())
        };

        let direct = |path: &&String| {
            path.strip_prefix(prefix.as_str())
                .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
        };

        let paths: BTreeSet<&String> = self
            .entries
            .keys()
            .filter(direct)
            .chain(self.directories.iter().filter(direct))
            .collect();

        paths
            .into_iter()
            .filter_map(|path| self.node(path))
            .collect()
    }
}
