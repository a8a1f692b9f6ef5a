//! Path resolution against the archive tree

use thiserror::Error;

use super::{ArchiveTree, VirtualNode};

/// Failure to resolve a path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A segment named something that does not exist.
    #[error("{segment}: No such file or directory")]
    NotFound { segment: String },
}

/// Resolve `input` starting from `start`.
///
/// A leading `/` restarts from the root. Empty and `.` segments are
/// skipped, `..` moves to the parent (staying put at the root), and every
/// other segment must name an existing child of the cursor. The first
/// missing segment aborts resolution and is named in the error.
///
/// # Example
///
/// ```ignore
/// let node = resolve(&tree, &VirtualNode::root(), "docs/../docs/./readme.md")?;
/// assert_eq!(node.path(), "docs/readme.md");
/// ```
pub fn resolve(
    tree: &ArchiveTree,
    start: &VirtualNode,
    input: &str,
) -> Result<VirtualNode, ResolveError> {
    let mut cursor = if input.starts_with('/') {
        VirtualNode::root()
    } else {
        start.clone()
    };

    for segment in input.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if let Some(parent) = cursor.parent() {
                    cursor = parent;
                }
            }
            name => {
                let path = cursor.child_path(name);
                cursor = tree.node(&path).ok_or_else(|| ResolveError::NotFound {
                    segment: name.to_string(),
                })?;
            }
        }
    }

    Ok(cursor)
}
