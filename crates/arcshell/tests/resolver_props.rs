//! Property tests for path resolution over generated archive trees

use arcshell::{ArchiveEntry, ArchiveTree, ResolveError, VirtualNode, resolve};
use proptest::prelude::*;

/// Entry names built from a tiny alphabet so paths share prefixes often.
fn entry_name() -> impl Strategy<Value = String> {
    prop::collection::vec("[abc]{1,2}", 1..4).prop_map(|segments| segments.join("/"))
}

fn tree_and_paths() -> impl Strategy<Value = (ArchiveTree, Vec<String>)> {
    prop::collection::vec((entry_name(), any::<bool>()), 1..12).prop_map(|names| {
        let entries: Vec<ArchiveEntry> = names
            .iter()
            .filter_map(|(name, marker)| {
                let raw = if *marker { format!("{}/", name) } else { name.clone() };
                ArchiveEntry::from_raw_name(&raw)
            })
            .collect();
        let paths = entries.iter().map(|e| e.path.clone()).collect();
        (ArchiveTree::from_entries(entries), paths)
    })
}

proptest! {
    #[test]
    fn every_entry_resolves_from_root((tree, paths) in tree_and_paths()) {
        for path in &paths {
            let node = resolve(&tree, &VirtualNode::root(), path).unwrap();
            prop_assert_eq!(node.path(), path.as_str());
        }
    }

    #[test]
    fn absolute_paths_ignore_start((tree, paths) in tree_and_paths()) {
        for start in &paths {
            let start = resolve(&tree, &VirtualNode::root(), start).unwrap();
            for path in &paths {
                let node = resolve(&tree, &start, &format!("/{}", path)).unwrap();
                prop_assert_eq!(node.path(), path.as_str());
            }
        }
    }

    #[test]
    fn dot_segments_are_skipped((tree, paths) in tree_and_paths()) {
        for path in &paths {
            let dotted = format!("./{}/.", path.replace('/', "/./"));
            let node = resolve(&tree, &VirtualNode::root(), &dotted).unwrap();
            prop_assert_eq!(node.path(), path.as_str());
        }
    }

    #[test]
    fn parent_of_child_is_self((tree, paths) in tree_and_paths()) {
        for path in &paths {
            let node = resolve(&tree, &VirtualNode::root(), path).unwrap();
            let parent = node.parent().unwrap();
            let back = resolve(&tree, &parent, &format!("{}/..", node.name())).unwrap();
            prop_assert_eq!(back, parent);
        }
    }

    #[test]
    fn dotdot_at_root_stays_at_root((tree, paths) in tree_and_paths()) {
        let root = VirtualNode::root();
        prop_assert_eq!(resolve(&tree, &root, "../..").unwrap(), root.clone());
        for path in &paths {
            let node = resolve(&tree, &root, &format!("../../{}", path)).unwrap();
            prop_assert_eq!(node.path(), path.as_str());
        }
    }

    #[test]
    fn unknown_segment_is_named((tree, paths) in tree_and_paths()) {
        for path in &paths {
            let err = resolve(&tree, &VirtualNode::root(), &format!("{}/zz/a", path)).unwrap_err();
            prop_assert_eq!(err, ResolveError::NotFound { segment: "zz".to_string() });
        }
    }
}
