//! Slug Path Resolution
//!
//! Derives each node's full URL path from its ancestor chain: the
//! `/`-joined segments from root down to the node. Used for rendering
//! admin links and for the sitemap projection, where the path's depth
//! scales the default change frequency and priority.
//!
//! A resolver memoizes per instance, so one resolution pass over a tree
//! computes each prefix once. It never mutates the snapshot; concurrent
//! passes each own their memo.

use crate::tree::TreeSnapshot;
use std::collections::{HashMap, HashSet};

/// Memoizing path resolver over one snapshot
pub struct PathResolver<'a> {
    snapshot: &'a TreeSnapshot,
    memo: HashMap<String, String>,
}

impl<'a> PathResolver<'a> {
    /// Create a resolver for one resolution pass
    pub fn new(snapshot: &'a TreeSnapshot) -> Self {
        Self {
            snapshot,
            memo: HashMap::new(),
        }
    }

    /// Full slug path of a node: ancestor segments root→node joined by `/`
    ///
    /// Returns `None` for an id absent from the snapshot. A node whose
    /// parent is absent resolves as a root (lenient orphan handling). If
    /// the parent chain turns out to be cyclic — prevented upstream by the
    /// guard, tolerated here — resolution short-circuits to the node's own
    /// segment instead of looping.
    pub fn full_path(&mut self, id: &str) -> Option<String> {
        if let Some(path) = self.memo.get(id) {
            return Some(path.clone());
        }

        let requested = self.snapshot.get(id)?;

        // Walk up, collecting the unresolved part of the chain
        let mut chain: Vec<&str> = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut prefix: Option<String> = None;
        let mut current = requested;

        loop {
            if !visited.insert(current.id.as_str()) {
                // Not memoized: a short-circuit segment is not a real
                // prefix and must not leak into other nodes' paths
                return Some(requested.path_segment());
            }
            chain.push(current.id.as_str());

            let parent = match current.parent_id.as_deref() {
                Some(parent_id) => parent_id,
                None => break,
            };
            if let Some(known) = self.memo.get(parent) {
                prefix = Some(known.clone());
                break;
            }
            match self.snapshot.get(parent) {
                Some(parent_node) => current = parent_node,
                // Absent parent: the chain starts here
                None => break,
            }
        }

        // Resolve top-down, memoizing every prefix along the way
        let mut path = prefix.unwrap_or_default();
        for chain_id in chain.iter().rev() {
            let segment = self
                .snapshot
                .get(chain_id)
                .map(|node| node.path_segment())
                .unwrap_or_default();
            if path.is_empty() {
                path = segment;
            } else {
                path = format!("{path}/{segment}");
            }
            self.memo.insert((*chain_id).to_string(), path.clone());
        }

        Some(path)
    }

    /// Number of `/`-separated segments in the node's full path
    pub fn depth_of(&mut self, id: &str) -> Option<usize> {
        self.full_path(id)
            .map(|path| path.split('/').filter(|s| !s.is_empty()).count().max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentNode, NodeType};
    use chrono::Utc;

    fn node(id: &str, parent: Option<&str>, slug: Option<&str>, title: &str) -> ContentNode {
        let now = Utc::now();
        ContentNode {
            id: id.to_string(),
            parent_id: parent.map(str::to_string),
            node_type: NodeType::Folder,
            title: title.to_string(),
            slug: slug.map(str::to_string),
            ref_id: None,
            order_index: 0,
            icon: None,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn root_path_is_own_segment() {
        let snapshot = TreeSnapshot::from_nodes(vec![node("a", None, Some("work"), "Work")]);
        let mut resolver = PathResolver::new(&snapshot);

        assert_eq!(resolver.full_path("a").unwrap(), "work");
        assert_eq!(resolver.depth_of("a").unwrap(), 1);
    }

    #[test]
    fn nested_path_joins_ancestor_segments() {
        let snapshot = TreeSnapshot::from_nodes(vec![
            node("a", None, Some("work"), "Work"),
            node("b", Some("a"), Some("demo"), "Demo"),
            node("c", Some("b"), Some("v2"), "V2"),
        ]);
        let mut resolver = PathResolver::new(&snapshot);

        assert_eq!(resolver.full_path("c").unwrap(), "work/demo/v2");
        assert_eq!(resolver.depth_of("c").unwrap(), 3);
        // Prefixes were memoized by the same pass
        assert_eq!(resolver.full_path("b").unwrap(), "work/demo");
        assert_eq!(resolver.full_path("a").unwrap(), "work");
    }

    #[test]
    fn slugless_nodes_fall_back_to_slugified_title() {
        let snapshot = TreeSnapshot::from_nodes(vec![
            node("a", None, None, "My Folder"),
            node("b", Some("a"), Some("post"), "Post"),
        ]);
        let mut resolver = PathResolver::new(&snapshot);

        assert_eq!(resolver.full_path("b").unwrap(), "my-folder/post");
    }

    #[test]
    fn orphan_resolves_as_root() {
        let snapshot =
            TreeSnapshot::from_nodes(vec![node("b", Some("gone"), Some("demo"), "Demo")]);
        let mut resolver = PathResolver::new(&snapshot);

        assert_eq!(resolver.full_path("b").unwrap(), "demo");
    }

    #[test]
    fn unknown_id_resolves_to_none() {
        let snapshot = TreeSnapshot::from_nodes(vec![]);
        let mut resolver = PathResolver::new(&snapshot);

        assert!(resolver.full_path("ghost").is_none());
    }

    #[test]
    fn cycle_short_circuits_to_own_segment() {
        let snapshot = TreeSnapshot::from_nodes(vec![
            node("a", Some("b"), Some("alpha"), "Alpha"),
            node("b", Some("a"), Some("beta"), "Beta"),
        ]);
        let mut resolver = PathResolver::new(&snapshot);

        assert_eq!(resolver.full_path("a").unwrap(), "alpha");
        assert_eq!(resolver.full_path("b").unwrap(), "beta");
    }
}
