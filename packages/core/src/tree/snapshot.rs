//! Per-Request Tree Snapshot
//!
//! A `TreeSnapshot` indexes one loaded node set for pure in-memory
//! traversal: id lookup, sibling grouping, and bounded ancestor walks.
//! Every request builds its snapshot once from a single store read, so
//! invariant checks and path resolution never issue per-hop queries
//! against the backend.
//!
//! The snapshot is deliberately lenient about incomplete sets: a node
//! whose parent is absent (filtered out, or genuinely dangling) is
//! surfaced as a root rather than dropped, so partial views never lose
//! content silently.

use crate::models::ContentNode;
use crate::tree::ordering;
use std::collections::HashMap;

/// Outcome of a bounded ancestor walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AncestorWalk {
    /// The walk reached the needle node
    Reached,
    /// The walk terminated at a root without meeting the needle
    Terminated,
    /// The hop budget ran out before termination (corrupted chain)
    Exhausted,
}

/// Immutable adjacency index over one loaded node set
pub struct TreeSnapshot {
    nodes: HashMap<String, ContentNode>,
    /// Stated parent id → child ids, each group in sibling order.
    /// Keys exist even for parents absent from the set (orphan groups).
    by_parent: HashMap<Option<String>, Vec<String>>,
    /// Root-level ids plus orphans, in sibling order
    roots: Vec<String>,
    /// Ids whose stated parent is absent from the set
    orphans: Vec<String>,
}

impl TreeSnapshot {
    /// Index a node set
    pub fn from_nodes(nodes: Vec<ContentNode>) -> Self {
        let mut map: HashMap<String, ContentNode> = HashMap::with_capacity(nodes.len());
        for node in nodes {
            map.insert(node.id.clone(), node);
        }

        let mut by_parent: HashMap<Option<String>, Vec<String>> = HashMap::new();
        for node in map.values() {
            by_parent
                .entry(node.parent_id.clone())
                .or_default()
                .push(node.id.clone());
        }

        for group in by_parent.values_mut() {
            group.sort_by(|a, b| ordering::sibling_cmp(&map[a], &map[b]));
        }

        let mut orphans: Vec<String> = Vec::new();
        let mut roots: Vec<String> = by_parent.get(&None).cloned().unwrap_or_default();
        for (parent, group) in &by_parent {
            if let Some(parent_id) = parent {
                if !map.contains_key(parent_id) {
                    orphans.extend(group.iter().cloned());
                }
            }
        }
        orphans.sort_by(|a, b| ordering::sibling_cmp(&map[a], &map[b]));
        roots.extend(orphans.iter().cloned());
        roots.sort_by(|a, b| ordering::sibling_cmp(&map[a], &map[b]));

        Self {
            nodes: map,
            by_parent,
            roots,
            orphans,
        }
    }

    /// Look up a node by id
    pub fn get(&self, id: &str) -> Option<&ContentNode> {
        self.nodes.get(id)
    }

    /// Whether the snapshot holds the id
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of indexed nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All indexed nodes, unordered
    pub fn nodes(&self) -> impl Iterator<Item = &ContentNode> {
        self.nodes.values()
    }

    /// Direct children of a node, in sibling order
    pub fn children_of(&self, id: &str) -> &[String] {
        self.by_parent
            .get(&Some(id.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The sibling group sharing a stated parent, in sibling order
    pub fn sibling_group(&self, parent_id: Option<&str>) -> Vec<&ContentNode> {
        self.by_parent
            .get(&parent_id.map(str::to_string))
            .map(|ids| ids.iter().map(|id| &self.nodes[id]).collect())
            .unwrap_or_default()
    }

    /// Root-level ids plus orphans, in sibling order
    pub fn root_ids(&self) -> &[String] {
        &self.roots
    }

    /// Ids whose stated parent is absent from this set
    pub fn orphan_ids(&self) -> &[String] {
        &self.orphans
    }

    /// Walk parent links upward from `start`, looking for `needle`
    ///
    /// The walk is bounded by `hop_limit` on top of the node count, so a
    /// corrupted parent chain (a cycle the guard failed to prevent
    /// upstream) reports `Exhausted` instead of spinning. Callers treat
    /// `Exhausted` as unsafe and fail closed.
    pub fn walk_ancestors(&self, start: &str, needle: &str, hop_limit: usize) -> AncestorWalk {
        let budget = hop_limit.min(self.nodes.len());
        let mut current = start;

        for _ in 0..=budget {
            if current == needle {
                return AncestorWalk::Reached;
            }
            match self.nodes.get(current).and_then(|n| n.parent_id.as_deref()) {
                Some(parent) => current = parent,
                None => return AncestorWalk::Terminated,
            }
        }

        AncestorWalk::Exhausted
    }
}
