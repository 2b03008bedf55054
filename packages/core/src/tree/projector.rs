//! Tree Projection
//!
//! Builds traversal-friendly structures from a flat node set: the nested
//! forest the admin tree view renders, pre-order flattening, subtree
//! scoping, and depth-limited views. All projections are lenient about
//! filtered sets — a node whose parent was filtered away is promoted to a
//! root, never dropped.

use crate::models::ContentNode;
use crate::tree::{PathResolver, TreeSnapshot};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};

/// One projected node: the row itself plus its resolved path, its depth
/// within the projected forest (0-based), and its ordered children.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    #[serde(flatten)]
    pub node: ContentNode,
    pub path: String,
    pub depth: usize,
    pub children: Vec<TreeNode>,
}

/// Build the nested forest for a snapshot
///
/// Children appear in sibling order; snapshot roots (stated roots plus
/// orphans) become the forest roots. `resolver` may be built over a
/// superset snapshot so that paths keep their absolute prefixes when the
/// view is scoped to a subtree.
pub fn build_forest(view: &TreeSnapshot, resolver: &mut PathResolver<'_>) -> Vec<TreeNode> {
    let mut roots = Vec::new();
    for root_id in view.root_ids() {
        if let Some(tree_node) = build_node(view, resolver, root_id, 0, &mut HashSet::new()) {
            roots.push(tree_node);
        }
    }
    roots
}

fn build_node(
    view: &TreeSnapshot,
    resolver: &mut PathResolver<'_>,
    id: &str,
    depth: usize,
    in_progress: &mut HashSet<String>,
) -> Option<TreeNode> {
    let node = view.get(id)?;
    // Corrupted cycles are unreachable from roots, but stay defensive
    if !in_progress.insert(id.to_string()) {
        return None;
    }

    let path = resolver.full_path(id).unwrap_or_else(|| node.path_segment());
    let mut children = Vec::new();
    for child_id in view.children_of(id) {
        if let Some(child) = build_node(view, resolver, child_id, depth + 1, in_progress) {
            children.push(child);
        }
    }

    in_progress.remove(id);
    Some(TreeNode {
        node: node.clone(),
        path,
        depth,
        children,
    })
}

/// Pre-order iterator over a projected forest
///
/// Lazy and restartable: each call to [`flatten`] yields a fresh pass
/// over the same forest.
pub struct FlattenIter<'a> {
    stack: Vec<std::slice::Iter<'a, TreeNode>>,
}

impl<'a> Iterator for FlattenIter<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let iter = self.stack.last_mut()?;
            match iter.next() {
                Some(tree_node) => {
                    self.stack.push(tree_node.children.iter());
                    return Some(tree_node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Flatten a forest into pre-order `(node, depth)` traversal
pub fn flatten(forest: &[TreeNode]) -> FlattenIter<'_> {
    FlattenIter {
        stack: vec![forest.iter()],
    }
}

/// Collect a node and every descendant, iteratively
///
/// Explicit stack instead of recursion, so arbitrarily deep trees cannot
/// blow the call stack. Returns an empty set for an unknown root.
pub fn subtree_ids(snapshot: &TreeSnapshot, root_id: &str) -> HashSet<String> {
    let mut collected = HashSet::new();
    if !snapshot.contains(root_id) {
        return collected;
    }

    let mut stack = vec![root_id.to_string()];
    while let Some(id) = stack.pop() {
        if !collected.insert(id.clone()) {
            continue;
        }
        for child_id in snapshot.children_of(&id) {
            stack.push(child_id.clone());
        }
    }

    collected
}

/// Ids of nodes within `max_depth` levels of the snapshot roots
///
/// Breadth-first labeling from the roots; nodes labeled `max_depth` or
/// deeper are discarded. `max_depth == 0` yields the empty set.
pub fn depth_limited_ids(snapshot: &TreeSnapshot, max_depth: usize) -> HashSet<String> {
    let mut kept = HashSet::new();
    if max_depth == 0 {
        return kept;
    }

    let mut queue: VecDeque<(String, usize)> = snapshot
        .root_ids()
        .iter()
        .map(|id| (id.clone(), 0))
        .collect();

    while let Some((id, depth)) = queue.pop_front() {
        if depth >= max_depth || !kept.insert(id.clone()) {
            continue;
        }
        for child_id in snapshot.children_of(&id) {
            queue.push_back((child_id.clone(), depth + 1));
        }
    }

    kept
}
