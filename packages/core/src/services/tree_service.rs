//! Tree Service - Content Tree Operations
//!
//! This module provides the main business logic layer for the content
//! tree:
//!
//! - Mutations (create, rename, move, reorder, retype, delete) gated by
//!   the invariant guard
//! - Read projections (scoped tree listing, sitemap entries)
//! - The best-effort cascade hook the external content subsystem calls
//!   when it deletes a project/blog row
//!
//! # Request model
//!
//! Every operation re-reads the node set it needs from the store
//! immediately before deciding, builds one in-memory snapshot, and runs
//! all checks against it. There is no cross-request caching and no
//! optimistic concurrency token: two concurrent edits of the same sibling
//! group can race, which is an accepted limitation of the single-admin
//! console this serves. Within one request, reads strictly precede
//! writes.

use crate::db::NodeStore;
use crate::models::{ContentNode, NewNode, NodeFilter, NodeType, NodeUpdate, ValidationError};
use crate::services::error::TreeServiceError;
use crate::tree::{
    build_forest, depth_limited_ids, ordering, project_sitemap_entries, subtree_ids,
    CreateNodeParams, InvariantGuard, PathResolver, ReorderDirection, SitemapConfig,
    SitemapEntry, SitemapOverride, TreeNode, TreeSnapshot,
};
use crate::utils::slugify;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Hop ceiling for ancestor walks when none is configured.
///
/// Walks are already bounded by the loaded node count; this cap only
/// matters for pathologically large sets.
const DEFAULT_MAX_TRAVERSAL_HOPS: usize = 300;

/// Tunable service behavior, injected at construction
#[derive(Debug, Clone)]
pub struct TreeServiceConfig {
    /// Ceiling on ancestor-walk hops (fail-closed when exhausted)
    pub max_traversal_hops: usize,
    /// Depth-scaled defaults for sitemap projection
    pub sitemap: SitemapConfig,
}

impl Default for TreeServiceConfig {
    fn default() -> Self {
        Self {
            max_traversal_hops: DEFAULT_MAX_TRAVERSAL_HOPS,
            sitemap: SitemapConfig::default(),
        }
    }
}

/// Who is asking for a tree listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeScope {
    /// Admin console: every node, published or not
    Admin,
    /// Public site: published content only, unless explicitly widened
    Public,
}

/// Options for [`TreeService::list_tree`]
#[derive(Debug, Clone)]
pub struct ListTreeOptions {
    pub scope: TreeScope,
    /// Include nodes referencing unpublished content even in public scope
    pub include_unpublished: bool,
    /// Keep only this many levels from the (scoped) roots
    pub max_depth: Option<usize>,
    /// Restrict the listing to one subtree
    pub root_id: Option<String>,
}

impl ListTreeOptions {
    /// Full admin view: everything, unlimited depth
    pub fn admin() -> Self {
        Self {
            scope: TreeScope::Admin,
            include_unpublished: true,
            max_depth: None,
            root_id: None,
        }
    }

    /// Public view: published nodes only
    pub fn public() -> Self {
        Self {
            scope: TreeScope::Public,
            include_unpublished: false,
            max_depth: None,
            root_id: None,
        }
    }

    /// Limit the view to `max_depth` levels
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Scope the view to one subtree
    pub fn with_root(mut self, root_id: String) -> Self {
        self.root_id = Some(root_id);
        self
    }
}

/// Result of a reorder request
///
/// Asking to move past the edge of a sibling group is a no-op, not an
/// error; callers can tell the two apart without diffing the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ReorderOutcome {
    /// The node traded order indexes with its neighbor
    Swapped {
        node: ContentNode,
        neighbor: ContentNode,
    },
    /// No adjacent sibling in the requested direction
    Unchanged,
}

impl ReorderOutcome {
    /// Whether the request changed anything
    pub fn changed(&self) -> bool {
        matches!(self, ReorderOutcome::Swapped { .. })
    }
}

/// Business logic facade over a [`NodeStore`]
///
/// All structural rules live here and in the tree engines it drives; the
/// store below only moves rows, and the transport above only marshals
/// arguments.
///
/// # Examples
///
/// ```rust,no_run
/// use folio_core::db::MemoryStore;
/// use folio_core::services::TreeService;
/// use folio_core::tree::CreateNodeParams;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let service = TreeService::new(Arc::new(MemoryStore::new()));
///
///     let folder = service
///         .create_node(CreateNodeParams {
///             title: "Work".to_string(),
///             ..Default::default()
///         })
///         .await?;
///     println!("created {}", folder.id);
///     Ok(())
/// }
/// ```
pub struct TreeService {
    store: Arc<dyn NodeStore>,
    config: TreeServiceConfig,
}

impl TreeService {
    /// Create a service with default configuration
    pub fn new(store: Arc<dyn NodeStore>) -> Self {
        Self::with_config(store, TreeServiceConfig::default())
    }

    /// Create a service with explicit configuration
    pub fn with_config(store: Arc<dyn NodeStore>, config: TreeServiceConfig) -> Self {
        Self { store, config }
    }

    /// Create a node under a folder (or at root)
    ///
    /// The title is required; the type defaults to folder; project/blog
    /// nodes must reference external content and get a slug derived from
    /// the title when none is supplied. Without an explicit order index
    /// the node appends to the end of its sibling group.
    ///
    /// # Errors
    ///
    /// `TITLE_REQUIRED`, `REF_REQUIRED`, `ORDER_INDEX_INVALID`,
    /// `PARENT_NOT_FOUND`, `PARENT_MUST_BE_FOLDER`, or `DB_ERROR`.
    pub async fn create_node(
        &self,
        params: CreateNodeParams,
    ) -> Result<ContentNode, TreeServiceError> {
        let snapshot = self.load_full_snapshot().await?;
        let guard = InvariantGuard::new(&snapshot, self.config.max_traversal_hops);
        let validated = guard.validate_create(params)?;

        let order_index = match validated.order_index {
            Some(order_index) => order_index,
            None => {
                let siblings = snapshot.sibling_group(validated.parent_id.as_deref());
                ordering::next_order_index(&siblings)
            }
        };

        let created = self
            .store
            .insert_node(NewNode {
                parent_id: validated.parent_id,
                node_type: validated.node_type,
                title: validated.title,
                slug: validated.slug,
                ref_id: validated.ref_id,
                order_index,
                icon: validated.icon,
                description: validated.description,
            })
            .await?;

        tracing::debug!(
            node_id = %created.id,
            node_type = %created.node_type,
            order_index,
            "created content node"
        );
        Ok(created)
    }

    /// Rename a node
    pub async fn rename_node(
        &self,
        id: &str,
        title: &str,
    ) -> Result<ContentNode, TreeServiceError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::TitleRequired.into());
        }

        self.store
            .update_node(id, NodeUpdate::new().with_title(title.to_string()))
            .await?
            .ok_or_else(|| TreeServiceError::node_not_found(id))
    }

    /// Move a node under a new parent, or to root with `None`
    ///
    /// The target must be an existing folder outside the node's own
    /// subtree. The node appends to the end of its new sibling group.
    /// Moving to the parent it already has is a no-op.
    ///
    /// # Errors
    ///
    /// `NOT_FOUND`, `PARENT_NOT_FOUND`, `PARENT_MUST_BE_FOLDER`,
    /// `PARENT_CANNOT_BE_SELF`, `PARENT_CANNOT_BE_DESCENDANT`, or
    /// `DB_ERROR`.
    pub async fn move_node(
        &self,
        id: &str,
        next_parent_id: Option<&str>,
    ) -> Result<ContentNode, TreeServiceError> {
        let snapshot = self.load_full_snapshot().await?;
        let node = snapshot
            .get(id)
            .ok_or_else(|| TreeServiceError::node_not_found(id))?;

        if node.parent_id.as_deref() == next_parent_id {
            return Ok(node.clone());
        }

        let guard = InvariantGuard::new(&snapshot, self.config.max_traversal_hops);
        guard.validate_reparent(id, next_parent_id)?;

        let siblings = snapshot.sibling_group(next_parent_id);
        let order_index = ordering::next_order_index(&siblings);

        let updated = self
            .store
            .update_node(
                id,
                NodeUpdate::new()
                    .with_parent(next_parent_id.map(str::to_string))
                    .with_order_index(order_index),
            )
            .await?
            .ok_or_else(|| TreeServiceError::node_not_found(id))?;

        tracing::debug!(
            node_id = %id,
            next_parent = next_parent_id.unwrap_or("<root>"),
            order_index,
            "moved content node"
        );
        Ok(updated)
    }

    /// Swap a node with its adjacent sibling in the given direction
    ///
    /// Sibling order is `(order_index, title)` ascending. At the edge of
    /// the group the request returns [`ReorderOutcome::Unchanged`]. The
    /// swap issues both order writes; coupling them transactionally is
    /// the store adapter's contract.
    pub async fn reorder_node(
        &self,
        id: &str,
        direction: ReorderDirection,
    ) -> Result<ReorderOutcome, TreeServiceError> {
        let snapshot = self.load_full_snapshot().await?;
        let node = snapshot
            .get(id)
            .ok_or_else(|| TreeServiceError::node_not_found(id))?;

        let siblings = snapshot.sibling_group(node.parent_id.as_deref());
        let plan = match ordering::plan_swap(&siblings, id, direction) {
            Some(plan) => plan,
            None => return Ok(ReorderOutcome::Unchanged),
        };

        let node_order = plan.node.order_index;
        let neighbor_order = plan.neighbor.order_index;
        let neighbor_id = plan.neighbor.id.clone();

        let updated_node = self
            .store
            .update_node(id, NodeUpdate::new().with_order_index(neighbor_order))
            .await?
            .ok_or_else(|| TreeServiceError::node_not_found(id))?;
        let updated_neighbor = self
            .store
            .update_node(
                &neighbor_id,
                NodeUpdate::new().with_order_index(node_order),
            )
            .await?
            .ok_or_else(|| TreeServiceError::node_not_found(&neighbor_id))?;

        tracing::debug!(
            node_id = %id,
            neighbor_id = %neighbor_id,
            ?direction,
            "swapped sibling order"
        );
        Ok(ReorderOutcome::Swapped {
            node: updated_node,
            neighbor: updated_neighbor,
        })
    }

    /// Change a node's type, optionally relinking its content reference
    ///
    /// The reference requirement is checked against the value the node
    /// would carry afterwards: the incoming `ref_id` when given, the
    /// stored one otherwise. Becoming a project/blog without a slug
    /// derives one from the title. A populated folder cannot be retyped
    /// away from folder.
    pub async fn retype_node(
        &self,
        id: &str,
        next_type: NodeType,
        ref_id: Option<String>,
    ) -> Result<ContentNode, TreeServiceError> {
        let snapshot = self.load_full_snapshot().await?;
        let node = snapshot
            .get(id)
            .ok_or_else(|| TreeServiceError::node_not_found(id))?;

        let effective_ref = ref_id.as_deref().or(node.ref_id.as_deref());
        let guard = InvariantGuard::new(&snapshot, self.config.max_traversal_hops);
        guard.validate_retype(id, next_type, effective_ref)?;

        let mut update = NodeUpdate {
            node_type: Some(next_type),
            ..Default::default()
        };
        if let Some(ref_id) = ref_id {
            update.ref_id = Some(Some(ref_id));
        }
        if next_type.requires_ref() && node.slug.as_deref().unwrap_or("").is_empty() {
            update.slug = Some(Some(slugify(&node.title)));
        }

        self.store
            .update_node(id, update)
            .await?
            .ok_or_else(|| TreeServiceError::node_not_found(id))
    }

    /// Delete a childless node
    ///
    /// Deleting a project/blog node never touches the external content
    /// row it references. A second delete of the same id fails with
    /// `NOT_FOUND`.
    pub async fn delete_node(&self, id: &str) -> Result<(), TreeServiceError> {
        let snapshot = self.load_full_snapshot().await?;
        if !snapshot.contains(id) {
            return Err(TreeServiceError::node_not_found(id));
        }

        let guard = InvariantGuard::new(&snapshot, self.config.max_traversal_hops);
        guard.validate_delete(id)?;

        let removed = self.store.delete_node(id).await?;
        if !removed {
            return Err(TreeServiceError::node_not_found(id));
        }

        tracing::debug!(node_id = %id, "deleted content node");
        Ok(())
    }

    /// Fetch a single node
    pub async fn get_node(&self, id: &str) -> Result<Option<ContentNode>, TreeServiceError> {
        Ok(self.store.get_node(id).await?)
    }

    /// List the tree as a nested forest
    ///
    /// Public scope drops nodes referencing unpublished content (unless
    /// widened); `root_id` restricts to one subtree; `max_depth` keeps
    /// that many levels from the scoped roots. Nodes whose parent falls
    /// outside the view surface as roots rather than vanishing. Paths
    /// stay absolute with respect to the loaded scope.
    pub async fn list_tree(
        &self,
        options: ListTreeOptions,
    ) -> Result<Vec<TreeNode>, TreeServiceError> {
        let mut filter = NodeFilter::new();
        if options.scope == TreeScope::Public && !options.include_unpublished {
            filter = filter.published_only();
        }

        let nodes = self.store.list_nodes(filter).await?;
        let full = TreeSnapshot::from_nodes(nodes);

        let mut view_nodes: Vec<ContentNode> = match &options.root_id {
            Some(root_id) => {
                if !full.contains(root_id) {
                    return Err(TreeServiceError::node_not_found(root_id));
                }
                let scope = subtree_ids(&full, root_id);
                full.nodes()
                    .filter(|node| scope.contains(&node.id))
                    .cloned()
                    .collect()
            }
            None => full.nodes().cloned().collect(),
        };

        let mut view = TreeSnapshot::from_nodes(view_nodes);
        if let Some(max_depth) = options.max_depth {
            let kept = depth_limited_ids(&view, max_depth);
            view_nodes = view
                .nodes()
                .filter(|node| kept.contains(&node.id))
                .cloned()
                .collect();
            view = TreeSnapshot::from_nodes(view_nodes);
        }

        let mut resolver = PathResolver::new(&full);
        Ok(build_forest(&view, &mut resolver))
    }

    /// Project the published tree onto sitemap entries
    ///
    /// Sections are exposed by default, folders on per-node opt-in, and
    /// any node can be excluded; defaults scale with path depth per the
    /// configured [`SitemapConfig`].
    pub async fn sitemap_entries(
        &self,
        overrides: &HashMap<String, SitemapOverride>,
    ) -> Result<Vec<SitemapEntry>, TreeServiceError> {
        let nodes = self
            .store
            .list_nodes(NodeFilter::new().published_only())
            .await?;
        let snapshot = TreeSnapshot::from_nodes(nodes);
        let mut resolver = PathResolver::new(&snapshot);

        Ok(project_sitemap_entries(
            &snapshot,
            &mut resolver,
            overrides,
            &self.config.sitemap,
        ))
    }

    /// Best-effort cascade removal for a deleted external content row
    ///
    /// The content subsystem owns project/blog rows; when it deletes one
    /// it calls this so the tree does not keep dangling reference nodes.
    /// Populated nodes and individual store failures are logged and
    /// skipped — the cascade never fails the caller's delete.
    ///
    /// Returns the number of nodes removed.
    pub async fn remove_nodes_for_ref(&self, ref_id: &str) -> Result<usize, TreeServiceError> {
        let nodes = self.store.list_nodes(NodeFilter::new()).await?;
        let mut removed = 0;

        for node in nodes.iter().filter(|n| n.ref_id.as_deref() == Some(ref_id)) {
            match self.store.count_children(&node.id).await {
                Ok(0) => {}
                Ok(child_count) => {
                    tracing::warn!(
                        node_id = %node.id,
                        child_count,
                        "skipping cascade removal of populated node"
                    );
                    continue;
                }
                Err(error) => {
                    tracing::warn!(node_id = %node.id, %error, "cascade child check failed");
                    continue;
                }
            }

            match self.store.delete_node(&node.id).await {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(error) => {
                    tracing::warn!(node_id = %node.id, %error, "cascade removal failed");
                }
            }
        }

        if removed > 0 {
            tracing::debug!(ref_id, removed, "cascade-removed nodes for content row");
        }
        Ok(removed)
    }

    /// Load the full node set for a mutation check
    ///
    /// An orphan in an unfiltered load means a parent was deleted without
    /// cascading — tolerated (the node lists as a root) but worth a
    /// warning, unlike orphans in filtered views which are expected.
    async fn load_full_snapshot(&self) -> Result<TreeSnapshot, TreeServiceError> {
        let nodes = self.store.list_nodes(NodeFilter::new()).await?;
        let snapshot = TreeSnapshot::from_nodes(nodes);

        if !snapshot.orphan_ids().is_empty() {
            tracing::warn!(
                orphans = snapshot.orphan_ids().len(),
                "node set contains orphaned nodes; listing them as roots"
            );
        }

        Ok(snapshot)
    }
}
