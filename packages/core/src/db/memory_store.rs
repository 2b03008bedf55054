//! In-Memory Node Store
//!
//! Reference `NodeStore` adapter backed by a `HashMap`. Production deploys
//! put a hosted-database adapter behind the trait instead; this one exists
//! for tests, examples, and single-process tooling where durability does
//! not matter.
//!
//! Publication state lives with the external content subsystem, not on the
//! node rows. The adapter mirrors that: callers flag unpublished reference
//! ids, and `published_only` queries drop nodes pointing at them.

use crate::db::{NodeStore, StoreError};
use crate::models::{ContentNode, NewNode, NodeFilter, NodeUpdate};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

/// HashMap-backed `NodeStore` implementation
///
/// Interior mutability via `tokio::sync::RwLock` keeps the adapter
/// `Send + Sync` behind an `Arc` without blocking the executor.
#[derive(Default)]
pub struct MemoryStore {
    nodes: RwLock<HashMap<String, ContentNode>>,
    unpublished_refs: RwLock<HashSet<String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag or unflag a referenced content row as unpublished
    ///
    /// Nodes whose `ref_id` is flagged disappear from `published_only`
    /// queries. Mirrors the publication toggle the external content
    /// subsystem owns.
    pub async fn set_ref_published(&self, ref_id: &str, published: bool) {
        let mut unpublished = self.unpublished_refs.write().await;
        if published {
            unpublished.remove(ref_id);
        } else {
            unpublished.insert(ref_id.to_string());
        }
    }

    /// Number of stored nodes
    pub async fn len(&self) -> usize {
        self.nodes.read().await.len()
    }

    /// Whether the store holds no nodes
    pub async fn is_empty(&self) -> bool {
        self.nodes.read().await.is_empty()
    }

    fn matches(
        node: &ContentNode,
        filter: &NodeFilter,
        unpublished: &HashSet<String>,
    ) -> bool {
        if let Some(ref parent) = filter.parent_id {
            if node.parent_id != *parent {
                return false;
            }
        }

        if let Some(node_type) = filter.node_type {
            if node.node_type != node_type {
                return false;
            }
        }

        if filter.published_only {
            if let Some(ref_id) = node.ref_id.as_deref() {
                if unpublished.contains(ref_id) {
                    return false;
                }
            }
        }

        true
    }

    fn apply_update(node: &mut ContentNode, update: NodeUpdate) {
        if let Some(node_type) = update.node_type {
            node.node_type = node_type;
        }
        if let Some(title) = update.title {
            node.title = title;
        }
        if let Some(parent_id) = update.parent_id {
            node.parent_id = parent_id;
        }
        if let Some(slug) = update.slug {
            node.slug = slug;
        }
        if let Some(ref_id) = update.ref_id {
            node.ref_id = ref_id;
        }
        if let Some(order_index) = update.order_index {
            node.order_index = order_index;
        }
        if let Some(icon) = update.icon {
            node.icon = icon;
        }
        if let Some(description) = update.description {
            node.description = description;
        }
        node.updated_at = Utc::now();
    }
}

#[async_trait]
impl NodeStore for MemoryStore {
    async fn list_nodes(&self, filter: NodeFilter) -> Result<Vec<ContentNode>, StoreError> {
        let nodes = self.nodes.read().await;
        let unpublished = self.unpublished_refs.read().await;

        let mut result: Vec<ContentNode> = nodes
            .values()
            .filter(|node| Self::matches(node, &filter, &unpublished))
            .cloned()
            .collect();

        // HashMap iteration order is arbitrary; keep output reproducible
        result.sort_by(|a, b| {
            a.order_index
                .cmp(&b.order_index)
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(result)
    }

    async fn get_node(&self, id: &str) -> Result<Option<ContentNode>, StoreError> {
        Ok(self.nodes.read().await.get(id).cloned())
    }

    async fn insert_node(&self, fields: NewNode) -> Result<ContentNode, StoreError> {
        let now = Utc::now();
        let node = ContentNode {
            id: Uuid::new_v4().to_string(),
            parent_id: fields.parent_id,
            node_type: fields.node_type,
            title: fields.title,
            slug: fields.slug,
            ref_id: fields.ref_id,
            order_index: fields.order_index,
            icon: fields.icon,
            description: fields.description,
            created_at: now,
            updated_at: now,
        };

        self.nodes
            .write()
            .await
            .insert(node.id.clone(), node.clone());
        Ok(node)
    }

    async fn update_node(
        &self,
        id: &str,
        update: NodeUpdate,
    ) -> Result<Option<ContentNode>, StoreError> {
        let mut nodes = self.nodes.write().await;
        match nodes.get_mut(id) {
            Some(node) => {
                Self::apply_update(node, update);
                Ok(Some(node.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_node(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.nodes.write().await.remove(id).is_some())
    }

    async fn count_children(&self, id: &str) -> Result<usize, StoreError> {
        let nodes = self.nodes.read().await;
        Ok(nodes
            .values()
            .filter(|node| node.parent_id.as_deref() == Some(id))
            .count())
    }
}
