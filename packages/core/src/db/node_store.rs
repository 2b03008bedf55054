//! NodeStore Trait - Store Abstraction Layer
//!
//! This module defines the `NodeStore` trait that abstracts persistence of
//! content-tree rows. The tree service never talks to a database directly;
//! it sees this trait, so hosted-Postgres REST adapters, SQL adapters, and
//! the bundled in-memory store are interchangeable.
//!
//! # Architecture
//!
//! - **Abstraction point**: between `TreeService` (business logic) and the
//!   row storage backend
//! - **Async-first**: every method suspends; network adapters dominate in
//!   production, so the trait is shaped for them
//! - **Thin contract**: CRUD plus two query helpers. Ordering, invariants,
//!   and path logic all live above this trait — an adapter only moves rows
//!
//! # Examples
//!
//! ```rust,no_run
//! use folio_core::db::{MemoryStore, NodeStore};
//! use folio_core::models::{NewNode, NodeFilter, NodeType};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store: Arc<dyn NodeStore> = Arc::new(MemoryStore::new());
//!
//!     let folder = store
//!         .insert_node(NewNode::new(NodeType::Folder, "Work".to_string()))
//!         .await?;
//!
//!     let roots = store
//!         .list_nodes(NodeFilter::new().with_parent(None))
//!         .await?;
//!     assert_eq!(roots[0].id, folder.id);
//!     Ok(())
//! }
//! ```

use crate::db::StoreError;
use crate::models::{ContentNode, NewNode, NodeFilter, NodeUpdate};
use async_trait::async_trait;

/// Abstraction layer for content-node persistence
///
/// Implementations must be `Send + Sync`; futures may migrate between
/// executor threads.
///
/// # Contract notes
///
/// - `get_node`/`update_node` return `Ok(None)` for a missing id; only
///   backend failures surface as `Err`
/// - `insert_node` assigns `id`, `created_at`, and `updated_at`
/// - `update_node` refreshes `updated_at` on every applied patch
/// - `delete_node` returns `false` for a missing id (idempotent signal,
///   the service decides whether that is an error)
#[async_trait]
pub trait NodeStore: Send + Sync {
    /// List nodes matching a filter, empty filter = full set
    ///
    /// Row order is unspecified; callers needing sibling order sort via
    /// the ordering engine.
    async fn list_nodes(&self, filter: NodeFilter) -> Result<Vec<ContentNode>, StoreError>;

    /// Get a node by ID
    async fn get_node(&self, id: &str) -> Result<Option<ContentNode>, StoreError>;

    /// Insert a new node, assigning id and timestamps
    async fn insert_node(&self, fields: NewNode) -> Result<ContentNode, StoreError>;

    /// Apply a sparse patch to a node
    ///
    /// Returns the full updated node, or `None` if the id does not exist.
    async fn update_node(
        &self,
        id: &str,
        update: NodeUpdate,
    ) -> Result<Option<ContentNode>, StoreError>;

    /// Delete a node row
    ///
    /// Returns `true` when a row was removed, `false` when the id was
    /// absent. No cascade: child handling is the service's concern.
    async fn delete_node(&self, id: &str) -> Result<bool, StoreError>;

    /// Count direct children of a node
    async fn count_children(&self, id: &str) -> Result<usize, StoreError>;
}
