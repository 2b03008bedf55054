//! Content Node Data Structures
//!
//! This module defines the core `ContentNode` struct and related types for the
//! Folio content tree: a forest of folders, sections, projects, and blogs that
//! backs both the admin tree view and the public sitemap.
//!
//! # Architecture
//!
//! - **Single model**: one struct represents every tree entry; `node_type`
//!   selects the behavior
//! - **Forest shape**: every node has at most one parent, and only folders
//!   may contain children
//! - **External references**: `project`/`blog` nodes point at a content row
//!   owned by another subsystem via `ref_id`; the tree never owns that row
//!
//! # Examples
//!
//! ```rust
//! use folio_core::models::{NewNode, NodeType};
//!
//! // A root-level folder
//! let folder = NewNode::new(NodeType::Folder, "Work".to_string());
//!
//! // A project node referencing an external content row
//! let project = NewNode::new(NodeType::Project, "Demo Reel".to_string())
//!     .with_parent("folder-id".to_string())
//!     .with_ref("p1".to_string());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Validation errors for caller-supplied node input
///
/// These cover malformed input only; structural violations (cycles, parent
/// type, childless-delete) are reported by the tree layer as constraint
/// errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Title missing or empty after trimming
    #[error("Title is required and must be non-empty")]
    TitleRequired,

    /// Project/blog node without an external content reference
    #[error("Node type '{node_type}' requires a content reference")]
    RefRequired { node_type: NodeType },

    /// Unknown node type string at the boundary
    #[error("Invalid node type: {0}")]
    InvalidNodeType(String),

    /// Negative sibling order index
    #[error("Invalid order index: {0}")]
    InvalidOrderIndex(i64),
}

/// The four node kinds of the content tree.
///
/// Only `Folder` may contain children. `Project` and `Blog` must carry a
/// reference to the external content row they expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Folder,
    Section,
    Project,
    Blog,
}

impl NodeType {
    /// Whether nodes of this type may contain children
    pub fn is_container(&self) -> bool {
        matches!(self, NodeType::Folder)
    }

    /// Whether nodes of this type must reference an external content row
    pub fn requires_ref(&self) -> bool {
        matches!(self, NodeType::Project | NodeType::Blog)
    }

    /// Stable lowercase name, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Folder => "folder",
            NodeType::Section => "section",
            NodeType::Project => "project",
            NodeType::Blog => "blog",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "folder" => Ok(NodeType::Folder),
            "section" => Ok(NodeType::Section),
            "project" => Ok(NodeType::Project),
            "blog" => Ok(NodeType::Blog),
            other => Err(ValidationError::InvalidNodeType(other.to_string())),
        }
    }
}

/// A single entry in the content tree.
///
/// # Fields
///
/// - `id`: opaque unique identifier, immutable once assigned by the store
/// - `parent_id`: optional reference to a folder node; `None` means root-level
/// - `node_type`: one of folder, section, project, blog
/// - `title`: human-readable label, non-empty after trim
/// - `slug`: URL-path segment; required for project/blog, optional otherwise
/// - `ref_id`: external content row reference; required for project/blog
/// - `order_index`: sibling display order, ties broken by `title`
/// - `icon`, `description`: optional display metadata
/// - `created_at`, `updated_at`: timestamps; `updated_at` refreshed on every
///   mutation by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentNode {
    /// Unique identifier (UUID, store-assigned)
    pub id: String,

    /// Parent folder ID, or None for root-level nodes
    pub parent_id: Option<String>,

    /// Node kind (folder, section, project, blog)
    pub node_type: NodeType,

    /// Human-readable label
    pub title: String,

    /// URL-path segment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// External content row reference (project/blog records)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,

    /// Sibling display order
    pub order_index: i64,

    /// Optional display icon name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Optional display description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl ContentNode {
    /// Whether this node sits at root level
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// The node's URL segment: its slug when present and non-empty,
    /// otherwise its slugified title.
    ///
    /// Folders and sections may omit a slug; their paths still need an
    /// addressable segment, so the title stands in.
    pub fn path_segment(&self) -> String {
        match self.slug.as_deref() {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => crate::utils::slugify(&self.title),
        }
    }

    /// Validate the stored shape of a node
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the title is empty after trimming, the
    /// order index is negative, or a project/blog node has no reference.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::TitleRequired);
        }

        if self.order_index < 0 {
            return Err(ValidationError::InvalidOrderIndex(self.order_index));
        }

        if self.node_type.requires_ref() && self.ref_id.as_deref().unwrap_or("").is_empty() {
            return Err(ValidationError::RefRequired {
                node_type: self.node_type,
            });
        }

        Ok(())
    }
}

/// Insert fields for a new node.
///
/// The store assigns `id`, `created_at`, and `updated_at`; everything else
/// comes validated from the tree layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNode {
    /// Parent folder ID, or None for root-level
    pub parent_id: Option<String>,

    /// Node kind
    pub node_type: NodeType,

    /// Human-readable label
    pub title: String,

    /// URL-path segment
    pub slug: Option<String>,

    /// External content row reference
    pub ref_id: Option<String>,

    /// Sibling display order
    pub order_index: i64,

    /// Optional display icon name
    pub icon: Option<String>,

    /// Optional display description
    pub description: Option<String>,
}

impl NewNode {
    /// Create insert fields for a root-level node with order index 0
    pub fn new(node_type: NodeType, title: String) -> Self {
        Self {
            parent_id: None,
            node_type,
            title,
            slug: None,
            ref_id: None,
            order_index: 0,
            icon: None,
            description: None,
        }
    }

    /// Set the parent folder
    pub fn with_parent(mut self, parent_id: String) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Set the URL segment
    pub fn with_slug(mut self, slug: String) -> Self {
        self.slug = Some(slug);
        self
    }

    /// Set the external content reference
    pub fn with_ref(mut self, ref_id: String) -> Self {
        self.ref_id = Some(ref_id);
        self
    }

    /// Set the sibling order index
    pub fn with_order_index(mut self, order_index: i64) -> Self {
        self.order_index = order_index;
        self
    }
}

/// Custom deserializer for nullable patch fields that accepts plain values
///
/// Maps three input formats to the double-Option pattern:
/// - Missing field → None (don't update)
/// - null → Some(None) (set to NULL)
/// - "value" → Some(Some("value")) (set to value)
fn deserialize_optional_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::<T>::deserialize(deserializer)?))
}

/// Partial node update for PATCH-style mutations.
///
/// All fields are optional; only provided fields are written. Nullable
/// columns (`parent_id`, `slug`, `ref_id`, `icon`, `description`) use a
/// double-`Option` so "leave unchanged" (`None`), "set to NULL"
/// (`Some(None)`), and "set to value" (`Some(Some(v))`) stay distinct.
///
/// # Examples
///
/// ```rust
/// # use folio_core::models::NodeUpdate;
/// // Rename only
/// let update = NodeUpdate {
///     title: Some("New title".to_string()),
///     ..Default::default()
/// };
///
/// // Move to root (clear the parent)
/// let update = NodeUpdate {
///     parent_id: Some(None),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeUpdate {
    /// Update node kind
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,

    /// Update title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Update parent reference (double-Option: `Some(None)` clears it)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub parent_id: Option<Option<String>>,

    /// Update URL segment (double-Option)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub slug: Option<Option<String>>,

    /// Update external content reference (double-Option)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub ref_id: Option<Option<String>>,

    /// Update sibling order index
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,

    /// Update display icon (double-Option)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub icon: Option<Option<String>>,

    /// Update display description (double-Option)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub description: Option<Option<String>>,
}

impl NodeUpdate {
    /// Create a new empty update
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a title update
    pub fn with_title(mut self, title: String) -> Self {
        self.title = Some(title);
        self
    }

    /// Set a parent update (`None` moves the node to root)
    pub fn with_parent(mut self, parent_id: Option<String>) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Set an order index update
    pub fn with_order_index(mut self, order_index: i64) -> Self {
        self.order_index = Some(order_index);
        self
    }

    /// Check whether the update carries any changes
    pub fn is_empty(&self) -> bool {
        self.node_type.is_none()
            && self.title.is_none()
            && self.parent_id.is_none()
            && self.slug.is_none()
            && self.ref_id.is_none()
            && self.order_index.is_none()
            && self.icon.is_none()
            && self.description.is_none()
    }
}

/// Query filter for listing nodes.
///
/// All fields combine with AND logic; `None` fields are ignored. An empty
/// filter returns the full node set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeFilter {
    /// Restrict to a sibling group (double-Option: `Some(None)` selects
    /// root-level nodes, `None` applies no parent restriction)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub parent_id: Option<Option<String>>,

    /// Restrict to one node kind
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,

    /// Drop project/blog nodes whose referenced content row is unpublished
    #[serde(default)]
    pub published_only: bool,
}

impl NodeFilter {
    /// Create a new empty filter (matches every node)
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to children of `parent_id` (`None` = root-level nodes)
    pub fn with_parent(mut self, parent_id: Option<String>) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Restrict to one node kind
    pub fn with_node_type(mut self, node_type: NodeType) -> Self {
        self.node_type = Some(node_type);
        self
    }

    /// Drop nodes referencing unpublished content
    pub fn published_only(mut self) -> Self {
        self.published_only = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_node(node_type: NodeType) -> ContentNode {
        let now = Utc::now();
        ContentNode {
            id: "n1".to_string(),
            parent_id: None,
            node_type,
            title: "Sample".to_string(),
            slug: None,
            ref_id: None,
            order_index: 0,
            icon: None,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn node_type_round_trips_through_str() {
        for (s, t) in [
            ("folder", NodeType::Folder),
            ("section", NodeType::Section),
            ("project", NodeType::Project),
            ("blog", NodeType::Blog),
        ] {
            assert_eq!(NodeType::from_str(s).unwrap(), t);
            assert_eq!(t.as_str(), s);
        }
        assert!(NodeType::from_str("widget").is_err());
    }

    #[test]
    fn only_folders_are_containers() {
        assert!(NodeType::Folder.is_container());
        assert!(!NodeType::Section.is_container());
        assert!(!NodeType::Project.is_container());
        assert!(!NodeType::Blog.is_container());
    }

    #[test]
    fn refs_required_for_project_and_blog() {
        assert!(NodeType::Project.requires_ref());
        assert!(NodeType::Blog.requires_ref());
        assert!(!NodeType::Folder.requires_ref());
        assert!(!NodeType::Section.requires_ref());
    }

    #[test]
    fn validate_rejects_empty_title() {
        let mut node = sample_node(NodeType::Folder);
        node.title = "   ".to_string();
        assert!(matches!(
            node.validate(),
            Err(ValidationError::TitleRequired)
        ));
    }

    #[test]
    fn validate_rejects_missing_ref_on_project() {
        let node = sample_node(NodeType::Project);
        assert!(matches!(
            node.validate(),
            Err(ValidationError::RefRequired { .. })
        ));

        let mut with_ref = sample_node(NodeType::Project);
        with_ref.ref_id = Some("p1".to_string());
        assert!(with_ref.validate().is_ok());
    }

    #[test]
    fn validate_rejects_negative_order_index() {
        let mut node = sample_node(NodeType::Folder);
        node.order_index = -3;
        assert!(matches!(
            node.validate(),
            Err(ValidationError::InvalidOrderIndex(-3))
        ));
    }

    #[test]
    fn path_segment_prefers_slug_over_title() {
        let mut node = sample_node(NodeType::Section);
        node.title = "About Me".to_string();
        assert_eq!(node.path_segment(), "about-me");

        node.slug = Some("about".to_string());
        assert_eq!(node.path_segment(), "about");

        node.slug = Some(String::new());
        assert_eq!(node.path_segment(), "about-me");
    }

    #[test]
    fn node_update_double_option_distinguishes_null_from_missing() {
        let missing: NodeUpdate = serde_json::from_str("{}").unwrap();
        assert!(missing.parent_id.is_none());
        assert!(missing.is_empty());

        let null: NodeUpdate = serde_json::from_str(r#"{"parentId": null}"#).unwrap();
        assert_eq!(null.parent_id, Some(None));

        let set: NodeUpdate = serde_json::from_str(r#"{"parentId": "abc"}"#).unwrap();
        assert_eq!(set.parent_id, Some(Some("abc".to_string())));
    }

    #[test]
    fn content_node_serializes_camel_case() {
        let node = sample_node(NodeType::Blog);
        let json = serde_json::to_value(&node).unwrap();
        assert!(json.get("nodeType").is_some());
        assert!(json.get("orderIndex").is_some());
        assert_eq!(json["nodeType"], "blog");
    }
}
