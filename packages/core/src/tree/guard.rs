//! Invariant Guard
//!
//! Gatekeeper for every tree mutation. The guard checks the structural
//! rules — folder-only containment, no self-parenting, acyclic
//! reparenting, type-bound references, childless deletion — against a
//! per-request snapshot, and refuses anything that would leave the forest
//! invalid after commit. Refusal, never repair: the guard performs no
//! writes and never coerces bad input into something acceptable.

use crate::models::{NodeType, ValidationError};
use crate::tree::snapshot::{AncestorWalk, TreeSnapshot};
use crate::utils::slugify;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structural rule violations
///
/// Each variant corresponds to one invariant a mutation would break.
/// Surfaced to callers as-is; nothing here is silently corrected.
#[derive(Error, Debug)]
pub enum ConstraintError {
    /// Target parent does not exist in the loaded set
    #[error("Parent node not found: {parent_id}")]
    ParentNotFound { parent_id: String },

    /// Target parent exists but is not a folder
    #[error("Parent node '{parent_id}' is a {node_type}; only folders can contain children")]
    ParentMustBeFolder {
        parent_id: String,
        node_type: NodeType,
    },

    /// A node cannot be reparented under itself
    #[error("Node '{node_id}' cannot be its own parent")]
    ParentCannotBeSelf { node_id: String },

    /// Reparenting under a descendant would create a cycle
    #[error("Cannot move node '{node_id}' under '{parent_id}': target is its descendant")]
    ParentCannotBeDescendant {
        node_id: String,
        parent_id: String,
    },

    /// Only childless nodes can be deleted or retyped away from folder
    #[error("Node '{node_id}' still has {child_count} children")]
    HasChildren {
        node_id: String,
        child_count: usize,
    },
}

/// Guard failure: malformed input or a structural violation
#[derive(Error, Debug)]
pub enum GuardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Constraint(#[from] ConstraintError),
}

/// Caller input for node creation, pre-validation
///
/// The boundary layer normalizes aliased key names before building this;
/// the guard sees one canonical shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNodeParams {
    /// Node kind; defaults to folder when unset
    pub node_type: Option<NodeType>,
    /// Human-readable label, required
    pub title: String,
    /// Parent folder id, or None for root-level
    pub parent_id: Option<String>,
    /// URL segment; derived from the title for project/blog when absent
    pub slug: Option<String>,
    /// External content row reference; required for project/blog
    pub ref_id: Option<String>,
    /// Explicit sibling order; append-at-end when unset
    pub order_index: Option<i64>,
    /// Optional display icon name
    pub icon: Option<String>,
    /// Optional display description
    pub description: Option<String>,
}

/// A create request that passed every check
///
/// `order_index` stays `None` when the caller left placement to the
/// append-at-end policy; the ordering engine fills it in.
#[derive(Debug, Clone)]
pub struct ValidatedCreate {
    pub node_type: NodeType,
    pub title: String,
    pub parent_id: Option<String>,
    pub slug: Option<String>,
    pub ref_id: Option<String>,
    pub order_index: Option<i64>,
    pub icon: Option<String>,
    pub description: Option<String>,
}

/// Mutation gatekeeper over one snapshot
pub struct InvariantGuard<'a> {
    snapshot: &'a TreeSnapshot,
    max_hops: usize,
}

impl<'a> InvariantGuard<'a> {
    /// Create a guard over a snapshot
    ///
    /// `max_hops` caps ancestor walks on top of the node-count bound;
    /// exhausting it fails closed.
    pub fn new(snapshot: &'a TreeSnapshot, max_hops: usize) -> Self {
        Self { snapshot, max_hops }
    }

    /// Validate a create request
    ///
    /// Trims the title, defaults the type to folder, enforces the
    /// type-bound reference, resolves the parent to an existing folder,
    /// and derives a slug where one is required but absent.
    pub fn validate_create(&self, params: CreateNodeParams) -> Result<ValidatedCreate, GuardError> {
        let title = params.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::TitleRequired.into());
        }

        let node_type = params.node_type.unwrap_or(NodeType::Folder);

        let ref_id = params
            .ref_id
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        if node_type.requires_ref() && ref_id.is_none() {
            return Err(ValidationError::RefRequired { node_type }.into());
        }

        if let Some(order_index) = params.order_index {
            if order_index < 0 {
                return Err(ValidationError::InvalidOrderIndex(order_index).into());
            }
        }

        if let Some(parent_id) = params.parent_id.as_deref() {
            self.require_folder(parent_id)?;
        }

        let slug = params
            .slug
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .or_else(|| {
                if node_type.requires_ref() {
                    Some(slugify(&title))
                } else {
                    None
                }
            });

        Ok(ValidatedCreate {
            node_type,
            title,
            parent_id: params.parent_id,
            slug,
            ref_id,
            order_index: params.order_index,
            icon: params.icon,
            description: params.description,
        })
    }

    /// Validate moving a node under a new parent (or to root)
    ///
    /// Rejects self-parenting, non-folder targets, and any target inside
    /// the node's own subtree. The descendant check walks the snapshot's
    /// parent links; an exhausted walk means the chain is corrupted and
    /// the move is refused outright.
    pub fn validate_reparent(
        &self,
        node_id: &str,
        next_parent_id: Option<&str>,
    ) -> Result<(), GuardError> {
        let parent_id = match next_parent_id {
            Some(parent_id) => parent_id,
            // Moving to root cannot break containment or create a cycle
            None => return Ok(()),
        };

        if parent_id == node_id {
            return Err(ConstraintError::ParentCannotBeSelf {
                node_id: node_id.to_string(),
            }
            .into());
        }

        self.require_folder(parent_id)?;

        match self.snapshot.walk_ancestors(parent_id, node_id, self.max_hops) {
            AncestorWalk::Terminated => Ok(()),
            AncestorWalk::Reached => Err(ConstraintError::ParentCannotBeDescendant {
                node_id: node_id.to_string(),
                parent_id: parent_id.to_string(),
            }
            .into()),
            AncestorWalk::Exhausted => {
                tracing::warn!(
                    node_id,
                    parent_id,
                    "ancestor walk exhausted its hop budget; refusing move"
                );
                Err(ConstraintError::ParentCannotBeDescendant {
                    node_id: node_id.to_string(),
                    parent_id: parent_id.to_string(),
                }
                .into())
            }
        }
    }

    /// Validate changing a node's type
    ///
    /// `effective_ref_id` is the reference the node would carry after the
    /// change (incoming value, falling back to the stored one). Retyping
    /// a populated folder to a non-container is refused: its children
    /// would violate folder-only containment.
    pub fn validate_retype(
        &self,
        node_id: &str,
        next_type: NodeType,
        effective_ref_id: Option<&str>,
    ) -> Result<(), GuardError> {
        if next_type.requires_ref() && effective_ref_id.unwrap_or("").trim().is_empty() {
            return Err(ValidationError::RefRequired {
                node_type: next_type,
            }
            .into());
        }

        if !next_type.is_container() {
            let child_count = self.snapshot.children_of(node_id).len();
            if child_count > 0 {
                return Err(ConstraintError::HasChildren {
                    node_id: node_id.to_string(),
                    child_count,
                }
                .into());
            }
        }

        Ok(())
    }

    /// Validate deleting a node: only leaves go
    pub fn validate_delete(&self, node_id: &str) -> Result<(), GuardError> {
        let child_count = self.snapshot.children_of(node_id).len();
        if child_count > 0 {
            return Err(ConstraintError::HasChildren {
                node_id: node_id.to_string(),
                child_count,
            }
            .into());
        }
        Ok(())
    }

    fn require_folder(&self, parent_id: &str) -> Result<(), ConstraintError> {
        match self.snapshot.get(parent_id) {
            None => Err(ConstraintError::ParentNotFound {
                parent_id: parent_id.to_string(),
            }),
            Some(parent) if !parent.node_type.is_container() => {
                Err(ConstraintError::ParentMustBeFolder {
                    parent_id: parent_id.to_string(),
                    node_type: parent.node_type,
                })
            }
            Some(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentNode;
    use chrono::Utc;

    const MAX_HOPS: usize = 300;

    fn node(id: &str, parent: Option<&str>, node_type: NodeType) -> ContentNode {
        let now = Utc::now();
        ContentNode {
            id: id.to_string(),
            parent_id: parent.map(str::to_string),
            node_type,
            title: format!("Node {id}"),
            slug: None,
            ref_id: None,
            order_index: 0,
            icon: None,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn snapshot(nodes: Vec<ContentNode>) -> TreeSnapshot {
        TreeSnapshot::from_nodes(nodes)
    }

    #[test]
    fn create_defaults_type_to_folder() {
        let snap = snapshot(vec![]);
        let guard = InvariantGuard::new(&snap, MAX_HOPS);

        let validated = guard
            .validate_create(CreateNodeParams {
                title: "  Projects  ".to_string(),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(validated.node_type, NodeType::Folder);
        assert_eq!(validated.title, "Projects");
        assert!(validated.slug.is_none());
    }

    #[test]
    fn create_requires_title() {
        let snap = snapshot(vec![]);
        let guard = InvariantGuard::new(&snap, MAX_HOPS);

        let err = guard
            .validate_create(CreateNodeParams {
                title: "   ".to_string(),
                ..Default::default()
            })
            .unwrap_err();

        assert!(matches!(
            err,
            GuardError::Validation(ValidationError::TitleRequired)
        ));
    }

    #[test]
    fn create_requires_ref_for_project_and_blog() {
        let snap = snapshot(vec![]);
        let guard = InvariantGuard::new(&snap, MAX_HOPS);

        for node_type in [NodeType::Project, NodeType::Blog] {
            let err = guard
                .validate_create(CreateNodeParams {
                    node_type: Some(node_type),
                    title: "Demo".to_string(),
                    ..Default::default()
                })
                .unwrap_err();
            assert!(matches!(
                err,
                GuardError::Validation(ValidationError::RefRequired { .. })
            ));

            // Whitespace-only refs count as missing
            let err = guard
                .validate_create(CreateNodeParams {
                    node_type: Some(node_type),
                    title: "Demo".to_string(),
                    ref_id: Some("  ".to_string()),
                    ..Default::default()
                })
                .unwrap_err();
            assert!(matches!(
                err,
                GuardError::Validation(ValidationError::RefRequired { .. })
            ));
        }
    }

    #[test]
    fn create_derives_slug_for_ref_types() {
        let snap = snapshot(vec![]);
        let guard = InvariantGuard::new(&snap, MAX_HOPS);

        let validated = guard
            .validate_create(CreateNodeParams {
                node_type: Some(NodeType::Blog),
                title: "Hello World Post".to_string(),
                ref_id: Some("b1".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(validated.slug.as_deref(), Some("hello-world-post"));

        let explicit = guard
            .validate_create(CreateNodeParams {
                node_type: Some(NodeType::Blog),
                title: "Hello World Post".to_string(),
                slug: Some("hello".to_string()),
                ref_id: Some("b1".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(explicit.slug.as_deref(), Some("hello"));
    }

    #[test]
    fn create_rejects_missing_or_non_folder_parent() {
        let snap = snapshot(vec![node("s", None, NodeType::Section)]);
        let guard = InvariantGuard::new(&snap, MAX_HOPS);

        let err = guard
            .validate_create(CreateNodeParams {
                title: "Child".to_string(),
                parent_id: Some("ghost".to_string()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            GuardError::Constraint(ConstraintError::ParentNotFound { .. })
        ));

        let err = guard
            .validate_create(CreateNodeParams {
                title: "Child".to_string(),
                parent_id: Some("s".to_string()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            GuardError::Constraint(ConstraintError::ParentMustBeFolder { .. })
        ));
    }

    #[test]
    fn create_rejects_negative_order_index() {
        let snap = snapshot(vec![]);
        let guard = InvariantGuard::new(&snap, MAX_HOPS);

        let err = guard
            .validate_create(CreateNodeParams {
                title: "X".to_string(),
                order_index: Some(-1),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            GuardError::Validation(ValidationError::InvalidOrderIndex(-1))
        ));
    }

    #[test]
    fn reparent_to_root_is_always_structural_ok() {
        let snap = snapshot(vec![node("a", None, NodeType::Folder)]);
        let guard = InvariantGuard::new(&snap, MAX_HOPS);
        assert!(guard.validate_reparent("a", None).is_ok());
    }

    #[test]
    fn reparent_rejects_self() {
        let snap = snapshot(vec![node("a", None, NodeType::Folder)]);
        let guard = InvariantGuard::new(&snap, MAX_HOPS);

        let err = guard.validate_reparent("a", Some("a")).unwrap_err();
        assert!(matches!(
            err,
            GuardError::Constraint(ConstraintError::ParentCannotBeSelf { .. })
        ));
    }

    #[test]
    fn reparent_rejects_descendant_target() {
        let snap = snapshot(vec![
            node("f1", None, NodeType::Folder),
            node("f2", Some("f1"), NodeType::Folder),
            node("f3", Some("f2"), NodeType::Folder),
        ]);
        let guard = InvariantGuard::new(&snap, MAX_HOPS);

        for target in ["f2", "f3"] {
            let err = guard.validate_reparent("f1", Some(target)).unwrap_err();
            assert!(matches!(
                err,
                GuardError::Constraint(ConstraintError::ParentCannotBeDescendant { .. })
            ));
        }

        // The other direction stays legal
        assert!(guard.validate_reparent("f3", Some("f1")).is_ok());
    }

    #[test]
    fn reparent_fails_closed_on_corrupted_chain() {
        // a <-> b cycle in stored data; any move near it is refused
        let snap = snapshot(vec![
            node("a", Some("b"), NodeType::Folder),
            node("b", Some("a"), NodeType::Folder),
            node("c", None, NodeType::Folder),
        ]);
        let guard = InvariantGuard::new(&snap, MAX_HOPS);

        let err = guard.validate_reparent("c", Some("a")).unwrap_err();
        assert!(matches!(
            err,
            GuardError::Constraint(ConstraintError::ParentCannotBeDescendant { .. })
        ));
    }

    #[test]
    fn retype_requires_effective_ref() {
        let snap = snapshot(vec![node("s", None, NodeType::Section)]);
        let guard = InvariantGuard::new(&snap, MAX_HOPS);

        let err = guard
            .validate_retype("s", NodeType::Project, None)
            .unwrap_err();
        assert!(matches!(
            err,
            GuardError::Validation(ValidationError::RefRequired { .. })
        ));

        assert!(guard
            .validate_retype("s", NodeType::Project, Some("p1"))
            .is_ok());
    }

    #[test]
    fn retype_of_populated_folder_is_refused() {
        let snap = snapshot(vec![
            node("f", None, NodeType::Folder),
            node("child", Some("f"), NodeType::Section),
        ]);
        let guard = InvariantGuard::new(&snap, MAX_HOPS);

        let err = guard
            .validate_retype("f", NodeType::Section, None)
            .unwrap_err();
        assert!(matches!(
            err,
            GuardError::Constraint(ConstraintError::HasChildren { child_count: 1, .. })
        ));

        // Folder-to-folder is fine regardless of children
        assert!(guard.validate_retype("f", NodeType::Folder, None).is_ok());
    }

    #[test]
    fn delete_requires_childless_node() {
        let snap = snapshot(vec![
            node("f", None, NodeType::Folder),
            node("child", Some("f"), NodeType::Section),
        ]);
        let guard = InvariantGuard::new(&snap, MAX_HOPS);

        let err = guard.validate_delete("f").unwrap_err();
        assert!(matches!(
            err,
            GuardError::Constraint(ConstraintError::HasChildren { .. })
        ));
        assert!(guard.validate_delete("child").is_ok());
    }
}
