//! Service Layer Error Types
//!
//! This module defines the top-level error type for tree operations,
//! folding the validation, constraint, and store taxonomies into one enum
//! callers can branch on. Every variant maps to a stable machine-readable
//! code; transport layers translate codes to user-facing messages and
//! never leak raw store error text to untrusted callers.

use crate::db::StoreError;
use crate::models::ValidationError;
use crate::tree::{ConstraintError, GuardError};
use thiserror::Error;

/// Tree service operation errors
///
/// Four kinds: the referenced node is missing, the input is malformed,
/// the mutation would break a structural invariant, or the backing store
/// failed. Only the last one is ever worth retrying.
#[derive(Error, Debug)]
pub enum TreeServiceError {
    /// Node not found by ID
    #[error("Node not found: {id}")]
    NodeNotFound { id: String },

    /// Caller input is malformed
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A structural invariant would be violated
    #[error("Constraint violated: {0}")]
    Constraint(#[from] ConstraintError),

    /// The external store failed
    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),
}

impl From<GuardError> for TreeServiceError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::Validation(e) => Self::Validation(e),
            GuardError::Constraint(e) => Self::Constraint(e),
        }
    }
}

impl TreeServiceError {
    /// Create a node not found error
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }

    /// Stable machine-readable code for this error
    ///
    /// Transport layers key user-facing messages and HTTP statuses off
    /// these; the strings are part of the public contract and never
    /// change meaning.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NodeNotFound { .. } => "NOT_FOUND",
            Self::Validation(e) => match e {
                ValidationError::TitleRequired => "TITLE_REQUIRED",
                ValidationError::RefRequired { .. } => "REF_REQUIRED",
                ValidationError::InvalidNodeType(_) => "NODE_TYPE_INVALID",
                ValidationError::InvalidOrderIndex(_) => "ORDER_INDEX_INVALID",
            },
            Self::Constraint(e) => match e {
                ConstraintError::ParentNotFound { .. } => "PARENT_NOT_FOUND",
                ConstraintError::ParentMustBeFolder { .. } => "PARENT_MUST_BE_FOLDER",
                ConstraintError::ParentCannotBeSelf { .. } => "PARENT_CANNOT_BE_SELF",
                ConstraintError::ParentCannotBeDescendant { .. } => "PARENT_CANNOT_BE_DESCENDANT",
                ConstraintError::HasChildren { .. } => "HAS_CHILDREN",
            },
            Self::Store(_) => "DB_ERROR",
        }
    }
}
