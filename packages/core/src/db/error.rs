//! Store Error Types
//!
//! This module defines error types for node-store operations, providing
//! clear error handling for connection, query, and serialization failures
//! in whatever backend sits behind the `NodeStore` trait.

use thiserror::Error;

/// Node store operation errors
///
/// Covers failures of the external store itself. Business-rule violations
/// are reported by the service layer; a `StoreError` always means the
/// backend misbehaved, never that the caller's input was wrong.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to reach the backing store
    #[error("Failed to connect to node store: {context}")]
    ConnectionFailed { context: String },

    /// A query or write against the store failed
    #[error("Store query failed: {context}")]
    QueryFailed { context: String },

    /// Row payload could not be decoded into a node
    #[error("Failed to decode store row: {0}")]
    Decode(#[from] serde_json::Error),

    /// Any other backend failure
    #[error("Store backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    /// Create a connection failed error
    pub fn connection_failed(context: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            context: context.into(),
        }
    }

    /// Create a query failed error
    pub fn query_failed(context: impl Into<String>) -> Self {
        Self::QueryFailed {
            context: context.into(),
        }
    }
}
