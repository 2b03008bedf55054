//! Business Services
//!
//! This module contains the core business logic services:
//!
//! - `TreeService` - content tree mutations, scoped listings, sitemap
//!   projection, and the external-content cascade hook
//!
//! Services coordinate between the store layer and the pure tree engines,
//! enforcing business rules and keeping the transport layer down to
//! argument marshaling.

pub mod error;
pub mod tree_service;

pub use error::TreeServiceError;
pub use tree_service::{
    ListTreeOptions, ReorderOutcome, TreeScope, TreeService, TreeServiceConfig,
};
