//! Utility functions for Folio Core
//!
//! This module provides common utility functions used across the codebase.

mod slug;

pub use slug::slugify;
