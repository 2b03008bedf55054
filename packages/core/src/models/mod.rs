//! Data Models
//!
//! This module contains the core data structures used throughout the content
//! tree:
//!
//! - `ContentNode` - a single tree entry (folder, section, project, blog)
//! - `NewNode` / `NodeUpdate` / `NodeFilter` - insert, patch, and query shapes
//!
//! All payloads serialize camelCase; boundary layers normalize any aliased
//! key names before these types are constructed.

mod node;

pub use node::{ContentNode, NewNode, NodeFilter, NodeType, NodeUpdate, ValidationError};
