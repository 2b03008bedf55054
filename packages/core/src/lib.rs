//! Folio Core Business Logic Layer
//!
//! This crate provides the content-tree engine for the Folio portfolio
//! platform: the hierarchical node model (folders, sections, projects,
//! blogs), its structural invariants, sibling ordering, slug-path
//! resolution, and the sitemap projection of the public URL tree.
//!
//! # Architecture
//!
//! - **One snapshot per request**: every operation reads the node set it
//!   needs once, then all checks and traversals run in memory
//! - **Guarded mutations**: the invariant guard refuses anything that
//!   would break the forest (cycles, non-folder parents, dangling
//!   references, populated-node deletes) — refusal, never repair
//! - **Store-agnostic**: persistence hides behind the `NodeStore` trait;
//!   the bundled adapter is in-memory, production adapters live outside
//!
//! # Modules
//!
//! - [`models`] - Data structures (ContentNode, patch/filter shapes)
//! - [`tree`] - Pure tree engines (snapshot, guard, ordering, paths,
//!   projection, sitemap)
//! - [`services`] - Business services (TreeService)
//! - [`db`] - Store trait and the in-memory reference adapter
//! - [`utils`] - Slug derivation

pub mod db;
pub mod models;
pub mod services;
pub mod tree;
pub mod utils;

// Re-export commonly used types
pub use models::*;
pub use services::*;
pub use tree::{
    ChangeFrequency, CreateNodeParams, ReorderDirection, SitemapConfig, SitemapEntry,
    SitemapOverride, TreeNode,
};
