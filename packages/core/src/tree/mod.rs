//! Tree Engine
//!
//! The pure, in-memory half of the content tree: everything here operates
//! on a `TreeSnapshot` built from one store read per request, with no I/O
//! of its own.
//!
//! - `snapshot` - adjacency index and bounded ancestor walks
//! - `guard` - invariant checks for every mutation
//! - `ordering` - sibling comparator, append policy, swap planning
//! - `path` - memoized slug-path resolution
//! - `projector` - forest building, flattening, subtree and depth scoping
//! - `sitemap` - projection of the public URL tree onto sitemap entries

pub mod guard;
pub mod ordering;
pub mod path;
pub mod projector;
pub mod sitemap;
pub mod snapshot;

pub use guard::{ConstraintError, CreateNodeParams, GuardError, InvariantGuard, ValidatedCreate};
pub use ordering::{ReorderDirection, SwapPlan};
pub use path::PathResolver;
pub use projector::{build_forest, depth_limited_ids, flatten, subtree_ids, TreeNode};
pub use sitemap::{
    project_sitemap_entries, ChangeFrequency, SitemapConfig, SitemapEntry, SitemapOverride,
};
pub use snapshot::{AncestorWalk, TreeSnapshot};
