//! Sitemap Projection
//!
//! Projects the published content tree onto sitemap entries: one entry per
//! exposed node, carrying its full path, last-modified timestamp, change
//! frequency, and priority. Sections are exposed by default; folders only
//! on explicit per-node opt-in; anything can be excluded per node.
//! Defaults scale with path depth — shallow pages change more and matter
//! more — and per-node overrides layer on top.

use crate::models::NodeType;
use crate::tree::{PathResolver, TreeSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Sitemap change-frequency hints, per the sitemaps.org protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    /// Stable lowercase name, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Depth-scaled defaults for projected entries
///
/// Priority starts at `base_priority` for depth-1 pages and drops by
/// `priority_step` per extra level, floored at `min_priority`. Pages at
/// or above `shallow_depth` get `shallow_changefreq`, deeper pages get
/// `deep_changefreq`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapConfig {
    pub shallow_depth: usize,
    pub shallow_changefreq: ChangeFrequency,
    pub deep_changefreq: ChangeFrequency,
    pub base_priority: f64,
    pub priority_step: f64,
    pub min_priority: f64,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            shallow_depth: 1,
            shallow_changefreq: ChangeFrequency::Weekly,
            deep_changefreq: ChangeFrequency::Monthly,
            base_priority: 0.9,
            priority_step: 0.1,
            min_priority: 0.3,
        }
    }
}

impl SitemapConfig {
    /// Default change frequency for a page at the given path depth
    pub fn default_changefreq(&self, depth: usize) -> ChangeFrequency {
        if depth <= self.shallow_depth {
            self.shallow_changefreq
        } else {
            self.deep_changefreq
        }
    }

    /// Default priority for a page at the given path depth
    pub fn default_priority(&self, depth: usize) -> f64 {
        let steps = depth.saturating_sub(1) as f64;
        (self.base_priority - self.priority_step * steps).max(self.min_priority)
    }
}

/// Per-node sitemap override, keyed by node id
///
/// `include` opts a folder into the sitemap; `exclude` removes any node
/// from it and wins over `include`. The remaining fields replace the
/// depth-scaled defaults when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapOverride {
    #[serde(default)]
    pub include: bool,
    #[serde(default)]
    pub exclude: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changefreq: Option<ChangeFrequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<DateTime<Utc>>,
}

/// One projected sitemap entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    pub path: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f64,
}

/// Project a snapshot onto sitemap entries
///
/// Walks the forest in pre-order; entries deduplicate by resolved path
/// with the later visit winning. Output is sorted by path.
pub fn project_sitemap_entries(
    snapshot: &TreeSnapshot,
    resolver: &mut PathResolver<'_>,
    overrides: &HashMap<String, SitemapOverride>,
    config: &SitemapConfig,
) -> Vec<SitemapEntry> {
    let mut by_path: HashMap<String, SitemapEntry> = HashMap::new();

    // Depth-first pre-order over the snapshot, children already sorted
    let mut stack: Vec<String> = snapshot.root_ids().iter().rev().cloned().collect();
    while let Some(id) = stack.pop() {
        for child_id in snapshot.children_of(&id).iter().rev() {
            stack.push(child_id.clone());
        }

        let node = match snapshot.get(&id) {
            Some(node) => node,
            None => continue,
        };
        let node_override = overrides.get(&id);

        let exposed = match node.node_type {
            NodeType::Section => true,
            NodeType::Folder => node_override.map(|o| o.include).unwrap_or(false),
            _ => false,
        };
        if !exposed || node_override.map(|o| o.exclude).unwrap_or(false) {
            continue;
        }

        let path = match resolver.full_path(&id) {
            Some(path) if !path.is_empty() => path,
            _ => continue,
        };
        let depth = path.split('/').count();

        let entry = SitemapEntry {
            path: path.clone(),
            last_modified: node_override
                .and_then(|o| o.lastmod)
                .unwrap_or(node.updated_at),
            change_frequency: node_override
                .and_then(|o| o.changefreq)
                .unwrap_or_else(|| config.default_changefreq(depth)),
            priority: node_override
                .and_then(|o| o.priority)
                .unwrap_or_else(|| config.default_priority(depth)),
        };

        // Last write wins on path collisions
        by_path.insert(path, entry);
    }

    let mut entries: Vec<SitemapEntry> = by_path.into_values().collect();
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentNode;
    use chrono::{Duration, Utc};

    fn node(
        id: &str,
        parent: Option<&str>,
        node_type: NodeType,
        slug: &str,
    ) -> ContentNode {
        let now = Utc::now();
        ContentNode {
            id: id.to_string(),
            parent_id: parent.map(str::to_string),
            node_type,
            title: format!("Node {id}"),
            slug: Some(slug.to_string()),
            ref_id: node_type.requires_ref().then(|| format!("ref-{id}")),
            order_index: 0,
            icon: None,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn project(
        nodes: Vec<ContentNode>,
        overrides: HashMap<String, SitemapOverride>,
    ) -> Vec<SitemapEntry> {
        let snapshot = TreeSnapshot::from_nodes(nodes);
        let mut resolver = PathResolver::new(&snapshot);
        project_sitemap_entries(&snapshot, &mut resolver, &overrides, &SitemapConfig::default())
    }

    #[test]
    fn sections_are_exposed_by_default() {
        let entries = project(
            vec![
                node("f", None, NodeType::Folder, "work"),
                node("s", Some("f"), NodeType::Section, "about"),
                node("p", Some("f"), NodeType::Project, "demo"),
            ],
            HashMap::new(),
        );

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "work/about");
    }

    #[test]
    fn folders_appear_only_on_include_override() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "f".to_string(),
            SitemapOverride {
                include: true,
                ..Default::default()
            },
        );

        let entries = project(vec![node("f", None, NodeType::Folder, "work")], overrides);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "work");
    }

    #[test]
    fn exclude_override_removes_sections() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "s".to_string(),
            SitemapOverride {
                exclude: true,
                ..Default::default()
            },
        );

        let entries = project(
            vec![node("s", None, NodeType::Section, "about")],
            overrides,
        );
        assert!(entries.is_empty());
    }

    #[test]
    fn defaults_scale_with_depth() {
        let entries = project(
            vec![
                node("top", None, NodeType::Section, "top"),
                node("f", None, NodeType::Folder, "work"),
                node("mid", Some("f"), NodeType::Section, "mid"),
                node("g", Some("f"), NodeType::Folder, "labs"),
                node("deep", Some("g"), NodeType::Section, "deep"),
            ],
            HashMap::new(),
        );

        let top = entries.iter().find(|e| e.path == "top").unwrap();
        assert_eq!(top.change_frequency, ChangeFrequency::Weekly);
        assert!((top.priority - 0.9).abs() < 1e-9);

        let mid = entries.iter().find(|e| e.path == "work/mid").unwrap();
        assert_eq!(mid.change_frequency, ChangeFrequency::Monthly);
        assert!((mid.priority - 0.8).abs() < 1e-9);

        let deep = entries.iter().find(|e| e.path == "work/labs/deep").unwrap();
        assert!((deep.priority - 0.7).abs() < 1e-9);
    }

    #[test]
    fn priority_floors_at_configured_minimum() {
        let config = SitemapConfig::default();
        assert!((config.default_priority(1) - 0.9).abs() < 1e-9);
        assert!((config.default_priority(7) - 0.3).abs() < 1e-9);
        assert!((config.default_priority(50) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn override_fields_replace_defaults() {
        let stamp = Utc::now() - Duration::days(30);
        let mut overrides = HashMap::new();
        overrides.insert(
            "s".to_string(),
            SitemapOverride {
                changefreq: Some(ChangeFrequency::Daily),
                priority: Some(0.25),
                lastmod: Some(stamp),
                ..Default::default()
            },
        );

        let entries = project(
            vec![node("s", None, NodeType::Section, "news")],
            overrides,
        );

        assert_eq!(entries[0].change_frequency, ChangeFrequency::Daily);
        assert!((entries[0].priority - 0.25).abs() < 1e-9);
        assert_eq!(entries[0].last_modified, stamp);
    }

    #[test]
    fn duplicate_paths_collapse_last_write_wins() {
        let mut first = node("s1", None, NodeType::Section, "about");
        first.order_index = 0;
        let mut second = node("s2", None, NodeType::Section, "about");
        second.order_index = 1;

        let mut overrides = HashMap::new();
        overrides.insert(
            "s2".to_string(),
            SitemapOverride {
                priority: Some(0.42),
                ..Default::default()
            },
        );

        let entries = project(vec![first, second], overrides);
        assert_eq!(entries.len(), 1);
        // s2 is visited later in sibling order, so its entry survives
        assert!((entries[0].priority - 0.42).abs() < 1e-9);
    }

    #[test]
    fn entries_come_back_sorted_by_path() {
        let entries = project(
            vec![
                node("b", None, NodeType::Section, "zeta"),
                node("a", None, NodeType::Section, "alpha"),
            ],
            HashMap::new(),
        );

        assert_eq!(entries[0].path, "alpha");
        assert_eq!(entries[1].path, "zeta");
    }
}
