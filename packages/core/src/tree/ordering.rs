//! Sibling Ordering
//!
//! Order assignment and swap-based reordering for sibling groups. Siblings
//! always compare by `(order_index, title)` ascending; ties on the index
//! are permitted and the title breaks them deterministically, so identical
//! inputs always list identically.

use crate::models::ContentNode;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Direction for a sibling reorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderDirection {
    Up,
    Down,
}

impl FromStr for ReorderDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(ReorderDirection::Up),
            "down" => Ok(ReorderDirection::Down),
            other => Err(format!("Invalid reorder direction: {other}")),
        }
    }
}

/// The canonical sibling comparator: `order_index` ascending, title breaks
/// ties (case-sensitive lexical)
pub fn sibling_cmp(a: &ContentNode, b: &ContentNode) -> Ordering {
    a.order_index
        .cmp(&b.order_index)
        .then_with(|| a.title.cmp(&b.title))
}

/// Append-at-end order index for a sibling group: `max + 1`, or `0` for an
/// empty group
///
/// Calling this twice without an intervening insert returns the same
/// value; after inserting with that value the next call returns one more.
pub fn next_order_index(siblings: &[&ContentNode]) -> i64 {
    siblings
        .iter()
        .map(|node| node.order_index)
        .max()
        .map(|max| max + 1)
        .unwrap_or(0)
}

/// A planned order swap between a node and its adjacent sibling
///
/// Applying the plan writes each node's `order_index` with the other's
/// current value. Both writes must land for the swap to be visible as
/// committed; the store adapter owns that atomicity.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapPlan<'a> {
    /// The node being reordered
    pub node: &'a ContentNode,
    /// The adjacent sibling it trades places with
    pub neighbor: &'a ContentNode,
}

/// Plan an up/down swap within a sibling group
///
/// `siblings` must already be in sibling order (the snapshot provides
/// this). Returns `None` when the node sits at the edge in the requested
/// direction, or is not part of the group — both are no-ops, not errors.
pub fn plan_swap<'a>(
    siblings: &[&'a ContentNode],
    node_id: &str,
    direction: ReorderDirection,
) -> Option<SwapPlan<'a>> {
    let position = siblings.iter().position(|node| node.id == node_id)?;

    let neighbor_position = match direction {
        ReorderDirection::Up => position.checked_sub(1)?,
        ReorderDirection::Down => {
            let next = position + 1;
            if next >= siblings.len() {
                return None;
            }
            next
        }
    };

    Some(SwapPlan {
        node: siblings[position],
        neighbor: siblings[neighbor_position],
    })
}
