// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Denormalized presentation view
//!
//! The filtered, flattened shape handed to rendering layers. This is the
//! entire contract a consumer may depend on; internal relationship records
//! and raw parameter lists are never exposed.

use crate::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One renderable node of the finished graph
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: EntityId,
    /// Element keyword, e.g. `"IFCWALL"`
    #[serde(rename = "type")]
    pub type_name: String,
    /// Resolved containing-level name; empty when unresolved
    pub level: String,
    /// First assigned material name; empty when none
    pub material: String,
    /// Connected element ids, filtered to elements present in the graph and
    /// deduplicated in first-occurrence order
    pub connections: Vec<EntityId>,
}

/// Aggregate view over a finished graph
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    /// Nodes sorted by id
    pub nodes: Vec<GraphNode>,
    /// Element count per keyword
    pub type_counts: BTreeMap<String, usize>,
}

impl GraphView {
    /// Check if the view has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by element id
    pub fn node(&self, id: EntityId) -> Option<&GraphNode> {
        self.nodes
            .binary_search_by_key(&id.0, |n| n.id.0)
            .ok()
            .map(|index| &self.nodes[index])
    }
}
