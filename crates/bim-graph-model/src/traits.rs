// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Query trait over the finished graph

use crate::{Element, ElementType, EntityId, GraphView, Level, Material};

/// Read-only queries over a fully resolved building graph
///
/// Implementations must only be consulted after relationship resolution has
/// completed; results observed mid-resolution are unspecified.
pub trait GraphQuery {
    /// Look up an element by id
    fn element(&self, id: EntityId) -> Option<&Element>;

    /// Look up a level by id
    fn level(&self, id: EntityId) -> Option<&Level>;

    /// Look up a material by id
    fn material(&self, id: EntityId) -> Option<&Material>;

    /// All element ids of the given type, in document order
    ///
    /// O(1) index lookup plus O(k) materialization.
    fn elements_by_type(&self, element_type: ElementType) -> Vec<EntityId>;

    /// Elements contained in the first level whose name matches exactly
    ///
    /// Linear scan over levels, then O(k) materialization.
    fn elements_on_level(&self, name: &str) -> Vec<EntityId>;

    /// Elements with at least one assigned material of the given name
    ///
    /// Linear filter over all elements and their material lists.
    fn elements_with_material(&self, name: &str) -> Vec<EntityId>;

    /// Build the denormalized presentation view
    fn view(&self) -> GraphView;
}
