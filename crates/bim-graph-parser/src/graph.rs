// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The finished building graph and its query layer

use bim_graph_model::{
    Element, ElementType, EntityId, GraphNode, GraphQuery, GraphView, Level, Material, ParamValue,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;

/// Typed, cross-referenced graph of building entities
///
/// Created by a parse call and immutable once returned; all mutation happens
/// during the two parse passes. Dropping the graph releases every entity at
/// once.
#[derive(Clone, Debug, Default)]
pub struct BuildingGraph {
    elements: FxHashMap<EntityId, Element>,
    levels: FxHashMap<EntityId, Level>,
    materials: FxHashMap<EntityId, Material>,
    /// Type index maintained during insertion; ids in document order
    elements_by_type: FxHashMap<ElementType, Vec<EntityId>>,
}

impl BuildingGraph {
    /// Number of elements in the graph
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Number of levels in the graph
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Number of materials in the graph
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Iterate all elements (unspecified order)
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Iterate all levels (unspecified order)
    pub fn levels(&self) -> impl Iterator<Item = &Level> {
        self.levels.values()
    }

    /// Iterate all materials (unspecified order)
    pub fn materials(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    pub(crate) fn insert_element(&mut self, element: Element) {
        self.elements_by_type
            .entry(element.element_type)
            .or_default()
            .push(element.id);
        self.elements.insert(element.id, element);
    }

    pub(crate) fn insert_level(&mut self, level: Level) {
        self.levels.insert(level.id, level);
    }

    pub(crate) fn insert_material(&mut self, material: Material) {
        self.materials.insert(material.id, material);
    }

    /// Move an element into a storey, keeping both sides of the containment
    /// relation in sync
    ///
    /// The caller has already checked that the storey exists. A later
    /// assignment overrides an earlier one and removes the stale
    /// back-reference.
    pub(crate) fn assign_storey(&mut self, element_id: EntityId, storey_id: EntityId) {
        let Some(element) = self.elements.get_mut(&element_id) else {
            log::debug!("containment references unknown element {element_id}");
            return;
        };
        let previous = element.storey.replace(storey_id);

        if let Some(previous_id) = previous {
            if previous_id != storey_id {
                if let Some(previous_level) = self.levels.get_mut(&previous_id) {
                    previous_level.elements.remove(&element_id);
                }
            }
        }
        if let Some(level) = self.levels.get_mut(&storey_id) {
            level.elements.insert(element_id);
        }
    }

    /// Append a material to an element's assignment list
    ///
    /// The caller has already checked that the material exists. Duplicates
    /// across repeated relationships are allowed.
    pub(crate) fn assign_material(&mut self, element_id: EntityId, material_id: EntityId) {
        match self.elements.get_mut(&element_id) {
            Some(element) => element.materials.push(material_id),
            None => log::debug!("material association references unknown element {element_id}"),
        }
    }

    /// Record a symmetric connection between two elements
    ///
    /// Both endpoints must exist; the edge is stored as independent appends
    /// on each side.
    pub(crate) fn connect(&mut self, first: EntityId, second: EntityId) {
        if !self.elements.contains_key(&first) || !self.elements.contains_key(&second) {
            log::debug!("path connection between {first} and {second} skipped");
            return;
        }
        if let Some(element) = self.elements.get_mut(&first) {
            element.connections.push(second);
        }
        if let Some(element) = self.elements.get_mut(&second) {
            element.connections.push(first);
        }
    }

    /// Store an opaque property-definition reference on an element
    pub(crate) fn attach_property(&mut self, element_id: EntityId, definition: EntityId) {
        if let Some(element) = self.elements.get_mut(&element_id) {
            element
                .properties
                .insert(definition.to_string(), ParamValue::Ref(definition));
        }
    }

    /// Build one denormalized node
    fn node_for(&self, element: &Element) -> GraphNode {
        let level = element
            .storey
            .and_then(|id| self.levels.get(&id))
            .map(|level| level.name.clone())
            .unwrap_or_default();
        let material = element
            .materials
            .first()
            .and_then(|id| self.materials.get(id))
            .map(|material| material.name.clone())
            .unwrap_or_default();

        let mut seen = FxHashSet::default();
        let connections = element
            .connections
            .iter()
            .copied()
            .filter(|id| self.elements.contains_key(id))
            .filter(|id| seen.insert(*id))
            .collect();

        GraphNode {
            id: element.id,
            type_name: element.element_type.keyword().to_string(),
            level,
            material,
            connections,
        }
    }
}

impl GraphQuery for BuildingGraph {
    fn element(&self, id: EntityId) -> Option<&Element> {
        self.elements.get(&id)
    }

    fn level(&self, id: EntityId) -> Option<&Level> {
        self.levels.get(&id)
    }

    fn material(&self, id: EntityId) -> Option<&Material> {
        self.materials.get(&id)
    }

    fn elements_by_type(&self, element_type: ElementType) -> Vec<EntityId> {
        self.elements_by_type
            .get(&element_type)
            .cloned()
            .unwrap_or_default()
    }

    fn elements_on_level(&self, name: &str) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .levels
            .values()
            .find(|level| level.name == name)
            .map(|level| level.elements.iter().copied().collect())
            .unwrap_or_default();
        ids.sort_by_key(|id| id.0);
        ids
    }

    fn elements_with_material(&self, name: &str) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .elements
            .values()
            .filter(|element| {
                element.materials.iter().any(|id| {
                    self.materials
                        .get(id)
                        .is_some_and(|material| material.name == name)
                })
            })
            .map(|element| element.id)
            .collect();
        ids.sort_by_key(|id| id.0);
        ids
    }

    fn view(&self) -> GraphView {
        let mut nodes: Vec<GraphNode> = self
            .elements
            .values()
            .map(|element| self.node_for(element))
            .collect();
        nodes.sort_by_key(|node| node.id.0);

        let mut type_counts: BTreeMap<String, usize> = BTreeMap::new();
        for element in self.elements.values() {
            *type_counts
                .entry(element.element_type.keyword().to_string())
                .or_insert(0) += 1;
        }

        GraphView { nodes, type_counts }
    }
}
