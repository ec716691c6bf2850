// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pass 2: relationship resolution
//!
//! Applies the deferred relationship records to the graph. Records are
//! applied in document order; when multiple containment records target the
//! same element, the last one applied wins. A reference to an id that was
//! never built skips only that edge and never aborts the parse.

use crate::builder::{attr, RelationshipRecord};
use crate::graph::BuildingGraph;
use bim_graph_model::{EntityId, GraphQuery, ParamValue, RelKind};

/// Resolve all deferred relationships into the graph
pub(crate) fn resolve(
    graph: &mut BuildingGraph,
    relationships: Vec<(EntityId, RelationshipRecord)>,
) {
    for (_, record) in relationships {
        match record.kind {
            RelKind::Containment => apply_containment(graph, &record.params),
            RelKind::MaterialAssociation => apply_material_association(graph, &record.params),
            RelKind::PathConnection => apply_path_connection(graph, &record.params),
            RelKind::PropertyDefinition => apply_property_definition(graph, &record.params),
        }
    }
}

/// Assign each existing related element to the relating storey
fn apply_containment(graph: &mut BuildingGraph, params: &[ParamValue]) {
    let storey_id = match ref_at(params, attr::REL_RELATING_STRUCTURE) {
        Some(id) if graph.level(id).is_some() => id,
        _ => return,
    };
    for element_id in refs_at(params, attr::REL_RELATED_ELEMENTS) {
        graph.assign_storey(element_id, storey_id);
    }
}

/// Append the relating material to each existing related element
fn apply_material_association(graph: &mut BuildingGraph, params: &[ParamValue]) {
    let material_id = match ref_at(params, attr::REL_RELATING_MATERIAL) {
        Some(id) if graph.material(id).is_some() => id,
        _ => return,
    };
    for element_id in refs_at(params, attr::REL_RELATED_ELEMENTS) {
        graph.assign_material(element_id, material_id);
    }
}

/// Record a symmetric connection between the two referenced elements
fn apply_path_connection(graph: &mut BuildingGraph, params: &[ParamValue]) {
    let (Some(first), Some(second)) = (
        ref_at(params, attr::REL_CONNECTS_FIRST),
        ref_at(params, attr::REL_CONNECTS_SECOND),
    ) else {
        return;
    };
    graph.connect(first, second);
}

/// Store the relating definition opaquely on each existing related element
fn apply_property_definition(graph: &mut BuildingGraph, params: &[ParamValue]) {
    let Some(definition) = ref_at(params, attr::REL_RELATING_DEFINITION) else {
        return;
    };
    for element_id in refs_at(params, attr::REL_RELATED_ELEMENTS) {
        graph.attach_property(element_id, definition);
    }
}

/// Single reference at a fixed position
fn ref_at(params: &[ParamValue], index: usize) -> Option<EntityId> {
    params.get(index).and_then(ParamValue::as_entity_ref)
}

/// Reference list at a fixed position
///
/// Accepts either a nested reference list or a bare reference; anything
/// else yields no references.
fn refs_at(params: &[ParamValue], index: usize) -> Vec<EntityId> {
    match params.get(index) {
        Some(ParamValue::Ref(id)) => vec![*id],
        Some(ParamValue::List(items)) => {
            items.iter().filter_map(ParamValue::as_entity_ref).collect()
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bim_graph_model::ParamValue;

    #[test]
    fn test_refs_at_accepts_bare_reference() {
        let params = vec![ParamValue::Null, ParamValue::Ref(EntityId(7))];
        assert_eq!(refs_at(&params, 1), vec![EntityId(7)]);
    }

    #[test]
    fn test_refs_at_filters_non_references() {
        let params = vec![ParamValue::List(vec![
            ParamValue::Ref(EntityId(1)),
            ParamValue::Text("noise".to_string()),
            ParamValue::Ref(EntityId(2)),
        ])];
        assert_eq!(refs_at(&params, 0), vec![EntityId(1), EntityId(2)]);
    }

    #[test]
    fn test_ref_at_out_of_range() {
        assert_eq!(ref_at(&[], 5), None);
    }
}
