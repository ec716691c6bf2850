// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pass 1: record dispatch and entity construction
//!
//! Builds levels, elements and materials from raw records and defers
//! relationship records for the second pass. Entities are inserted into the
//! shared collections immediately so resolution can find them regardless of
//! declaration order.

use crate::graph::BuildingGraph;
use crate::params::parse_parameters;
use crate::scanner::RawRecord;
use bim_graph_model::{
    Element, ElementAttributes, ElementType, EntityId, Level, Material, ParamValue, RecordKind,
    RelKind,
};

/// Fixed positional contracts per keyword
///
/// The source grammar carries no key/value tagging; attribute extraction is
/// purely positional and must match the order the source format emits. These
/// constants are the single schema coupling to that format.
pub(crate) mod attr {
    /// GlobalId position shared by all element keywords
    pub const ELEMENT_GLOBAL_ID: usize = 0;
    /// Name position shared by all element keywords
    pub const ELEMENT_NAME: usize = 2;
    /// Description position shared by all element keywords
    pub const ELEMENT_DESCRIPTION: usize = 3;

    /// Storey name position
    pub const STOREY_NAME: usize = 2;
    /// Storey elevation position
    pub const STOREY_ELEVATION: usize = 9;

    /// Material name position
    pub const MATERIAL_NAME: usize = 0;

    /// Related-element list position shared by containment, material and
    /// property relationships
    pub const REL_RELATED_ELEMENTS: usize = 4;
    /// Relating storey position in a containment relationship
    pub const REL_RELATING_STRUCTURE: usize = 5;
    /// Relating material position in a material association
    pub const REL_RELATING_MATERIAL: usize = 5;
    /// Relating definition position in a property relationship
    pub const REL_RELATING_DEFINITION: usize = 5;
    /// First endpoint position in a path connection
    pub const REL_CONNECTS_FIRST: usize = 4;
    /// Second endpoint position in a path connection
    pub const REL_CONNECTS_SECOND: usize = 5;
}

/// Deferred relationship record
///
/// Held only between pass 1 and pass 2, discarded after resolution; never
/// exposed outside the parser.
#[derive(Clone, Debug)]
pub(crate) struct RelationshipRecord {
    pub kind: RelKind,
    pub params: Vec<ParamValue>,
}

/// Builds graph entities from raw records and defers relationships
#[derive(Default)]
pub(crate) struct GraphBuilder {
    pub graph: BuildingGraph,
    /// Deferred records in document order; resolution applies them in this
    /// order, which is the last-write-wins tie-break
    pub relationships: Vec<(EntityId, RelationshipRecord)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch one raw record by keyword
    ///
    /// Unrecognized keywords are inert; their parameter text is never
    /// parsed.
    pub fn add_record(&mut self, record: RawRecord<'_>) {
        match RecordKind::parse(record.keyword) {
            RecordKind::Storey => {
                let params = parse_parameters(record.params);
                self.add_level(record.id, &params);
            }
            RecordKind::Element(element_type) => {
                let params = parse_parameters(record.params);
                self.add_element(record.id, element_type, &params);
            }
            RecordKind::Material => {
                let params = parse_parameters(record.params);
                self.add_material(record.id, &params);
            }
            RecordKind::Relationship(kind) => {
                let params = parse_parameters(record.params);
                self.relationships
                    .push((record.id, RelationshipRecord { kind, params }));
            }
            RecordKind::Unrecognized => {}
        }
    }

    fn add_level(&mut self, id: EntityId, params: &[ParamValue]) {
        let name = text_at(params, attr::STOREY_NAME).unwrap_or_default();
        let elevation = float_at(params, attr::STOREY_ELEVATION).unwrap_or(0.0);
        self.graph.insert_level(Level::new(id, name, elevation));
    }

    fn add_element(&mut self, id: EntityId, element_type: ElementType, params: &[ParamValue]) {
        let attributes = ElementAttributes {
            global_id: text_at(params, attr::ELEMENT_GLOBAL_ID),
            name: text_at(params, attr::ELEMENT_NAME),
            description: text_at(params, attr::ELEMENT_DESCRIPTION),
        };
        self.graph
            .insert_element(Element::new(id, element_type, attributes));
    }

    fn add_material(&mut self, id: EntityId, params: &[ParamValue]) {
        let name = text_at(params, attr::MATERIAL_NAME).unwrap_or_default();
        self.graph.insert_material(Material::new(id, name));
    }
}

/// String literal at a fixed position
fn text_at(params: &[ParamValue], index: usize) -> Option<String> {
    params.get(index).and_then(|v| v.as_text()).map(str::to_string)
}

/// Numeric value at a fixed position
///
/// Some producers emit numbers as quoted text; coerce those too. Anything
/// else is treated as absent.
fn float_at(params: &[ParamValue], index: usize) -> Option<f64> {
    let value = params.get(index)?;
    if let Some(f) = value.as_float() {
        return Some(f);
    }
    match value {
        ParamValue::Text(s) | ParamValue::Raw(s) => {
            lexical_core::parse::<f64>(s.trim().as_bytes()).ok()
        }
        _ => None,
    }
}
