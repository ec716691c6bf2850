// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building-graph domain model and record-keyword dispatch

use crate::{EntityId, ParamValue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Recognized element keywords
///
/// The fixed allow-list of building components the graph models. Any other
/// keyword in the source never produces an element.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ElementType {
    Wall,
    WallStandardCase,
    Slab,
    Window,
    Door,
    Beam,
    Column,
}

impl ElementType {
    /// Every recognized element type, in keyword order
    pub const ALL: [ElementType; 7] = [
        ElementType::Wall,
        ElementType::WallStandardCase,
        ElementType::Slab,
        ElementType::Window,
        ElementType::Door,
        ElementType::Beam,
        ElementType::Column,
    ];

    /// Parse a record keyword into an element type
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword.to_uppercase().as_str() {
            "IFCWALL" => Some(ElementType::Wall),
            "IFCWALLSTANDARDCASE" => Some(ElementType::WallStandardCase),
            "IFCSLAB" => Some(ElementType::Slab),
            "IFCWINDOW" => Some(ElementType::Window),
            "IFCDOOR" => Some(ElementType::Door),
            "IFCBEAM" => Some(ElementType::Beam),
            "IFCCOLUMN" => Some(ElementType::Column),
            _ => None,
        }
    }

    /// Get the source keyword for this type
    pub fn keyword(&self) -> &'static str {
        match self {
            ElementType::Wall => "IFCWALL",
            ElementType::WallStandardCase => "IFCWALLSTANDARDCASE",
            ElementType::Slab => "IFCSLAB",
            ElementType::Window => "IFCWINDOW",
            ElementType::Door => "IFCDOOR",
            ElementType::Beam => "IFCBEAM",
            ElementType::Column => "IFCCOLUMN",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// Relationship keywords, resolved during the second pass
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum RelKind {
    /// Assigns elements to a storey
    Containment,
    /// Attaches a property definition to elements
    PropertyDefinition,
    /// Associates a material with elements
    MaterialAssociation,
    /// Symmetric physical-adjacency edge between two elements
    PathConnection,
}

/// Dispatch class of one record keyword
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RecordKind {
    /// A spatial storey record
    Storey,
    /// A building element record
    Element(ElementType),
    /// A material record
    Material,
    /// A relationship record, deferred until pass 2
    Relationship(RelKind),
    /// Anything else; inert
    Unrecognized,
}

impl RecordKind {
    /// Classify a record keyword
    pub fn parse(keyword: &str) -> Self {
        match keyword.to_uppercase().as_str() {
            "IFCBUILDINGSTOREY" => RecordKind::Storey,
            "IFCMATERIAL" => RecordKind::Material,
            "IFCRELCONTAINEDINSPATIALSTRUCTURE" => {
                RecordKind::Relationship(RelKind::Containment)
            }
            "IFCRELDEFINESBYPROPERTIES" => {
                RecordKind::Relationship(RelKind::PropertyDefinition)
            }
            "IFCRELASSOCIATESMATERIAL" => {
                RecordKind::Relationship(RelKind::MaterialAssociation)
            }
            "IFCRELCONNECTSPATHELEMENTS" => {
                RecordKind::Relationship(RelKind::PathConnection)
            }
            other => match ElementType::parse(other) {
                Some(element_type) => RecordKind::Element(element_type),
                None => RecordKind::Unrecognized,
            },
        }
    }
}

/// Attributes extracted from fixed parameter positions of element records
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementAttributes {
    pub global_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// One physical building component
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Element {
    /// Record number, unique within one parse
    pub id: EntityId,
    pub element_type: ElementType,
    pub attributes: ElementAttributes,
    /// Containing storey, resolved in pass 2; when several containment
    /// records target the same element the last one applied wins
    pub storey: Option<EntityId>,
    /// Assigned materials in association order; shared by reference,
    /// duplicates across repeated relationships allowed
    pub materials: Vec<EntityId>,
    /// Ids of physically connected elements; appended on both sides,
    /// deduplicated only at the view boundary
    pub connections: Vec<EntityId>,
    /// Opaque property-definition references keyed by their textual form
    pub properties: BTreeMap<String, ParamValue>,
}

impl Element {
    /// Create an element with no resolved relationships
    pub fn new(id: EntityId, element_type: ElementType, attributes: ElementAttributes) -> Self {
        Self {
            id,
            element_type,
            attributes,
            storey: None,
            materials: Vec::new(),
            connections: Vec::new(),
            properties: BTreeMap::new(),
        }
    }
}

/// A spatial storey containing elements
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Level {
    pub id: EntityId,
    pub name: String,
    /// Elevation in file units; 0.0 when missing or unparseable
    pub elevation: f64,
    /// Back-references to contained elements; kept in sync with each
    /// element's `storey` link
    pub elements: HashSet<EntityId>,
}

impl Level {
    pub fn new(id: EntityId, name: impl Into<String>, elevation: f64) -> Self {
        Self {
            id,
            name: name.into(),
            elevation,
            elements: HashSet::new(),
        }
    }
}

/// A named substance shared by reference across elements
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Material {
    pub id: EntityId,
    pub name: String,
}

impl Material {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
