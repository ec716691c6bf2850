// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! bim-graph Parser - STEP-style building-file parser
//!
//! This crate turns the textual entity format (numbered records referencing
//! each other by id) into the typed, cross-referenced [`BuildingGraph`]
//! defined by `bim-graph-model`.
//!
//! Parsing is two-pass: pass 1 scans the data section and builds every
//! level, element and material while deferring relationship records; pass 2
//! resolves the deferred records into containment, material and connection
//! edges. The two-pass design is load-bearing: relationships may reference
//! ids declared later in the file.
//!
//! # Features
//!
//! - **Fast record scanning** using `memchr`
//! - **Typed parameter values** classified with `nom` combinators
//! - **Graceful degradation** - only a missing data section is fatal
//!
//! # Example
//!
//! ```ignore
//! use bim_graph_model::{ElementType, GraphQuery};
//!
//! let graph = bim_graph_parser::parse(content)?;
//! let walls = graph.elements_by_type(ElementType::Wall);
//! println!("Found {} walls", walls.len());
//! ```

mod builder;
mod graph;
mod params;
mod resolver;
mod scanner;

pub use graph::BuildingGraph;
pub use params::{parse_parameters, parse_value};
pub use scanner::{locate_data_section, RawRecord, RecordScanner};

use bim_graph_model::{RelKind, Result};
use builder::GraphBuilder;
use std::path::Path;

/// Main parser entry point
///
/// Each parse call builds a fresh graph; no state is retained between
/// calls.
#[derive(Clone, Copy, Debug)]
pub struct StepParser {
    /// Whether property-definition relationships populate element bags
    pub extract_properties: bool,
}

impl Default for StepParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StepParser {
    /// Create a parser with default settings
    pub fn new() -> Self {
        Self {
            extract_properties: true,
        }
    }

    /// Set whether to populate the opaque property bags
    pub fn with_properties(mut self, enabled: bool) -> Self {
        self.extract_properties = enabled;
        self
    }

    /// Parse file content into a building graph
    ///
    /// The only fatal condition is a missing data section. Malformed
    /// records, unknown keywords, dangling references and unparseable
    /// numerics degrade to omission.
    pub fn parse(&self, content: &str) -> Result<BuildingGraph> {
        let data = scanner::locate_data_section(content)?;

        let mut builder = GraphBuilder::new();
        let mut records = scanner::RecordScanner::new(data);
        while let Some(record) = records.next_record() {
            builder.add_record(record);
        }

        let GraphBuilder {
            mut graph,
            mut relationships,
        } = builder;
        if !self.extract_properties {
            relationships.retain(|(_, record)| record.kind != RelKind::PropertyDefinition);
        }
        resolver::resolve(&mut graph, relationships);

        log::debug!(
            "parsed {} elements, {} levels, {} materials",
            graph.element_count(),
            graph.level_count(),
            graph.material_count()
        );

        Ok(graph)
    }
}

/// Quick parse function for simple use cases
pub fn parse(content: &str) -> Result<BuildingGraph> {
    StepParser::new().parse(content)
}

/// Read a file and parse it
pub fn parse_file(path: impl AsRef<Path>) -> Result<BuildingGraph> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bim_graph_model::{ElementType, EntityId, GraphQuery, ParseError};

    const TEST_FILE: &str = r#"ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('test.ifc','2024-01-01T00:00:00',('Author'),('Org'),'Preprocessor','App','');
FILE_SCHEMA(('IFC2X3'));
ENDSEC;
DATA;
#1=IFCBUILDINGSTOREY('guidL1',$,'Level 1',$,$,$,$,$,$,3.0);
#2=IFCWALL('guidW1',$,'Wall 1',$,$,$,$,$);
#3=IFCWALL('guidW2',$,'Wall 2',$,$,$,$,$);
#4=IFCMATERIAL('Concrete');
#5=IFCRELCONTAINEDINSPATIALSTRUCTURE('guidR1',$,$,$,(#2,#3),#1);
#6=IFCRELASSOCIATESMATERIAL('guidR2',$,$,$,(#2),#4);
#7=IFCRELCONNECTSPATHELEMENTS('guidR3',$,$,$,#2,#3);
#8=IFCWINDOW('guidW3',$,'Window 1',$,$,$,$,$);
ENDSEC;
END-ISO-10303-21;
"#;

    #[test]
    fn test_containment_scenario() {
        let graph = parse(TEST_FILE).unwrap();

        assert_eq!(graph.elements_by_type(ElementType::Wall).len(), 2);
        let wall = graph.element(EntityId(2)).unwrap();
        assert_eq!(wall.storey, Some(EntityId(1)));

        let level = graph.level(EntityId(1)).unwrap();
        assert_eq!(level.name, "Level 1");
        assert!((level.elevation - 3.0).abs() < 1e-10);
        assert!(level.elements.contains(&EntityId(2)));
        assert!(level.elements.contains(&EntityId(3)));

        let view = graph.view();
        assert_eq!(view.node(EntityId(2)).unwrap().level, "Level 1");
    }

    #[test]
    fn test_connections_are_symmetric() {
        let graph = parse(TEST_FILE).unwrap();

        assert_eq!(
            graph.element(EntityId(2)).unwrap().connections,
            vec![EntityId(3)]
        );
        assert_eq!(
            graph.element(EntityId(3)).unwrap().connections,
            vec![EntityId(2)]
        );
    }

    #[test]
    fn test_material_assignment() {
        let graph = parse(TEST_FILE).unwrap();

        assert_eq!(
            graph.element(EntityId(2)).unwrap().materials,
            vec![EntityId(4)]
        );
        assert_eq!(
            graph.elements_with_material("Concrete"),
            vec![EntityId(2)]
        );
        assert_eq!(graph.view().node(EntityId(2)).unwrap().material, "Concrete");
        assert_eq!(graph.view().node(EntityId(3)).unwrap().material, "");
    }

    #[test]
    fn test_query_layer() {
        let graph = parse(TEST_FILE).unwrap();

        assert_eq!(
            graph.elements_on_level("Level 1"),
            vec![EntityId(2), EntityId(3)]
        );
        assert!(graph.elements_on_level("Penthouse").is_empty());
        assert_eq!(
            graph.elements_by_type(ElementType::Window),
            vec![EntityId(8)]
        );
        assert!(graph.elements_by_type(ElementType::Door).is_empty());
    }

    #[test]
    fn test_view_counts() {
        let view = parse(TEST_FILE).unwrap().view();

        assert_eq!(view.nodes.len(), 3);
        assert_eq!(view.type_counts.get("IFCWALL"), Some(&2));
        assert_eq!(view.type_counts.get("IFCWINDOW"), Some(&1));
        assert_eq!(view.type_counts.get("IFCDOOR"), None);
    }

    #[test]
    fn test_missing_data_section_yields_failure_not_partial_graph() {
        let result = parse("#1=IFCWALL('guid',$,'Wall',$,$,$,$,$);");
        assert!(matches!(result, Err(ParseError::MissingDataSection)));
    }

    #[test]
    fn test_forward_references_resolve() {
        // Relationship declared before any of the entities it references
        let content = "DATA;\n\
            #1=IFCRELCONTAINEDINSPATIALSTRUCTURE('g',$,$,$,(#3),#2);\n\
            #2=IFCBUILDINGSTOREY('g2',$,'Roof',$,$,$,$,$,$,9.0);\n\
            #3=IFCSLAB('g3',$,'Roof Slab',$,$,$,$,$,$);\n\
            ENDSEC;";
        let graph = parse(content).unwrap();

        assert_eq!(graph.element(EntityId(3)).unwrap().storey, Some(EntityId(2)));
        assert!(graph.level(EntityId(2)).unwrap().elements.contains(&EntityId(3)));
    }

    #[test]
    fn test_dangling_reference_skips_only_that_edge() {
        let content = "DATA;\n\
            #1=IFCBUILDINGSTOREY('g',$,'Level 1',$,$,$,$,$,$,0.0);\n\
            #2=IFCWALL('g2',$,'Wall',$,$,$,$,$);\n\
            #3=IFCRELCONTAINEDINSPATIALSTRUCTURE('g3',$,$,$,(#2,#99),#1);\n\
            #4=IFCRELCONNECTSPATHELEMENTS('g4',$,$,$,#2,#98);\n\
            ENDSEC;";
        let graph = parse(content).unwrap();

        // The valid containment still applied
        assert_eq!(graph.element(EntityId(2)).unwrap().storey, Some(EntityId(1)));
        // The half-dangling connection applied to neither side
        assert!(graph.element(EntityId(2)).unwrap().connections.is_empty());
    }

    #[test]
    fn test_last_containment_wins_and_back_reference_moves() {
        let content = "DATA;\n\
            #1=IFCBUILDINGSTOREY('g',$,'First',$,$,$,$,$,$,0.0);\n\
            #2=IFCBUILDINGSTOREY('g2',$,'Second',$,$,$,$,$,$,4.0);\n\
            #3=IFCWALL('g3',$,'Wall',$,$,$,$,$);\n\
            #4=IFCRELCONTAINEDINSPATIALSTRUCTURE('g4',$,$,$,(#3),#1);\n\
            #5=IFCRELCONTAINEDINSPATIALSTRUCTURE('g5',$,$,$,(#3),#2);\n\
            ENDSEC;";
        let graph = parse(content).unwrap();

        assert_eq!(graph.element(EntityId(3)).unwrap().storey, Some(EntityId(2)));
        assert!(!graph.level(EntityId(1)).unwrap().elements.contains(&EntityId(3)));
        assert!(graph.level(EntityId(2)).unwrap().elements.contains(&EntityId(3)));
    }

    #[test]
    fn test_repeated_connection_deduplicated_in_view() {
        let content = "DATA;\n\
            #1=IFCWALL('g',$,'A',$,$,$,$,$);\n\
            #2=IFCWALL('g2',$,'B',$,$,$,$,$);\n\
            #3=IFCRELCONNECTSPATHELEMENTS('g3',$,$,$,#1,#2);\n\
            #4=IFCRELCONNECTSPATHELEMENTS('g4',$,$,$,#1,#2);\n\
            ENDSEC;";
        let graph = parse(content).unwrap();

        // Internal list keeps both appends
        assert_eq!(graph.element(EntityId(1)).unwrap().connections.len(), 2);
        // View deduplicates
        let view = graph.view();
        assert_eq!(view.node(EntityId(1)).unwrap().connections, vec![EntityId(2)]);
        assert_eq!(view.node(EntityId(2)).unwrap().connections, vec![EntityId(1)]);
    }

    #[test]
    fn test_property_definitions_stored_opaquely() {
        let content = "DATA;\n\
            #1=IFCWALL('g',$,'Wall',$,$,$,$,$);\n\
            #2=IFCRELDEFINESBYPROPERTIES('g2',$,$,$,(#1),#77);\n\
            ENDSEC;";

        let graph = parse(content).unwrap();
        let wall = graph.element(EntityId(1)).unwrap();
        assert!(wall.properties.contains_key("#77"));

        let graph = StepParser::new()
            .with_properties(false)
            .parse(content)
            .unwrap();
        assert!(graph.element(EntityId(1)).unwrap().properties.is_empty());
    }

    #[test]
    fn test_reparse_leaves_no_residual_state() {
        let parser = StepParser::new();
        let first = parser.parse(TEST_FILE).unwrap();
        assert_eq!(first.element_count(), 3);

        let second = parser
            .parse("DATA;\n#10=IFCDOOR('g',$,'Door',$,$,$,$,$);\nENDSEC;")
            .unwrap();
        assert_eq!(second.element_count(), 1);
        assert_eq!(second.level_count(), 0);
        assert!(second.element(EntityId(2)).is_none());
        assert_eq!(
            second.elements_by_type(ElementType::Door),
            vec![EntityId(10)]
        );
    }

    #[test]
    fn test_view_serializes_with_keyword_type() {
        let view = parse(TEST_FILE).unwrap().view();
        let json = serde_json::to_value(&view).unwrap();

        let first = &json["nodes"][0];
        assert_eq!(first["id"], 2);
        assert_eq!(first["type"], "IFCWALL");
        assert_eq!(first["level"], "Level 1");
    }

    #[test]
    fn test_parse_file_surfaces_io_errors() {
        let result = parse_file("/definitely/not/a/real/path.ifc");
        assert!(matches!(result, Err(ParseError::Io(_))));
    }
}
