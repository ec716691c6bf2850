// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! bim-graph Model - Shared types and query traits for the building graph
//!
//! This crate provides the data model produced by parsing a STEP-style
//! building file: typed entity identifiers, the parameter-value union,
//! the element/level/material graph, and the denormalized view handed to
//! presentation layers. Parser backends implement [`GraphQuery`] so
//! consumers stay independent of how the graph was built.
//!
//! # Example
//!
//! ```ignore
//! use bim_graph_model::{ElementType, GraphQuery};
//!
//! let graph = parse(content)?;
//! for id in graph.elements_by_type(ElementType::Wall) {
//!     let wall = graph.element(id).unwrap();
//!     println!("{}: {:?}", id, wall.attributes.name);
//! }
//! ```

pub mod entities;
pub mod error;
pub mod traits;
pub mod types;
pub mod view;

// Re-export all public types
pub use entities::*;
pub use error::*;
pub use traits::*;
pub use types::*;
pub use view::*;
