// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core identifier and parameter-value types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe entity identifier
///
/// Wraps the raw record number (e.g. `#123` becomes `EntityId(123)`), stable
/// for the lifetime of a parse.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Default)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        EntityId(id)
    }
}

impl From<EntityId> for u32 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Typed parameter value
///
/// Represents one field of a record's parameter list. The parameter parser
/// classifies every field into exactly one of these variants; classification
/// never fails, so a field the grammar does not cover becomes [`Raw`].
///
/// [`Raw`]: ParamValue::Raw
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub enum ParamValue {
    /// Omitted or inherited value (`$`, `*`, or an empty field)
    #[default]
    Null,
    /// Entity reference (`#123`)
    Ref(EntityId),
    /// Integer literal
    Integer(i64),
    /// Floating point literal
    Float(f64),
    /// Quoted string literal, quotes stripped, no escape processing
    Text(String),
    /// Nested `( … )` aggregate
    List(Vec<ParamValue>),
    /// Defensive fallback: unclassified field text, passed through verbatim
    Raw(String),
}

impl ParamValue {
    /// Try to get as entity reference
    pub fn as_entity_ref(&self) -> Option<EntityId> {
        match self {
            ParamValue::Ref(id) => Some(*id),
            _ => None,
        }
    }

    /// Try to get as string literal
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as float, widening integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(f) => Some(*f),
            ParamValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get as integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ParamValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as list
    pub fn as_list(&self) -> Option<&[ParamValue]> {
        match self {
            ParamValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }
}
