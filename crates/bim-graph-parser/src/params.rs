// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parameter-list parser
//!
//! Converts the text between a record's outer parentheses into an ordered
//! sequence of typed values. Splitting is a single left-to-right scan that
//! tracks nesting depth and string state; classification of each field uses
//! nom combinators for references and numeric literals.

use bim_graph_model::{EntityId, ParamValue};
use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::char,
    combinator::{opt, recognize},
    sequence::pair,
    IResult, Parser,
};

/// Parse one record's parameter text into typed values
///
/// Commas at depth 0 outside strings separate fields; a comma inside a
/// nested group or a quoted string never splits the outer field. The
/// trailing field is flushed at the implicit close, and an empty field
/// yields a null entry so positional extraction stays aligned.
pub fn parse_parameters(input: &str) -> Vec<ParamValue> {
    let mut values = Vec::new();
    if input.trim().is_empty() {
        return values;
    }

    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut field_start = 0usize;

    for pos in 0..bytes.len() {
        match bytes[pos] {
            b'\'' => in_string = !in_string,
            b'(' if !in_string => depth += 1,
            b')' if !in_string => depth = depth.saturating_sub(1),
            b',' if !in_string && depth == 0 => {
                values.push(parse_value(&input[field_start..pos]));
                field_start = pos + 1;
            }
            _ => {}
        }
    }
    values.push(parse_value(&input[field_start..]));

    values
}

/// Classify one raw field; never fails
///
/// Anything the grammar does not cover is passed through as [`ParamValue::Raw`].
pub fn parse_value(field: &str) -> ParamValue {
    let field = field.trim();

    if field.is_empty() || field == "$" || field == "*" {
        return ParamValue::Null;
    }

    // Quoted literal; quotes stripped, embedded quotes passed through
    if field.len() >= 2 && field.starts_with('\'') && field.ends_with('\'') {
        return ParamValue::Text(field[1..field.len() - 1].to_string());
    }

    // Nested aggregate; recurse with the same field grammar
    if field.starts_with('(') && field.ends_with(')') {
        return ParamValue::List(parse_parameters(&field[1..field.len() - 1]));
    }

    if let Ok(("", value)) = entity_ref(field) {
        return value;
    }
    if let Ok(("", value)) = numeric(field) {
        return value;
    }

    ParamValue::Raw(field.to_string())
}

/// Parse an entity reference (#123)
fn entity_ref(input: &str) -> IResult<&str, ParamValue> {
    let (input, _) = char('#')(input)?;
    let (input, digits) = take_while1(|c: char| c.is_ascii_digit())(input)?;
    let id = digits.parse::<u32>().unwrap_or(0);
    Ok((input, ParamValue::Ref(EntityId(id))))
}

/// Parse a numeric literal (optional sign, fraction, exponent)
fn numeric(input: &str) -> IResult<&str, ParamValue> {
    let (input, num_str) = recognize((
        opt(char('-')),
        take_while1(|c: char| c.is_ascii_digit()),
        opt(pair(char('.'), take_while(|c: char| c.is_ascii_digit()))),
        opt((
            alt((char('e'), char('E'))),
            opt(alt((char('+'), char('-')))),
            take_while1(|c: char| c.is_ascii_digit()),
        )),
    ))
    .parse(input)?;

    if num_str.contains('.') || num_str.contains('e') || num_str.contains('E') {
        let f: f64 = lexical_core::parse(num_str.as_bytes()).unwrap_or(0.0);
        Ok((input, ParamValue::Float(f)))
    } else {
        let i: i64 = lexical_core::parse(num_str.as_bytes()).unwrap_or(0);
        Ok((input, ParamValue::Integer(i)))
    }
}
