// SPDX-License-Identifier: MIT OR Apache-2.0
//! Evaluators for vector utilities and named values.

use super::unknown_output;
use crate::compiler::Compiler;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::result::NodeResult;
use prism_graph::{Node, PlugType};

pub fn split(c: &mut Compiler, node: &Node, output: &str) -> NodeResult {
    let arity = match node.type_id.as_str() {
        "split_vector2" => 2,
        "split_vector3" => 3,
        _ => 4,
    };
    let index = match output {
        "x" => 0,
        "y" => 1,
        "z" => 2,
        "w" => 3,
        other => return unknown_output(c, node, other),
    };
    if index >= arity {
        return unknown_output(c, node, output);
    }
    match c.input(node, "vector") {
        NodeResult::Value { code, constant, .. } => NodeResult::Value {
            code: format!("({code}).{output}"),
            ty: PlugType::Float,
            constant,
        },
        other => other,
    }
}

pub fn combine(c: &mut Compiler, node: &Node, output: &str) -> NodeResult {
    if output != "vector" {
        return unknown_output(c, node, output);
    }
    let (arity, ty) = match node.type_id.as_str() {
        "combine_vector2" => (2, PlugType::Vector2),
        "combine_vector3" => (3, PlugType::Vector3),
        _ => (4, PlugType::Vector4),
    };
    let mut parts = Vec::with_capacity(arity);
    let mut constant = true;
    for name in ["x", "y", "z", "w"].iter().take(arity) {
        match c.input(node, name) {
            NodeResult::Value {
                code,
                constant: part_constant,
                ..
            } => {
                constant &= part_constant;
                parts.push(code);
            }
            _ => return NodeResult::Error,
        }
    }
    NodeResult::Value {
        code: format!("float{arity}({})", parts.join(", ")),
        ty,
        constant,
    }
}

pub fn swizzle(c: &mut Compiler, node: &Node, output: &str) -> NodeResult {
    if output != "value" {
        return unknown_output(c, node, output);
    }
    let mask = node.property_str("mask").unwrap_or("").to_string();
    if mask.is_empty() || mask.len() > 4 || !mask.chars().all(|ch| "xyzw".contains(ch)) {
        // Graph validation has already diagnosed the bad mask.
        return NodeResult::Error;
    }

    // The source must be at least wide enough for the highest component
    // the mask touches.
    let needed = mask
        .chars()
        .map(|ch| "xyzw".find(ch).unwrap_or(0) + 1)
        .max()
        .unwrap_or(1);
    let source_ty = match needed {
        1 => PlugType::Float,
        2 => PlugType::Vector2,
        3 => PlugType::Vector3,
        _ => PlugType::Vector4,
    };
    let plug = c
        .registry()
        .input_plug(node, "value")
        .expect("swizzle declares `value`");
    let value = c.input_untyped(node, &plug);
    let value = c.cast(value, source_ty, Some(node.id));
    let NodeResult::Value { code, constant, .. } = value else {
        return NodeResult::Error;
    };

    let ty = match mask.len() {
        1 => PlugType::Float,
        2 => PlugType::Vector2,
        3 => PlugType::Vector3,
        _ => PlugType::Vector4,
    };
    NodeResult::Value {
        code: format!("({code}).{mask}"),
        ty,
        constant,
    }
}

/// A name declaration forwards its input; its side effect is the entry in
/// the pass's named value table, built when the scope is entered.
pub fn named_declaration(c: &mut Compiler, node: &Node, output: &str) -> NodeResult {
    if output != "value" {
        return unknown_output(c, node, output);
    }
    let plug = c
        .registry()
        .input_plug(node, "value")
        .expect("named_declaration declares `value`");
    match c.input_untyped(node, &plug) {
        NodeResult::Missing => NodeResult::constant("0.0", PlugType::Float),
        other => other,
    }
}

/// A reference resolves by name, not by positional connection. A missing
/// declaration degrades to a typed default with a warning; user graphs may
/// rely on that leniency, so it is not an error.
pub fn named_reference(c: &mut Compiler, node: &Node, output: &str) -> NodeResult {
    if output != "value" {
        return unknown_output(c, node, output);
    }
    let name = node.property_str("name").unwrap_or("").to_string();
    match c.named_lookup(&name) {
        Some((scope, declaration)) => c.result_in_scope(scope, declaration, "value"),
        None => {
            c.diagnostic(Diagnostic::warning(
                DiagnosticKind::UnresolvedName,
                Some(node.id),
                format!("no declaration named `{name}`; using a default value"),
            ));
            NodeResult::constant("0.0", PlugType::Float)
        }
    }
}
