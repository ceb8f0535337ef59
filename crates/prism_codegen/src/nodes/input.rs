// SPDX-License-Identifier: MIT OR Apache-2.0
//! Evaluators for constants, attributes, and blackboard parameters.

use super::unknown_output;
use crate::compiler::Compiler;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::emit;
use crate::result::NodeResult;
use prism_graph::{Node, PlugType, Value};

/// Constant nodes emit their `value` property as an inline literal; no
/// intermediate statement is generated.
pub fn constant(c: &mut Compiler, node: &Node, output: &str) -> NodeResult {
    if output != "value" {
        return unknown_output(c, node, output);
    }
    let fallback = c
        .registry()
        .output_plug(node, "value")
        .and_then(|plug| Value::zero(plug.ty));
    let literal = node
        .property("value")
        .and_then(emit::literal)
        .or_else(|| fallback.as_ref().and_then(emit::literal));
    match literal {
        Some((code, ty)) => NodeResult::constant(code, ty),
        None => {
            c.diagnostic(Diagnostic::error(
                DiagnosticKind::Validation,
                Some(node.id),
                "constant node holds no literal value",
            ));
            NodeResult::Error
        }
    }
}

pub fn gradient_constant(c: &mut Compiler, node: &Node, output: &str) -> NodeResult {
    if output != "gradient" {
        return unknown_output(c, node, output);
    }
    match node.property("gradient") {
        Some(Value::Gradient(stops)) => NodeResult::Gradient(stops.clone()),
        _ => NodeResult::Gradient(Vec::new()),
    }
}

pub fn uv_coordinate(c: &mut Compiler, node: &Node, output: &str) -> NodeResult {
    match output {
        "uv" => NodeResult::expr("input.uv", PlugType::Vector2),
        "u" => NodeResult::expr("input.uv.x", PlugType::Float),
        "v" => NodeResult::expr("input.uv.y", PlugType::Float),
        other => unknown_output(c, node, other),
    }
}

pub fn world_position(c: &mut Compiler, node: &Node, output: &str) -> NodeResult {
    match output {
        "position" => NodeResult::expr("input.world_position", PlugType::Vector3),
        other => unknown_output(c, node, other),
    }
}

pub fn time(c: &mut Compiler, node: &Node, output: &str) -> NodeResult {
    match output {
        "time" => NodeResult::expr("input.time", PlugType::Float),
        "sin_time" => NodeResult::expr("sin(input.time)", PlugType::Float),
        other => unknown_output(c, node, other),
    }
}

/// Parameter nodes mirror one blackboard entry.
///
/// Inside an inlined function the entry is an input port and resolves to
/// the caller's substitution; at the top level it registers an external
/// resource and resolves to the bound global symbol.
pub fn parameter(c: &mut Compiler, node: &Node, output: &str) -> NodeResult {
    if output != "value" {
        return unknown_output(c, node, output);
    }
    let Some(param_id) = node.parameter_ref() else {
        return orphaned(c, node);
    };

    if let Some(bound) = c.scope_binding(param_id) {
        return bound;
    }

    let Some(parameter) = c.graph().find_parameter(param_id).cloned() else {
        return orphaned(c, node);
    };

    match parameter.ty {
        PlugType::Texture2D | PlugType::TextureCube => {
            let path = parameter
                .default
                .as_ref()
                .and_then(Value::as_str)
                .map(str::to_string);
            match c.register_texture(
                node.id,
                &parameter.name,
                parameter.ty,
                path,
                parameter.hints.clone(),
            ) {
                Some(symbol) => NodeResult::Resource {
                    symbol,
                    ty: parameter.ty,
                },
                None => NodeResult::Error,
            }
        }
        PlugType::Gradient => match &parameter.default {
            Some(Value::Gradient(stops)) => NodeResult::Gradient(stops.clone()),
            _ => NodeResult::Gradient(Vec::new()),
        },
        PlugType::Sampler | PlugType::Void => {
            c.diagnostic(Diagnostic::error(
                DiagnosticKind::Validation,
                Some(node.id),
                format!(
                    "parameter `{}` has type {} which cannot be exposed",
                    parameter.name,
                    parameter.ty.as_str()
                ),
            ));
            NodeResult::Error
        }
        _ => match c.register_parameter(node.id, &parameter) {
            Some(symbol) => NodeResult::expr(symbol, parameter.ty),
            None => NodeResult::Error,
        },
    }
}

fn orphaned(c: &mut Compiler, node: &Node) -> NodeResult {
    // Validation reports this as well; keep resolution side-effect free
    // and degrade to an error result.
    c.diagnostic(Diagnostic::error(
        DiagnosticKind::OrphanedParameter,
        Some(node.id),
        "parameter node references a deleted blackboard entry",
    ));
    NodeResult::Error
}
