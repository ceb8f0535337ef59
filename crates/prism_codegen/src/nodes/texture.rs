// SPDX-License-Identifier: MIT OR Apache-2.0
//! Evaluators for texture sampling and gradient sampling.

use super::unknown_output;
use crate::compiler::Compiler;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::emit;
use crate::result::NodeResult;
use prism_graph::{GradientStop, Node, ParameterHints, PlugType, Value};

/// Sample a texture at a UV coordinate.
///
/// The texture comes from the `texture` input plug (fed by a texture
/// parameter node) or, unconnected, from the node's own `texture` asset
/// path property, which registers a binding under that path.
pub fn sample(c: &mut Compiler, node: &Node, output: &str) -> NodeResult {
    let channel = match output {
        "color" => None,
        "r" => Some("x"),
        "g" => Some("y"),
        "b" => Some("z"),
        "a" => Some("w"),
        other => return unknown_output(c, node, other),
    };
    if let Some(component) = channel {
        // Channels share the one hoisted sample via the color output.
        return match c.result_of(node.id, "color") {
            NodeResult::Value { code, constant, .. } => NodeResult::Value {
                code: format!("({code}).{component}"),
                ty: PlugType::Float,
                constant,
            },
            other => other,
        };
    }

    let texture = resolve_texture(c, node);
    let Some((symbol, texture_ty)) = texture else {
        return NodeResult::Error;
    };

    let filter = node.property_str("filter").unwrap_or("linear").to_string();
    let Some(sampler) = c.register_sampler(node.id, &filter) else {
        return NodeResult::Error;
    };

    // Cube textures sample by direction, 2D by UV.
    let uv_ty = if texture_ty == PlugType::TextureCube {
        PlugType::Vector3
    } else {
        PlugType::Vector2
    };
    let uv_plug = c
        .registry()
        .input_plug(node, "uv")
        .expect("texture_sample declares `uv`");
    let uv = match c.input_untyped(node, &uv_plug) {
        NodeResult::Missing => NodeResult::expr("input.uv", PlugType::Vector2),
        other => other,
    };
    let uv = c.cast(uv, uv_ty, Some(node.id));
    let Some(uv_code) = uv.code().map(str::to_string) else {
        return NodeResult::Error;
    };

    NodeResult::expr(
        format!("{symbol}.Sample({sampler}, {uv_code})"),
        PlugType::Color,
    )
}

fn resolve_texture(c: &mut Compiler, node: &Node) -> Option<(String, PlugType)> {
    if let Some(conn) = node.input_connection("texture") {
        let conn = conn.clone();
        if c.graph().find_node(conn.node).is_some() {
            return match c.result_of(conn.node, &conn.output) {
                NodeResult::Resource { symbol, ty } => Some((symbol, ty)),
                NodeResult::Error => None,
                _ => {
                    c.diagnostic(Diagnostic::error(
                        DiagnosticKind::InvalidCast,
                        Some(node.id),
                        "input `texture` expects a texture object",
                    ));
                    None
                }
            };
        }
    }
    let path = node.property_str("texture").unwrap_or("");
    if path.is_empty() {
        c.diagnostic(Diagnostic::error(
            DiagnosticKind::MissingInput,
            Some(node.id),
            "texture sample has no connected texture and no asset path",
        ));
        return None;
    }
    let path = path.to_string();
    c.register_texture(
        node.id,
        &path,
        PlugType::Texture2D,
        Some(path.clone()),
        ParameterHints::default(),
    )
    .map(|symbol| (symbol, PlugType::Texture2D))
}

/// Sample a gradient at a time value by expanding the stop list into a
/// chain of lerps. The gradient itself never reaches the GPU; only the
/// expanded arithmetic does.
pub fn sample_gradient(c: &mut Compiler, node: &Node, output: &str) -> NodeResult {
    if output != "color" {
        return unknown_output(c, node, output);
    }
    let gradient_plug = c
        .registry()
        .input_plug(node, "gradient")
        .expect("sample_gradient declares `gradient`");
    let stops = match c.input_untyped(node, &gradient_plug) {
        NodeResult::Gradient(stops) => stops,
        NodeResult::Missing | NodeResult::Error => return NodeResult::Error,
        _ => {
            c.diagnostic(Diagnostic::error(
                DiagnosticKind::InvalidCast,
                Some(node.id),
                "input `gradient` expects gradient data",
            ));
            return NodeResult::Error;
        }
    };

    let mut stops: Vec<GradientStop> = stops;
    stops.sort_by(|a, b| a.position.total_cmp(&b.position));

    match stops.len() {
        0 => NodeResult::constant("float4(0.0, 0.0, 0.0, 1.0)", PlugType::Color),
        1 => {
            let (code, _) = emit::literal(&Value::Color(stops[0].color))
                .expect("colors always have a literal form");
            NodeResult::constant(code, PlugType::Color)
        }
        _ => {
            let time = c.input(node, "time");
            let Some(time_code) = time.code().map(str::to_string) else {
                return NodeResult::Error;
            };
            let mut chain = emit::literal(&Value::Color(stops[0].color))
                .expect("colors always have a literal form")
                .0;
            for window in stops.windows(2) {
                let (prev, next) = (&window[0], &window[1]);
                let span = (next.position - prev.position).max(1e-6);
                let color = emit::literal(&Value::Color(next.color))
                    .expect("colors always have a literal form")
                    .0;
                chain = format!(
                    "lerp({chain}, {color}, saturate((({time_code}) - {}) / {}))",
                    emit::float_literal(prev.position),
                    emit::float_literal(span),
                );
            }
            NodeResult::expr(chain, PlugType::Color)
        }
    }
}
