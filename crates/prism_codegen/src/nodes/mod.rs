// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-kind node evaluators.
//!
//! [`evaluate`] dispatches on the node's type tag. Evaluators record
//! diagnostics on the compiler instead of returning errors, so a pass
//! always runs to completion and reports everything it found.

pub mod function;
pub mod input;
pub mod math;
pub mod texture;
pub mod utility;

use crate::compiler::Compiler;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::result::NodeResult;
use prism_graph::Node;

pub(crate) fn evaluate(c: &mut Compiler, node: &Node, output: &str) -> NodeResult {
    match node.type_id.as_str() {
        // Constants
        "float_constant" | "int_constant" | "bool_constant" | "vector2_constant"
        | "vector3_constant" | "vector4_constant" | "color_constant" => {
            input::constant(c, node, output)
        }
        "gradient_constant" => input::gradient_constant(c, node, output),

        // Attributes and parameters
        "uv_coordinate" => input::uv_coordinate(c, node, output),
        "world_position" => input::world_position(c, node, output),
        "time" => input::time(c, node, output),
        "parameter" => input::parameter(c, node, output),

        // Textures and gradients
        "texture_sample" => texture::sample(c, node, output),
        "sample_gradient" => texture::sample_gradient(c, node, output),

        // Math
        "add" | "subtract" | "multiply" | "divide" | "power" | "min" | "max" | "distance"
        | "dot" | "cross" => math::binary(c, node, output),
        "lerp" => math::lerp(c, node, output),
        "clamp" => math::clamp(c, node, output),
        "smoothstep" => math::smoothstep(c, node, output),
        "abs" | "negate" | "sqrt" | "floor" | "ceil" | "frac" | "one_minus" | "saturate"
        | "sin" | "cos" | "normalize" | "length" => math::unary(c, node, output),

        // Vector utilities
        "split_vector2" | "split_vector3" | "split_vector4" => utility::split(c, node, output),
        "combine_vector2" | "combine_vector3" | "combine_vector4" => {
            utility::combine(c, node, output)
        }
        "swizzle" => utility::swizzle(c, node, output),

        // Named values
        "named_declaration" => utility::named_declaration(c, node, output),
        "named_reference" => utility::named_reference(c, node, output),

        // Functions
        "function_reference" => function::reference(c, node, output),
        "function_output" => function::output(c, node, output),

        "material_output" => {
            c.diagnostic(Diagnostic::error(
                DiagnosticKind::UnknownOutput,
                Some(node.id),
                "material output node has no output plugs",
            ));
            NodeResult::Error
        }

        other => {
            c.diagnostic(Diagnostic::error(
                DiagnosticKind::UnknownNodeType,
                Some(node.id),
                format!("unknown node type `{other}`"),
            ));
            NodeResult::Error
        }
    }
}

/// Shared diagnostic for a request naming an output plug the node lacks.
pub(crate) fn unknown_output(c: &mut Compiler, node: &Node, output: &str) -> NodeResult {
    c.diagnostic(Diagnostic::error(
        DiagnosticKind::UnknownOutput,
        Some(node.id),
        format!(
            "`{}` node has no output plug named `{output}`",
            node.type_id
        ),
    ));
    NodeResult::Error
}
