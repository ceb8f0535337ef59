// SPDX-License-Identifier: MIT OR Apache-2.0
//! HLSL text emission helpers.
//!
//! The generated unit is host-agnostic: resource declarations, then one
//! evaluation function. The host wraps it with its own `MaterialInput` /
//! `MaterialOutput` struct definitions before handing the text to the
//! shading-language toolchain.

use crate::manifest::{ResourceBinding, ResourceKind};
use prism_graph::{PlugType, Value};

/// Format a float so it always reads as a float literal in HLSL.
pub fn float_literal(value: f32) -> String {
    if value.is_finite() {
        // Debug formatting always keeps a decimal point or exponent.
        format!("{value:?}")
    } else if value.is_nan() {
        "(0.0 / 0.0)".to_string()
    } else if value > 0.0 {
        "(1.0 / 0.0)".to_string()
    } else {
        "(-1.0 / 0.0)".to_string()
    }
}

/// Emit a literal value as an HLSL expression, with its plug type.
///
/// Strings and gradients have no inline representation and return `None`.
pub fn literal(value: &Value) -> Option<(String, PlugType)> {
    let (code, ty) = match value {
        Value::Bool(b) => (b.to_string(), PlugType::Bool),
        Value::Int(i) => (i.to_string(), PlugType::Int),
        Value::Float(f) => (float_literal(*f), PlugType::Float),
        Value::Vector2(v) => (components("float2", v), PlugType::Vector2),
        Value::Vector3(v) => (components("float3", v), PlugType::Vector3),
        Value::Vector4(v) => (components("float4", v), PlugType::Vector4),
        Value::Color(v) => (components("float4", v), PlugType::Color),
        Value::Matrix2(v) => (components("float2x2", v), PlugType::Matrix2),
        Value::Matrix3(v) => (components("float3x3", v), PlugType::Matrix3),
        Value::Matrix4(v) => (components("float4x4", v), PlugType::Matrix4),
        Value::Gradient(_) | Value::String(_) => return None,
    };
    Some((code, ty))
}

fn components(constructor: &str, values: &[f32]) -> String {
    let joined = values
        .iter()
        .map(|v| float_literal(*v))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{constructor}({joined})")
}

/// Whether a fragment is a bare symbol or field access that is safe to
/// repeat without hoisting into a local.
pub fn is_atom(code: &str) -> bool {
    !code.is_empty()
        && code
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// Turn a display name into a valid HLSL identifier.
pub fn sanitize_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "value".to_string()
    } else if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        format!("v_{trimmed}")
    } else {
        trimmed.to_string()
    }
}

/// Material output struct field for an output-node input plug.
pub fn material_output_field(plug: &str) -> Option<&'static str> {
    Some(match plug {
        "base_color" => "BaseColor",
        "metallic" => "Metallic",
        "roughness" => "Roughness",
        "emissive" => "Emissive",
        "normal" => "Normal",
        "opacity" => "Opacity",
        "ambient_occlusion" => "AmbientOcclusion",
        _ => return None,
    })
}

/// Assemble the resource declaration preamble.
pub fn preamble(bindings: &[ResourceBinding]) -> String {
    let mut out = String::new();
    for binding in bindings {
        match binding.kind {
            ResourceKind::Texture2D => {
                out.push_str(&format!(
                    "Texture2D {} : register(t{});\n",
                    binding.symbol, binding.slot
                ));
            }
            ResourceKind::TextureCube => {
                out.push_str(&format!(
                    "TextureCube {} : register(t{});\n",
                    binding.symbol, binding.slot
                ));
            }
            ResourceKind::Sampler => {
                out.push_str(&format!(
                    "SamplerState {} : register(s{});\n",
                    binding.symbol, binding.slot
                ));
            }
            ResourceKind::Parameter => {}
        }
    }

    let parameters: Vec<&ResourceBinding> = bindings
        .iter()
        .filter(|b| b.kind == ResourceKind::Parameter)
        .collect();
    if !parameters.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("cbuffer MaterialParams : register(b0)\n{\n");
        for binding in parameters {
            let ty = binding.ty.hlsl_name().unwrap_or("float4");
            out.push_str(&format!("    {ty} {};\n", binding.symbol));
        }
        out.push_str("};\n");
    }
    out
}

/// Assemble the full generated unit.
pub fn assemble(
    preamble: &str,
    signature: &str,
    statements: &[String],
    epilogue: &[String],
) -> String {
    let mut out = String::from("// Generated by the Prism shader graph compiler.\n");
    if !preamble.is_empty() {
        out.push('\n');
        out.push_str(preamble);
    }
    out.push('\n');
    out.push_str(signature);
    out.push_str("\n{\n");
    for statement in statements {
        out.push_str("    ");
        out.push_str(statement);
        out.push('\n');
    }
    if !statements.is_empty() && !epilogue.is_empty() {
        out.push('\n');
    }
    for line in epilogue {
        out.push_str("    ");
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_literal_keeps_decimal_point() {
        assert_eq!(float_literal(1.0), "1.0");
        assert_eq!(float_literal(0.5), "0.5");
        assert_eq!(float_literal(-2.0), "-2.0");
    }

    #[test]
    fn test_literal_vector() {
        let (code, ty) = literal(&Value::Vector3([0.0, 0.5, 1.0])).unwrap();
        assert_eq!(code, "float3(0.0, 0.5, 1.0)");
        assert_eq!(ty, PlugType::Vector3);
    }

    #[test]
    fn test_literal_has_no_string_form() {
        assert!(literal(&Value::String("path".to_string())).is_none());
    }

    #[test]
    fn test_is_atom() {
        assert!(is_atom("local_3"));
        assert!(is_atom("input.uv"));
        assert!(!is_atom("(a + b)"));
        assert!(!is_atom("0.5"));
        assert!(!is_atom(""));
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("Base Color"), "base_color");
        assert_eq!(sanitize_identifier("2nd Layer"), "v_2nd_layer");
        assert_eq!(sanitize_identifier("!!!"), "value");
    }
}
