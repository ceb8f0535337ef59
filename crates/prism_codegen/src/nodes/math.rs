// SPDX-License-Identifier: MIT OR Apache-2.0
//! Evaluators for scalar and vector math nodes.
//!
//! Binary operators are polymorphic: both operands are resolved with their
//! natural types, unified to the wider arity, and cast before the operator
//! is applied. HLSL's scalar broadcasting is never relied on for operands
//! of different vector widths.

use super::unknown_output;
use crate::compiler::Compiler;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::result::NodeResult;
use prism_graph::{Node, PlugType};

/// Resolve a math operand without casting; a missing operand degrades to a
/// float zero so one unconnected plug never poisons the whole expression.
fn operand(c: &mut Compiler, node: &Node, name: &str) -> NodeResult {
    let plug = c
        .registry()
        .input_plug(node, name)
        .unwrap_or_else(|| panic!("math node `{}` declares input `{name}`", node.type_id));
    match c.input_untyped(node, &plug) {
        NodeResult::Missing => NodeResult::constant("0.0", PlugType::Float),
        NodeResult::Resource { .. } | NodeResult::Gradient(_) => {
            c.diagnostic(Diagnostic::error(
                DiagnosticKind::InvalidCast,
                Some(node.id),
                format!("input `{name}` expects a numeric value, not an object"),
            ));
            NodeResult::Error
        }
        other => other,
    }
}

/// Widest numeric type across two operands. Scalars always compute as
/// floats; equal arities above one keep the vector type.
fn unify(a: PlugType, b: PlugType) -> PlugType {
    let n = a
        .components()
        .unwrap_or(1)
        .max(b.components().unwrap_or(1));
    match n {
        2 => PlugType::Vector2,
        3 => PlugType::Vector3,
        4 => PlugType::Vector4,
        _ => PlugType::Float,
    }
}

pub fn binary(c: &mut Compiler, node: &Node, output: &str) -> NodeResult {
    if output != "result" {
        return unknown_output(c, node, output);
    }

    // Dot and cross fix their operand type by declaration.
    if matches!(node.type_id.as_str(), "dot" | "cross") {
        let a = c.input(node, "a");
        let b = c.input(node, "b");
        let (Some(a_code), Some(b_code)) = (a.code(), b.code()) else {
            return NodeResult::Error;
        };
        return match node.type_id.as_str() {
            "dot" => NodeResult::expr(format!("dot({a_code}, {b_code})"), PlugType::Float),
            _ => NodeResult::expr(format!("cross({a_code}, {b_code})"), PlugType::Vector3),
        };
    }

    let a = operand(c, node, "a");
    let b = operand(c, node, "b");
    let (Some(a_ty), Some(b_ty)) = (a.ty(), b.ty()) else {
        return NodeResult::Error;
    };
    let ty = unify(a_ty, b_ty);
    let a = c.cast(a, ty, Some(node.id));
    let b = c.cast(b, ty, Some(node.id));
    let (NodeResult::Value { code: a_code, constant: a_const, .. },
         NodeResult::Value { code: b_code, constant: b_const, .. }) = (a, b)
    else {
        return NodeResult::Error;
    };
    let constant = a_const && b_const;

    let (code, result_ty) = match node.type_id.as_str() {
        "add" => (format!("({a_code} + {b_code})"), ty),
        "subtract" => (format!("({a_code} - {b_code})"), ty),
        "multiply" => (format!("({a_code} * {b_code})"), ty),
        "divide" => (format!("({a_code} / {b_code})"), ty),
        "power" => (format!("pow({a_code}, {b_code})"), ty),
        "min" => (format!("min({a_code}, {b_code})"), ty),
        "max" => (format!("max({a_code}, {b_code})"), ty),
        "distance" => (format!("distance({a_code}, {b_code})"), PlugType::Float),
        other => unreachable!("binary dispatch covers `{other}`"),
    };
    NodeResult::Value {
        code,
        ty: result_ty,
        constant,
    }
}

pub fn unary(c: &mut Compiler, node: &Node, output: &str) -> NodeResult {
    if output != "result" {
        return unknown_output(c, node, output);
    }
    let value = operand(c, node, "value");
    let Some(value_ty) = value.ty() else {
        return NodeResult::Error;
    };
    // Bool/int operands compute as floats.
    let ty = unify(value_ty, PlugType::Float);
    let NodeResult::Value { code, constant, .. } = c.cast(value, ty, Some(node.id)) else {
        return NodeResult::Error;
    };

    let (code, result_ty) = match node.type_id.as_str() {
        "abs" => (format!("abs({code})"), ty),
        "negate" => (format!("(-{code})"), ty),
        "sqrt" => (format!("sqrt({code})"), ty),
        "floor" => (format!("floor({code})"), ty),
        "ceil" => (format!("ceil({code})"), ty),
        "frac" => (format!("frac({code})"), ty),
        "one_minus" => (format!("(1.0 - {code})"), ty),
        "saturate" => (format!("saturate({code})"), ty),
        "sin" => (format!("sin({code})"), ty),
        "cos" => (format!("cos({code})"), ty),
        "normalize" => (format!("normalize({code})"), ty),
        "length" => (format!("length({code})"), PlugType::Float),
        other => unreachable!("unary dispatch covers `{other}`"),
    };
    NodeResult::Value {
        code,
        ty: result_ty,
        constant,
    }
}

pub fn lerp(c: &mut Compiler, node: &Node, output: &str) -> NodeResult {
    if output != "result" {
        return unknown_output(c, node, output);
    }
    let a = operand(c, node, "a");
    let b = operand(c, node, "b");
    let (Some(a_ty), Some(b_ty)) = (a.ty(), b.ty()) else {
        return NodeResult::Error;
    };
    let ty = unify(a_ty, b_ty);
    let a = c.cast(a, ty, Some(node.id));
    let b = c.cast(b, ty, Some(node.id));
    let t = c.input(node, "t");
    let (Some(a_code), Some(b_code), Some(t_code)) = (a.code(), b.code(), t.code()) else {
        return NodeResult::Error;
    };
    NodeResult::expr(format!("lerp({a_code}, {b_code}, {t_code})"), ty)
}

pub fn clamp(c: &mut Compiler, node: &Node, output: &str) -> NodeResult {
    if output != "result" {
        return unknown_output(c, node, output);
    }
    let value = operand(c, node, "value");
    let Some(value_ty) = value.ty() else {
        return NodeResult::Error;
    };
    let ty = unify(value_ty, PlugType::Float);
    let value = c.cast(value, ty, Some(node.id));
    let lo = operand(c, node, "min");
    let lo = c.cast(lo, ty, Some(node.id));
    let hi = operand(c, node, "max");
    let hi = c.cast(hi, ty, Some(node.id));
    let (Some(v), Some(lo), Some(hi)) = (value.code(), lo.code(), hi.code()) else {
        return NodeResult::Error;
    };
    NodeResult::expr(format!("clamp({v}, {lo}, {hi})"), ty)
}

pub fn smoothstep(c: &mut Compiler, node: &Node, output: &str) -> NodeResult {
    if output != "result" {
        return unknown_output(c, node, output);
    }
    let x = operand(c, node, "x");
    let Some(x_ty) = x.ty() else {
        return NodeResult::Error;
    };
    let ty = unify(x_ty, PlugType::Float);
    let x = c.cast(x, ty, Some(node.id));
    let edge0 = operand(c, node, "edge0");
    let edge0 = c.cast(edge0, ty, Some(node.id));
    let edge1 = operand(c, node, "edge1");
    let edge1 = c.cast(edge1, ty, Some(node.id));
    let (Some(x), Some(e0), Some(e1)) = (x.code(), edge0.code(), edge1.code()) else {
        return NodeResult::Error;
    };
    NodeResult::expr(format!("smoothstep({e0}, {e1}, {x})"), ty)
}
