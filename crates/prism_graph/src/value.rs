// SPDX-License-Identifier: MIT OR Apache-2.0
//! Value types that flow through plugs and node properties.

use serde::{Deserialize, Serialize};

/// Data type carried by a plug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlugType {
    /// Boolean value
    Bool,
    /// Integer value
    Int,
    /// Floating point value
    Float,
    /// 2D vector
    Vector2,
    /// 3D vector
    Vector3,
    /// 4D vector
    Vector4,
    /// Color (RGBA, linear)
    Color,
    /// Matrix 2x2
    Matrix2,
    /// Matrix 3x3
    Matrix3,
    /// Matrix 4x4
    Matrix4,
    /// 2D texture object
    Texture2D,
    /// Cube texture object
    TextureCube,
    /// Sampler state object
    Sampler,
    /// Color gradient (stop list, sampled at shader time)
    Gradient,
    /// No value (unused plugs on output-only nodes)
    Void,
}

impl PlugType {
    /// Number of scalar components for numeric types, `None` for objects.
    pub fn components(self) -> Option<u32> {
        match self {
            Self::Bool | Self::Int | Self::Float => Some(1),
            Self::Vector2 => Some(2),
            Self::Vector3 => Some(3),
            Self::Vector4 | Self::Color => Some(4),
            Self::Matrix2 => Some(4),
            Self::Matrix3 => Some(9),
            Self::Matrix4 => Some(16),
            Self::Texture2D | Self::TextureCube | Self::Sampler | Self::Gradient | Self::Void => {
                None
            }
        }
    }

    /// Whether the type is a scalar or vector of floats after codegen.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Bool
                | Self::Int
                | Self::Float
                | Self::Vector2
                | Self::Vector3
                | Self::Vector4
                | Self::Color
        )
    }

    /// HLSL type name, `None` for opaque objects that never appear as locals.
    pub fn hlsl_name(self) -> Option<&'static str> {
        match self {
            Self::Bool => Some("bool"),
            Self::Int => Some("int"),
            Self::Float => Some("float"),
            Self::Vector2 => Some("float2"),
            Self::Vector3 => Some("float3"),
            Self::Vector4 | Self::Color => Some("float4"),
            Self::Matrix2 => Some("float2x2"),
            Self::Matrix3 => Some("float3x3"),
            Self::Matrix4 => Some("float4x4"),
            Self::Texture2D => Some("Texture2D"),
            Self::TextureCube => Some("TextureCube"),
            Self::Sampler => Some("SamplerState"),
            Self::Gradient | Self::Void => None,
        }
    }

    /// Stable name used in persisted documents and node properties.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Vector2 => "Vector2",
            Self::Vector3 => "Vector3",
            Self::Vector4 => "Vector4",
            Self::Color => "Color",
            Self::Matrix2 => "Matrix2",
            Self::Matrix3 => "Matrix3",
            Self::Matrix4 => "Matrix4",
            Self::Texture2D => "Texture2D",
            Self::TextureCube => "TextureCube",
            Self::Sampler => "Sampler",
            Self::Gradient => "Gradient",
            Self::Void => "Void",
        }
    }

    /// Parse a stable name produced by [`PlugType::as_str`].
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "Bool" => Self::Bool,
            "Int" => Self::Int,
            "Float" => Self::Float,
            "Vector2" => Self::Vector2,
            "Vector3" => Self::Vector3,
            "Vector4" => Self::Vector4,
            "Color" => Self::Color,
            "Matrix2" => Self::Matrix2,
            "Matrix3" => Self::Matrix3,
            "Matrix4" => Self::Matrix4,
            "Texture2D" => Self::Texture2D,
            "TextureCube" => Self::TextureCube,
            "Sampler" => Self::Sampler,
            "Gradient" => Self::Gradient,
            "Void" => Self::Void,
            _ => return None,
        })
    }

    /// Check if a connection between two plug types is plausible.
    ///
    /// This is advisory only. The editor may allow any connection; the
    /// compiler enforces the actual casting rules when generating code.
    pub fn can_connect_to(self, other: PlugType) -> bool {
        if self == other {
            return true;
        }
        match (self.components(), other.components()) {
            // Numeric values cast between arities
            (Some(_), Some(_)) => true,
            _ => false,
        }
    }
}

/// One stop of a color gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position along the gradient, 0..1
    pub position: f32,
    /// Color at this stop (RGBA, linear)
    pub color: [f32; 4],
}

/// A literal value stored in node properties or plug defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i32),
    /// Float
    Float(f32),
    /// 2D vector
    Vector2([f32; 2]),
    /// 3D vector
    Vector3([f32; 3]),
    /// 4D vector
    Vector4([f32; 4]),
    /// Color (RGBA, linear)
    Color([f32; 4]),
    /// Matrix 2x2, row-major
    Matrix2([f32; 4]),
    /// Matrix 3x3, row-major
    Matrix3([f32; 9]),
    /// Matrix 4x4, row-major
    Matrix4([f32; 16]),
    /// Gradient stop list
    Gradient(Vec<GradientStop>),
    /// String (asset paths, names, plug type tags)
    String(String),
}

impl Value {
    /// The plug type this literal produces, `None` for strings.
    pub fn plug_type(&self) -> Option<PlugType> {
        match self {
            Self::Bool(_) => Some(PlugType::Bool),
            Self::Int(_) => Some(PlugType::Int),
            Self::Float(_) => Some(PlugType::Float),
            Self::Vector2(_) => Some(PlugType::Vector2),
            Self::Vector3(_) => Some(PlugType::Vector3),
            Self::Vector4(_) => Some(PlugType::Vector4),
            Self::Color(_) => Some(PlugType::Color),
            Self::Matrix2(_) => Some(PlugType::Matrix2),
            Self::Matrix3(_) => Some(PlugType::Matrix3),
            Self::Matrix4(_) => Some(PlugType::Matrix4),
            Self::Gradient(_) => Some(PlugType::Gradient),
            Self::String(_) => None,
        }
    }

    /// Typed zero/default literal for a constructible plug type.
    ///
    /// Object types (textures, samplers) have no literal representation and
    /// return `None`.
    pub fn zero(ty: PlugType) -> Option<Value> {
        Some(match ty {
            PlugType::Bool => Value::Bool(false),
            PlugType::Int => Value::Int(0),
            PlugType::Float => Value::Float(0.0),
            PlugType::Vector2 => Value::Vector2([0.0; 2]),
            PlugType::Vector3 => Value::Vector3([0.0; 3]),
            PlugType::Vector4 => Value::Vector4([0.0; 4]),
            PlugType::Color => Value::Color([0.0, 0.0, 0.0, 1.0]),
            PlugType::Matrix2 => Value::Matrix2([0.0; 4]),
            PlugType::Matrix3 => Value::Matrix3([0.0; 9]),
            PlugType::Matrix4 => Value::Matrix4([0.0; 16]),
            PlugType::Gradient => Value::Gradient(Vec::new()),
            PlugType::Texture2D | PlugType::TextureCube | PlugType::Sampler | PlugType::Void => {
                return None;
            }
        })
    }

    /// Read this value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Read this value as a float, converting ints and bools.
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f32),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plug_type_round_trip_names() {
        for ty in [
            PlugType::Bool,
            PlugType::Float,
            PlugType::Vector3,
            PlugType::Color,
            PlugType::Matrix4,
            PlugType::Texture2D,
            PlugType::Gradient,
        ] {
            assert_eq!(PlugType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(PlugType::parse("Quaternion"), None);
    }

    #[test]
    fn test_components() {
        assert_eq!(PlugType::Float.components(), Some(1));
        assert_eq!(PlugType::Color.components(), Some(4));
        assert_eq!(PlugType::Texture2D.components(), None);
    }

    #[test]
    fn test_zero_values_are_typed() {
        let zero = Value::zero(PlugType::Vector3).unwrap();
        assert_eq!(zero.plug_type(), Some(PlugType::Vector3));
        assert!(Value::zero(PlugType::Sampler).is_none());
    }

    #[test]
    fn test_advisory_connection_rules() {
        assert!(PlugType::Float.can_connect_to(PlugType::Vector3));
        assert!(PlugType::Color.can_connect_to(PlugType::Vector4));
        assert!(!PlugType::Texture2D.can_connect_to(PlugType::Float));
        assert!(PlugType::Sampler.can_connect_to(PlugType::Sampler));
    }
}
