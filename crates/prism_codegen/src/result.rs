// SPDX-License-Identifier: MIT OR Apache-2.0
//! The compiler's intermediate value for one resolved node output.

use prism_graph::{GradientStop, PlugType};

/// Result of resolving one `(node, output)` pair.
///
/// Ephemeral: produced and consumed within a single compile pass, cached in
/// the pass-scoped memo table, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeResult {
    /// A generated code fragment with its declared type.
    Value {
        /// HLSL expression text. Non-constant fragments are hoisted into
        /// `local_N` statements before caching, so shared upstream nodes
        /// are declared exactly once.
        code: String,
        /// Declared type of the fragment
        ty: PlugType,
        /// Whether the fragment is a literal safe to inline anywhere
        constant: bool,
    },
    /// An opaque resource object (texture or sampler) flowing between
    /// plugs as a bound global symbol.
    Resource {
        /// Generated global symbol
        symbol: String,
        /// Object type
        ty: PlugType,
    },
    /// Gradient stop data flowing between plugs at compile time.
    Gradient(Vec<GradientStop>),
    /// The input was unconnected with no usable default.
    Missing,
    /// Resolution failed; a diagnostic has already been recorded.
    Error,
}

impl NodeResult {
    /// A constant literal fragment.
    pub fn constant(code: impl Into<String>, ty: PlugType) -> Self {
        Self::Value {
            code: code.into(),
            ty,
            constant: true,
        }
    }

    /// A non-constant fragment.
    pub fn expr(code: impl Into<String>, ty: PlugType) -> Self {
        Self::Value {
            code: code.into(),
            ty,
            constant: false,
        }
    }

    /// The fragment type, if this is a value.
    pub fn ty(&self) -> Option<PlugType> {
        match self {
            Self::Value { ty, .. } | Self::Resource { ty, .. } => Some(*ty),
            Self::Gradient(_) => Some(PlugType::Gradient),
            Self::Missing | Self::Error => None,
        }
    }

    /// The fragment code, if this is a value.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Value { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Whether resolution produced something usable.
    pub fn is_usable(&self) -> bool {
        !matches!(self, Self::Missing | Self::Error)
    }
}
