// SPDX-License-Identifier: MIT OR Apache-2.0
//! The resource-binding manifest handed back to the host.

use prism_graph::{ParameterHints, PlugType, Value};
use serde::{Deserialize, Serialize};

/// Kind of an external resource referenced by generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    /// 2D texture, bound to a `t` register
    Texture2D,
    /// Cube texture, bound to a `t` register
    TextureCube,
    /// Sampler state, bound to an `s` register
    Sampler,
    /// Scalar/vector/matrix constant inside the material cbuffer
    Parameter,
}

/// One entry of the binding manifest: a generated global symbol and the
/// logical metadata the host needs to bind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceBinding {
    /// Compiler-assigned unique global symbol
    pub symbol: String,
    /// Resource kind
    pub kind: ResourceKind,
    /// Logical name the resource was registered under
    pub name: String,
    /// Register slot (`t`/`s` index) or cbuffer field order for parameters
    pub slot: u32,
    /// Value type of the resource
    pub ty: PlugType,
    /// Default value: a literal for parameters, an asset path for textures
    pub default: Option<Value>,
    /// Editor presentation hints carried over from the blackboard
    pub hints: ParameterHints,
}
