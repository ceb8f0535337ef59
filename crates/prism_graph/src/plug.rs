// SPDX-License-Identifier: MIT OR Apache-2.0
//! Plug definitions - the typed, named connection points on nodes.

use crate::node::NodeId;
use crate::value::{PlugType, Value};
use serde::{Deserialize, Serialize};

/// Plug direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlugDirection {
    /// Input plug
    Input,
    /// Output plug
    Output,
}

/// Describes one plug of a node type.
///
/// Plug lists are derived from the node registry, never persisted. A plug
/// name is unique among its node's plugs of the same direction.
#[derive(Debug, Clone)]
pub struct PlugDesc {
    /// Plug name
    pub name: String,
    /// Declared value type
    pub ty: PlugType,
    /// Whether an input must be connected or carry a usable default
    pub required: bool,
    /// Literal default used when an input is unconnected
    pub default: Option<Value>,
}

impl PlugDesc {
    /// Create a plug description.
    pub fn new(name: impl Into<String>, ty: PlugType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: false,
            default: None,
        }
    }

    /// Set the literal default.
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Mark the plug as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A connection stored on an input plug: the source node and output name.
///
/// An input plug holds at most one connection; output fan-out is
/// unrestricted. A connection whose source node no longer exists is
/// "dangling" and is treated exactly like an unconnected plug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConnection {
    /// Source node identifier
    pub node: NodeId,
    /// Source output plug name
    pub output: String,
}

impl InputConnection {
    /// Create a connection reference.
    pub fn new(node: NodeId, output: impl Into<String>) -> Self {
        Self {
            node,
            output: output.into(),
        }
    }
}
