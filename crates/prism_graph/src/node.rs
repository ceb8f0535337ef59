// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the shader graph.

use crate::blackboard::{BlackboardParameter, ParameterId};
use crate::plug::InputConnection;
use crate::registry::NodeDescriptor;
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// A node instance in the graph.
///
/// Plug lists are not stored here; they are derived from the registry
/// descriptor for `type_id` (plus the descriptor's dynamic hooks, which may
/// react to property values).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Registry type tag
    pub type_id: String,
    /// Schema version the node data conforms to
    pub version: u32,
    /// Position in the graph editor, irrelevant to compilation
    pub position: [f32; 2],
    /// Property name -> literal value. Holds node settings and per-plug
    /// default overrides (keyed by the input plug name).
    pub properties: IndexMap<String, Value>,
    /// Input plug name -> connection to a source output
    pub inputs: IndexMap<String, InputConnection>,
}

impl Node {
    /// Create a new node instance from a registry descriptor.
    pub fn new(descriptor: &NodeDescriptor) -> Self {
        Self {
            id: NodeId::new(),
            type_id: descriptor.type_id.to_string(),
            version: descriptor.version,
            position: [0.0, 0.0],
            properties: descriptor
                .defaults
                .iter()
                .map(|(name, value)| ((*name).to_string(), value.clone()))
                .collect(),
            inputs: IndexMap::new(),
        }
    }

    /// Set the editor position.
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Set a property.
    pub fn with_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Get a property value.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Get a string property.
    pub fn property_str(&self, name: &str) -> Option<&str> {
        self.properties.get(name).and_then(Value::as_str)
    }

    /// Get the connection feeding an input plug, if any.
    pub fn input_connection(&self, plug: &str) -> Option<&InputConnection> {
        self.inputs.get(plug)
    }

    /// The blackboard parameter this node mirrors, for parameter nodes.
    pub fn parameter_ref(&self) -> Option<ParameterId> {
        let raw = self.property_str("parameter")?;
        Uuid::parse_str(raw).ok().map(ParameterId)
    }

    /// Mirror blackboard state into this node's cached display properties.
    ///
    /// One-way: the blackboard entry is the source of truth; the node only
    /// caches name and type for display and for plug derivation.
    pub fn update_from_blackboard(&mut self, parameter: &BlackboardParameter) {
        self.properties.insert(
            "name".to_string(),
            Value::String(parameter.name.clone()),
        );
        self.properties.insert(
            "type".to_string(),
            Value::String(parameter.ty.as_str().to_string()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PlugType;

    #[test]
    fn test_parameter_ref_parses_guid() {
        let param = BlackboardParameter::new("Tint", PlugType::Color);
        let node = Node {
            id: NodeId::new(),
            type_id: "parameter".to_string(),
            version: 1,
            position: [0.0, 0.0],
            properties: IndexMap::new(),
            inputs: IndexMap::new(),
        }
        .with_property("parameter", Value::String(param.id.0.to_string()));

        assert_eq!(node.parameter_ref(), Some(param.id));
    }

    #[test]
    fn test_parameter_ref_rejects_garbage() {
        let node = Node {
            id: NodeId::new(),
            type_id: "parameter".to_string(),
            version: 1,
            position: [0.0, 0.0],
            properties: IndexMap::new(),
            inputs: IndexMap::new(),
        }
        .with_property("parameter", Value::String("not-a-guid".to_string()));

        assert_eq!(node.parameter_ref(), None);
    }

    #[test]
    fn test_update_from_blackboard_caches_name_and_type() {
        let param = BlackboardParameter::new("Roughness", PlugType::Float);
        let mut node = Node {
            id: NodeId::new(),
            type_id: "parameter".to_string(),
            version: 1,
            position: [0.0, 0.0],
            properties: IndexMap::new(),
            inputs: IndexMap::new(),
        };
        node.update_from_blackboard(&param);
        assert_eq!(node.property_str("name"), Some("Roughness"));
        assert_eq!(node.property_str("type"), Some("Float"));
    }
}
