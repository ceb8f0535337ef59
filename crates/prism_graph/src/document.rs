// SPDX-License-Identifier: MIT OR Apache-2.0
//! Persisted graph documents.
//!
//! A graph is stored as a versioned JSON document: a node list, the
//! blackboard parameter list, and per-node property maps. Connected input
//! plugs are represented as `{node, output}` pairs; unconnected plugs carry
//! only literal defaults inside the property map. Node properties are kept
//! as raw JSON until schema migrations have run, so migrations can rewrite
//! shapes that no longer parse as live values.

use crate::blackboard::BlackboardParameter;
use crate::graph::{Graph, GraphKind};
use crate::migration;
use crate::node::{Node, NodeId};
use crate::plug::InputConnection;
use crate::registry::NodeRegistry;
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

/// Current document format version
pub const DOCUMENT_FORMAT_VERSION: u32 = 1;

/// One persisted node entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeData {
    /// Node identifier
    pub id: NodeId,
    /// Node type tag
    #[serde(rename = "type")]
    pub type_id: String,
    /// Schema version the properties were written with
    pub version: u32,
    /// Editor position, preserved for round-trip only
    pub position: [f32; 2],
    /// Raw property map, migrated before materialization
    pub properties: Map<String, JsonValue>,
    /// Input plug name -> source connection
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub inputs: IndexMap<String, InputConnection>,
}

/// A persisted graph document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Document format version
    pub format: u32,
    /// Graph name
    pub name: String,
    /// How the graph is consumed
    pub kind: GraphKind,
    /// Blackboard parameter list
    #[serde(default)]
    pub parameters: Vec<BlackboardParameter>,
    /// Node entries in graph order
    pub nodes: Vec<NodeData>,
}

/// Error loading or saving a document
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Document was written by a newer editor
    #[error("unsupported document format version {0}")]
    UnsupportedFormat(u32),

    /// A node entry names a type the registry does not know
    #[error("unknown node type `{0}`")]
    UnknownNodeType(String),

    /// JSON (de)serialization failed
    #[error("document serialization failed")]
    Json(#[from] serde_json::Error),
}

impl GraphDocument {
    /// Snapshot a live graph into its persisted form.
    pub fn from_graph(graph: &Graph) -> Self {
        let nodes = graph
            .nodes()
            .map(|node| NodeData {
                id: node.id,
                type_id: node.type_id.clone(),
                version: node.version,
                position: node.position,
                properties: node
                    .properties
                    .iter()
                    .map(|(k, v)| {
                        let raw = serde_json::to_value(v)
                            .expect("property values always serialize");
                        (k.clone(), raw)
                    })
                    .collect(),
                inputs: node.inputs.clone(),
            })
            .collect();

        Self {
            format: DOCUMENT_FORMAT_VERSION,
            name: graph.name.clone(),
            kind: graph.kind,
            parameters: graph.parameters().to_vec(),
            nodes,
        }
    }

    /// Materialize the document into a live graph.
    ///
    /// Schema migrations are applied per node first. A node whose data
    /// cannot be migrated reverts to its type defaults and the load
    /// continues; an unknown node type fails the whole load.
    pub fn into_graph(self, registry: &NodeRegistry) -> Result<Graph, DocumentError> {
        if self.format > DOCUMENT_FORMAT_VERSION {
            return Err(DocumentError::UnsupportedFormat(self.format));
        }

        let mut graph = Graph::new(self.name);
        graph.kind = self.kind;
        for parameter in self.parameters {
            graph.add_parameter(parameter);
        }

        for data in self.nodes {
            let descriptor = registry
                .get(&data.type_id)
                .ok_or_else(|| DocumentError::UnknownNodeType(data.type_id.clone()))?;

            let mut version = data.version;
            let mut raw = data.properties;
            let properties = match migration::upgrade(
                &descriptor.migrations,
                &mut version,
                &mut raw,
                descriptor.version,
            ) {
                Ok(()) => parse_properties(raw, &data.type_id),
                Err(err) => {
                    tracing::warn!(
                        "schema migration of `{}` node {} failed ({err}); reverting to defaults",
                        data.type_id,
                        data.id.0
                    );
                    descriptor
                        .defaults
                        .iter()
                        .map(|(name, value)| ((*name).to_string(), value.clone()))
                        .collect()
                }
            };

            graph.add_node(Node {
                id: data.id,
                type_id: data.type_id,
                version: descriptor.version,
                position: data.position,
                properties,
                inputs: data.inputs,
            });
        }

        graph.sync_parameter_nodes();
        Ok(graph)
    }

    /// Serialize to a pretty JSON string.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a document from JSON.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }
}

fn parse_properties(raw: Map<String, JsonValue>, type_id: &str) -> IndexMap<String, Value> {
    let mut properties = IndexMap::new();
    for (name, json) in raw {
        match serde_json::from_value::<Value>(json) {
            Ok(value) => {
                properties.insert(name, value);
            }
            Err(err) => {
                tracing::warn!(
                    "dropping unreadable property `{name}` on `{type_id}` node: {err}"
                );
            }
        }
    }
    properties
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::builtin_registry;
    use crate::value::PlugType;

    fn sample_graph(registry: &NodeRegistry) -> Graph {
        let mut graph = Graph::new("Round Trip");
        let tint = graph.add_parameter(
            BlackboardParameter::new("Tint", PlugType::Color)
                .with_default(Value::Color([1.0, 0.5, 0.0, 1.0])),
        );

        let constant = graph.add_node(
            registry
                .create_node("float_constant")
                .unwrap()
                .with_property("value", Value::Float(0.25))
                .with_position(10.0, 20.0),
        );
        let param = graph.add_node(
            registry
                .create_node("parameter")
                .unwrap()
                .with_property("parameter", Value::String(tint.0.to_string())),
        );
        let mul = graph.add_node(registry.create_node("multiply").unwrap());
        let output = graph.add_node(registry.create_node("material_output").unwrap());

        graph.connect(registry, constant, "value", mul, "a").unwrap();
        graph.connect(registry, param, "value", mul, "b").unwrap();
        graph
            .connect(registry, mul, "result", output, "base_color")
            .unwrap();
        graph.sync_parameter_nodes();
        graph
    }

    #[test]
    fn test_round_trip_preserves_topology() {
        let registry = builtin_registry();
        let graph = sample_graph(&registry);

        let json = GraphDocument::from_graph(&graph).to_json().unwrap();
        let restored = GraphDocument::from_json(&json)
            .unwrap()
            .into_graph(&registry)
            .unwrap();

        assert_eq!(restored.node_count(), graph.node_count());
        assert_eq!(restored.parameters().len(), 1);
        for node in graph.nodes() {
            let other = restored.find_node(node.id).expect("node survives");
            assert_eq!(other.type_id, node.type_id);
            assert_eq!(other.inputs, node.inputs);
            assert_eq!(other.properties, node.properties);
            assert_eq!(other.position, node.position);
        }
    }

    #[test]
    fn test_legacy_color_preset_is_migrated() {
        let registry = builtin_registry();
        let id = NodeId::new();
        let document = GraphDocument {
            format: DOCUMENT_FORMAT_VERSION,
            name: "Legacy".to_string(),
            kind: GraphKind::Material,
            parameters: Vec::new(),
            nodes: vec![NodeData {
                id,
                type_id: "color_constant".to_string(),
                version: 1,
                position: [0.0, 0.0],
                properties: serde_json::json!({ "preset": "Red" })
                    .as_object()
                    .unwrap()
                    .clone(),
                inputs: IndexMap::new(),
            }],
        };

        let graph = document.into_graph(&registry).unwrap();
        let node = graph.find_node(id).unwrap();
        assert_eq!(node.version, 2);
        assert_eq!(
            node.property("value"),
            Some(&Value::Color([1.0, 0.0, 0.0, 1.0]))
        );
    }

    #[test]
    fn test_failed_migration_reverts_to_defaults() {
        let registry = builtin_registry();
        let id = NodeId::new();
        let document = GraphDocument {
            format: DOCUMENT_FORMAT_VERSION,
            name: "Broken".to_string(),
            kind: GraphKind::Material,
            parameters: Vec::new(),
            nodes: vec![NodeData {
                id,
                type_id: "color_constant".to_string(),
                version: 1,
                position: [0.0, 0.0],
                // No `preset` field: the v1 -> v2 migration cannot run.
                properties: Map::new(),
                inputs: IndexMap::new(),
            }],
        };

        let graph = document.into_graph(&registry).unwrap();
        let node = graph.find_node(id).unwrap();
        assert_eq!(node.version, 2);
        assert_eq!(
            node.property("value"),
            Some(&Value::Color([1.0, 1.0, 1.0, 1.0]))
        );
    }

    #[test]
    fn test_unknown_node_type_fails_load() {
        let registry = builtin_registry();
        let document = GraphDocument {
            format: DOCUMENT_FORMAT_VERSION,
            name: "Unknown".to_string(),
            kind: GraphKind::Material,
            parameters: Vec::new(),
            nodes: vec![NodeData {
                id: NodeId::new(),
                type_id: "quantum_flux".to_string(),
                version: 1,
                position: [0.0, 0.0],
                properties: Map::new(),
                inputs: IndexMap::new(),
            }],
        };

        assert!(matches!(
            document.into_graph(&registry),
            Err(DocumentError::UnknownNodeType(_))
        ));
    }

    #[test]
    fn test_future_format_is_rejected() {
        let document = GraphDocument {
            format: DOCUMENT_FORMAT_VERSION + 1,
            name: "Future".to_string(),
            kind: GraphKind::Material,
            parameters: Vec::new(),
            nodes: Vec::new(),
        };
        assert!(matches!(
            document.into_graph(&builtin_registry()),
            Err(DocumentError::UnsupportedFormat(_))
        ));
    }
}
