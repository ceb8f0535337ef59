// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and blackboard parameters.

use crate::blackboard::{BlackboardParameter, ParameterId};
use crate::node::{Node, NodeId};
use crate::plug::InputConnection;
use crate::registry::NodeRegistry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How a graph is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GraphKind {
    /// Top-level graph: blackboard parameters are exposed to the material
    #[default]
    Material,
    /// Function graph: blackboard parameters become input ports
    Function,
}

/// A shader node graph: the compilation unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    /// Graph name
    pub name: String,
    /// How the graph is consumed
    pub kind: GraphKind,
    nodes: IndexMap<NodeId, Node>,
    parameters: Vec<BlackboardParameter>,
}

impl Graph {
    /// Create a new empty graph.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: GraphKind::Material,
            nodes: IndexMap::new(),
            parameters: Vec::new(),
        }
    }

    /// Create a new empty function graph.
    pub fn new_function(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: GraphKind::Function,
            nodes: IndexMap::new(),
            parameters: Vec::new(),
        }
    }

    /// Add a node. Node IDs are unique within the graph; inserting a node
    /// whose ID is already present replaces the previous instance.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node and clear any input connections elsewhere that
    /// referenced it, so nothing downstream is left dangling.
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        let removed = self.nodes.swap_remove(&node_id)?;
        for node in self.nodes.values_mut() {
            node.inputs.retain(|_, conn| conn.node != node_id);
        }
        Some(removed)
    }

    /// Look up a node. Absence is a normal result, not an error.
    pub fn find_node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Look up a node mutably.
    pub fn find_node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The first node of a given type, if any.
    pub fn find_node_of_type(&self, type_id: &str) -> Option<&Node> {
        self.nodes.values().find(|n| n.type_id == type_id)
    }

    /// All nodes of a given type, in insertion order.
    pub fn nodes_of_type<'a>(&'a self, type_id: &'a str) -> impl Iterator<Item = &'a Node> {
        self.nodes.values().filter(move |n| n.type_id == type_id)
    }

    /// Connect a source output plug to a destination input plug.
    ///
    /// Type compatibility is advisory here; the compiler enforces casting
    /// rules when generating code. Cycles are likewise permitted at edit
    /// time and rejected by the compiler with a diagnostic.
    pub fn connect(
        &mut self,
        registry: &NodeRegistry,
        from_node: NodeId,
        from_output: &str,
        to_node: NodeId,
        to_input: &str,
    ) -> Result<(), ConnectError> {
        let source = self
            .nodes
            .get(&from_node)
            .ok_or(ConnectError::NodeNotFound(from_node))?;
        let target = self
            .nodes
            .get(&to_node)
            .ok_or(ConnectError::NodeNotFound(to_node))?;

        // Function reference plugs derive from the referenced graph, which
        // is not loadable at edit time; accept their names as-is and let
        // the compiler resolve them.
        let is_function = |node: &Node| {
            registry
                .get(&node.type_id)
                .is_some_and(|d| d.category == crate::registry::NodeCategory::Function)
        };
        let source_plug = if is_function(source) {
            None
        } else {
            Some(
                registry
                    .output_plug(source, from_output)
                    .ok_or_else(|| ConnectError::PlugNotFound(from_output.to_string()))?,
            )
        };
        let target_plug = if is_function(target) {
            None
        } else {
            Some(
                registry
                    .input_plug(target, to_input)
                    .ok_or_else(|| ConnectError::PlugNotFound(to_input.to_string()))?,
            )
        };

        if let (Some(source_plug), Some(target_plug)) = (source_plug, target_plug) {
            if !source_plug.ty.can_connect_to(target_plug.ty) {
                tracing::debug!(
                    "connecting {:?} output to {:?} input; compile-time casting will decide",
                    source_plug.ty,
                    target_plug.ty
                );
            }
        }

        let target = self.nodes.get_mut(&to_node).expect("checked above");
        target
            .inputs
            .insert(to_input.to_string(), InputConnection::new(from_node, from_output));
        Ok(())
    }

    /// Remove the connection feeding an input plug.
    pub fn disconnect(&mut self, node_id: NodeId, input: &str) -> Option<InputConnection> {
        self.nodes.get_mut(&node_id)?.inputs.shift_remove(input)
    }

    // ------------------------------------------------------------------------
    // Blackboard
    // ------------------------------------------------------------------------

    /// Append a blackboard parameter.
    pub fn add_parameter(&mut self, parameter: BlackboardParameter) -> ParameterId {
        let id = parameter.id;
        self.parameters.push(parameter);
        id
    }

    /// Remove a blackboard parameter.
    ///
    /// Parameter nodes that referenced it become orphaned; they stay in the
    /// graph and surface an error diagnostic at compile time.
    pub fn remove_parameter(&mut self, id: ParameterId) -> Option<BlackboardParameter> {
        let index = self.parameters.iter().position(|p| p.id == id)?;
        Some(self.parameters.remove(index))
    }

    /// Look up a parameter by ID. Absence is a normal result.
    pub fn find_parameter(&self, id: ParameterId) -> Option<&BlackboardParameter> {
        self.parameters.iter().find(|p| p.id == id)
    }

    /// Look up a parameter mutably.
    pub fn find_parameter_mut(&mut self, id: ParameterId) -> Option<&mut BlackboardParameter> {
        self.parameters.iter_mut().find(|p| p.id == id)
    }

    /// Ordered blackboard parameter list.
    pub fn parameters(&self) -> &[BlackboardParameter] {
        &self.parameters
    }

    /// Push blackboard state into every parameter node that mirrors an
    /// existing entry. One-way: nodes never write back.
    pub fn sync_parameter_nodes(&mut self) {
        let parameters = self.parameters.clone();
        for node in self.nodes.values_mut() {
            if node.type_id != "parameter" {
                continue;
            }
            let Some(param_id) = node.parameter_ref() else {
                continue;
            };
            if let Some(parameter) = parameters.iter().find(|p| p.id == param_id) {
                node.update_from_blackboard(parameter);
            }
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Error when creating a connection
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// Node not found
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Plug not found on the node
    #[error("plug not found: {0}")]
    PlugNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::builtin_registry;
    use crate::value::Value;

    #[test]
    fn test_remove_node_clears_dangling_connections() {
        let registry = builtin_registry();
        let mut graph = Graph::new("test");
        let a = graph.add_node(registry.create_node("float_constant").unwrap());
        let b = graph.add_node(registry.create_node("add").unwrap());
        graph.connect(&registry, a, "value", b, "a").unwrap();
        assert!(graph.find_node(b).unwrap().input_connection("a").is_some());

        graph.remove_node(a);
        assert!(graph.find_node(b).unwrap().input_connection("a").is_none());
    }

    #[test]
    fn test_connect_rejects_missing_plug() {
        let registry = builtin_registry();
        let mut graph = Graph::new("test");
        let a = graph.add_node(registry.create_node("float_constant").unwrap());
        let b = graph.add_node(registry.create_node("add").unwrap());
        let err = graph.connect(&registry, a, "nope", b, "a").unwrap_err();
        assert!(matches!(err, ConnectError::PlugNotFound(_)));
    }

    #[test]
    fn test_connect_allows_mismatched_types() {
        // Advisory only; the compiler casts or diagnoses later.
        let registry = builtin_registry();
        let mut graph = Graph::new("test");
        let a = graph.add_node(registry.create_node("color_constant").unwrap());
        let b = graph.add_node(registry.create_node("add").unwrap());
        graph.connect(&registry, a, "value", b, "a").unwrap();
    }

    #[test]
    fn test_reconnect_replaces_existing_connection() {
        let registry = builtin_registry();
        let mut graph = Graph::new("test");
        let a = graph.add_node(registry.create_node("float_constant").unwrap());
        let b = graph.add_node(registry.create_node("float_constant").unwrap());
        let c = graph.add_node(registry.create_node("add").unwrap());
        graph.connect(&registry, a, "value", c, "a").unwrap();
        graph.connect(&registry, b, "value", c, "a").unwrap();

        let conn = graph.find_node(c).unwrap().input_connection("a").unwrap();
        assert_eq!(conn.node, b);
    }

    #[test]
    fn test_remove_parameter_orphans_nodes() {
        use crate::blackboard::BlackboardParameter;
        use crate::value::PlugType;

        let registry = builtin_registry();
        let mut graph = Graph::new("test");
        let param = BlackboardParameter::new("Tint", PlugType::Color);
        let param_id = graph.add_parameter(param);

        let node = registry
            .create_node("parameter")
            .unwrap()
            .with_property("parameter", Value::String(param_id.0.to_string()));
        let node_id = graph.add_node(node);
        graph.sync_parameter_nodes();
        assert_eq!(
            graph.find_node(node_id).unwrap().property_str("name"),
            Some("Tint")
        );

        graph.remove_parameter(param_id);
        // The node stays; compile-time validation reports it as orphaned.
        assert!(graph.find_node(node_id).is_some());
        assert!(graph.find_parameter(param_id).is_none());
    }
}
