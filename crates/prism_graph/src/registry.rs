// SPDX-License-Identifier: MIT OR Apache-2.0
//! The node type registry.
//!
//! Every node kind is described by a statically-built [`NodeDescriptor`]
//! holding its ordered plug lists, current schema version, migrations, and
//! optional capability hooks. The registry is populated once at startup;
//! there is no runtime type introspection.

use crate::graph::Graph;
use crate::migration::{Migration, MigrationError};
use crate::node::Node;
use crate::plug::PlugDesc;
use crate::value::{PlugType, Value};
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};

/// Node type category, used for palette grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCategory {
    /// Input nodes (constants, attributes, parameters)
    Input,
    /// Output nodes (material output, function output)
    Output,
    /// Math operations
    Math,
    /// Texture and gradient operations
    Texture,
    /// Vector and utility nodes
    Utility,
    /// Function (subgraph) nodes
    Function,
}

/// Severity of a node-local issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// The graph still compiles
    Warning,
    /// Code generation must not proceed
    Error,
}

/// A node-local error or warning reported by a validation hook.
#[derive(Debug, Clone)]
pub struct NodeIssue {
    /// Severity
    pub severity: IssueSeverity,
    /// Human-readable description
    pub message: String,
}

impl NodeIssue {
    /// Create an error issue.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Error,
            message: message.into(),
        }
    }

    /// Create a warning issue.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            message: message.into(),
        }
    }
}

/// Static description of one node type.
pub struct NodeDescriptor {
    /// Unique type tag
    pub type_id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Palette category
    pub category: NodeCategory,
    /// Current schema version
    pub version: u32,
    /// Ordered input plugs
    pub inputs: Vec<PlugDesc>,
    /// Ordered output plugs
    pub outputs: Vec<PlugDesc>,
    /// Default property values for new instances
    pub defaults: Vec<(&'static str, Value)>,
    /// Inputs derived from property values, replacing the static list
    pub dynamic_inputs: Option<fn(&Node) -> Vec<PlugDesc>>,
    /// Outputs derived from property values, replacing the static list
    pub dynamic_outputs: Option<fn(&Node) -> Vec<PlugDesc>>,
    /// Node-local error/warning capability
    pub validate: Option<fn(&Node, &Graph) -> Vec<NodeIssue>>,
    /// Schema migrations, ascending by `from` version
    pub migrations: Vec<Migration>,
}

impl NodeDescriptor {
    /// Create a descriptor with no plugs and version 1.
    pub fn new(type_id: &'static str, name: &'static str, category: NodeCategory) -> Self {
        Self {
            type_id,
            name,
            category,
            version: 1,
            inputs: Vec::new(),
            outputs: Vec::new(),
            defaults: Vec::new(),
            dynamic_inputs: None,
            dynamic_outputs: None,
            validate: None,
            migrations: Vec::new(),
        }
    }

    /// Set the static input plugs.
    pub fn with_inputs(mut self, inputs: Vec<PlugDesc>) -> Self {
        self.inputs = inputs;
        self
    }

    /// Set the static output plugs.
    pub fn with_outputs(mut self, outputs: Vec<PlugDesc>) -> Self {
        self.outputs = outputs;
        self
    }

    /// Set the default properties of new instances.
    pub fn with_defaults(mut self, defaults: Vec<(&'static str, Value)>) -> Self {
        self.defaults = defaults;
        self
    }

    /// Set the current schema version.
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Attach a dynamic input hook.
    pub fn with_dynamic_inputs(mut self, hook: fn(&Node) -> Vec<PlugDesc>) -> Self {
        self.dynamic_inputs = Some(hook);
        self
    }

    /// Attach a dynamic output hook.
    pub fn with_dynamic_outputs(mut self, hook: fn(&Node) -> Vec<PlugDesc>) -> Self {
        self.dynamic_outputs = Some(hook);
        self
    }

    /// Attach a validation capability.
    pub fn with_validate(mut self, hook: fn(&Node, &Graph) -> Vec<NodeIssue>) -> Self {
        self.validate = Some(hook);
        self
    }

    /// Attach schema migrations.
    pub fn with_migrations(mut self, migrations: Vec<Migration>) -> Self {
        self.migrations = migrations;
        self
    }

    /// Effective input plugs for a node instance.
    pub fn inputs_of(&self, node: &Node) -> Vec<PlugDesc> {
        match self.dynamic_inputs {
            Some(hook) => hook(node),
            None => self.inputs.clone(),
        }
    }

    /// Effective output plugs for a node instance.
    pub fn outputs_of(&self, node: &Node) -> Vec<PlugDesc> {
        match self.dynamic_outputs {
            Some(hook) => hook(node),
            None => self.outputs.clone(),
        }
    }
}

/// Registry of available node types.
pub struct NodeRegistry {
    types: IndexMap<&'static str, NodeDescriptor>,
}

impl NodeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            types: IndexMap::new(),
        }
    }

    /// Register a node type.
    ///
    /// Panics if a non-output type declares no way to produce outputs;
    /// that is a programmer error, not a malformed user graph.
    pub fn register(&mut self, descriptor: NodeDescriptor) {
        let produces_outputs = !descriptor.outputs.is_empty()
            || descriptor.dynamic_outputs.is_some()
            || matches!(
                descriptor.category,
                NodeCategory::Output | NodeCategory::Function
            );
        assert!(
            produces_outputs,
            "node type `{}` registered without any output plugs",
            descriptor.type_id
        );
        self.types.insert(descriptor.type_id, descriptor);
    }

    /// Look up a descriptor by type tag.
    pub fn get(&self, type_id: &str) -> Option<&NodeDescriptor> {
        self.types.get(type_id)
    }

    /// All registered descriptors, in registration order.
    pub fn types(&self) -> impl Iterator<Item = &NodeDescriptor> {
        self.types.values()
    }

    /// Create a node instance from a type tag.
    pub fn create_node(&self, type_id: &str) -> Option<Node> {
        self.get(type_id).map(Node::new)
    }

    /// Effective input plugs of a node, or empty if its type is unknown.
    pub fn inputs_of(&self, node: &Node) -> Vec<PlugDesc> {
        self.get(&node.type_id)
            .map(|d| d.inputs_of(node))
            .unwrap_or_default()
    }

    /// Effective output plugs of a node, or empty if its type is unknown.
    pub fn outputs_of(&self, node: &Node) -> Vec<PlugDesc> {
        self.get(&node.type_id)
            .map(|d| d.outputs_of(node))
            .unwrap_or_default()
    }

    /// Find one input plug of a node by name.
    pub fn input_plug(&self, node: &Node, name: &str) -> Option<PlugDesc> {
        self.inputs_of(node).into_iter().find(|p| p.name == name)
    }

    /// Find one output plug of a node by name.
    pub fn output_plug(&self, node: &Node, name: &str) -> Option<PlugDesc> {
        self.outputs_of(node).into_iter().find(|p| p.name == name)
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Builtin node types
// ============================================================================

fn validate_parameter(node: &Node, graph: &Graph) -> Vec<NodeIssue> {
    match node.parameter_ref() {
        None => vec![NodeIssue::error(
            "parameter node does not reference a blackboard entry",
        )],
        Some(id) if graph.find_parameter(id).is_none() => vec![NodeIssue::error(format!(
            "parameter node references deleted blackboard entry {}",
            id.0
        ))],
        Some(_) => Vec::new(),
    }
}

fn validate_named_declaration(node: &Node, _graph: &Graph) -> Vec<NodeIssue> {
    match node.property_str("name") {
        Some(name) if !name.is_empty() => Vec::new(),
        _ => vec![NodeIssue::error("name declaration has an empty name")],
    }
}

fn validate_swizzle(node: &Node, _graph: &Graph) -> Vec<NodeIssue> {
    let mask = node.property_str("mask").unwrap_or("");
    if mask.is_empty() || mask.len() > 4 || !mask.chars().all(|c| "xyzw".contains(c)) {
        vec![NodeIssue::error(format!("invalid swizzle mask `{mask}`"))]
    } else {
        Vec::new()
    }
}

fn validate_function_reference(node: &Node, _graph: &Graph) -> Vec<NodeIssue> {
    match node.property_str("function") {
        Some(path) if !path.is_empty() => Vec::new(),
        _ => vec![NodeIssue::error("function reference has no target graph")],
    }
}

fn parameter_outputs(node: &Node) -> Vec<PlugDesc> {
    let ty = node
        .property_str("type")
        .and_then(PlugType::parse)
        .unwrap_or(PlugType::Float);
    vec![PlugDesc::new("value", ty)]
}

fn function_output_inputs(node: &Node) -> Vec<PlugDesc> {
    let ty = node
        .property_str("type")
        .and_then(PlugType::parse)
        .unwrap_or(PlugType::Float);
    vec![PlugDesc::new("value", ty).required()]
}

fn swizzle_outputs(node: &Node) -> Vec<PlugDesc> {
    let ty = match node.property_str("mask").map(str::len) {
        Some(2) => PlugType::Vector2,
        Some(3) => PlugType::Vector3,
        Some(4) => PlugType::Vector4,
        _ => PlugType::Float,
    };
    vec![PlugDesc::new("value", ty)]
}

/// Color constant v1 stored a named `preset`; v2 stores a literal `value`.
fn migrate_color_preset(props: &mut Map<String, JsonValue>) -> Result<(), MigrationError> {
    let preset = props
        .remove("preset")
        .ok_or_else(|| MigrationError::MissingField("preset".to_string()))?;
    let name = preset.as_str().unwrap_or_default().to_string();
    let rgba = match name.as_str() {
        "Black" => [0.0, 0.0, 0.0, 1.0],
        "White" => [1.0, 1.0, 1.0, 1.0],
        "Red" => [1.0, 0.0, 0.0, 1.0],
        "Green" => [0.0, 1.0, 0.0, 1.0],
        "Blue" => [0.0, 0.0, 1.0, 1.0],
        _ => {
            return Err(MigrationError::UnsupportedValue {
                field: "preset".to_string(),
                value: name,
            });
        }
    };
    props.insert(
        "value".to_string(),
        serde_json::json!({ "Color": rgba }),
    );
    Ok(())
}

/// Texture sample v1 stored `point_filter: bool`; v2 stores `filter` by name.
fn migrate_texture_filter(props: &mut Map<String, JsonValue>) -> Result<(), MigrationError> {
    let point = match props.remove("point_filter") {
        Some(JsonValue::Bool(b)) => b,
        Some(JsonValue::Object(map)) => map
            .get("Bool")
            .and_then(JsonValue::as_bool)
            .ok_or_else(|| MigrationError::MissingField("point_filter".to_string()))?,
        _ => false,
    };
    let filter = if point { "point" } else { "linear" };
    props.insert(
        "filter".to_string(),
        serde_json::json!({ "String": filter }),
    );
    Ok(())
}

fn binary_math(type_id: &'static str, name: &'static str) -> NodeDescriptor {
    NodeDescriptor::new(type_id, name, NodeCategory::Math)
        .with_inputs(vec![
            PlugDesc::new("a", PlugType::Float).with_default(Value::Float(0.0)),
            PlugDesc::new("b", PlugType::Float).with_default(Value::Float(0.0)),
        ])
        .with_outputs(vec![PlugDesc::new("result", PlugType::Float)])
}

fn unary_math(type_id: &'static str, name: &'static str) -> NodeDescriptor {
    NodeDescriptor::new(type_id, name, NodeCategory::Math)
        .with_inputs(vec![
            PlugDesc::new("value", PlugType::Float).with_default(Value::Float(0.0))
        ])
        .with_outputs(vec![PlugDesc::new("result", PlugType::Float)])
}

/// Create the registry with all builtin shader node types.
pub fn builtin_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();

    // ========================================================================
    // Output nodes
    // ========================================================================

    registry.register(
        NodeDescriptor::new("material_output", "Material Output", NodeCategory::Output)
            .with_inputs(vec![
                PlugDesc::new("base_color", PlugType::Vector3)
                    .with_default(Value::Vector3([0.8, 0.8, 0.8])),
                PlugDesc::new("metallic", PlugType::Float).with_default(Value::Float(0.0)),
                PlugDesc::new("roughness", PlugType::Float).with_default(Value::Float(0.5)),
                PlugDesc::new("emissive", PlugType::Vector3)
                    .with_default(Value::Vector3([0.0, 0.0, 0.0])),
                PlugDesc::new("normal", PlugType::Vector3),
                PlugDesc::new("opacity", PlugType::Float).with_default(Value::Float(1.0)),
                PlugDesc::new("ambient_occlusion", PlugType::Float)
                    .with_default(Value::Float(1.0)),
            ]),
    );

    registry.register(
        NodeDescriptor::new("function_output", "Function Output", NodeCategory::Output)
            .with_defaults(vec![
                ("name", Value::String("Result".to_string())),
                ("type", Value::String("Float".to_string())),
            ])
            .with_dynamic_inputs(function_output_inputs),
    );

    // ========================================================================
    // Constants
    // ========================================================================

    registry.register(
        NodeDescriptor::new("float_constant", "Float", NodeCategory::Input)
            .with_defaults(vec![("value", Value::Float(0.0))])
            .with_outputs(vec![PlugDesc::new("value", PlugType::Float)]),
    );

    registry.register(
        NodeDescriptor::new("int_constant", "Int", NodeCategory::Input)
            .with_defaults(vec![("value", Value::Int(0))])
            .with_outputs(vec![PlugDesc::new("value", PlugType::Int)]),
    );

    registry.register(
        NodeDescriptor::new("bool_constant", "Bool", NodeCategory::Input)
            .with_defaults(vec![("value", Value::Bool(false))])
            .with_outputs(vec![PlugDesc::new("value", PlugType::Bool)]),
    );

    registry.register(
        NodeDescriptor::new("vector2_constant", "Vector2", NodeCategory::Input)
            .with_defaults(vec![("value", Value::Vector2([0.0; 2]))])
            .with_outputs(vec![PlugDesc::new("value", PlugType::Vector2)]),
    );

    registry.register(
        NodeDescriptor::new("vector3_constant", "Vector3", NodeCategory::Input)
            .with_defaults(vec![("value", Value::Vector3([0.0; 3]))])
            .with_outputs(vec![PlugDesc::new("value", PlugType::Vector3)]),
    );

    registry.register(
        NodeDescriptor::new("vector4_constant", "Vector4", NodeCategory::Input)
            .with_defaults(vec![("value", Value::Vector4([0.0; 4]))])
            .with_outputs(vec![PlugDesc::new("value", PlugType::Vector4)]),
    );

    registry.register(
        NodeDescriptor::new("color_constant", "Color", NodeCategory::Input)
            .with_version(2)
            .with_defaults(vec![("value", Value::Color([1.0, 1.0, 1.0, 1.0]))])
            .with_outputs(vec![PlugDesc::new("value", PlugType::Color)])
            .with_migrations(vec![Migration {
                from: 1,
                apply: migrate_color_preset,
            }]),
    );

    registry.register(
        NodeDescriptor::new("gradient_constant", "Gradient", NodeCategory::Input)
            .with_defaults(vec![("gradient", Value::Gradient(Vec::new()))])
            .with_outputs(vec![PlugDesc::new("gradient", PlugType::Gradient)]),
    );

    // ========================================================================
    // Attributes and parameters
    // ========================================================================

    registry.register(
        NodeDescriptor::new("uv_coordinate", "UV Coordinates", NodeCategory::Input)
            .with_outputs(vec![
                PlugDesc::new("uv", PlugType::Vector2),
                PlugDesc::new("u", PlugType::Float),
                PlugDesc::new("v", PlugType::Float),
            ]),
    );

    registry.register(
        NodeDescriptor::new("world_position", "World Position", NodeCategory::Input)
            .with_outputs(vec![PlugDesc::new("position", PlugType::Vector3)]),
    );

    registry.register(
        NodeDescriptor::new("time", "Time", NodeCategory::Input).with_outputs(vec![
            PlugDesc::new("time", PlugType::Float),
            PlugDesc::new("sin_time", PlugType::Float),
        ]),
    );

    registry.register(
        NodeDescriptor::new("parameter", "Parameter", NodeCategory::Input)
            .with_defaults(vec![
                ("parameter", Value::String(String::new())),
                ("name", Value::String(String::new())),
                ("type", Value::String("Float".to_string())),
            ])
            .with_dynamic_outputs(parameter_outputs)
            .with_validate(validate_parameter),
    );

    // ========================================================================
    // Texture nodes
    // ========================================================================

    registry.register(
        NodeDescriptor::new("texture_sample", "Texture Sample", NodeCategory::Texture)
            .with_version(2)
            .with_defaults(vec![
                ("texture", Value::String(String::new())),
                ("filter", Value::String("linear".to_string())),
            ])
            .with_inputs(vec![
                PlugDesc::new("texture", PlugType::Texture2D),
                PlugDesc::new("uv", PlugType::Vector2),
            ])
            .with_outputs(vec![
                PlugDesc::new("color", PlugType::Color),
                PlugDesc::new("r", PlugType::Float),
                PlugDesc::new("g", PlugType::Float),
                PlugDesc::new("b", PlugType::Float),
                PlugDesc::new("a", PlugType::Float),
            ])
            .with_migrations(vec![Migration {
                from: 1,
                apply: migrate_texture_filter,
            }]),
    );

    registry.register(
        NodeDescriptor::new("sample_gradient", "Sample Gradient", NodeCategory::Texture)
            .with_inputs(vec![
                PlugDesc::new("gradient", PlugType::Gradient).required(),
                PlugDesc::new("time", PlugType::Float).with_default(Value::Float(0.0)),
            ])
            .with_outputs(vec![PlugDesc::new("color", PlugType::Color)]),
    );

    // ========================================================================
    // Math nodes
    // ========================================================================

    registry.register(binary_math("add", "Add"));
    registry.register(binary_math("subtract", "Subtract"));
    registry.register(binary_math("multiply", "Multiply"));
    registry.register(binary_math("divide", "Divide"));
    registry.register(binary_math("power", "Power"));
    registry.register(binary_math("min", "Minimum"));
    registry.register(binary_math("max", "Maximum"));
    registry.register(binary_math("distance", "Distance"));

    registry.register(
        NodeDescriptor::new("dot", "Dot Product", NodeCategory::Math)
            .with_inputs(vec![
                PlugDesc::new("a", PlugType::Vector3).with_default(Value::Vector3([0.0; 3])),
                PlugDesc::new("b", PlugType::Vector3).with_default(Value::Vector3([0.0; 3])),
            ])
            .with_outputs(vec![PlugDesc::new("result", PlugType::Float)]),
    );

    registry.register(
        NodeDescriptor::new("cross", "Cross Product", NodeCategory::Math)
            .with_inputs(vec![
                PlugDesc::new("a", PlugType::Vector3).with_default(Value::Vector3([0.0; 3])),
                PlugDesc::new("b", PlugType::Vector3).with_default(Value::Vector3([0.0; 3])),
            ])
            .with_outputs(vec![PlugDesc::new("result", PlugType::Vector3)]),
    );

    registry.register(
        NodeDescriptor::new("lerp", "Lerp", NodeCategory::Math)
            .with_inputs(vec![
                PlugDesc::new("a", PlugType::Float).with_default(Value::Float(0.0)),
                PlugDesc::new("b", PlugType::Float).with_default(Value::Float(1.0)),
                PlugDesc::new("t", PlugType::Float).with_default(Value::Float(0.5)),
            ])
            .with_outputs(vec![PlugDesc::new("result", PlugType::Float)]),
    );

    registry.register(
        NodeDescriptor::new("clamp", "Clamp", NodeCategory::Math)
            .with_inputs(vec![
                PlugDesc::new("value", PlugType::Float).with_default(Value::Float(0.0)),
                PlugDesc::new("min", PlugType::Float).with_default(Value::Float(0.0)),
                PlugDesc::new("max", PlugType::Float).with_default(Value::Float(1.0)),
            ])
            .with_outputs(vec![PlugDesc::new("result", PlugType::Float)]),
    );

    registry.register(
        NodeDescriptor::new("smoothstep", "Smoothstep", NodeCategory::Math)
            .with_inputs(vec![
                PlugDesc::new("edge0", PlugType::Float).with_default(Value::Float(0.0)),
                PlugDesc::new("edge1", PlugType::Float).with_default(Value::Float(1.0)),
                PlugDesc::new("x", PlugType::Float).with_default(Value::Float(0.0)),
            ])
            .with_outputs(vec![PlugDesc::new("result", PlugType::Float)]),
    );

    registry.register(unary_math("abs", "Absolute"));
    registry.register(unary_math("negate", "Negate"));
    registry.register(unary_math("sqrt", "Square Root"));
    registry.register(unary_math("floor", "Floor"));
    registry.register(unary_math("ceil", "Ceiling"));
    registry.register(unary_math("frac", "Fraction"));
    registry.register(unary_math("one_minus", "One Minus"));
    registry.register(unary_math("saturate", "Saturate"));
    registry.register(unary_math("sin", "Sine"));
    registry.register(unary_math("cos", "Cosine"));
    registry.register(unary_math("normalize", "Normalize"));
    registry.register(unary_math("length", "Length"));

    // ========================================================================
    // Vector utility nodes
    // ========================================================================

    registry.register(
        NodeDescriptor::new("split_vector2", "Split Vector2", NodeCategory::Utility)
            .with_inputs(vec![PlugDesc::new("vector", PlugType::Vector2)
                .with_default(Value::Vector2([0.0; 2]))])
            .with_outputs(vec![
                PlugDesc::new("x", PlugType::Float),
                PlugDesc::new("y", PlugType::Float),
            ]),
    );

    registry.register(
        NodeDescriptor::new("split_vector3", "Split Vector3", NodeCategory::Utility)
            .with_inputs(vec![PlugDesc::new("vector", PlugType::Vector3)
                .with_default(Value::Vector3([0.0; 3]))])
            .with_outputs(vec![
                PlugDesc::new("x", PlugType::Float),
                PlugDesc::new("y", PlugType::Float),
                PlugDesc::new("z", PlugType::Float),
            ]),
    );

    registry.register(
        NodeDescriptor::new("split_vector4", "Split Vector4", NodeCategory::Utility)
            .with_inputs(vec![PlugDesc::new("vector", PlugType::Vector4)
                .with_default(Value::Vector4([0.0; 4]))])
            .with_outputs(vec![
                PlugDesc::new("x", PlugType::Float),
                PlugDesc::new("y", PlugType::Float),
                PlugDesc::new("z", PlugType::Float),
                PlugDesc::new("w", PlugType::Float),
            ]),
    );

    registry.register(
        NodeDescriptor::new("combine_vector2", "Combine Vector2", NodeCategory::Utility)
            .with_inputs(vec![
                PlugDesc::new("x", PlugType::Float).with_default(Value::Float(0.0)),
                PlugDesc::new("y", PlugType::Float).with_default(Value::Float(0.0)),
            ])
            .with_outputs(vec![PlugDesc::new("vector", PlugType::Vector2)]),
    );

    registry.register(
        NodeDescriptor::new("combine_vector3", "Combine Vector3", NodeCategory::Utility)
            .with_inputs(vec![
                PlugDesc::new("x", PlugType::Float).with_default(Value::Float(0.0)),
                PlugDesc::new("y", PlugType::Float).with_default(Value::Float(0.0)),
                PlugDesc::new("z", PlugType::Float).with_default(Value::Float(0.0)),
            ])
            .with_outputs(vec![PlugDesc::new("vector", PlugType::Vector3)]),
    );

    registry.register(
        NodeDescriptor::new("combine_vector4", "Combine Vector4", NodeCategory::Utility)
            .with_inputs(vec![
                PlugDesc::new("x", PlugType::Float).with_default(Value::Float(0.0)),
                PlugDesc::new("y", PlugType::Float).with_default(Value::Float(0.0)),
                PlugDesc::new("z", PlugType::Float).with_default(Value::Float(0.0)),
                PlugDesc::new("w", PlugType::Float).with_default(Value::Float(0.0)),
            ])
            .with_outputs(vec![PlugDesc::new("vector", PlugType::Vector4)]),
    );

    registry.register(
        NodeDescriptor::new("swizzle", "Swizzle", NodeCategory::Utility)
            .with_defaults(vec![("mask", Value::String("x".to_string()))])
            .with_inputs(vec![PlugDesc::new("value", PlugType::Vector4)
                .with_default(Value::Vector4([0.0; 4]))])
            .with_dynamic_outputs(swizzle_outputs)
            .with_validate(validate_swizzle),
    );

    // ========================================================================
    // Named values
    // ========================================================================

    registry.register(
        NodeDescriptor::new("named_declaration", "Name", NodeCategory::Utility)
            .with_defaults(vec![("name", Value::String(String::new()))])
            .with_inputs(vec![
                PlugDesc::new("value", PlugType::Float).with_default(Value::Float(0.0))
            ])
            .with_outputs(vec![PlugDesc::new("value", PlugType::Float)])
            .with_validate(validate_named_declaration),
    );

    registry.register(
        NodeDescriptor::new("named_reference", "Named Value", NodeCategory::Utility)
            .with_defaults(vec![("name", Value::String(String::new()))])
            .with_outputs(vec![PlugDesc::new("value", PlugType::Float)]),
    );

    // ========================================================================
    // Functions
    // ========================================================================

    registry.register(
        NodeDescriptor::new(
            "function_reference",
            "Function Reference",
            NodeCategory::Function,
        )
        .with_defaults(vec![("function", Value::String(String::new()))])
        .with_validate(validate_function_reference),
    );

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_creates_nodes() {
        let registry = builtin_registry();
        let node = registry.create_node("float_constant").unwrap();
        assert_eq!(node.type_id, "float_constant");
        assert_eq!(node.property("value"), Some(&Value::Float(0.0)));
    }

    #[test]
    fn test_swizzle_output_type_follows_mask() {
        let registry = builtin_registry();
        let node = registry
            .create_node("swizzle")
            .unwrap()
            .with_property("mask", Value::String("xyz".to_string()));
        let outputs = registry.outputs_of(&node);
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].ty, PlugType::Vector3);
    }

    #[test]
    fn test_function_output_input_type_follows_property() {
        let registry = builtin_registry();
        let node = registry
            .create_node("function_output")
            .unwrap()
            .with_property("type", Value::String("Vector2".to_string()));
        let inputs = registry.inputs_of(&node);
        assert_eq!(inputs[0].ty, PlugType::Vector2);
        assert!(inputs[0].required);
    }

    #[test]
    #[should_panic(expected = "without any output plugs")]
    fn test_register_without_outputs_panics() {
        let mut registry = NodeRegistry::new();
        registry.register(NodeDescriptor::new("broken", "Broken", NodeCategory::Math));
    }

    #[test]
    fn test_color_preset_migration_maps_red() {
        let mut props = serde_json::json!({ "preset": "Red" })
            .as_object()
            .unwrap()
            .clone();
        migrate_color_preset(&mut props).unwrap();
        assert_eq!(
            props.get("value"),
            Some(&serde_json::json!({ "Color": [1.0, 0.0, 0.0, 1.0] }))
        );
    }

    #[test]
    fn test_color_preset_migration_rejects_unknown() {
        let mut props = serde_json::json!({ "preset": "Chartreuse" })
            .as_object()
            .unwrap()
            .clone();
        assert!(migrate_color_preset(&mut props).is_err());
    }

    #[test]
    fn test_texture_filter_migration() {
        let mut props = serde_json::json!({ "point_filter": { "Bool": true } })
            .as_object()
            .unwrap()
            .clone();
        migrate_texture_filter(&mut props).unwrap();
        assert_eq!(
            props.get("filter"),
            Some(&serde_json::json!({ "String": "point" }))
        );
    }
}
