// SPDX-License-Identifier: MIT OR Apache-2.0
//! Function (subgraph) inlining tests.

mod common;

use common::{count_occurrences, material_graph};
use prism_codegen::{Compiler, DiagnosticKind, MemoryFunctions, NoFunctions, ResourceKind};
use prism_graph::{BlackboardParameter, Graph, NodeRegistry, PlugType, Value};

/// A function graph computing `value * 2`.
fn double_function(registry: &NodeRegistry) -> Graph {
    let mut function = Graph::new_function("Double");
    let port = function.add_parameter(
        BlackboardParameter::new("value", PlugType::Float).required(),
    );
    let param = function.add_node(
        registry
            .create_node("parameter")
            .unwrap()
            .with_property("parameter", Value::String(port.0.to_string())),
    );
    let multiply = function.add_node(
        registry
            .create_node("multiply")
            .unwrap()
            .with_property("b", Value::Float(2.0)),
    );
    let output = function.add_node(
        registry
            .create_node("function_output")
            .unwrap()
            .with_property("name", Value::String("Result".to_string()))
            .with_property("type", Value::String("Float".to_string())),
    );
    function
        .connect(registry, param, "value", multiply, "a")
        .unwrap();
    function
        .connect(registry, multiply, "result", output, "value")
        .unwrap();
    function
}

#[test]
fn test_inlining_matches_manual_expansion() {
    // Compile a graph that calls Double(0.3)...
    let (registry, mut graph, output) = material_graph("caller");
    let mut functions = MemoryFunctions::new();
    functions.insert("math/double", double_function(&registry));

    let constant = graph.add_node(
        registry
            .create_node("float_constant")
            .unwrap()
            .with_property("value", Value::Float(0.3)),
    );
    let reference = graph.add_node(
        registry
            .create_node("function_reference")
            .unwrap()
            .with_property("function", Value::String("math/double".to_string())),
    );
    graph
        .connect(&registry, constant, "value", reference, "value")
        .unwrap();
    graph
        .connect(&registry, reference, "Result", output, "roughness")
        .unwrap();
    let inlined = Compiler::new(&registry, &graph, &functions).compile(output);

    // ...against the same nodes pasted inline at the reference point.
    let (registry2, mut manual, manual_output) = material_graph("caller");
    let constant = manual.add_node(
        registry2
            .create_node("float_constant")
            .unwrap()
            .with_property("value", Value::Float(0.3)),
    );
    let multiply = manual.add_node(
        registry2
            .create_node("multiply")
            .unwrap()
            .with_property("b", Value::Float(2.0)),
    );
    manual
        .connect(&registry2, constant, "value", multiply, "a")
        .unwrap();
    manual
        .connect(&registry2, multiply, "result", manual_output, "roughness")
        .unwrap();
    let expanded = Compiler::new(&registry2, &manual, &NoFunctions).compile(manual_output);

    assert!(!inlined.has_errors());
    assert!(!expanded.has_errors());
    assert_eq!(inlined.source, expanded.source);
    assert!(inlined.source.unwrap().contains("(0.3 * 2.0)"));
}

#[test]
fn test_required_port_unconnected_is_an_error() {
    let (registry, mut graph, output) = material_graph("missing-port");
    let mut functions = MemoryFunctions::new();
    functions.insert("math/double", double_function(&registry));

    let reference = graph.add_node(
        registry
            .create_node("function_reference")
            .unwrap()
            .with_property("function", Value::String("math/double".to_string())),
    );
    graph
        .connect(&registry, reference, "Result", output, "roughness")
        .unwrap();

    let result = Compiler::new(&registry, &graph, &functions).compile(output);
    assert!(result.source.is_none());
    let missing = result
        .diagnostics
        .iter()
        .find(|d| d.kind == DiagnosticKind::MissingInput)
        .expect("missing required port is diagnosed");
    assert!(missing.message.contains("value"));
}

#[test]
fn test_unknown_function_output_is_an_error() {
    let (registry, mut graph, output) = material_graph("bad-output");
    let mut functions = MemoryFunctions::new();
    functions.insert("math/double", double_function(&registry));

    let reference = graph.add_node(
        registry
            .create_node("function_reference")
            .unwrap()
            .with_property("function", Value::String("math/double".to_string()))
            .with_property("value", Value::Float(1.0)),
    );
    graph
        .connect(&registry, reference, "Quotient", output, "roughness")
        .unwrap();

    let result = Compiler::new(&registry, &graph, &functions).compile(output);
    assert!(result.source.is_none());
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::UnknownOutput && d.message.contains("Quotient")));
}

#[test]
fn test_missing_function_graph_is_an_error() {
    let (registry, mut graph, output) = material_graph("no-function");
    let reference = graph.add_node(
        registry
            .create_node("function_reference")
            .unwrap()
            .with_property("function", Value::String("math/absent".to_string())),
    );
    graph
        .connect(&registry, reference, "Result", output, "roughness")
        .unwrap();

    let result = Compiler::new(&registry, &graph, &NoFunctions).compile(output);
    assert!(result.source.is_none());
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::FunctionUnavailable));
}

#[test]
fn test_recursive_function_is_a_cycle() {
    let registry = prism_graph::builtin_registry();
    let mut recursive = Graph::new_function("Recursive");
    let inner_ref = recursive.add_node(
        registry
            .create_node("function_reference")
            .unwrap()
            .with_property("function", Value::String("rec".to_string())),
    );
    let inner_out = recursive.add_node(
        registry
            .create_node("function_output")
            .unwrap()
            .with_property("name", Value::String("Result".to_string())),
    );
    recursive
        .connect(&registry, inner_ref, "Result", inner_out, "value")
        .unwrap();

    let mut functions = MemoryFunctions::new();
    functions.insert("rec", recursive);

    let (registry, mut graph, output) = material_graph("recursion");
    let reference = graph.add_node(
        registry
            .create_node("function_reference")
            .unwrap()
            .with_property("function", Value::String("rec".to_string())),
    );
    graph
        .connect(&registry, reference, "Result", output, "roughness")
        .unwrap();

    let result = Compiler::new(&registry, &graph, &functions).compile(output);
    assert!(result.source.is_none());
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::Cycle));
}

/// A function graph sampling a fixed texture at a UV port.
fn noise_function(registry: &NodeRegistry) -> Graph {
    let mut function = Graph::new_function("Noise");
    let port = function.add_parameter(BlackboardParameter::new("uv", PlugType::Vector2));
    let param = function.add_node(
        registry
            .create_node("parameter")
            .unwrap()
            .with_property("parameter", Value::String(port.0.to_string())),
    );
    let sample = function.add_node(
        registry
            .create_node("texture_sample")
            .unwrap()
            .with_property("texture", Value::String("textures/shared.png".to_string())),
    );
    let output = function.add_node(
        registry
            .create_node("function_output")
            .unwrap()
            .with_property("name", Value::String("Result".to_string()))
            .with_property("type", Value::String("Color".to_string())),
    );
    function.connect(registry, param, "value", sample, "uv").unwrap();
    function
        .connect(registry, sample, "color", output, "value")
        .unwrap();
    function
}

#[test]
fn test_resources_are_shared_across_the_inlining_boundary() {
    let (registry, mut graph, output) = material_graph("shared-resources");
    let mut functions = MemoryFunctions::new();
    functions.insert("util/noise", noise_function(&registry));

    // Two expansions of the same function: the code is inlined twice but
    // the texture and sampler are registered once.
    for plug in ["base_color", "emissive"] {
        let reference = graph.add_node(
            registry
                .create_node("function_reference")
                .unwrap()
                .with_property("function", Value::String("util/noise".to_string())),
        );
        graph
            .connect(&registry, reference, "Result", output, plug)
            .unwrap();
    }

    let result = Compiler::new(&registry, &graph, &functions).compile(output);
    assert!(!result.has_errors());
    assert_eq!(result.bindings.len(), 2); // one texture + one sampler
    assert!(result
        .bindings
        .iter()
        .any(|b| b.kind == ResourceKind::Texture2D));

    let source = result.source.unwrap();
    assert_eq!(count_occurrences(&source, "Texture2D "), 1);
    assert_eq!(count_occurrences(&source, ".Sample("), 2);
}

#[test]
fn test_named_values_cross_the_inlining_boundary() {
    let registry = prism_graph::builtin_registry();
    let mut scaled = Graph::new_function("Scaled");
    let reference = scaled.add_node(
        registry
            .create_node("named_reference")
            .unwrap()
            .with_property("name", Value::String("Scale".to_string())),
    );
    let inner_out = scaled.add_node(
        registry
            .create_node("function_output")
            .unwrap()
            .with_property("name", Value::String("Result".to_string())),
    );
    scaled
        .connect(&registry, reference, "value", inner_out, "value")
        .unwrap();

    let mut functions = MemoryFunctions::new();
    functions.insert("util/scaled", scaled);

    let (registry, mut graph, output) = material_graph("named-across");
    let constant = graph.add_node(
        registry
            .create_node("float_constant")
            .unwrap()
            .with_property("value", Value::Float(0.5)),
    );
    let declaration = graph.add_node(
        registry
            .create_node("named_declaration")
            .unwrap()
            .with_property("name", Value::String("Scale".to_string())),
    );
    graph
        .connect(&registry, constant, "value", declaration, "value")
        .unwrap();
    let function_ref = graph.add_node(
        registry
            .create_node("function_reference")
            .unwrap()
            .with_property("function", Value::String("util/scaled".to_string())),
    );
    graph
        .connect(&registry, function_ref, "Result", output, "roughness")
        .unwrap();

    let result = Compiler::new(&registry, &graph, &functions).compile(output);
    assert!(!result.has_errors());
    assert!(result.source.unwrap().contains("output.Roughness = 0.5;"));
}

#[test]
fn test_function_graph_compiles_standalone() {
    let registry = prism_graph::builtin_registry();
    let function = double_function(&registry);
    let result_node = function
        .find_node_of_type("function_output")
        .unwrap()
        .id;

    let result = Compiler::new(&registry, &function, &NoFunctions).compile(result_node);
    assert!(!result.has_errors());
    let source = result.source.unwrap();
    // Free-form signature: one out argument per function output port, and
    // the port parameter is exposed through the material parameter block.
    assert!(source.contains("void EvaluateFunction(in MaterialInput input, out float result)"));
    assert!(source.contains("param_0"));
}
