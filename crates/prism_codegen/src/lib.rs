// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shader graph compiler for Prism.
//!
//! Walks a [`prism_graph::Graph`] from a designated result node and emits
//! linear HLSL source plus a resource-binding manifest. Resolution is a
//! memoized recursive descent over one graph snapshot: shared upstream
//! nodes are declared exactly once, type mismatches are bridged with
//! deterministic casts, function graphs are inlined like macros, and all
//! failures surface as an ordered diagnostic list rather than panics.
//!
//! ```
//! use prism_codegen::{Compiler, NoFunctions};
//! use prism_graph::{builtin_registry, Graph, Value};
//!
//! let registry = builtin_registry();
//! let mut graph = Graph::new("example");
//! let c = graph.add_node(
//!     registry
//!         .create_node("float_constant")
//!         .unwrap()
//!         .with_property("value", Value::Float(0.25)),
//! );
//! let out = graph.add_node(registry.create_node("material_output").unwrap());
//! graph.connect(&registry, c, "value", out, "roughness").unwrap();
//!
//! let output = Compiler::new(&registry, &graph, &NoFunctions).compile(out);
//! assert!(output.source.unwrap().contains("output.Roughness = 0.25;"));
//! ```

pub mod compiler;
pub mod diagnostics;
pub mod emit;
pub mod functions;
pub mod manifest;
mod nodes;
pub mod result;

pub use compiler::{CompileOutput, Compiler};
pub use diagnostics::{Diagnostic, DiagnosticKind, Severity};
pub use functions::{FunctionLoadError, FunctionProvider, MemoryFunctions, NoFunctions};
pub use manifest::{ResourceBinding, ResourceKind};
pub use result::NodeResult;

use prism_graph::{Graph, NodeRegistry};

/// Compile a material graph rooted at its material output node.
///
/// Convenience wrapper for hosts that follow the one-output convention;
/// use [`Compiler`] directly to pick the result node.
pub fn compile_material(
    registry: &NodeRegistry,
    graph: &Graph,
    provider: &dyn FunctionProvider,
) -> CompileOutput {
    match graph.find_node_of_type("material_output") {
        Some(node) => Compiler::new(registry, graph, provider).compile(node.id),
        None => CompileOutput {
            source: None,
            bindings: Vec::new(),
            diagnostics: vec![Diagnostic::error(
                DiagnosticKind::UnknownOutput,
                None,
                "graph has no material output node",
            )],
        },
    }
}
