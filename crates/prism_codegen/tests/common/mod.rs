// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shared helpers for compiler integration tests.

use prism_graph::{builtin_registry, Graph, NodeId, NodeRegistry};

/// Install a test subscriber so `RUST_LOG` surfaces compiler traces.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A registry plus a graph that already carries a material output node.
pub fn material_graph(name: &str) -> (NodeRegistry, Graph, NodeId) {
    init_tracing();
    let registry = builtin_registry();
    let mut graph = Graph::new(name);
    let output = graph.add_node(registry.create_node("material_output").unwrap());
    (registry, graph, output)
}

/// Count non-overlapping occurrences of `needle` in `haystack`.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
