// SPDX-License-Identifier: MIT OR Apache-2.0
//! Evaluators for function (subgraph) nodes.

use super::unknown_output;
use crate::compiler::Compiler;
use crate::result::NodeResult;
use prism_graph::Node;

/// A function reference exposes the referenced graph's ports as its own
/// plugs and inlines the graph at the reference point. All the heavy
/// lifting lives on the compiler, which owns the scope stack.
pub fn reference(c: &mut Compiler, node: &Node, output: &str) -> NodeResult {
    c.inline_function(node, output)
}

/// A function output resolves its `value` input; the result crosses the
/// inlining boundary as the port result.
pub fn output(c: &mut Compiler, node: &Node, out: &str) -> NodeResult {
    if out != "value" {
        return unknown_output(c, node, out);
    }
    c.input(node, "value")
}
