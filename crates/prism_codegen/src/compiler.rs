// SPDX-License-Identifier: MIT OR Apache-2.0
//! The compile driver: memoized recursive resolution and code generation.
//!
//! A [`Compiler`] is created per pass and consumed by [`Compiler::compile`].
//! All mutable state - the memo cache, the resource table, the named value
//! table, the diagnostic list - is pass-scoped and rebuilt every call, so a
//! pass is a pure function of one graph snapshot. Compilation is
//! single-threaded and synchronous; callers receive complete source text or
//! a complete diagnostic list, never partial output.

use crate::diagnostics::{Diagnostic, DiagnosticKind, Severity};
use crate::emit;
use crate::functions::FunctionProvider;
use crate::manifest::{ResourceBinding, ResourceKind};
use crate::nodes;
use crate::result::NodeResult;
use indexmap::IndexMap;
use prism_graph::{
    Graph, GraphKind, Node, NodeId, ParameterHints, ParameterId, PlugDesc, PlugType,
    NodeRegistry, Value,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Memo key: (scope serial, node, output name). Scope serials keep two
/// expansions of the same function graph from sharing node results while
/// node IDs repeat across them.
type ResultKey = (usize, NodeId, String);

enum GraphHandle {
    Root,
    Function(Arc<Graph>),
}

struct Scope {
    serial: usize,
    graph: GraphHandle,
    /// Function port substitutions: parameter id -> caller-side result
    bindings: HashMap<ParameterId, NodeResult>,
    /// Named value table for this graph: declared name -> declaring node
    named: HashMap<String, NodeId>,
}

/// The result of one compile pass.
#[derive(Debug)]
pub struct CompileOutput {
    /// Generated HLSL source. `None` when any error-severity diagnostic was
    /// recorded; such a graph must be treated as not-compilable.
    pub source: Option<String>,
    /// Resource-binding manifest, in registration order
    pub bindings: Vec<ResourceBinding>,
    /// Ordered diagnostic list
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileOutput {
    /// Whether any error-severity diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}

struct RegisteredResource {
    symbol: String,
    kind: ResourceKind,
    ty: PlugType,
    default: Option<Value>,
    hints: ParameterHints,
    slot: u32,
    first_node: NodeId,
}

/// Compiles one graph snapshot into HLSL source plus a binding manifest.
pub struct Compiler<'a> {
    registry: &'a NodeRegistry,
    provider: &'a dyn FunctionProvider,
    root: &'a Graph,
    scopes: Vec<Scope>,
    current: usize,
    next_scope_serial: usize,
    instance_scopes: HashMap<(usize, NodeId), usize>,
    function_cache: HashMap<String, Arc<Graph>>,
    function_stack: Vec<String>,
    cache: HashMap<ResultKey, NodeResult>,
    in_flight: HashSet<ResultKey>,
    statements: Vec<String>,
    resources: IndexMap<String, RegisteredResource>,
    diagnostics: Vec<Diagnostic>,
    validated: HashSet<String>,
    next_local: usize,
}

impl<'a> Compiler<'a> {
    /// Create a compiler for one pass over `graph`.
    pub fn new(
        registry: &'a NodeRegistry,
        graph: &'a Graph,
        provider: &'a dyn FunctionProvider,
    ) -> Self {
        Self {
            registry,
            provider,
            root: graph,
            scopes: Vec::new(),
            current: 0,
            next_scope_serial: 1,
            instance_scopes: HashMap::new(),
            function_cache: HashMap::new(),
            function_stack: Vec::new(),
            cache: HashMap::new(),
            in_flight: HashSet::new(),
            statements: Vec::new(),
            resources: IndexMap::new(),
            diagnostics: Vec::new(),
            validated: HashSet::new(),
            next_local: 0,
        }
    }

    /// Compile the graph, rooted at `result_node`.
    ///
    /// For material graphs the result node is the material output node; for
    /// function graphs any function output node designates the graph's
    /// output set and every output port is generated.
    pub fn compile(mut self, result_node: NodeId) -> CompileOutput {
        tracing::debug!(
            "compiling graph `{}` ({} nodes)",
            self.root.name,
            self.root.node_count()
        );

        self.scopes.push(Scope {
            serial: 0,
            graph: GraphHandle::Root,
            bindings: HashMap::new(),
            named: scan_named(self.root),
        });
        self.current = 0;
        self.validate_graph_once("");

        let Some(node) = self.root.find_node(result_node).cloned() else {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticKind::UnknownNodeType,
                Some(result_node),
                "result node does not exist in the graph",
            ));
            return self.finish(String::new(), Vec::new());
        };

        let (signature, epilogue) = match node.type_id.as_str() {
            "material_output" => self.generate_material(&node),
            "function_output" if self.root.kind == GraphKind::Function => {
                self.generate_function()
            }
            other => {
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticKind::UnknownOutput,
                    Some(result_node),
                    format!("`{other}` node cannot be used as the compilation result"),
                ));
                (String::new(), Vec::new())
            }
        };

        self.finish(signature, epilogue)
    }

    fn generate_material(&mut self, node: &Node) -> (String, Vec<String>) {
        let signature =
            "void EvaluateMaterial(in MaterialInput input, inout MaterialOutput output)"
                .to_string();
        let mut epilogue = Vec::new();
        for plug in self.registry.inputs_of(node) {
            let Some(field) = emit::material_output_field(&plug.name) else {
                continue;
            };
            match self.input(node, &plug.name) {
                NodeResult::Value { code, .. } => {
                    epilogue.push(format!("output.{field} = {code};"));
                }
                // Unconnected plugs without defaults keep the engine value.
                NodeResult::Missing | NodeResult::Error => {}
                NodeResult::Resource { .. } | NodeResult::Gradient(_) => {
                    self.diagnostics.push(Diagnostic::error(
                        DiagnosticKind::InvalidCast,
                        Some(node.id),
                        format!("material output `{}` cannot consume an object value", plug.name),
                    ));
                }
            }
        }
        (signature, epilogue)
    }

    fn generate_function(&mut self) -> (String, Vec<String>) {
        let ports: Vec<(NodeId, String, PlugType)> = self
            .root
            .nodes_of_type("function_output")
            .map(|n| {
                let name = emit::sanitize_identifier(n.property_str("name").unwrap_or("result"));
                let ty = n
                    .property_str("type")
                    .and_then(PlugType::parse)
                    .unwrap_or(PlugType::Float);
                (n.id, name, ty)
            })
            .collect();

        let mut seen = HashSet::new();
        for (id, name, _) in &ports {
            if !seen.insert(name.clone()) {
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticKind::DuplicateName,
                    Some(*id),
                    format!("function output `{name}` is declared more than once"),
                ));
            }
        }

        let mut signature = String::from("void EvaluateFunction(in MaterialInput input");
        for (_, name, ty) in &ports {
            let hlsl = ty.hlsl_name().unwrap_or("float4");
            signature.push_str(&format!(", out {hlsl} {name}"));
        }
        signature.push(')');

        let mut epilogue = Vec::new();
        for (id, name, ty) in &ports {
            match self.result_of(*id, "value") {
                NodeResult::Value { code, .. } => epilogue.push(format!("{name} = {code};")),
                _ => {
                    if let Some(zero) = Value::zero(*ty).as_ref().and_then(emit::literal) {
                        epilogue.push(format!("{name} = {};", zero.0));
                    }
                }
            }
        }
        (signature, epilogue)
    }

    fn finish(self, signature: String, epilogue: Vec<String>) -> CompileOutput {
        let bindings: Vec<ResourceBinding> = self
            .resources
            .into_iter()
            .map(|(name, r)| ResourceBinding {
                symbol: r.symbol,
                kind: r.kind,
                name,
                slot: r.slot,
                ty: r.ty,
                default: r.default,
                hints: r.hints,
            })
            .collect();

        let has_errors = self
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error);
        let source = if has_errors || signature.is_empty() {
            None
        } else {
            let preamble = emit::preamble(&bindings);
            Some(emit::assemble(
                &preamble,
                &signature,
                &self.statements,
                &epilogue,
            ))
        };

        tracing::debug!(
            "compile finished: {} statement(s), {} binding(s), {} diagnostic(s)",
            self.statements.len(),
            bindings.len(),
            self.diagnostics.len()
        );

        CompileOutput {
            source,
            bindings,
            diagnostics: self.diagnostics,
        }
    }

    // ------------------------------------------------------------------------
    // Scope and graph access
    // ------------------------------------------------------------------------

    /// The node type registry for this pass.
    pub(crate) fn registry(&self) -> &NodeRegistry {
        self.registry
    }

    /// The graph of the scope currently being resolved.
    pub(crate) fn graph(&self) -> &Graph {
        match &self.scopes[self.current].graph {
            GraphHandle::Root => self.root,
            GraphHandle::Function(graph) => graph,
        }
    }

    /// The function-port substitution for a parameter, if inside an
    /// inlined function scope that binds it.
    pub(crate) fn scope_binding(&self, id: ParameterId) -> Option<NodeResult> {
        self.scopes[self.current].bindings.get(&id).cloned()
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    /// Resolve one node output, memoized per pass.
    ///
    /// Shared upstream nodes resolve exactly once; revisiting a pair that
    /// is currently being resolved is a cycle and yields an error result
    /// instead of unbounded recursion.
    pub(crate) fn result_of(&mut self, node_id: NodeId, output: &str) -> NodeResult {
        let key = (
            self.scopes[self.current].serial,
            node_id,
            output.to_string(),
        );
        if let Some(cached) = self.cache.get(&key) {
            return cached.clone();
        }
        if self.in_flight.contains(&key) {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticKind::Cycle,
                Some(node_id),
                "node is part of a connection cycle",
            ));
            return NodeResult::Error;
        }

        let Some(node) = self.graph().find_node(node_id).cloned() else {
            return NodeResult::Missing;
        };

        self.in_flight.insert(key.clone());
        let result = nodes::evaluate(self, &node, output);
        let result = self.hoist(result);
        self.in_flight.remove(&key);
        self.cache.insert(key, result.clone());
        result
    }

    /// Resolve a node output inside an enclosing scope that is still on
    /// the stack. Used by named references that resolve across the
    /// function-inlining boundary.
    pub(crate) fn result_in_scope(
        &mut self,
        scope_index: usize,
        node_id: NodeId,
        output: &str,
    ) -> NodeResult {
        let saved = self.current;
        self.current = scope_index;
        let result = self.result_of(node_id, output);
        self.current = saved;
        result
    }

    fn hoist(&mut self, result: NodeResult) -> NodeResult {
        match result {
            NodeResult::Value {
                code,
                ty,
                constant: false,
            } if !emit::is_atom(&code) => {
                let symbol = self.emit_local(ty, &code);
                NodeResult::expr(symbol, ty)
            }
            other => other,
        }
    }

    /// Resolve an input plug without casting. Connection first; a dangling
    /// connection counts as unconnected. Falls back to the node's literal
    /// property of the same name, then the plug default.
    pub(crate) fn input_untyped(&mut self, node: &Node, plug: &PlugDesc) -> NodeResult {
        if let Some(conn) = node.input_connection(&plug.name) {
            let conn = conn.clone();
            if self.graph().find_node(conn.node).is_some() {
                return self.result_of(conn.node, &conn.output);
            }
        }
        for literal in [node.property(&plug.name), plug.default.as_ref()]
            .into_iter()
            .flatten()
        {
            if let Value::Gradient(stops) = literal {
                return NodeResult::Gradient(stops.clone());
            }
            if let Some((code, ty)) = emit::literal(literal) {
                return NodeResult::constant(code, ty);
            }
        }
        if plug.required {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticKind::MissingInput,
                Some(node.id),
                format!("required input `{}` is not connected", plug.name),
            ));
        }
        NodeResult::Missing
    }

    /// Resolve an input plug and cast it to the plug's declared type.
    pub(crate) fn input(&mut self, node: &Node, name: &str) -> NodeResult {
        let plug = self
            .registry
            .input_plug(node, name)
            .unwrap_or_else(|| panic!("node type `{}` declares input `{name}`", node.type_id));
        let result = self.input_untyped(node, &plug);
        match result {
            NodeResult::Missing => NodeResult::Missing,
            other => self.cast(other, plug.ty, Some(node.id)),
        }
    }

    // ------------------------------------------------------------------------
    // Casting
    // ------------------------------------------------------------------------

    /// Cast a result to a required type.
    ///
    /// Deterministic expansion/truncation: scalars replicate to fill wider
    /// vectors, truncation drops trailing components, narrower vectors
    /// zero-pad. Casts are emitted inline in generated code; bits are never
    /// silently reinterpreted.
    pub(crate) fn cast(
        &mut self,
        result: NodeResult,
        to: PlugType,
        node: Option<NodeId>,
    ) -> NodeResult {
        let NodeResult::Value { code, ty, constant } = result else {
            return match result {
                NodeResult::Missing | NodeResult::Error => result,
                NodeResult::Resource { ty, .. } if ty == to => result,
                NodeResult::Gradient(_) if to == PlugType::Gradient => result,
                other => {
                    let from = other.ty().map_or("missing", PlugType::as_str);
                    self.diagnostics.push(Diagnostic::error(
                        DiagnosticKind::InvalidCast,
                        node,
                        format!("cannot cast {from} to {}", to.as_str()),
                    ));
                    NodeResult::Error
                }
            };
        };

        if ty == to {
            return NodeResult::Value { code, ty, constant };
        }
        // Color and Vector4 share a layout; retype without emitting a cast.
        if ty.is_numeric() && to.is_numeric() && ty.hlsl_name() == to.hlsl_name() {
            return NodeResult::Value { code, ty: to, constant };
        }
        if !ty.is_numeric() || !to.is_numeric() {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticKind::InvalidCast,
                node,
                format!("cannot cast {} to {}", ty.as_str(), to.as_str()),
            ));
            return NodeResult::Error;
        }

        let from_n = ty.components().expect("numeric types have components");
        let to_n = to.components().expect("numeric types have components");
        let code = match (from_n, to_n) {
            (1, 1) => scalar_convert(&code, ty, to),
            (1, n) => {
                let scalar = scalar_convert(&code, ty, PlugType::Float);
                let parts = vec![scalar; n as usize].join(", ");
                format!("float{n}({parts})")
            }
            (_, 1) => scalar_convert(&format!("({code}).x"), PlugType::Float, to),
            (m, n) if m > n => {
                let mask = &"xyzw"[..n as usize];
                format!("({code}).{mask}")
            }
            (m, n) => {
                let zeros = ", 0.0".repeat((n - m) as usize);
                format!("float{n}(({code}){zeros})")
            }
        };
        NodeResult::Value { code, ty: to, constant }
    }

    // ------------------------------------------------------------------------
    // Code emission
    // ------------------------------------------------------------------------

    /// Hoist an expression into a uniquely-named local statement and return
    /// the symbol.
    pub(crate) fn emit_local(&mut self, ty: PlugType, expr: &str) -> String {
        let symbol = format!("local_{}", self.next_local);
        self.next_local += 1;
        let ty_name = ty.hlsl_name().unwrap_or("float4");
        self.statements.push(format!("{ty_name} {symbol} = {expr};"));
        symbol
    }

    /// Record a diagnostic.
    pub(crate) fn diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    // ------------------------------------------------------------------------
    // Resource registration
    // ------------------------------------------------------------------------

    fn register_resource(
        &mut self,
        node: NodeId,
        kind: ResourceKind,
        ty: PlugType,
        logical: &str,
        default: Option<Value>,
        hints: ParameterHints,
    ) -> Option<String> {
        if let Some(existing) = self.resources.get(logical) {
            if existing.kind == kind && existing.ty == ty && existing.default == default {
                return Some(existing.symbol.clone());
            }
            self.diagnostics.push(Diagnostic::error(
                DiagnosticKind::DuplicateResource,
                Some(node),
                format!(
                    "resource `{logical}` is already registered by node {} with a different binding",
                    existing.first_node.0
                ),
            ));
            return None;
        }

        let (prefix, slot) = match kind {
            ResourceKind::Texture2D | ResourceKind::TextureCube => (
                "tex",
                self.count_resources(|k| {
                    matches!(k, ResourceKind::Texture2D | ResourceKind::TextureCube)
                }),
            ),
            ResourceKind::Sampler => (
                "samp",
                self.count_resources(|k| matches!(k, ResourceKind::Sampler)),
            ),
            ResourceKind::Parameter => (
                "param",
                self.count_resources(|k| matches!(k, ResourceKind::Parameter)),
            ),
        };
        let symbol = format!("{prefix}_{slot}");
        self.resources.insert(
            logical.to_string(),
            RegisteredResource {
                symbol: symbol.clone(),
                kind,
                ty,
                default,
                hints,
                slot,
                first_node: node,
            },
        );
        Some(symbol)
    }

    fn count_resources(&self, matches: impl Fn(ResourceKind) -> bool) -> u32 {
        self.resources.values().filter(|r| matches(r.kind)).count() as u32
    }

    /// Register a texture under a logical name, deduplicating identical
    /// registrations. Returns the assigned global symbol.
    pub(crate) fn register_texture(
        &mut self,
        node: NodeId,
        logical: &str,
        ty: PlugType,
        path: Option<String>,
        hints: ParameterHints,
    ) -> Option<String> {
        let kind = if ty == PlugType::TextureCube {
            ResourceKind::TextureCube
        } else {
            ResourceKind::Texture2D
        };
        let default = path.map(Value::String);
        self.register_resource(node, kind, ty, logical, default, hints)
    }

    /// Register a shared sampler state for a filter mode.
    pub(crate) fn register_sampler(&mut self, node: NodeId, filter: &str) -> Option<String> {
        let logical = format!("sampler_{filter}");
        self.register_resource(
            node,
            ResourceKind::Sampler,
            PlugType::Sampler,
            &logical,
            Some(Value::String(filter.to_string())),
            ParameterHints::default(),
        )
    }

    /// Register a scalar/vector/matrix parameter from a blackboard entry.
    pub(crate) fn register_parameter(
        &mut self,
        node: NodeId,
        parameter: &prism_graph::BlackboardParameter,
    ) -> Option<String> {
        self.register_resource(
            node,
            ResourceKind::Parameter,
            parameter.ty,
            &parameter.name,
            parameter.default.clone(),
            parameter.hints.clone(),
        )
    }

    // ------------------------------------------------------------------------
    // Named value table
    // ------------------------------------------------------------------------

    /// Find the declaration for a name, searching the current graph first
    /// and then the enclosing scopes (declarations are shared across the
    /// inlining boundary).
    pub(crate) fn named_lookup(&self, name: &str) -> Option<(usize, NodeId)> {
        for index in (0..=self.current).rev() {
            if let Some(id) = self.scopes[index].named.get(name) {
                return Some((index, *id));
            }
        }
        None
    }

    // ------------------------------------------------------------------------
    // Function inlining
    // ------------------------------------------------------------------------

    /// Inline one output of a function reference node.
    ///
    /// The referenced graph is loaded lazily, its input ports substituted
    /// with caller results or port defaults, and its nodes resolved with
    /// this same compiler, so resource registrations and named values are
    /// shared across the boundary. Only port-level results cross it; inner
    /// node identifiers stay scoped to the expansion.
    pub(crate) fn inline_function(&mut self, node: &Node, output: &str) -> NodeResult {
        let Some(path) = node
            .property_str("function")
            .filter(|p| !p.is_empty())
            .map(str::to_string)
        else {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticKind::FunctionUnavailable,
                Some(node.id),
                "function reference has no target graph",
            ));
            return NodeResult::Error;
        };

        if self.function_stack.contains(&path) {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticKind::Cycle,
                Some(node.id),
                format!("function `{path}` recursively includes itself"),
            ));
            return NodeResult::Error;
        }

        let function = match self.load_function(&path) {
            Some(graph) => graph,
            None => {
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticKind::FunctionUnavailable,
                    Some(node.id),
                    format!("function graph `{path}` could not be loaded"),
                ));
                return NodeResult::Error;
            }
        };
        if function.kind != GraphKind::Function {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticKind::FunctionUnavailable,
                Some(node.id),
                format!("graph `{path}` is not a function graph"),
            ));
            return NodeResult::Error;
        }

        // Substitute each input port in the caller's scope before entering
        // the function.
        let mut bindings = HashMap::new();
        for parameter in function.parameters() {
            let port = PlugDesc {
                name: parameter.name.clone(),
                ty: parameter.ty,
                required: parameter.required,
                default: parameter.default.clone(),
            };
            let result = match self.input_untyped(node, &port) {
                NodeResult::Missing if parameter.required => {
                    // input_untyped already recorded the missing-input
                    // diagnostic naming the port.
                    NodeResult::Error
                }
                // Texture ports have no literal form; an unconnected port
                // with a default asset path binds that texture directly.
                NodeResult::Missing
                    if matches!(
                        parameter.ty,
                        PlugType::Texture2D | PlugType::TextureCube
                    ) && parameter.default.as_ref().and_then(Value::as_str).is_some() =>
                {
                    let path = parameter
                        .default
                        .as_ref()
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    match self.register_texture(
                        node.id,
                        &parameter.name,
                        parameter.ty,
                        path,
                        parameter.hints.clone(),
                    ) {
                        Some(symbol) => NodeResult::Resource {
                            symbol,
                            ty: parameter.ty,
                        },
                        None => NodeResult::Error,
                    }
                }
                NodeResult::Missing => NodeResult::Missing,
                other => self.cast(other, parameter.ty, Some(node.id)),
            };
            bindings.insert(parameter.id, result);
        }

        let Some(out_node) = function
            .nodes_of_type("function_output")
            .find(|n| n.property_str("name") == Some(output))
            .map(|n| n.id)
        else {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticKind::UnknownOutput,
                Some(node.id),
                format!("function `{path}` has no output named `{output}`"),
            ));
            return NodeResult::Error;
        };

        let serial = self.scope_serial_for_instance(node.id);
        self.function_stack.push(path.clone());
        self.scopes.push(Scope {
            serial,
            graph: GraphHandle::Function(function.clone()),
            bindings,
            named: scan_named(&function),
        });
        let saved = self.current;
        self.current = self.scopes.len() - 1;
        self.validate_graph_once(&path);

        let result = self.result_of(out_node, "value");

        self.scopes.pop();
        self.current = saved;
        self.function_stack.pop();
        result
    }

    fn load_function(&mut self, path: &str) -> Option<Arc<Graph>> {
        if let Some(cached) = self.function_cache.get(path) {
            return Some(cached.clone());
        }
        match self.provider.load(path) {
            Ok(graph) => {
                self.function_cache.insert(path.to_string(), graph.clone());
                Some(graph)
            }
            Err(err) => {
                tracing::warn!("function load failed: {err}");
                None
            }
        }
    }

    /// Serial for a function expansion, stable per reference instance so
    /// all outputs of one reference share their inner results.
    fn scope_serial_for_instance(&mut self, node: NodeId) -> usize {
        let key = (self.scopes[self.current].serial, node);
        if let Some(serial) = self.instance_scopes.get(&key) {
            return *serial;
        }
        let serial = self.next_scope_serial;
        self.next_scope_serial += 1;
        self.instance_scopes.insert(key, serial);
        serial
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    /// Aggregate node-local issues for a graph, once per pass.
    fn validate_graph_once(&mut self, key: &str) {
        if !self.validated.insert(key.to_string()) {
            return;
        }
        let mut collected = Vec::new();
        {
            let graph = self.graph();
            for node in graph.nodes() {
                match self.registry.get(&node.type_id) {
                    None => collected.push(Diagnostic::error(
                        DiagnosticKind::UnknownNodeType,
                        Some(node.id),
                        format!("unknown node type `{}`", node.type_id),
                    )),
                    Some(descriptor) => {
                        if let Some(validate) = descriptor.validate {
                            for issue in validate(node, graph) {
                                collected.push(Diagnostic {
                                    severity: issue.severity.into(),
                                    kind: DiagnosticKind::Validation,
                                    node: Some(node.id),
                                    message: issue.message,
                                });
                            }
                        }
                    }
                }
            }

            let mut seen: HashMap<&str, NodeId> = HashMap::new();
            for node in graph.nodes_of_type("named_declaration") {
                let Some(name) = node.property_str("name").filter(|n| !n.is_empty()) else {
                    continue;
                };
                if let Some(first) = seen.get(name) {
                    collected.push(Diagnostic::error(
                        DiagnosticKind::DuplicateName,
                        Some(node.id),
                        format!("name `{name}` is already declared by node {}", first.0),
                    ));
                } else {
                    seen.insert(name, node.id);
                }
            }
        }
        self.diagnostics.extend(collected);
    }
}

fn scan_named(graph: &Graph) -> HashMap<String, NodeId> {
    let mut named = HashMap::new();
    for node in graph.nodes_of_type("named_declaration") {
        if let Some(name) = node.property_str("name").filter(|n| !n.is_empty()) {
            // First declaration wins; duplicates are diagnosed separately.
            named.entry(name.to_string()).or_insert(node.id);
        }
    }
    named
}

fn scalar_convert(code: &str, from: PlugType, to: PlugType) -> String {
    match (from, to) {
        (PlugType::Bool, PlugType::Float) => format!("(({code}) ? 1.0 : 0.0)"),
        (PlugType::Bool, PlugType::Int) => format!("(({code}) ? 1 : 0)"),
        (PlugType::Int, PlugType::Float) => format!("(float)({code})"),
        (PlugType::Float, PlugType::Int) => format!("(int)({code})"),
        (PlugType::Float, PlugType::Bool) => format!("(({code}) != 0.0)"),
        (PlugType::Int, PlugType::Bool) => format!("(({code}) != 0)"),
        _ => code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::NoFunctions;
    use prism_graph::builtin_registry;

    fn cast_one(result: NodeResult, to: PlugType) -> NodeResult {
        let registry = builtin_registry();
        let graph = Graph::new("cast");
        let mut compiler = Compiler::new(&registry, &graph, &NoFunctions);
        compiler.cast(result, to, None)
    }

    #[test]
    fn test_cast_replicates_scalar() {
        let result = cast_one(
            NodeResult::constant("0.5", PlugType::Float),
            PlugType::Vector3,
        );
        assert_eq!(result.code(), Some("float3(0.5, 0.5, 0.5)"));
        assert_eq!(result.ty(), Some(PlugType::Vector3));
    }

    #[test]
    fn test_cast_truncates_trailing_components() {
        let result = cast_one(NodeResult::expr("local_0", PlugType::Vector4), PlugType::Vector2);
        assert_eq!(result.code(), Some("(local_0).xy"));
    }

    #[test]
    fn test_cast_zero_pads_narrower_vectors() {
        let result = cast_one(NodeResult::expr("local_0", PlugType::Vector2), PlugType::Vector4);
        assert_eq!(result.code(), Some("float4((local_0), 0.0, 0.0)"));
    }

    #[test]
    fn test_cast_color_to_vector4_is_free() {
        let result = cast_one(NodeResult::expr("local_0", PlugType::Color), PlugType::Vector4);
        assert_eq!(result.code(), Some("local_0"));
        assert_eq!(result.ty(), Some(PlugType::Vector4));
    }

    #[test]
    fn test_cast_rejects_objects() {
        let registry = builtin_registry();
        let graph = Graph::new("cast");
        let mut compiler = Compiler::new(&registry, &graph, &NoFunctions);
        let result = compiler.cast(
            NodeResult::Resource {
                symbol: "tex_0".to_string(),
                ty: PlugType::Texture2D,
            },
            PlugType::Float,
            None,
        );
        assert_eq!(result, NodeResult::Error);
        assert_eq!(compiler.diagnostics.len(), 1);
    }

    #[test]
    fn test_scalar_convert_int_to_float() {
        assert_eq!(
            scalar_convert("x", PlugType::Int, PlugType::Float),
            "(float)(x)"
        );
    }
}
