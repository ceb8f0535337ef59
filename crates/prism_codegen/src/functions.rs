// SPDX-License-Identifier: MIT OR Apache-2.0
//! Function graph resolution for subgraph inlining.

use prism_graph::Graph;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Error resolving a function graph by path.
#[derive(Debug, Error)]
pub enum FunctionLoadError {
    /// No function graph exists at the path
    #[error("function graph not found: {0}")]
    NotFound(String),

    /// The asset exists but could not be loaded as a graph
    #[error("function graph `{path}` failed to load: {reason}")]
    Invalid {
        /// Asset path
        path: String,
        /// Why the load failed
        reason: String,
    },
}

/// Host-supplied resolver for function graphs referenced by path.
///
/// The compiler loads each referenced graph lazily, on first use, and
/// caches it for the remainder of the pass.
pub trait FunctionProvider {
    /// Resolve a function graph by its asset path.
    fn load(&self, path: &str) -> Result<Arc<Graph>, FunctionLoadError>;
}

/// Provider for graphs that contain no function references.
#[derive(Debug, Default)]
pub struct NoFunctions;

impl FunctionProvider for NoFunctions {
    fn load(&self, path: &str) -> Result<Arc<Graph>, FunctionLoadError> {
        Err(FunctionLoadError::NotFound(path.to_string()))
    }
}

/// In-memory provider backed by a path map. Used by tests and by hosts
/// that keep function graphs in an asset cache.
#[derive(Debug, Default)]
pub struct MemoryFunctions {
    graphs: HashMap<String, Arc<Graph>>,
}

impl MemoryFunctions {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function graph under a path.
    pub fn insert(&mut self, path: impl Into<String>, graph: Graph) {
        self.graphs.insert(path.into(), Arc::new(graph));
    }
}

impl FunctionProvider for MemoryFunctions {
    fn load(&self, path: &str) -> Result<Arc<Graph>, FunctionLoadError> {
        self.graphs
            .get(path)
            .cloned()
            .ok_or_else(|| FunctionLoadError::NotFound(path.to_string()))
    }
}
