// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shader graph data model for Prism.
//!
//! This crate holds everything the shader compiler consumes:
//! - Typed nodes and plugs with a statically-built type registry
//! - The graph structure with blackboard parameters
//! - Persisted JSON documents with per-node schema migrations
//!
//! Code generation lives in `prism_codegen`; the editor UI and preview
//! renderers are separate hosts that consume these types.

pub mod blackboard;
pub mod document;
pub mod graph;
pub mod migration;
pub mod node;
pub mod plug;
pub mod registry;
pub mod value;

pub use blackboard::{BlackboardParameter, ParameterHints, ParameterId};
pub use document::{DocumentError, GraphDocument, NodeData, DOCUMENT_FORMAT_VERSION};
pub use graph::{ConnectError, Graph, GraphKind};
pub use node::{Node, NodeId};
pub use plug::{InputConnection, PlugDesc, PlugDirection};
pub use registry::{
    builtin_registry, IssueSeverity, NodeCategory, NodeDescriptor, NodeIssue, NodeRegistry,
};
pub use value::{GradientStop, PlugType, Value};
