// SPDX-License-Identifier: MIT OR Apache-2.0
//! Compile diagnostics.
//!
//! A compile pass never throws for malformed user graphs; it collects an
//! ordered diagnostic list instead. Any error-severity entry means the
//! generated source, if produced at all, must be treated as not-compilable.

use prism_graph::{IssueSeverity, NodeId};

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The graph still compiles
    Warning,
    /// Code generation must not proceed
    Error,
}

impl From<IssueSeverity> for Severity {
    fn from(severity: IssueSeverity) -> Self {
        match severity {
            IssueSeverity::Warning => Self::Warning,
            IssueSeverity::Error => Self::Error,
        }
    }
}

/// What went wrong, for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A mandatory input has no connection and no usable default
    MissingInput,
    /// Two different bindings collided on one logical resource name
    DuplicateResource,
    /// Two name declarations share a name within one graph
    DuplicateName,
    /// A named-value reference has no matching declaration
    UnresolvedName,
    /// A resolution chain revisited a node currently being resolved
    Cycle,
    /// A parameter node references a deleted blackboard entry
    OrphanedParameter,
    /// A value cannot be cast to the type a consumer requires
    InvalidCast,
    /// A node's type tag is not in the registry
    UnknownNodeType,
    /// A node was asked for an output plug it does not have
    UnknownOutput,
    /// A function reference could not be loaded
    FunctionUnavailable,
    /// Reported by a node's own validation capability
    Validation,
}

/// One entry of the compile diagnostic list.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity
    pub severity: Severity,
    /// Category
    pub kind: DiagnosticKind,
    /// Originating node, when attributable
    pub node: Option<NodeId>,
    /// Human-readable description
    pub message: String,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(kind: DiagnosticKind, node: Option<NodeId>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            node,
            message: message.into(),
        }
    }

    /// Create a warning diagnostic.
    pub fn warning(kind: DiagnosticKind, node: Option<NodeId>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            node,
            message: message.into(),
        }
    }
}
