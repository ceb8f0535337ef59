// SPDX-License-Identifier: MIT OR Apache-2.0
//! Blackboard parameters - the exposed values a graph publishes to its host.
//!
//! A blackboard parameter is the single source of truth for one exposed
//! input. Parameter nodes inside the graph mirror it one-way; deleting the
//! parameter orphans those nodes (an error surfaced at compile time, not a
//! crash). On function graphs the parameter list doubles as the input port
//! list.

use crate::value::{PlugType, Value};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a blackboard parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterId(pub Uuid);

impl ParameterId {
    /// Create a new random parameter ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ParameterId {
    fn default() -> Self {
        Self::new()
    }
}

/// Editor presentation hints for a parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterHints {
    /// Group header the parameter is listed under
    pub group: Option<String>,
    /// Hover tooltip
    pub tooltip: Option<String>,
    /// Slider minimum for numeric parameters
    pub min: Option<f32>,
    /// Slider maximum for numeric parameters
    pub max: Option<f32>,
}

/// One exposed parameter entry on a graph's blackboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlackboardParameter {
    /// Unique ID, referenced by parameter nodes
    pub id: ParameterId,
    /// Display and binding name
    pub name: String,
    /// Value type
    pub ty: PlugType,
    /// Canonical default value. Texture parameters store the asset path as
    /// a string; object types without a literal default store `None`.
    pub default: Option<Value>,
    /// Editor presentation hints
    pub hints: ParameterHints,
    /// On function graphs: whether a caller must connect this port
    pub required: bool,
}

impl BlackboardParameter {
    /// Create a parameter with a fresh ID and the type's zero default.
    pub fn new(name: impl Into<String>, ty: PlugType) -> Self {
        Self {
            id: ParameterId::new(),
            name: name.into(),
            ty,
            default: Value::zero(ty),
            hints: ParameterHints::default(),
            required: false,
        }
    }

    /// Set the default value.
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Mark as required (function graph ports).
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the slider range hint.
    pub fn with_range(mut self, min: f32, max: f32) -> Self {
        self.hints.min = Some(min);
        self.hints.max = Some(max);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_parameter_gets_typed_default() {
        let p = BlackboardParameter::new("Tint", PlugType::Color);
        assert_eq!(p.default, Some(Value::Color([0.0, 0.0, 0.0, 1.0])));
        assert!(!p.required);
    }

    #[test]
    fn test_texture_parameter_has_no_literal_default() {
        let p = BlackboardParameter::new("Albedo", PlugType::Texture2D);
        assert_eq!(p.default, None);
    }
}
