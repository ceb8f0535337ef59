// SPDX-License-Identifier: MIT OR Apache-2.0
//! Schema migrations for persisted node data.
//!
//! Each node type declares a current version; persisted nodes store the
//! version they were written with. Before a node is materialized, the
//! migrations registered for its type are applied in ascending version
//! order against the raw JSON property map until it matches the current
//! version. A failed migration is recovered at the call site by reverting
//! the node to its type defaults; it never aborts the graph load.

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

/// A single raw-property rewrite step for one node type.
pub struct Migration {
    /// The version this step upgrades from (to `from + 1`).
    pub from: u32,
    /// Pure rewrite of the persisted property map.
    pub apply: fn(&mut Map<String, JsonValue>) -> Result<(), MigrationError>,
}

/// Error produced by a migration step or the upgrade driver.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A field the migration needs is absent
    #[error("missing field `{0}`")]
    MissingField(String),

    /// A field holds a value the migration cannot map
    #[error("field `{field}` has unsupported value `{value}`")]
    UnsupportedValue {
        /// Field name
        field: String,
        /// Offending raw value
        value: String,
    },

    /// No registered step upgrades from this version
    #[error("no migration step from version {0}")]
    NoStepFrom(u32),

    /// Persisted version is newer than the type's current version
    #[error("persisted version {persisted} is newer than current version {current}")]
    FromFuture {
        /// Version stored in the document
        persisted: u32,
        /// The node type's current version
        current: u32,
    },
}

/// Upgrade raw node properties from `version` to `current`, in order.
///
/// On success `version` equals `current` and the map holds the new shape.
/// On failure the map may be partially rewritten; the caller discards it
/// and reverts to defaults.
pub fn upgrade(
    migrations: &[Migration],
    version: &mut u32,
    properties: &mut Map<String, JsonValue>,
    current: u32,
) -> Result<(), MigrationError> {
    if *version > current {
        return Err(MigrationError::FromFuture {
            persisted: *version,
            current,
        });
    }
    while *version < current {
        let step = migrations
            .iter()
            .find(|m| m.from == *version)
            .ok_or(MigrationError::NoStepFrom(*version))?;
        (step.apply)(properties)?;
        *version += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rename_step(props: &mut Map<String, JsonValue>) -> Result<(), MigrationError> {
        let old = props
            .remove("old")
            .ok_or_else(|| MigrationError::MissingField("old".to_string()))?;
        props.insert("new".to_string(), old);
        Ok(())
    }

    #[test]
    fn test_upgrade_applies_steps_in_order() {
        let migrations = vec![Migration {
            from: 1,
            apply: rename_step,
        }];
        let mut props = json!({ "old": 5 }).as_object().unwrap().clone();
        let mut version = 1;
        upgrade(&migrations, &mut version, &mut props, 2).unwrap();
        assert_eq!(version, 2);
        assert_eq!(props.get("new"), Some(&json!(5)));
        assert!(props.get("old").is_none());
    }

    #[test]
    fn test_upgrade_missing_step_fails() {
        let mut props = Map::new();
        let mut version = 1;
        let err = upgrade(&[], &mut version, &mut props, 3).unwrap_err();
        assert!(matches!(err, MigrationError::NoStepFrom(1)));
    }

    #[test]
    fn test_upgrade_from_future_fails() {
        let mut props = Map::new();
        let mut version = 9;
        let err = upgrade(&[], &mut version, &mut props, 2).unwrap_err();
        assert!(matches!(err, MigrationError::FromFuture { persisted: 9, .. }));
    }

    #[test]
    fn test_upgrade_noop_when_current() {
        let mut props = Map::new();
        let mut version = 2;
        upgrade(&[], &mut version, &mut props, 2).unwrap();
        assert_eq!(version, 2);
    }
}
