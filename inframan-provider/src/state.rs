//! Parsing of `terraform output -json` state snapshots.
//!
//! Two output shapes are in the wild: a legacy single `public_ip` value and
//! a named `instances` map. Some provisioning templates still emit the
//! legacy field alongside the map for backward compatibility, so the map
//! always wins when both are present; a stale `public_ip` must never mask
//! multi-endpoint output.

use inframan_core::error::{InframanError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

/// A single `value`-wrapped terraform output. Missing outputs deserialize
/// to the default, never an error.
#[derive(Debug, Default, Deserialize)]
struct OutputValue<T> {
    #[serde(default)]
    value: T,
}

/// The schema-flexible state snapshot as terraform emits it.
#[derive(Debug, Default, Deserialize)]
pub struct StateDocument {
    /// Legacy single-instance output.
    #[serde(default)]
    public_ip: OutputValue<String>,

    /// Named multi-instance output: `{ "web-1": "1.2.3.4", ... }`.
    #[serde(default)]
    instances: OutputValue<BTreeMap<String, String>>,
}

/// The one place the two-shape precedence rule lives.
#[derive(Debug, PartialEq, Eq)]
pub enum StateShape {
    /// Named map present and non-empty. Takes precedence over the legacy
    /// field regardless of its value.
    NamedMap(BTreeMap<String, String>),
    /// Only the legacy single address is populated.
    LegacySingle(String),
    /// Neither field carries a usable value.
    Empty,
}

impl StateDocument {
    /// Decode raw `terraform output -json` bytes. Only structurally
    /// malformed input fails; missing fields do not.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        serde_json::from_slice(raw).map_err(Into::into)
    }

    pub fn into_shape(self) -> StateShape {
        if !self.instances.value.is_empty() {
            StateShape::NamedMap(self.instances.value)
        } else if !self.public_ip.value.is_empty() {
            StateShape::LegacySingle(self.public_ip.value)
        } else {
            StateShape::Empty
        }
    }
}

/// A provisioned instance, recomputed from tool output on every resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub project: String,
    /// Empty for single-instance projects using the legacy output shape.
    pub name: String,
    pub public_ip: String,
}

impl Instance {
    /// Full identifier: `project/name`, or just `project` for the legacy
    /// unnamed instance.
    pub fn full_name(&self) -> String {
        if self.name.is_empty() {
            self.project.clone()
        } else {
            format!("{}/{}", self.project, self.name)
        }
    }
}

/// Extract the instance set for `project` from raw state output.
pub fn parse_instances(raw: &[u8], project: &str) -> Result<Vec<Instance>> {
    match StateDocument::parse(raw)?.into_shape() {
        StateShape::NamedMap(map) => Ok(map
            .into_iter()
            .map(|(name, public_ip)| Instance {
                project: project.to_string(),
                name,
                public_ip,
            })
            .collect()),
        StateShape::LegacySingle(public_ip) => Ok(vec![Instance {
            project: project.to_string(),
            name: String::new(),
            public_ip,
        }]),
        StateShape::Empty => Err(InframanError::NotFound(format!(
            "no instances found in terraform output for project \"{}\" (expected 'instances' map or 'public_ip')",
            project
        ))),
    }
}
