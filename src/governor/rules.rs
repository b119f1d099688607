use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;

use crate::governor::error::{GovernorError, malformed_rules, rules_unavailable};

/// One node of the permission tree. Presence of a full path through branches
/// is what grants a permission; the leaf's own value is never consulted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PermissionNode {
    Branch(BTreeMap<String, PermissionNode>),
    Leaf(bool),
}

impl Default for PermissionNode {
    fn default() -> Self {
        PermissionNode::Branch(BTreeMap::new())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GovernorMeta {
    pub version: String,
}

/// The declarative governor rule document. Loaded once at startup and
/// read-only for the process lifetime.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GovernorRules {
    pub governor: GovernorMeta,
    #[serde(default)]
    pub permissions: PermissionNode,
    #[serde(default)]
    pub approval_required_for: Vec<String>,
    #[serde(default)]
    pub learning_bounds: LearningBounds,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LearningBounds {
    #[serde(default)]
    pub personality_clamp: BTreeMap<String, [f64; 2]>,
}

impl GovernorRules {
    /// A missing or unparseable rule file is fatal: there is no safe default
    /// permission set to fall back to.
    pub fn load(path: &Path) -> Result<Self, GovernorError> {
        let content = fs::read_to_string(path).map_err(|err| {
            rules_unavailable(format!(
                "failed to read governor rules '{}': {err}",
                path.display()
            ))
        })?;

        json5::from_str(&content).map_err(|err| {
            malformed_rules(format!(
                "failed to parse governor rules '{}': {err}",
                path.display()
            ))
        })
    }

    /// Walk the permission tree segment by segment. Any absent segment, or a
    /// leaf reached before the path is consumed, fails closed.
    pub fn permission_granted(&self, permission_path: &str) -> bool {
        let mut node = &self.permissions;
        for segment in permission_path.split('.') {
            match node {
                PermissionNode::Branch(children) => match children.get(segment) {
                    Some(child) => node = child,
                    None => return false,
                },
                PermissionNode::Leaf(_) => return false,
            }
        }
        true
    }

    pub fn clamp_bounds(&self, key: &str) -> Option<[f64; 2]> {
        self.learning_bounds.personality_clamp.get(key).copied()
    }
}
