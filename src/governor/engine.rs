use std::path::Path;

use crate::governor::{
    audit::{AuditEventKind, AuditLog, AuditOutcome},
    error::{GovernorError, approval_required, forbidden},
    rules::GovernorRules,
};

/// Outcome of one permission query. Constructed fresh per call and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct GovernorDecision {
    pub allowed: bool,
    pub reason: String,
    pub requires_approval: bool,
}

/// Evaluates the immutable governor rule tree. Callers may query the engine
/// but never modify its rules; the only internal mutation is the append-only
/// audit trail.
#[derive(Debug, Clone)]
pub struct GovernorEngine {
    rules: GovernorRules,
    audit: AuditLog,
}

impl GovernorEngine {
    pub fn load(path: &Path) -> Result<Self, GovernorError> {
        let rules = GovernorRules::load(path)?;
        tracing::info!(
            target: "governor",
            version = %rules.governor.version,
            path = %path.display(),
            "governor_rules_loaded"
        );
        Ok(Self::from_rules(rules))
    }

    pub fn from_rules(rules: GovernorRules) -> Self {
        Self {
            rules,
            audit: AuditLog::new(),
        }
    }

    pub fn version(&self) -> &str {
        &self.rules.governor.version
    }

    /// Permission query. Lookup fails closed: only a complete chain of
    /// branches spelling out `permission_path` yields `allowed`.
    ///
    /// `requires_approval` uses a deliberately permissive dual match (full
    /// path ends with a gated identifier, or the identifier occurs anywhere
    /// inside the path); an identifier that happens to be a substring of an
    /// unrelated path will trip it. Kept as specified pending product
    /// clarification.
    pub fn allows(&mut self, permission_path: &str) -> GovernorDecision {
        let allowed = self.rules.permission_granted(permission_path);
        let decision = GovernorDecision {
            allowed,
            reason: if allowed { "allowed" } else { "forbidden" }.to_string(),
            requires_approval: self.path_requires_approval(permission_path),
        };

        tracing::debug!(
            target: "governor",
            path = permission_path,
            allowed = decision.allowed,
            requires_approval = decision.requires_approval,
            "permission_check"
        );
        self.audit.append(
            AuditEventKind::PermissionCheck,
            permission_path.to_string(),
            AuditOutcome::Decision(decision.clone()),
        );

        decision
    }

    /// Clamp a learning parameter into its configured bounds. A key with no
    /// configured bounds passes the value through unchanged; both paths are
    /// audited.
    pub fn clamp(&mut self, category: &str, key: &str, value: f64) -> f64 {
        let clamped = match self.rules.clamp_bounds(key) {
            Some([min, max]) => value.clamp(min, max),
            None => value,
        };

        self.audit.append(
            AuditEventKind::Clamp,
            format!("{category}.{key}"),
            AuditOutcome::Clamp {
                input: value,
                output: clamped,
            },
        );

        clamped
    }

    /// Exact membership test against the approval-gated action list, distinct
    /// from the substring matching inside `allows`.
    pub fn requires_approval(&self, action: &str) -> bool {
        self.rules
            .approval_required_for
            .iter()
            .any(|gated| gated == action)
    }

    /// Strict variant for integrations that want failure signalling instead
    /// of decision objects. The turn path prefers `allows` and substitutes
    /// refusal text.
    pub fn enforce(&mut self, permission_path: &str) -> Result<(), GovernorError> {
        let decision = self.allows(permission_path);

        if !decision.allowed {
            return Err(forbidden(format!(
                "action '{permission_path}' is forbidden by governor"
            )));
        }
        if decision.requires_approval {
            return Err(approval_required(format!(
                "action '{permission_path}' requires human approval"
            )));
        }

        Ok(())
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    fn path_requires_approval(&self, path: &str) -> bool {
        self.rules
            .approval_required_for
            .iter()
            .any(|gated| path.ends_with(gated.as_str()) || path.contains(gated.as_str()))
    }
}
