use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GovernorErrorKind {
    RulesUnavailable,
    MalformedRules,
    Forbidden,
    ApprovalRequired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernorError {
    pub kind: GovernorErrorKind,
    pub message: String,
}

impl GovernorError {
    pub fn new(kind: GovernorErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for GovernorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for GovernorError {}

pub fn rules_unavailable(message: impl Into<String>) -> GovernorError {
    GovernorError::new(GovernorErrorKind::RulesUnavailable, message)
}

pub fn malformed_rules(message: impl Into<String>) -> GovernorError {
    GovernorError::new(GovernorErrorKind::MalformedRules, message)
}

pub fn forbidden(message: impl Into<String>) -> GovernorError {
    GovernorError::new(GovernorErrorKind::Forbidden, message)
}

pub fn approval_required(message: impl Into<String>) -> GovernorError {
    GovernorError::new(GovernorErrorKind::ApprovalRequired, message)
}
