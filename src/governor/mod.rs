#![allow(dead_code)]

pub mod audit;
pub mod engine;
pub mod error;
pub mod rules;

pub use audit::{AuditEventKind, AuditLog, AuditOutcome, AuditRecord};
pub use engine::{GovernorDecision, GovernorEngine};
pub use error::{GovernorError, GovernorErrorKind};
pub use rules::{GovernorRules, PermissionNode};
