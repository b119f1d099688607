use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::affect::AffectVector;

/// One completed exchange, plus the synthetic items written by long-term
/// consolidation. Immutable after creation; consolidation replaces items
/// wholesale rather than editing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryItem {
    /// Epoch seconds.
    pub timestamp: f64,
    pub user_input: String,
    pub assistant_response: String,
    pub intent: String,
    pub emotion: AffectVector,
    pub importance: f64,
    #[serde(default)]
    pub summary: Option<String>,
}

pub(crate) fn now_epoch_seconds() -> f64 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() as f64 / 1e9
}
