use serde::{Deserialize, Serialize};

/// A tagged hit returned from the canister's `search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub text: String,
    pub score: f32,
    pub tag: String,
}

/// Result of an `insert` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertOutcome {
    pub stored: bool,
    pub id: Option<String>,
}
