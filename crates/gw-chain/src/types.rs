use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operation type recorded on-chain. The contract enforces `opType ≤ 1`.
///
/// Both inserts and chat turns log as knowledge events (`Insert`, value 0) —
/// a chat turn is not a distinct op type on chain, only `Search` (value 1) is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum OpType {
    Insert = 0,
    Search = 1,
}

impl OpType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// One entry read back from `MemoryLogged`/`getMemory`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: u64,
    pub user: String,
    pub op_type: u8,
    pub title: String,
    pub summary: String,
    pub tags: String,
    pub content_hash: String,
    pub timestamp: DateTime<Utc>,
}
