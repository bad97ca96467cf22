//! Generated bindings for the audit contract.
//!
//! The contract surface this gateway needs is small: one write (`logMemory`)
//! and three reads. Field bounds (`opType ≤ 1`, `title` ≤ 100 bytes,
//! `summary` ≤ 200 bytes) are enforced on-chain; [`crate::client`] validates
//! them up front so a bad call never reaches the signer.

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface MemoryLog {
        function logMemory(uint8 opType, string title, string summary, string tags, bytes32 contentHash) external returns (uint256);
        function getMemory(uint256 id) external view returns (address user, uint8 opType, string title, string summary, string tags, bytes32 contentHash, uint256 timestamp);
        function getTotalMemories() external view returns (uint256);
        event MemoryLogged(uint256 indexed id, address indexed user, uint8 opType, string title, string tags);
    }
}
