// Path: crates/api/src/governance/mod.rs
//! Defines the `VoteCaster` trait for pluggable voting strategies.

use async_trait::async_trait;
use wasmlc_types::app::VoteOption;
use wasmlc_types::error::VoteError;

/// Casts votes on a governance proposal.
///
/// The driver makes no assumption about who votes or how many do: a test
/// harness may let every validator vote the same way, split the vote, or
/// abstain entirely. Whatever the strategy, the proposal's outcome is still
/// read back from the ledger by polling.
#[async_trait]
pub trait VoteCaster: Send + Sync {
    /// Casts the votes this strategy is responsible for on `proposal_id`.
    async fn cast_votes(&self, proposal_id: u64, option: VoteOption) -> Result<(), VoteError>;
}
