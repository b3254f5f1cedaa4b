// Path: crates/types/src/app/gov.rs
//! The subset of the `cosmos.gov.v1` schema the driver reads and writes.
//!
//! Field tags match the upstream protobuf definitions so that encoded messages
//! are byte-compatible with the ledger. Response fields the driver does not
//! need are omitted; `prost` skips unknown fields when decoding.

use super::{Any, Coin};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The current status of a governance proposal in its lifecycle.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    ::prost::Enumeration,
)]
#[repr(i32)]
pub enum ProposalStatus {
    /// The status has not been set.
    Unspecified = 0,
    /// The proposal is collecting deposits.
    DepositPeriod = 1,
    /// The proposal is open for votes.
    VotingPeriod = 2,
    /// The proposal has passed and its messages executed.
    Passed = 3,
    /// The proposal was voted down.
    Rejected = 4,
    /// The proposal passed but executing its messages failed.
    Failed = 5,
}

impl ProposalStatus {
    /// Returns true once the ledger will no longer change this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Passed | Self::Rejected | Self::Failed)
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unspecified => "PROPOSAL_STATUS_UNSPECIFIED",
            Self::DepositPeriod => "PROPOSAL_STATUS_DEPOSIT_PERIOD",
            Self::VotingPeriod => "PROPOSAL_STATUS_VOTING_PERIOD",
            Self::Passed => "PROPOSAL_STATUS_PASSED",
            Self::Rejected => "PROPOSAL_STATUS_REJECTED",
            Self::Failed => "PROPOSAL_STATUS_FAILED",
        };
        f.write_str(name)
    }
}

/// A voting option for a governance proposal.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    ::prost::Enumeration,
)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum VoteOption {
    /// No option selected.
    Unspecified = 0,
    /// A vote in favor of the proposal.
    Yes = 1,
    /// A vote that counts towards quorum but not the threshold.
    Abstain = 2,
    /// A vote against the proposal.
    No = 3,
    /// A stronger vote against, indicating a potential veto.
    NoWithVeto = 4,
}

/// `cosmos.gov.v1.MsgSubmitProposal`: the envelope that carries the upgrade message.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgSubmitProposal {
    /// The messages executed if the proposal passes.
    #[prost(message, repeated, tag = "1")]
    pub messages: Vec<Any>,
    /// The deposit attached at submission time.
    #[prost(message, repeated, tag = "2")]
    pub initial_deposit: Vec<Coin>,
    /// The bech32 address of the proposer.
    #[prost(string, tag = "3")]
    pub proposer: String,
    /// Free-form metadata.
    #[prost(string, tag = "4")]
    pub metadata: String,
    /// The proposal title.
    #[prost(string, tag = "5")]
    pub title: String,
    /// The proposal summary.
    #[prost(string, tag = "6")]
    pub summary: String,
    /// Whether the proposal runs on the expedited voting track.
    #[prost(bool, tag = "7")]
    pub expedited: bool,
}

/// `cosmos.gov.v1.TallyResult`.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct TallyResult {
    /// Voting power that voted yes.
    #[prost(string, tag = "1")]
    pub yes_count: String,
    /// Voting power that abstained.
    #[prost(string, tag = "2")]
    pub abstain_count: String,
    /// Voting power that voted no.
    #[prost(string, tag = "3")]
    pub no_count: String,
    /// Voting power that voted no with veto.
    #[prost(string, tag = "4")]
    pub no_with_veto_count: String,
}

/// `cosmos.gov.v1.Proposal`, restricted to the fields the driver inspects.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Proposal {
    /// The ledger-assigned identifier.
    #[prost(uint64, tag = "1")]
    pub id: u64,
    /// The messages executed on passing.
    #[prost(message, repeated, tag = "2")]
    pub messages: Vec<Any>,
    /// The current status.
    #[prost(enumeration = "ProposalStatus", tag = "3")]
    pub status: i32,
    /// The tally, populated once voting has ended.
    #[prost(message, optional, tag = "4")]
    pub final_tally_result: Option<TallyResult>,
    /// The deposits collected so far.
    #[prost(message, repeated, tag = "7")]
    pub total_deposit: Vec<Coin>,
    /// Free-form metadata.
    #[prost(string, tag = "10")]
    pub metadata: String,
    /// The proposal title.
    #[prost(string, tag = "11")]
    pub title: String,
    /// The proposal summary.
    #[prost(string, tag = "12")]
    pub summary: String,
    /// The bech32 address of the proposer.
    #[prost(string, tag = "13")]
    pub proposer: String,
    /// Whether the proposal runs on the expedited voting track.
    #[prost(bool, tag = "14")]
    pub expedited: bool,
    /// The reason execution failed, set when the status is `Failed`.
    #[prost(string, tag = "15")]
    pub failed_reason: String,
}

/// `cosmos.gov.v1.QueryProposalRequest`.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct QueryProposalRequest {
    /// The proposal to look up.
    #[prost(uint64, tag = "1")]
    pub proposal_id: u64,
}

/// `cosmos.gov.v1.QueryProposalResponse`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryProposalResponse {
    /// The proposal, absent if it does not exist.
    #[prost(message, optional, tag = "1")]
    pub proposal: Option<Proposal>,
}

/// `cosmos.gov.v1.Params`, restricted to the deposit and period settings.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Params {
    /// The minimum deposit for a proposal to enter the voting period.
    #[prost(message, repeated, tag = "1")]
    pub min_deposit: Vec<Coin>,
    /// The maximum time to collect the minimum deposit.
    #[prost(message, optional, tag = "2")]
    pub max_deposit_period: Option<prost_types::Duration>,
    /// The length of the voting period.
    #[prost(message, optional, tag = "3")]
    pub voting_period: Option<prost_types::Duration>,
    /// The minimum deposit for an expedited proposal.
    #[prost(message, repeated, tag = "12")]
    pub expedited_min_deposit: Vec<Coin>,
}

/// `cosmos.gov.v1.QueryParamsRequest`.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct QueryParamsRequest {
    /// Legacy selector (`deposit`, `voting`, `tallying`); ignored by recent ledgers.
    #[prost(string, tag = "1")]
    pub params_type: String,
}

/// `cosmos.gov.v1.QueryParamsResponse`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryParamsResponse {
    /// The full parameter set.
    #[prost(message, optional, tag = "4")]
    pub params: Option<Params>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_status_wire_values() {
        assert_eq!(ProposalStatus::Passed as i32, 3);
        assert_eq!(ProposalStatus::try_from(4).ok(), Some(ProposalStatus::Rejected));
        assert!(ProposalStatus::try_from(42).is_err());
    }

    #[test]
    fn test_status_getter_defaults_on_unknown_value() {
        let proposal = Proposal {
            id: 1,
            status: 99,
            ..Default::default()
        };
        assert_eq!(proposal.status(), ProposalStatus::Unspecified);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(ProposalStatus::Passed.is_terminal());
        assert!(ProposalStatus::Rejected.is_terminal());
        assert!(ProposalStatus::Failed.is_terminal());
        assert!(!ProposalStatus::VotingPeriod.is_terminal());
        assert!(!ProposalStatus::DepositPeriod.is_terminal());
        assert!(!ProposalStatus::Unspecified.is_terminal());
    }

    #[test]
    fn test_query_proposal_request_encoding() {
        // field 1, varint: 0x08 0x01
        let bytes = QueryProposalRequest { proposal_id: 1 }.encode_to_vec();
        assert_eq!(bytes, vec![0x08, 0x01]);
    }

    #[test]
    fn test_vote_option_from_toml_name() {
        #[derive(Deserialize)]
        struct Wrapper {
            option: VoteOption,
        }
        let w: Wrapper = toml::from_str("option = \"no_with_veto\"").unwrap();
        assert_eq!(w.option, VoteOption::NoWithVeto);
    }
}
