// Path: crates/types/src/error/mod.rs
//! Core error types for the light-client upgrade driver.

use crate::app::ProposalStatus;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors raised while reading and compressing a contract artifact.
#[derive(Error, Debug)]
pub enum PackageError {
    /// The artifact could not be opened or fully read.
    #[error("Failed to read artifact {path}: {source}")]
    Io {
        /// The path that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The compression stream could not be completed.
    #[error("Compression failed: {0}")]
    Compression(#[source] std::io::Error),
}

impl ErrorCode for PackageError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "PACKAGE_IO_ERROR",
            Self::Compression(_) => "PACKAGE_COMPRESSION_FAILED",
        }
    }
}

/// Errors raised while broadcasting a transaction.
#[derive(Error, Debug)]
pub enum BroadcastError {
    /// The transaction could not be encoded or signed.
    #[error("Failed to encode transaction: {0}")]
    Encode(String),
    /// The transaction never reached the ledger, or its inclusion could not be confirmed.
    #[error("Broadcast transport error: {0}")]
    Transport(String),
    /// The ledger executed the transaction and returned a non-zero code.
    #[error("Transaction {tx_hash} rejected with code {code} ({codespace}): {log}")]
    Rejected {
        /// The hash of the rejected transaction.
        tx_hash: String,
        /// The ABCI result code.
        code: u32,
        /// The module codespace of `code`.
        codespace: String,
        /// The raw execution log.
        log: String,
    },
}

impl ErrorCode for BroadcastError {
    fn code(&self) -> &'static str {
        match self {
            Self::Encode(_) => "BROADCAST_ENCODE_FAILED",
            Self::Transport(_) => "BROADCAST_TRANSPORT_ERROR",
            Self::Rejected { .. } => "BROADCAST_REJECTED",
        }
    }
}

/// Errors raised by read-only ledger queries. None of them are retried internally.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The query could not be delivered or the ledger returned a transport-level error.
    #[error("Query {path} failed: {reason}")]
    Transport {
        /// The query route.
        path: String,
        /// A description of the failure.
        reason: String,
    },
    /// The response bytes did not decode into the expected message.
    #[error("Failed to decode response of {path}: {reason}")]
    Decode {
        /// The query route.
        path: String,
        /// A description of the decode failure.
        reason: String,
    },
    /// The ledger answered, but the requested object does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ErrorCode for QueryError {
    fn code(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "QUERY_TRANSPORT_ERROR",
            Self::Decode { .. } => "QUERY_DECODE_FAILED",
            Self::NotFound(_) => "QUERY_NOT_FOUND",
        }
    }
}

/// Errors raised by a vote-casting collaborator.
#[derive(Error, Debug)]
pub enum VoteError {
    /// The votes could not be delivered.
    #[error("Vote transport error: {0}")]
    Transport(String),
    /// The ledger refused one or more votes.
    #[error("Vote from {voter} rejected: {reason}")]
    Rejected {
        /// The voter whose vote was refused.
        voter: String,
        /// The reason given by the ledger.
        reason: String,
    },
}

impl ErrorCode for VoteError {
    fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "VOTE_TRANSPORT_ERROR",
            Self::Rejected { .. } => "VOTE_REJECTED",
        }
    }
}

/// Errors raised by the condition poller.
///
/// `E` is the error type of the polled predicate; it is returned unmodified.
#[derive(Error, Debug)]
pub enum PollError<E> {
    /// The predicate returned an error. Polling stopped at that evaluation.
    #[error("{0}")]
    Condition(E),
    /// The deadline elapsed before the predicate held.
    #[error("Timeout waiting for {description} after {elapsed:?} ({evaluations} evaluations)")]
    Timeout {
        /// What was being waited for.
        description: String,
        /// Time spent polling, measured on the monotonic clock.
        elapsed: Duration,
        /// How many times the predicate was evaluated.
        evaluations: u32,
    },
    /// The caller signalled shutdown while polling.
    #[error("Cancelled while waiting for {description} after {elapsed:?}")]
    Cancelled {
        /// What was being waited for.
        description: String,
        /// Time spent polling before cancellation.
        elapsed: Duration,
    },
    /// The timeout or interval is zero, or the interval exceeds the timeout.
    #[error("Invalid poll schedule: timeout {timeout:?}, interval {interval:?}")]
    InvalidSchedule {
        /// The requested total budget.
        timeout: Duration,
        /// The requested interval between evaluations.
        interval: Duration,
    },
}

impl<E> ErrorCode for PollError<E> {
    fn code(&self) -> &'static str {
        match self {
            Self::Condition(_) => "POLL_CONDITION_ERROR",
            Self::Timeout { .. } => "POLL_TIMEOUT",
            Self::Cancelled { .. } => "POLL_CANCELLED",
            Self::InvalidSchedule { .. } => "POLL_INVALID_SCHEDULE",
        }
    }
}

/// Errors raised while loading or validating a scenario configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// The path that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A field holds a value the driver cannot run with.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "CONFIG_IO_ERROR",
            Self::Parse(_) => "CONFIG_PARSE_ERROR",
            Self::Invalid(_) => "CONFIG_INVALID",
        }
    }
}

/// The lifecycle stage in which an upgrade scenario failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading and compressing the artifact.
    Package,
    /// Resolving the signer and deposit, assembling and broadcasting the proposal.
    Submit,
    /// Casting votes on the submitted proposal.
    Vote,
    /// Polling the proposal status until it is terminal.
    Poll,
    /// Checking that the ledger stored the expected code.
    Verify,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Package => "package",
            Self::Submit => "submit",
            Self::Vote => "vote",
            Self::Poll => "poll",
            Self::Verify => "verify",
        };
        f.write_str(name)
    }
}

/// Renders an optional last-observed status for error messages.
fn fmt_status(status: &Option<ProposalStatus>) -> String {
    status.map_or_else(|| "none".to_string(), |s| s.to_string())
}

/// The error returned by a full upgrade scenario run.
///
/// Every variant knows its [`Stage`]; from the poll stage on, variants carry the
/// proposal id, the last status observed and the time spent polling, so that a
/// failing scenario can be diagnosed from its error alone.
#[derive(Error, Debug)]
pub enum UpgradeError {
    /// The artifact could not be packaged.
    #[error("[package] {0}")]
    Package(#[from] PackageError),
    /// The governance module account could not be resolved.
    #[error("[submit] Failed to resolve signer module account: {0}")]
    ModuleAddress(#[source] QueryError),
    /// The minimum deposit could not be resolved.
    #[error("[submit] Failed to resolve minimum deposit: {0}")]
    DepositLookup(#[source] QueryError),
    /// The proposal transaction was not accepted.
    #[error("[submit] {0}")]
    Submit(#[from] BroadcastError),
    /// The transaction succeeded but carried no `submit_proposal` event.
    #[error("[submit] Transaction {tx_hash} did not report a proposal id")]
    MissingProposalId {
        /// The hash of the submission transaction.
        tx_hash: String,
    },
    /// Casting votes failed.
    #[error("[vote] Proposal {proposal_id}: {source}")]
    Vote {
        /// The proposal being voted on.
        proposal_id: u64,
        /// The collaborator's error.
        #[source]
        source: VoteError,
    },
    /// A status query failed while polling.
    #[error("[poll] Proposal {proposal_id}: query failed after {elapsed:?} (last status {}): {source}", fmt_status(.last_status))]
    Query {
        /// The polled proposal.
        proposal_id: u64,
        /// The last status observed before the failure.
        last_status: Option<ProposalStatus>,
        /// Time spent polling.
        elapsed: Duration,
        /// The query error.
        #[source]
        source: QueryError,
    },
    /// The ledger reported the proposal as rejected.
    #[error("[poll] Proposal {proposal_id} was rejected after {elapsed:?}")]
    ProposalRejected {
        /// The rejected proposal.
        proposal_id: u64,
        /// Time spent polling.
        elapsed: Duration,
    },
    /// The ledger reported the proposal as failed during execution.
    #[error("[poll] Proposal {proposal_id} failed after {elapsed:?}: {reason}")]
    ProposalFailed {
        /// The failed proposal.
        proposal_id: u64,
        /// The ledger's failure reason, possibly empty.
        reason: String,
        /// Time spent polling.
        elapsed: Duration,
    },
    /// The proposal did not reach a terminal status before the deadline.
    #[error("[poll] Timeout waiting for proposal {proposal_id} to pass after {elapsed:?} ({evaluations} evaluations, last status {})", fmt_status(.last_status))]
    Timeout {
        /// The polled proposal.
        proposal_id: u64,
        /// The last status observed.
        last_status: Option<ProposalStatus>,
        /// Time spent polling.
        elapsed: Duration,
        /// How many status queries were made.
        evaluations: u32,
    },
    /// Polling was cancelled by the caller.
    #[error("[poll] Cancelled while waiting for proposal {proposal_id} after {elapsed:?} (last status {})", fmt_status(.last_status))]
    Cancelled {
        /// The polled proposal.
        proposal_id: u64,
        /// The last status observed.
        last_status: Option<ProposalStatus>,
        /// Time spent polling.
        elapsed: Duration,
    },
    /// The poll schedule in the configuration is unusable.
    #[error("[poll] {0}")]
    Schedule(String),
    /// The code query failed after the proposal passed.
    #[error("[verify] Failed to query stored code {checksum}: {source}")]
    CodeQuery {
        /// The hex checksum that was queried.
        checksum: String,
        /// The query error.
        #[source]
        source: QueryError,
    },
    /// The stored code does not hash to the submitted checksum.
    #[error("[verify] Stored code hashes to {actual}, expected {expected}")]
    CodeMismatch {
        /// The checksum of the submitted artifact.
        expected: String,
        /// The checksum of the code returned by the ledger.
        actual: String,
    },
}

impl UpgradeError {
    /// The lifecycle stage this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Package(_) => Stage::Package,
            Self::ModuleAddress(_)
            | Self::DepositLookup(_)
            | Self::Submit(_)
            | Self::MissingProposalId { .. } => Stage::Submit,
            Self::Vote { .. } => Stage::Vote,
            Self::Query { .. }
            | Self::ProposalRejected { .. }
            | Self::ProposalFailed { .. }
            | Self::Timeout { .. }
            | Self::Cancelled { .. }
            | Self::Schedule(_) => Stage::Poll,
            Self::CodeQuery { .. } | Self::CodeMismatch { .. } => Stage::Verify,
        }
    }

    /// The proposal this error concerns, once one has been assigned.
    pub fn proposal_id(&self) -> Option<u64> {
        match self {
            Self::Vote { proposal_id, .. }
            | Self::Query { proposal_id, .. }
            | Self::ProposalRejected { proposal_id, .. }
            | Self::ProposalFailed { proposal_id, .. }
            | Self::Timeout { proposal_id, .. }
            | Self::Cancelled { proposal_id, .. } => Some(*proposal_id),
            _ => None,
        }
    }
}

impl ErrorCode for UpgradeError {
    fn code(&self) -> &'static str {
        match self {
            Self::Package(e) => e.code(),
            Self::ModuleAddress(_) => "UPGRADE_MODULE_ADDRESS_FAILED",
            Self::DepositLookup(_) => "UPGRADE_DEPOSIT_LOOKUP_FAILED",
            Self::Submit(e) => e.code(),
            Self::MissingProposalId { .. } => "UPGRADE_MISSING_PROPOSAL_ID",
            Self::Vote { source, .. } => source.code(),
            Self::Query { source, .. } => source.code(),
            Self::ProposalRejected { .. } => "UPGRADE_PROPOSAL_REJECTED",
            Self::ProposalFailed { .. } => "UPGRADE_PROPOSAL_FAILED",
            Self::Timeout { .. } => "UPGRADE_TIMEOUT",
            Self::Cancelled { .. } => "UPGRADE_CANCELLED",
            Self::Schedule(_) => "UPGRADE_INVALID_SCHEDULE",
            Self::CodeQuery { source, .. } => source.code(),
            Self::CodeMismatch { .. } => "UPGRADE_CODE_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_tags_in_messages() {
        let err = UpgradeError::ProposalRejected {
            proposal_id: 3,
            elapsed: Duration::from_secs(5),
        };
        assert_eq!(err.stage(), Stage::Poll);
        assert_eq!(err.proposal_id(), Some(3));
        assert!(err.to_string().starts_with("[poll] Proposal 3 was rejected"));

        let err = UpgradeError::Submit(BroadcastError::Transport("connection refused".into()));
        assert_eq!(err.stage(), Stage::Submit);
        assert_eq!(err.proposal_id(), None);
        assert_eq!(err.code(), "BROADCAST_TRANSPORT_ERROR");
    }

    #[test]
    fn test_timeout_message_carries_last_status() {
        let err = UpgradeError::Timeout {
            proposal_id: 1,
            last_status: Some(ProposalStatus::VotingPeriod),
            elapsed: Duration::from_secs(30),
            evaluations: 6,
        };
        let msg = err.to_string();
        assert!(msg.contains("PROPOSAL_STATUS_VOTING_PERIOD"), "{}", msg);
        assert!(msg.contains("6 evaluations"), "{}", msg);

        let err = UpgradeError::Timeout {
            proposal_id: 1,
            last_status: None,
            elapsed: Duration::from_secs(30),
            evaluations: 0,
        };
        assert!(err.to_string().contains("last status none"));
    }

    #[test]
    fn test_rejected_and_failed_are_distinct_from_timeout() {
        let codes = [
            UpgradeError::ProposalRejected {
                proposal_id: 1,
                elapsed: Duration::ZERO,
            }
            .code(),
            UpgradeError::ProposalFailed {
                proposal_id: 1,
                reason: String::new(),
                elapsed: Duration::ZERO,
            }
            .code(),
            UpgradeError::Timeout {
                proposal_id: 1,
                last_status: None,
                elapsed: Duration::ZERO,
                evaluations: 0,
            }
            .code(),
        ];
        assert_eq!(
            codes,
            ["UPGRADE_PROPOSAL_REJECTED", "UPGRADE_PROPOSAL_FAILED", "UPGRADE_TIMEOUT"]
        );
    }
}
