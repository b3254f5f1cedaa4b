// Path: crates/cli/src/testing/mod.rs
//! Contains the building blocks of an upgrade scenario.
//! These functions are exposed as a public library so that other harnesses
//! can drive the same workflow against their own chains.

pub mod rpc;

// Focused submodules
pub mod assert;
pub mod mock;
pub mod package;
pub mod proposal;
pub mod scenario;

// Re-export public items
pub use assert::{wait_for, wait_for_condition, Poller, Satisfied};
pub use mock::MockLedger;
pub use package::{compress, decompress, package_artifact, package_bytes};
pub use proposal::{new_store_code_proposal, submit_proposal, ProposalBuilder};
pub use rpc::{
    query_code, query_min_deposit, query_module_account_address, query_proposal,
    query_proposal_status,
};
pub use scenario::{UpgradeReport, UpgradeScenario};
