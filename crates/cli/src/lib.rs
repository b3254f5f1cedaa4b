// Path: crates/cli/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # wasmlc CLI Library
//!
//! This library drives the light-client contract upgrade workflow end to end:
//! it packages a contract artifact, submits it inside a governance proposal,
//! hands the proposal to a vote-casting collaborator and polls the ledger
//! until the proposal reaches a terminal status.
//!
//! ## Architectural Boundary
//!
//! The driver talks to a chain only through the traits in `wasmlc-api`. It
//! never provisions nodes, manages keys or speaks gRPC itself; those concerns
//! belong to the surrounding harness, which passes its collaborators in
//! explicitly. The in-memory [`testing::mock::MockLedger`] stands in for a
//! chain so the whole workflow can be exercised in-process.
//!
//! This crate contains modules for:
//! - `testing::package`: compressing contract artifacts.
//! - `testing::proposal`: assembling and broadcasting store-code proposals.
//! - `testing::assert`: the condition poller.
//! - `testing::rpc`: typed queries over the narrow ledger interface.
//! - `testing::scenario`: the stage-by-stage upgrade driver.
//! - `testing::mock`: a scriptable in-memory ledger.

pub mod testing;

// Re-export core testing primitives for ergonomic top-level access.
// This allows tests to use `wasmlc_cli::UpgradeScenario` directly.
pub use testing::mock::MockLedger;
pub use testing::scenario::{UpgradeReport, UpgradeScenario};

// Re-export helper functions for convenience.
pub use testing::assert::{wait_for, wait_for_condition, Poller};
pub use testing::package::package_artifact;
pub use testing::proposal::{new_store_code_proposal, submit_proposal, ProposalBuilder};
