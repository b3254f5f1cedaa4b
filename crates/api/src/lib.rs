// Path: crates/api/src/lib.rs

//! # wasmlc API Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free, and well-documented code. Panics are disallowed in non-test
//! code to promote robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
#![deny(missing_docs)]
//! # wasmlc API
//!
//! The traits through which the upgrade driver talks to the outside world.
//! Everything behind these traits (gRPC transport, key management, validator
//! processes) is supplied by the surrounding test harness, so the packager,
//! submitter and poller can be exercised against in-memory implementations.

/// Defines the `VoteCaster` trait for pluggable voting strategies.
pub mod governance;
/// Defines the `LedgerClient` trait: a narrow query and broadcast interface.
pub mod ledger;

/// A curated set of the most commonly used traits and types.
pub mod prelude {
    pub use crate::governance::VoteCaster;
    pub use crate::ledger::LedgerClient;
    pub use wasmlc_types::error::{BroadcastError, ErrorCode, QueryError, VoteError};
}
