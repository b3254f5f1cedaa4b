// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # wasmlc Types
//!
//! This crate is the foundational library for the light-client upgrade driver,
//! containing the protobuf wire messages exchanged with the ledger, the domain
//! types built on top of them, the error enums, and configuration objects.
//!
//! ## Architectural Role
//!
//! As the base crate, `wasmlc-types` has minimal dependencies and is itself a
//! dependency for every other crate in the workspace. This structure prevents
//! circular dependencies and provides a single canonical definition for shared
//! types like `MsgStoreCode`, `MsgSubmitProposal`, `ProposalStatus` and the
//! error taxonomy.

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::QueryError> = std::result::Result<T, E>;

/// Application-level data structures and protobuf wire messages.
pub mod app;
/// Protobuf encoding helpers shared by every wire message.
pub mod codec;
/// Scenario configuration structures.
pub mod config;
/// A unified set of all error types used across the workspace.
pub mod error;
/// Well-known query routes, type URLs and module names.
pub mod keys;
/// A prelude containing useful extension traits like `OptionExt`.
pub mod prelude;
