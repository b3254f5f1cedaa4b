// Path: crates/types/src/keys/mod.rs
//! Defines constants for well-known query routes, type URLs and module names.
//!
//! These constants provide a single source of truth for the gRPC paths and
//! `Any` type URLs the driver exchanges with the ledger. Using these constants
//! prevents typos and keeps the typed query helpers and the mock ledger in
//! agreement about which route serves which message.

/// The name of the governance module, whose account signs protected messages.
pub const GOV_MODULE_NAME: &str = "gov";

/// The type URL of the 08-wasm `MsgStoreCode` message.
pub const MSG_STORE_CODE_TYPE_URL: &str = "/ibc.lightclients.wasm.v1.MsgStoreCode";
/// The type URL of the gov v1 `MsgSubmitProposal` message.
pub const MSG_SUBMIT_PROPOSAL_TYPE_URL: &str = "/cosmos.gov.v1.MsgSubmitProposal";
/// The type URL of an auth `ModuleAccount`.
pub const MODULE_ACCOUNT_TYPE_URL: &str = "/cosmos.auth.v1beta1.ModuleAccount";

/// The query route returning a single governance proposal.
pub const QUERY_PROPOSAL_PATH: &str = "/cosmos.gov.v1.Query/Proposal";
/// The query route returning the governance parameters.
pub const QUERY_GOV_PARAMS_PATH: &str = "/cosmos.gov.v1.Query/Params";
/// The query route resolving a module account by name.
pub const QUERY_MODULE_ACCOUNT_PATH: &str = "/cosmos.auth.v1beta1.Query/ModuleAccountByName";
/// The query route returning stored light-client code by checksum.
pub const QUERY_WASM_CODE_PATH: &str = "/ibc.lightclients.wasm.v1.Query/Code";

/// The event type emitted by the gov module when a proposal is submitted.
pub const SUBMIT_PROPOSAL_EVENT: &str = "submit_proposal";
/// The attribute of [`SUBMIT_PROPOSAL_EVENT`] carrying the assigned proposal id.
pub const PROPOSAL_ID_ATTRIBUTE: &str = "proposal_id";
