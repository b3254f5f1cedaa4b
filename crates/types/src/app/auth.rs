// Path: crates/types/src/app/auth.rs
//! The subset of the `cosmos.auth.v1beta1` schema used to resolve module accounts.

use super::Any;

/// `cosmos.auth.v1beta1.BaseAccount`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BaseAccount {
    /// The bech32 address.
    #[prost(string, tag = "1")]
    pub address: String,
    /// The account's public key, absent for module accounts.
    #[prost(message, optional, tag = "2")]
    pub pub_key: Option<Any>,
    /// The account number.
    #[prost(uint64, tag = "3")]
    pub account_number: u64,
    /// The account sequence.
    #[prost(uint64, tag = "4")]
    pub sequence: u64,
}

/// `cosmos.auth.v1beta1.ModuleAccount`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ModuleAccount {
    /// The underlying base account.
    #[prost(message, optional, tag = "1")]
    pub base_account: Option<BaseAccount>,
    /// The module name.
    #[prost(string, tag = "2")]
    pub name: String,
    /// The module's permissions (`burner`, `minter`, ...).
    #[prost(string, repeated, tag = "3")]
    pub permissions: Vec<String>,
}

/// `cosmos.auth.v1beta1.QueryModuleAccountByNameRequest`.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct QueryModuleAccountByNameRequest {
    /// The module name.
    #[prost(string, tag = "1")]
    pub name: String,
}

/// `cosmos.auth.v1beta1.QueryModuleAccountByNameResponse`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryModuleAccountByNameResponse {
    /// The module account packed in an `Any`.
    #[prost(message, optional, tag = "1")]
    pub account: Option<Any>,
}
