// Path: crates/api/src/ledger/mod.rs
//! Defines the `LedgerClient` trait, the only channel between the driver and a chain.

use async_trait::async_trait;
use wasmlc_types::app::{Any, TxResult, Wallet};
use wasmlc_types::error::{BroadcastError, QueryError};

/// A connection to one chain.
///
/// Queries are deliberately untyped: the client moves protobuf bytes for a
/// gRPC route, and each call site decodes the response into the message it
/// expects. This keeps generic dispatch out of the driver and makes every
/// collaborator trivially mockable.
///
/// Implementations must be safe for concurrent use; independent scenarios may
/// share one client.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// The chain id this client is connected to.
    fn chain_id(&self) -> &str;

    /// Performs one read-only query against a gRPC route, e.g.
    /// `/cosmos.gov.v1.Query/Proposal`, returning the encoded response.
    async fn query(&self, path: &str, request: Vec<u8>) -> Result<Vec<u8>, QueryError>;

    /// Signs `messages` with `wallet`, broadcasts them with the given gas limit,
    /// and waits until the transaction is included in a block.
    ///
    /// A transaction that is included but fails execution is still returned as
    /// `Ok` with a non-zero `code`; callers decide how to treat it.
    async fn broadcast(
        &self,
        wallet: &Wallet,
        gas_limit: u64,
        messages: Vec<Any>,
    ) -> Result<TxResult, BroadcastError>;
}
