// Path: crates/cli/src/testing/proposal.rs
//! Assembles store-code governance proposals and broadcasts them.

use wasmlc_api::ledger::LedgerClient;
use wasmlc_types::app::{
    Address, Coin, CompressedPayload, MsgStoreCode, MsgSubmitProposal, TxResult, Wallet,
};
use wasmlc_types::codec;
use wasmlc_types::error::BroadcastError;
use wasmlc_types::keys::{MSG_STORE_CODE_TYPE_URL, MSG_SUBMIT_PROPOSAL_TYPE_URL};

/// A builder for a `MsgSubmitProposal` that installs light-client code.
///
/// Building is pure data assembly; nothing touches the ledger until the
/// result is handed to [`submit_proposal`].
#[derive(Debug, Clone)]
pub struct ProposalBuilder {
    signer: Address,
    payload: CompressedPayload,
    proposer: Address,
    deposit: Coin,
    metadata: String,
    title: String,
    summary: String,
    expedited: bool,
}

impl ProposalBuilder {
    /// Starts a proposal for `payload`, to be executed by `signer` (normally the
    /// gov module account) and submitted by `proposer` with `deposit` attached.
    pub fn new(
        signer: impl Into<Address>,
        payload: CompressedPayload,
        proposer: &Wallet,
        deposit: Coin,
    ) -> Self {
        Self {
            signer: signer.into(),
            payload,
            proposer: proposer.address.clone(),
            deposit,
            metadata: String::new(),
            title: String::new(),
            summary: String::new(),
            expedited: false,
        }
    }

    /// Sets the free-form proposal metadata.
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = metadata.into();
        self
    }

    /// Sets the proposal title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the proposal summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Puts the proposal on the expedited voting track.
    pub fn expedited(mut self, expedited: bool) -> Self {
        self.expedited = expedited;
        self
    }

    /// Consumes the builder. The compressed payload moves into the upgrade message.
    pub fn build(self) -> MsgSubmitProposal {
        let upgrade = MsgStoreCode {
            signer: self.signer.0,
            wasm_byte_code: self.payload.bytes,
        };
        MsgSubmitProposal {
            messages: vec![codec::to_any(MSG_STORE_CODE_TYPE_URL, &upgrade)],
            initial_deposit: vec![self.deposit],
            proposer: self.proposer.0,
            metadata: self.metadata,
            title: self.title,
            summary: self.summary,
            expedited: self.expedited,
        }
    }
}

/// Assembles a store-code proposal in one call.
#[allow(clippy::too_many_arguments)]
pub fn new_store_code_proposal(
    signer: impl Into<Address>,
    payload: CompressedPayload,
    proposer: &Wallet,
    deposit: Coin,
    metadata: &str,
    title: &str,
    summary: &str,
    expedited: bool,
) -> MsgSubmitProposal {
    ProposalBuilder::new(signer, payload, proposer, deposit)
        .with_metadata(metadata)
        .with_title(title)
        .with_summary(summary)
        .expedited(expedited)
        .build()
}

/// Broadcasts `proposal` signed by `wallet` and waits for block inclusion.
///
/// A transaction that is included but fails execution is reported as
/// [`BroadcastError::Rejected`]. Success only means the proposal exists on the
/// ledger, not that it passed.
pub async fn submit_proposal(
    client: &dyn LedgerClient,
    wallet: &Wallet,
    gas_limit: u64,
    proposal: MsgSubmitProposal,
) -> Result<TxResult, BroadcastError> {
    let deposit = proposal
        .initial_deposit
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    let msg = codec::to_any(MSG_SUBMIT_PROPOSAL_TYPE_URL, &proposal);
    tracing::info!(
        target: "submit",
        chain_id = client.chain_id(),
        proposer = %wallet.address,
        gas_limit,
        deposit = %deposit,
        expedited = proposal.expedited,
        "Broadcasting store-code proposal"
    );

    let result = client.broadcast(wallet, gas_limit, vec![msg]).await?;
    if !result.is_ok() {
        tracing::warn!(
            target: "submit",
            tx_hash = %result.tx_hash,
            code = result.code,
            codespace = %result.codespace,
            "Proposal transaction failed execution"
        );
        return Err(BroadcastError::Rejected {
            tx_hash: result.tx_hash,
            code: result.code,
            codespace: result.codespace,
            log: result.raw_log,
        });
    }
    tracing::info!(
        target: "submit",
        tx_hash = %result.tx_hash,
        height = result.height,
        "Proposal transaction included"
    );
    Ok(result)
}
