// Path: crates/cli/src/testing/scenario.rs
//! The stage-by-stage driver of one light-client upgrade.

use super::assert::{Poller, Satisfied};
use super::package::package_artifact;
use super::proposal::{submit_proposal, ProposalBuilder};
use super::rpc::{query_code, query_min_deposit, query_module_account_address, query_proposal};
use parking_lot::Mutex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use wasmlc_api::governance::VoteCaster;
use wasmlc_api::ledger::LedgerClient;
use wasmlc_telemetry::time::StageTimer;
use wasmlc_telemetry::{error_metrics, lifecycle_metrics};
use wasmlc_types::app::{Coin, CompressedPayload, Proposal, ProposalStatus, Wallet};
use wasmlc_types::config::ScenarioConfig;
use wasmlc_types::error::{ErrorCode, PollError, QueryError, UpgradeError};
use wasmlc_types::keys::GOV_MODULE_NAME;
use wasmlc_types::prelude::OptionExt;

/// What a successful upgrade looked like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpgradeReport {
    /// The ledger-assigned proposal id.
    pub proposal_id: u64,
    /// The hash of the submission transaction.
    pub tx_hash: String,
    /// The height the submission was included at.
    pub height: u64,
    /// Hex SHA-256 of the uncompressed artifact.
    pub checksum: String,
    /// Size of the artifact before compression.
    pub original_len: usize,
    /// Size of the gzip stream that was submitted.
    pub compressed_len: usize,
    /// The deposit attached to the proposal.
    pub deposit: String,
    /// Status queries made until the proposal passed.
    pub evaluations: u32,
    /// Time spent polling.
    pub poll_elapsed: Duration,
    /// Whether the stored code was read back and matched.
    pub code_verified: bool,
}

/// Drives package, submit, vote, poll and verify against explicitly supplied collaborators.
pub struct UpgradeScenario {
    ledger: Arc<dyn LedgerClient>,
    voter: Arc<dyn VoteCaster>,
    wallet: Wallet,
    config: ScenarioConfig,
    shutdown: Option<watch::Receiver<bool>>,
}

impl UpgradeScenario {
    /// Creates a scenario. Nothing is read or sent until [`UpgradeScenario::run`].
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        voter: Arc<dyn VoteCaster>,
        wallet: Wallet,
        config: ScenarioConfig,
    ) -> Self {
        Self {
            ledger,
            voter,
            wallet,
            config,
            shutdown: None,
        }
    }

    /// Aborts polling with [`UpgradeError::Cancelled`] once `shutdown` reads `true`.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// The configuration this scenario runs with.
    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Packages the configured artifact and runs the full upgrade.
    pub async fn run(&self) -> Result<UpgradeReport, UpgradeError> {
        let payload = {
            let _timer = StageTimer::new(lifecycle_metrics(), "package");
            package_artifact(&self.config.artifact).map_err(UpgradeError::from)
        };
        match payload {
            Ok(payload) => self.run_with_payload(payload).await,
            Err(e) => Err(self.record_failure(e)),
        }
    }

    /// Runs the upgrade for a payload that was packaged elsewhere.
    pub async fn run_with_payload(
        &self,
        payload: CompressedPayload,
    ) -> Result<UpgradeReport, UpgradeError> {
        match self.drive(payload).await {
            Ok(report) => {
                lifecycle_metrics().inc_scenario_outcome("passed");
                tracing::info!(
                    target: "scenario",
                    chain_id = self.ledger.chain_id(),
                    proposal_id = report.proposal_id,
                    checksum = %report.checksum,
                    evaluations = report.evaluations,
                    "Light-client upgrade passed"
                );
                Ok(report)
            }
            Err(e) => Err(self.record_failure(e)),
        }
    }

    fn record_failure(&self, e: UpgradeError) -> UpgradeError {
        let stage = e.stage().to_string();
        lifecycle_metrics().inc_scenario_outcome(&stage);
        error_metrics().inc_error("upgrade", e.code());
        tracing::error!(
            target: "scenario",
            chain_id = self.ledger.chain_id(),
            stage = %stage,
            code = e.code(),
            proposal_id = ?e.proposal_id(),
            error = %e,
            "Light-client upgrade failed"
        );
        e
    }

    async fn drive(&self, payload: CompressedPayload) -> Result<UpgradeReport, UpgradeError> {
        let ledger = self.ledger.as_ref();
        let proposal_cfg = &self.config.proposal;
        let checksum = payload.checksum_hex();
        let original_len = payload.original_len;
        let compressed_len = payload.len();

        // --- Submit ---
        let submit_timer = StageTimer::new(lifecycle_metrics(), "submit");
        let signer = query_module_account_address(ledger, GOV_MODULE_NAME)
            .await
            .map_err(UpgradeError::ModuleAddress)?;
        let amount = match proposal_cfg.deposit {
            Some(amount) => u128::from(amount),
            None => query_min_deposit(ledger, &self.config.chain.denom, proposal_cfg.expedited)
                .await
                .map_err(UpgradeError::DepositLookup)?,
        };
        let deposit = Coin::new(self.config.chain.denom.clone(), amount);
        let deposit_display = deposit.to_string();
        let proposal = ProposalBuilder::new(signer, payload, &self.wallet, deposit)
            .with_metadata(proposal_cfg.metadata.clone())
            .with_title(proposal_cfg.title.clone())
            .with_summary(proposal_cfg.summary.clone())
            .expedited(proposal_cfg.expedited)
            .build();
        let tx = submit_proposal(ledger, &self.wallet, proposal_cfg.gas_limit, proposal).await?;
        let proposal_id = proposal_cfg
            .proposal_id
            .or_else(|| tx.proposal_id())
            .required(|| UpgradeError::MissingProposalId {
                tx_hash: tx.tx_hash.clone(),
            })?;
        drop(submit_timer);
        tracing::info!(target: "scenario", proposal_id, tx_hash = %tx.tx_hash, "Proposal submitted");

        // --- Vote ---
        {
            let _timer = StageTimer::new(lifecycle_metrics(), "vote");
            self.voter
                .cast_votes(proposal_id, proposal_cfg.vote_option)
                .await
                .map_err(|source| UpgradeError::Vote {
                    proposal_id,
                    source,
                })?;
        }

        // --- Poll ---
        let passed = {
            let _timer = StageTimer::new(lifecycle_metrics(), "poll");
            self.poll_until_terminal(proposal_id).await?
        };

        // --- Verify ---
        let code_verified = if proposal_cfg.verify_code {
            let _timer = StageTimer::new(lifecycle_metrics(), "verify");
            let code = query_code(ledger, &checksum)
                .await
                .map_err(|source| UpgradeError::CodeQuery {
                    checksum: checksum.clone(),
                    source,
                })?;
            let actual = hex::encode(Sha256::digest(&code));
            if actual != checksum {
                return Err(UpgradeError::CodeMismatch {
                    expected: checksum,
                    actual,
                });
            }
            true
        } else {
            false
        };

        Ok(UpgradeReport {
            proposal_id,
            tx_hash: tx.tx_hash,
            height: tx.height,
            checksum,
            original_len,
            compressed_len,
            deposit: deposit_display,
            evaluations: passed.evaluations,
            poll_elapsed: passed.elapsed,
            code_verified,
        })
    }

    /// Polls the proposal until the ledger reports a terminal status.
    /// Only `Passed` is a success.
    async fn poll_until_terminal(
        &self,
        proposal_id: u64,
    ) -> Result<Satisfied<Proposal>, UpgradeError> {
        let ledger = self.ledger.as_ref();
        let poll_cfg = &self.config.poll;
        let last_status: Mutex<Option<ProposalStatus>> = Mutex::new(None);
        let started = tokio::time::Instant::now();

        let mut poller = Poller::new(
            format!("proposal {} to pass", proposal_id),
            poll_cfg.timeout(),
            poll_cfg.interval(),
        );
        if let Some(shutdown) = &self.shutdown {
            poller = poller.with_shutdown(shutdown.clone());
        }

        let outcome = poller
            .poll(|| {
                let last_status = &last_status;
                async move {
                    let proposal = query_proposal(ledger, proposal_id).await?;
                    let status = proposal.status();
                    let previous = last_status.lock().replace(status);
                    if previous != Some(status) {
                        tracing::info!(target: "scenario", proposal_id, status = %status, "Proposal status changed");
                    }
                    Ok::<_, QueryError>(status.is_terminal().then_some(proposal))
                }
            })
            .await;
        let last_status = *last_status.lock();

        match outcome {
            Ok(satisfied) => match satisfied.value.status() {
                ProposalStatus::Passed => Ok(satisfied),
                ProposalStatus::Rejected => Err(UpgradeError::ProposalRejected {
                    proposal_id,
                    elapsed: satisfied.elapsed,
                }),
                _ => Err(UpgradeError::ProposalFailed {
                    proposal_id,
                    reason: satisfied.value.failed_reason,
                    elapsed: satisfied.elapsed,
                }),
            },
            Err(PollError::Condition(source)) => Err(UpgradeError::Query {
                proposal_id,
                last_status,
                elapsed: started.elapsed(),
                source,
            }),
            Err(PollError::Timeout {
                elapsed,
                evaluations,
                ..
            }) => Err(UpgradeError::Timeout {
                proposal_id,
                last_status,
                elapsed,
                evaluations,
            }),
            Err(PollError::Cancelled { elapsed, .. }) => Err(UpgradeError::Cancelled {
                proposal_id,
                last_status,
                elapsed,
            }),
            Err(e @ PollError::InvalidSchedule { .. }) => Err(UpgradeError::Schedule(e.to_string())),
        }
    }
}
