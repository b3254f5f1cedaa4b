// Path: crates/cli/tests/upgrade_e2e.rs

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use wasmlc_cli::testing::mock::{BroadcastFailure, MockVote, VoterBehavior, MOCK_GOV_ADDRESS};
use wasmlc_cli::testing::package::{decompress, package_artifact};
use wasmlc_cli::{MockLedger, UpgradeScenario};
use wasmlc_types::app::{Coin, MsgStoreCode, MsgSubmitProposal, ProposalStatus, VoteOption, Wallet};
use wasmlc_types::codec;
use wasmlc_types::config::ScenarioConfig;
use wasmlc_types::error::{BroadcastError, ErrorCode, QueryError, Stage, UpgradeError};
use wasmlc_types::keys::{
    MSG_STORE_CODE_TYPE_URL, MSG_SUBMIT_PROPOSAL_TYPE_URL, QUERY_GOV_PARAMS_PATH,
    QUERY_PROPOSAL_PATH,
};

const TEN_MB: usize = 10 * 1024 * 1024;

fn proposer() -> Wallet {
    Wallet::new("faucet", "cosmos1hj5fveer5cjtn4wd6wstzugjfdxzl0xpxvjjvr")
}

/// Writes a compressible artifact that starts with the wasm magic.
fn write_artifact(dir: &Path, len: usize) -> Result<std::path::PathBuf> {
    let mut bytes = b"\0asm\x01\0\0\0".to_vec();
    bytes.extend((0..len.saturating_sub(8)).map(|i| (i % 251) as u8 & 0x3f));
    let path = dir.join("rollkit_ibc.wasm");
    std::fs::write(&path, &bytes)?;
    Ok(path)
}

fn config(artifact: std::path::PathBuf, timeout_secs: u64, interval_secs: u64) -> ScenarioConfig {
    let mut cfg = ScenarioConfig {
        artifact,
        ..Default::default()
    };
    cfg.poll.timeout_ms = timeout_secs * 1000;
    cfg.poll.interval_ms = interval_secs * 1000;
    cfg
}

fn scenario(ledger: &Arc<MockLedger>, cfg: ScenarioConfig) -> UpgradeScenario {
    UpgradeScenario::new(ledger.clone(), ledger.clone(), proposer(), cfg)
}

#[tokio::test(start_paused = true)]
async fn test_ten_megabyte_upgrade_passes_on_third_poll() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let artifact = write_artifact(dir.path(), TEN_MB)?;
    let ledger = Arc::new(MockLedger::default());
    ledger.script_statuses([
        ProposalStatus::VotingPeriod,
        ProposalStatus::VotingPeriod,
        ProposalStatus::Passed,
    ]);

    let start = Instant::now();
    let report = scenario(&ledger, config(artifact.clone(), 30, 5)).run().await?;

    assert_eq!(report.proposal_id, 1);
    assert_eq!(report.original_len, TEN_MB);
    assert!(report.compressed_len < TEN_MB);
    assert_eq!(report.evaluations, 3);
    assert_eq!(report.poll_elapsed, Duration::from_secs(15));
    assert_eq!(start.elapsed(), Duration::from_secs(15));
    assert!(report.code_verified);
    assert_eq!(report.deposit, "10000000stake");
    assert_eq!(ledger.query_count(QUERY_PROPOSAL_PATH), 3);
    assert_eq!(
        ledger.votes(),
        vec![MockVote {
            proposal_id: 1,
            voter: "validator-0".to_string(),
            option: VoteOption::Yes,
        }]
    );

    // The broadcast carries exactly one proposal with the compressed artifact.
    let broadcasts = ledger.broadcasts();
    assert_eq!(broadcasts.len(), 1);
    assert_eq!(broadcasts[0].gas_limit, 60_000_000);
    assert_eq!(broadcasts[0].wallet, proposer());
    let submitted: MsgSubmitProposal =
        codec::from_any(&broadcasts[0].messages[0], MSG_SUBMIT_PROPOSAL_TYPE_URL)
            .map_err(anyhow::Error::msg)?;
    assert_eq!(submitted.initial_deposit, vec![Coin::new("stake", 10_000_000)]);
    assert_eq!(submitted.title, "title:e2e");
    assert_eq!(submitted.summary, "summary:e2e");
    assert_eq!(submitted.metadata, "metadata:e2e");
    assert!(!submitted.expedited);
    let store: MsgStoreCode = codec::from_any(&submitted.messages[0], MSG_STORE_CODE_TYPE_URL)
        .map_err(anyhow::Error::msg)?;
    assert_eq!(store.signer, MOCK_GOV_ADDRESS);
    assert_eq!(store.wasm_byte_code.len(), report.compressed_len);
    assert_eq!(decompress(&store.wasm_byte_code)?, std::fs::read(&artifact)?);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_rejected_proposal_is_not_a_timeout() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let artifact = write_artifact(dir.path(), 4096)?;
    let ledger = Arc::new(MockLedger::default());
    ledger.script_statuses([ProposalStatus::Rejected]);

    let start = Instant::now();
    let err = scenario(&ledger, config(artifact, 30, 5))
        .run()
        .await
        .unwrap_err();

    match &err {
        UpgradeError::ProposalRejected {
            proposal_id,
            elapsed,
        } => {
            assert_eq!(*proposal_id, 1);
            assert_eq!(*elapsed, Duration::from_secs(5));
        }
        other => panic!("expected a rejection, got {other}"),
    }
    assert_eq!(err.stage(), Stage::Poll);
    assert_eq!(err.code(), "UPGRADE_PROPOSAL_REJECTED");
    assert_eq!(start.elapsed(), Duration::from_secs(5));
    assert_eq!(ledger.query_count(QUERY_PROPOSAL_PATH), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_split_vote_rejects_proposal() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let artifact = write_artifact(dir.path(), 4096)?;
    let ledger = Arc::new(MockLedger::default());
    ledger.set_voters([
        ("val-a".to_string(), VoterBehavior::Follow),
        ("val-b".to_string(), VoterBehavior::Cast(VoteOption::NoWithVeto)),
        ("val-c".to_string(), VoterBehavior::Absent),
        ("val-d".to_string(), VoterBehavior::Cast(VoteOption::Abstain)),
    ]);
    ledger.enforce_tally(true);
    ledger.script_statuses([ProposalStatus::VotingPeriod, ProposalStatus::Passed]);

    let err = scenario(&ledger, config(artifact, 30, 5))
        .run()
        .await
        .unwrap_err();

    match &err {
        UpgradeError::ProposalRejected {
            proposal_id,
            elapsed,
        } => {
            assert_eq!(*proposal_id, 1);
            assert_eq!(*elapsed, Duration::from_secs(10));
        }
        other => panic!("expected a rejection, got {other}"),
    }
    let voters: Vec<_> = ledger.votes().into_iter().map(|v| v.voter).collect();
    assert_eq!(voters, ["val-a", "val-b", "val-d"]);
    let tally = ledger
        .proposal(1)
        .and_then(|p| p.final_tally_result)
        .expect("tally attached to rejected proposal");
    assert_eq!(tally.yes_count, "1");
    assert_eq!(tally.no_with_veto_count, "1");
    assert_eq!(tally.abstain_count, "1");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_absent_validators_leave_proposal_in_voting() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let artifact = write_artifact(dir.path(), 4096)?;
    let ledger = Arc::new(MockLedger::default());
    ledger.set_voters([
        ("val-a".to_string(), VoterBehavior::Absent),
        ("val-b".to_string(), VoterBehavior::Absent),
    ]);
    ledger.script_statuses([ProposalStatus::VotingPeriod]);

    let err = scenario(&ledger, config(artifact, 10, 5))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        UpgradeError::Timeout {
            last_status: Some(ProposalStatus::VotingPeriod),
            ..
        }
    ));
    assert!(ledger.votes().is_empty());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_stuck_proposal_times_out_with_last_status() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let artifact = write_artifact(dir.path(), 4096)?;
    let ledger = Arc::new(MockLedger::default());
    ledger.script_statuses([ProposalStatus::VotingPeriod]);

    let start = Instant::now();
    let err = scenario(&ledger, config(artifact, 10, 3))
        .run()
        .await
        .unwrap_err();

    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(9) && elapsed <= Duration::from_secs(13));
    match err {
        UpgradeError::Timeout {
            proposal_id,
            last_status,
            evaluations,
            ..
        } => {
            assert_eq!(proposal_id, 1);
            assert_eq!(last_status, Some(ProposalStatus::VotingPeriod));
            assert_eq!(evaluations, 3);
        }
        other => panic!("expected a timeout, got {other}"),
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_failed_proposal_reports_reason_stage() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let artifact = write_artifact(dir.path(), 1024)?;
    let ledger = Arc::new(MockLedger::default());
    ledger.script_statuses([ProposalStatus::VotingPeriod, ProposalStatus::Failed]);

    let err = scenario(&ledger, config(artifact, 30, 5))
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, UpgradeError::ProposalFailed { proposal_id: 1, .. }));
    assert_eq!(err.code(), "UPGRADE_PROPOSAL_FAILED");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_query_error_mid_poll_keeps_last_status() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let artifact = write_artifact(dir.path(), 1024)?;
    let ledger = Arc::new(MockLedger::default());
    ledger.script_statuses([ProposalStatus::VotingPeriod]);

    let cfg = config(artifact, 30, 5);
    let scenario = scenario(&ledger, cfg);
    let failing = ledger.clone();
    let (outcome, ()) = tokio::join!(scenario.run(), async move {
        // Between the first (5s) and second (10s) status query.
        tokio::time::sleep(Duration::from_secs(7)).await;
        failing.fail_queries(QUERY_PROPOSAL_PATH, "connection reset");
    });

    match outcome {
        Err(UpgradeError::Query {
            proposal_id,
            last_status,
            elapsed,
            source: QueryError::Transport { reason, .. },
        }) => {
            assert_eq!(proposal_id, 1);
            assert_eq!(last_status, Some(ProposalStatus::VotingPeriod));
            assert_eq!(elapsed, Duration::from_secs(10));
            assert_eq!(reason, "connection reset");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(ledger.query_count(QUERY_PROPOSAL_PATH), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_configured_deposit_skips_params_query() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let artifact = write_artifact(dir.path(), 1024)?;
    let ledger = Arc::new(MockLedger::default());

    let mut cfg = config(artifact, 30, 5);
    cfg.proposal.deposit = Some(25_000_000);
    cfg.proposal.expedited = true;
    let report = scenario(&ledger, cfg).run().await?;

    assert_eq!(report.deposit, "25000000stake");
    assert_eq!(ledger.query_count(QUERY_GOV_PARAMS_PATH), 0);
    let submitted: MsgSubmitProposal =
        codec::from_any(&ledger.broadcasts()[0].messages[0], MSG_SUBMIT_PROPOSAL_TYPE_URL)
            .map_err(anyhow::Error::msg)?;
    assert!(submitted.expedited);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_expedited_uses_expedited_minimum() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let artifact = write_artifact(dir.path(), 1024)?;
    let ledger = Arc::new(MockLedger::default());

    let mut cfg = config(artifact, 30, 5);
    cfg.proposal.expedited = true;
    let report = scenario(&ledger, cfg).run().await?;
    assert_eq!(report.deposit, "50000000stake");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_missing_min_deposit_fails_submit_stage() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let artifact = write_artifact(dir.path(), 1024)?;
    let ledger = Arc::new(MockLedger::default());
    ledger.set_min_deposit(vec![Coin::new("uatom", 1)]);

    let err = scenario(&ledger, config(artifact, 30, 5))
        .run()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        UpgradeError::DepositLookup(QueryError::NotFound(_))
    ));
    assert_eq!(err.stage(), Stage::Submit);
    assert!(ledger.broadcasts().is_empty());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_broadcast_failures_surface_as_submit_errors() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let artifact = write_artifact(dir.path(), 1024)?;
    let ledger = Arc::new(MockLedger::default());

    ledger.fail_next_broadcast(BroadcastFailure::Code {
        code: 5,
        codespace: "sdk".to_string(),
        log: "insufficient funds".to_string(),
    });
    let err = scenario(&ledger, config(artifact.clone(), 30, 5))
        .run()
        .await
        .unwrap_err();
    match err {
        UpgradeError::Submit(BroadcastError::Rejected { code, log, .. }) => {
            assert_eq!(code, 5);
            assert_eq!(log, "insufficient funds");
        }
        other => panic!("unexpected error: {other}"),
    }

    ledger.fail_next_broadcast(BroadcastFailure::Transport("connection refused".into()));
    let err = scenario(&ledger, config(artifact, 30, 5))
        .run()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        UpgradeError::Submit(BroadcastError::Transport(_))
    ));
    assert!(ledger.votes().is_empty());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_missing_event_requires_pinned_proposal_id() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let artifact = write_artifact(dir.path(), 1024)?;
    let ledger = Arc::new(MockLedger::default());
    ledger.emit_proposal_event(false);

    let err = scenario(&ledger, config(artifact.clone(), 30, 5))
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, UpgradeError::MissingProposalId { .. }));

    // With deterministic ordering the id can be pinned instead.
    let mut cfg = config(artifact, 30, 5);
    cfg.proposal.proposal_id = Some(2);
    let report = scenario(&ledger, cfg).run().await?;
    assert_eq!(report.proposal_id, 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_vote_failure_is_tagged_with_proposal() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let artifact = write_artifact(dir.path(), 1024)?;
    let ledger = Arc::new(MockLedger::default());
    ledger.set_next_proposal_id(41);
    ledger.fail_votes(Some("validator is jailed".into()));

    let err = scenario(&ledger, config(artifact, 30, 5))
        .run()
        .await
        .unwrap_err();
    assert_eq!(err.stage(), Stage::Vote);
    assert_eq!(err.proposal_id(), Some(41));
    assert_eq!(err.code(), "VOTE_REJECTED");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_stored_code_mismatch_fails_verification() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let artifact = write_artifact(dir.path(), 1024)?;
    let checksum = package_artifact(&artifact)?.checksum_hex();
    let ledger = Arc::new(MockLedger::default());
    ledger.put_code(&checksum, b"something else".to_vec());

    let err = scenario(&ledger, config(artifact, 30, 5))
        .run()
        .await
        .unwrap_err();
    match err {
        UpgradeError::CodeMismatch { expected, actual } => {
            assert_eq!(expected, checksum);
            assert_ne!(actual, checksum);
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_cancels_polling() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let artifact = write_artifact(dir.path(), 1024)?;
    let ledger = Arc::new(MockLedger::default());
    ledger.script_statuses([ProposalStatus::DepositPeriod]);
    let (tx, rx) = watch::channel(false);

    let scenario = scenario(&ledger, config(artifact, 60, 5)).with_shutdown(rx);
    let (outcome, ()) = tokio::join!(scenario.run(), async move {
        tokio::time::sleep(Duration::from_secs(12)).await;
        tx.send_replace(true);
    });

    match outcome {
        Err(UpgradeError::Cancelled {
            last_status,
            elapsed,
            ..
        }) => {
            assert_eq!(last_status, Some(ProposalStatus::DepositPeriod));
            assert_eq!(elapsed, Duration::from_secs(12));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_missing_artifact_fails_package_stage() -> Result<()> {
    let ledger = Arc::new(MockLedger::default());
    let err = scenario(&ledger, config("/no/such/client.wasm".into(), 30, 5))
        .run()
        .await
        .unwrap_err();
    assert_eq!(err.stage(), Stage::Package);
    assert!(err.to_string().starts_with("[package]"));
    assert!(ledger.broadcasts().is_empty());
    Ok(())
}
