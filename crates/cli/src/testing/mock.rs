// Path: crates/cli/src/testing/mock.rs
//! An in-memory ledger that plays the chain side of an upgrade scenario.
//!
//! `MockLedger` implements both [`LedgerClient`] and [`VoteCaster`]. Every
//! submitted proposal walks through a scripted sequence of statuses, one per
//! status query, and the last scripted status repeats. When a proposal is first
//! reported as `Passed`, its `MsgStoreCode` messages are executed: the code is
//! decompressed and stored under its SHA-256 checksum.
//!
//! Votes are cast by a scriptable validator set. Tallying is off by default;
//! with [`MockLedger::enforce_tally`] a scripted `Passed` only stands if a
//! majority of the validator set voted yes.

use crate::testing::package::decompress;
use async_trait::async_trait;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap, VecDeque};
use wasmlc_api::governance::VoteCaster;
use wasmlc_api::ledger::LedgerClient;
use wasmlc_types::app::{
    Any, BaseAccount, Coin, Event, ModuleAccount, MsgStoreCode, MsgSubmitProposal, Params,
    Proposal, ProposalStatus, QueryCodeRequest, TallyResult, QueryCodeResponse, QueryModuleAccountByNameRequest,
    QueryModuleAccountByNameResponse, QueryParamsResponse, QueryProposalRequest,
    QueryProposalResponse, TxResult, VoteOption, Wallet,
};
use wasmlc_types::codec;
use wasmlc_types::config::DEFAULT_MIN_DEPOSIT_TOKENS;
use wasmlc_types::error::{BroadcastError, QueryError, VoteError};
use wasmlc_types::keys::{
    GOV_MODULE_NAME, MODULE_ACCOUNT_TYPE_URL, MSG_STORE_CODE_TYPE_URL,
    MSG_SUBMIT_PROPOSAL_TYPE_URL, PROPOSAL_ID_ATTRIBUTE, QUERY_GOV_PARAMS_PATH,
    QUERY_MODULE_ACCOUNT_PATH, QUERY_PROPOSAL_PATH, QUERY_WASM_CODE_PATH, SUBMIT_PROPOSAL_EVENT,
};

/// The address the mock reports for the gov module account.
pub const MOCK_GOV_ADDRESS: &str = "cosmos10d07y265gmmuvt4z0w9aw880jnsr700j6zn9kn";

/// A transaction the mock received.
#[derive(Debug, Clone)]
pub struct BroadcastRecord {
    /// The signing wallet.
    pub wallet: Wallet,
    /// The gas limit the caller asked for.
    pub gas_limit: u64,
    /// The messages, still packed.
    pub messages: Vec<Any>,
}

/// How the next broadcast should fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastFailure {
    /// The transaction never reaches the mock.
    Transport(String),
    /// The transaction is included but fails with an ABCI code.
    Code {
        /// The ABCI result code.
        code: u32,
        /// The codespace reported alongside the code.
        codespace: String,
        /// The raw log.
        log: String,
    },
}

/// How a mock validator responds when votes are cast on a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoterBehavior {
    /// Votes whatever option the caller asked for.
    Follow,
    /// Always votes this option.
    Cast(VoteOption),
    /// Does not vote at all.
    Absent,
}

/// A vote recorded by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockVote {
    /// The proposal voted on.
    pub proposal_id: u64,
    /// The validator that voted.
    pub voter: String,
    /// The option it voted.
    pub option: VoteOption,
}

#[derive(Debug)]
struct MockProposal {
    proposal: Proposal,
    script: VecDeque<ProposalStatus>,
    executed: bool,
}

#[derive(Debug)]
struct MockState {
    height: u64,
    next_proposal_id: u64,
    default_script: Vec<ProposalStatus>,
    proposals: BTreeMap<u64, MockProposal>,
    code: HashMap<String, Vec<u8>>,
    broadcasts: Vec<BroadcastRecord>,
    voters: Vec<(String, VoterBehavior)>,
    votes: Vec<MockVote>,
    enforce_tally: bool,
    query_counts: HashMap<String, usize>,
    failing_queries: HashMap<String, String>,
    broadcast_failure: Option<BroadcastFailure>,
    vote_failure: Option<String>,
    emit_proposal_event: bool,
    min_deposit: Vec<Coin>,
    expedited_min_deposit: Vec<Coin>,
}

/// A scriptable in-memory ledger.
#[derive(Debug)]
pub struct MockLedger {
    chain_id: String,
    gov_address: String,
    state: Mutex<MockState>,
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new("simd-1", "stake")
    }
}

impl MockLedger {
    /// Creates a ledger whose gov params require the default minimum deposit
    /// in `denom`, and whose proposals pass on the first status query.
    pub fn new(chain_id: impl Into<String>, denom: &str) -> Self {
        Self {
            chain_id: chain_id.into(),
            gov_address: MOCK_GOV_ADDRESS.to_string(),
            state: Mutex::new(MockState {
                height: 1,
                next_proposal_id: 1,
                default_script: vec![ProposalStatus::Passed],
                proposals: BTreeMap::new(),
                code: HashMap::new(),
                broadcasts: Vec::new(),
                voters: vec![("validator-0".to_string(), VoterBehavior::Follow)],
                votes: Vec::new(),
                enforce_tally: false,
                query_counts: HashMap::new(),
                failing_queries: HashMap::new(),
                broadcast_failure: None,
                vote_failure: None,
                emit_proposal_event: true,
                min_deposit: vec![Coin::new(denom, DEFAULT_MIN_DEPOSIT_TOKENS)],
                expedited_min_deposit: vec![Coin::new(denom, DEFAULT_MIN_DEPOSIT_TOKENS * 5)],
            }),
        }
    }

    /// Sets the status sequence served for proposals submitted from now on.
    /// An empty sequence is ignored.
    pub fn script_statuses(&self, statuses: impl IntoIterator<Item = ProposalStatus>) {
        let statuses: Vec<_> = statuses.into_iter().collect();
        if !statuses.is_empty() {
            self.state.lock().default_script = statuses;
        }
    }

    /// Replaces the remaining status sequence of an already submitted proposal.
    pub fn script_proposal(
        &self,
        proposal_id: u64,
        statuses: impl IntoIterator<Item = ProposalStatus>,
    ) {
        let mut state = self.state.lock();
        if let Some(p) = state.proposals.get_mut(&proposal_id) {
            let script: VecDeque<_> = statuses.into_iter().collect();
            if !script.is_empty() {
                p.script = script;
            }
        }
    }

    /// Sets the id the next submitted proposal receives.
    pub fn set_next_proposal_id(&self, id: u64) {
        self.state.lock().next_proposal_id = id;
    }

    /// Makes every query on `path` fail with a transport error until cleared.
    pub fn fail_queries(&self, path: &str, reason: impl Into<String>) {
        self.state
            .lock()
            .failing_queries
            .insert(path.to_string(), reason.into());
    }

    /// Lets queries on `path` succeed again.
    pub fn clear_query_failure(&self, path: &str) {
        self.state.lock().failing_queries.remove(path);
    }

    /// Makes the next broadcast fail.
    pub fn fail_next_broadcast(&self, failure: BroadcastFailure) {
        self.state.lock().broadcast_failure = Some(failure);
    }

    /// Makes every vote fail until cleared with `None`.
    pub fn fail_votes(&self, reason: Option<String>) {
        self.state.lock().vote_failure = reason;
    }

    /// Controls whether successful submissions report a `submit_proposal` event.
    pub fn emit_proposal_event(&self, emit: bool) {
        self.state.lock().emit_proposal_event = emit;
    }

    /// Replaces the validator set. Each validator holds equal voting power.
    pub fn set_voters(&self, voters: impl IntoIterator<Item = (String, VoterBehavior)>) {
        self.state.lock().voters = voters.into_iter().collect();
    }

    /// When enabled, a scripted `Passed` is reported as `Rejected` unless more
    /// than half of the validator set voted yes. The tally is attached to the
    /// proposal once it reaches a final status.
    pub fn enforce_tally(&self, enforce: bool) {
        self.state.lock().enforce_tally = enforce;
    }

    /// Overrides the regular minimum deposit.
    pub fn set_min_deposit(&self, coins: Vec<Coin>) {
        self.state.lock().min_deposit = coins;
    }

    /// Pre-seeds stored code. Executing a passed proposal never overwrites an
    /// existing entry, so this simulates a ledger that stored something else.
    pub fn put_code(&self, checksum: &str, code: Vec<u8>) {
        self.state.lock().code.insert(checksum.to_string(), code);
    }

    /// All transactions received so far.
    pub fn broadcasts(&self) -> Vec<BroadcastRecord> {
        self.state.lock().broadcasts.clone()
    }

    /// All votes cast so far, one entry per validator that voted.
    pub fn votes(&self) -> Vec<MockVote> {
        self.state.lock().votes.clone()
    }

    /// How many queries were made on `path`.
    pub fn query_count(&self, path: &str) -> usize {
        self.state.lock().query_counts.get(path).copied().unwrap_or(0)
    }

    /// The stored proposal, as the ledger currently sees it.
    pub fn proposal(&self, proposal_id: u64) -> Option<Proposal> {
        self.state
            .lock()
            .proposals
            .get(&proposal_id)
            .map(|p| p.proposal.clone())
    }

    fn module_account_response(&self, request: &[u8]) -> Result<Vec<u8>, String> {
        let request: QueryModuleAccountByNameRequest = codec::from_bytes(request)?;
        if request.name != GOV_MODULE_NAME {
            return Ok(codec::to_bytes(&QueryModuleAccountByNameResponse { account: None }));
        }
        let account = ModuleAccount {
            base_account: Some(BaseAccount {
                address: self.gov_address.clone(),
                pub_key: None,
                account_number: 7,
                sequence: 0,
            }),
            name: request.name,
            permissions: vec!["burner".to_string()],
        };
        Ok(codec::to_bytes(&QueryModuleAccountByNameResponse {
            account: Some(codec::to_any(MODULE_ACCOUNT_TYPE_URL, &account)),
        }))
    }
}

impl MockState {
    fn next_tx_hash(&mut self, messages: &[Any]) -> String {
        self.height += 1;
        let mut hasher = Sha256::new();
        hasher.update(self.height.to_be_bytes());
        for m in messages {
            hasher.update(m.type_url.as_bytes());
            hasher.update(&m.value);
        }
        hex::encode_upper(hasher.finalize())
    }

    fn proposal_response(&mut self, request: &[u8]) -> Result<Vec<u8>, String> {
        let request: QueryProposalRequest = codec::from_bytes(request)?;
        let tally = self.tally(request.proposal_id);
        let majority = self.voters.len() / 2 + 1;
        let Some(entry) = self.proposals.get_mut(&request.proposal_id) else {
            return Ok(codec::to_bytes(&QueryProposalResponse { proposal: None }));
        };
        let status = if entry.script.len() > 1 {
            entry.script.pop_front()
        } else {
            entry.script.front().copied()
        }
        .unwrap_or(ProposalStatus::VotingPeriod);
        let status = if status == ProposalStatus::Passed && self.enforce_tally && tally[0] < majority {
            ProposalStatus::Rejected
        } else {
            status
        };
        entry.proposal.set_status(status);
        if status.is_terminal() {
            let [yes, abstain, no, veto] = tally.map(|n| n.to_string());
            entry.proposal.final_tally_result = Some(TallyResult {
                yes_count: yes,
                abstain_count: abstain,
                no_count: no,
                no_with_veto_count: veto,
            });
        }

        if status == ProposalStatus::Passed && !entry.executed {
            entry.executed = true;
            let mut stored = Vec::new();
            for any in &entry.proposal.messages {
                if let Ok(msg) = codec::from_any::<MsgStoreCode>(any, MSG_STORE_CODE_TYPE_URL) {
                    let code = decompress(&msg.wasm_byte_code).map_err(|e| e.to_string())?;
                    stored.push((hex::encode(Sha256::digest(&code)), code));
                }
            }
            for (checksum, code) in stored {
                self.code.entry(checksum).or_insert(code);
            }
        }
        let proposal = self
            .proposals
            .get(&request.proposal_id)
            .map(|p| p.proposal.clone());
        Ok(codec::to_bytes(&QueryProposalResponse { proposal }))
    }

    /// Yes, abstain, no and veto counts for a proposal.
    fn tally(&self, proposal_id: u64) -> [usize; 4] {
        let mut counts = [0; 4];
        for vote in self.votes.iter().filter(|v| v.proposal_id == proposal_id) {
            match vote.option {
                VoteOption::Yes => counts[0] += 1,
                VoteOption::Abstain => counts[1] += 1,
                VoteOption::No => counts[2] += 1,
                VoteOption::NoWithVeto => counts[3] += 1,
                VoteOption::Unspecified => {}
            }
        }
        counts
    }

    fn params_response(&self) -> Vec<u8> {
        codec::to_bytes(&QueryParamsResponse {
            params: Some(Params {
                min_deposit: self.min_deposit.clone(),
                max_deposit_period: Some(seconds(172_800)),
                voting_period: Some(seconds(10)),
                expedited_min_deposit: self.expedited_min_deposit.clone(),
            }),
        })
    }

    fn code_response(&self, request: &[u8]) -> Result<Vec<u8>, String> {
        let request: QueryCodeRequest = codec::from_bytes(request)?;
        let data = self.code.get(&request.checksum).cloned().unwrap_or_default();
        Ok(codec::to_bytes(&QueryCodeResponse { data }))
    }
}

fn seconds(seconds: i64) -> prost_types::Duration {
    prost_types::Duration { seconds, nanos: 0 }
}

#[async_trait]
impl LedgerClient for MockLedger {
    fn chain_id(&self) -> &str {
        &self.chain_id
    }

    async fn query(&self, path: &str, request: Vec<u8>) -> Result<Vec<u8>, QueryError> {
        let mut state = self.state.lock();
        *state.query_counts.entry(path.to_string()).or_default() += 1;
        if let Some(reason) = state.failing_queries.get(path) {
            return Err(QueryError::Transport {
                path: path.to_string(),
                reason: reason.clone(),
            });
        }
        let response = match path {
            QUERY_PROPOSAL_PATH => state.proposal_response(&request),
            QUERY_GOV_PARAMS_PATH => Ok(state.params_response()),
            QUERY_WASM_CODE_PATH => state.code_response(&request),
            QUERY_MODULE_ACCOUNT_PATH => self.module_account_response(&request),
            other => {
                return Err(QueryError::Transport {
                    path: other.to_string(),
                    reason: "unknown query route".to_string(),
                })
            }
        };
        response.map_err(|reason| QueryError::Transport {
            path: path.to_string(),
            reason,
        })
    }

    async fn broadcast(
        &self,
        wallet: &Wallet,
        gas_limit: u64,
        messages: Vec<Any>,
    ) -> Result<TxResult, BroadcastError> {
        let mut state = self.state.lock();
        if let Some(BroadcastFailure::Transport(reason)) = &state.broadcast_failure {
            let err = BroadcastError::Transport(reason.clone());
            state.broadcast_failure = None;
            return Err(err);
        }
        state.broadcasts.push(BroadcastRecord {
            wallet: wallet.clone(),
            gas_limit,
            messages: messages.clone(),
        });
        let tx_hash = state.next_tx_hash(&messages);
        let height = state.height;

        if let Some(BroadcastFailure::Code {
            code,
            codespace,
            log,
        }) = state.broadcast_failure.take()
        {
            return Ok(TxResult {
                height,
                tx_hash,
                code,
                codespace,
                raw_log: log,
                events: Vec::new(),
            });
        }

        let mut events = vec![Event::new("tx", [("acc_seq", format!("{}/0", wallet.address))])];
        for any in &messages {
            if any.type_url != MSG_SUBMIT_PROPOSAL_TYPE_URL {
                continue;
            }
            let submitted: MsgSubmitProposal = codec::from_any(any, MSG_SUBMIT_PROPOSAL_TYPE_URL)
                .map_err(BroadcastError::Encode)?;
            let id = state.next_proposal_id;
            state.next_proposal_id += 1;
            let script: VecDeque<_> = state.default_script.iter().copied().collect();
            let inner_types = submitted
                .messages
                .iter()
                .map(|m| m.type_url.as_str())
                .collect::<Vec<_>>()
                .join(",");
            let mut proposal = Proposal {
                id,
                messages: submitted.messages,
                final_tally_result: None,
                total_deposit: submitted.initial_deposit,
                metadata: submitted.metadata,
                title: submitted.title,
                summary: submitted.summary,
                proposer: submitted.proposer,
                expedited: submitted.expedited,
                ..Default::default()
            };
            proposal.set_status(ProposalStatus::DepositPeriod);
            state.proposals.insert(
                id,
                MockProposal {
                    proposal,
                    script,
                    executed: false,
                },
            );
            if state.emit_proposal_event {
                events.push(Event::new(
                    SUBMIT_PROPOSAL_EVENT,
                    [
                        (PROPOSAL_ID_ATTRIBUTE.to_string(), id.to_string()),
                        ("proposal_messages".to_string(), format!(",{}", inner_types)),
                    ],
                ));
            }
        }

        Ok(TxResult {
            height,
            tx_hash,
            code: 0,
            codespace: String::new(),
            raw_log: String::new(),
            events,
        })
    }
}

#[async_trait]
impl VoteCaster for MockLedger {
    async fn cast_votes(&self, proposal_id: u64, option: VoteOption) -> Result<(), VoteError> {
        let mut state = self.state.lock();
        let first_voter = state
            .voters
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_default();
        if let Some(reason) = &state.vote_failure {
            return Err(VoteError::Rejected {
                voter: first_voter,
                reason: reason.clone(),
            });
        }
        if !state.proposals.contains_key(&proposal_id) {
            return Err(VoteError::Rejected {
                voter: first_voter,
                reason: format!("proposal {} does not exist", proposal_id),
            });
        }
        let cast: Vec<_> = state
            .voters
            .iter()
            .filter_map(|(voter, behavior)| {
                let option = match behavior {
                    VoterBehavior::Follow => option,
                    VoterBehavior::Cast(fixed) => *fixed,
                    VoterBehavior::Absent => return None,
                };
                Some(MockVote {
                    proposal_id,
                    voter: voter.clone(),
                    option,
                })
            })
            .collect();
        state.votes.extend(cast);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::rpc::{query_module_account_address, query_proposal_status};

    #[tokio::test]
    async fn test_script_advances_and_last_status_repeats() {
        let ledger = MockLedger::default();
        ledger.script_statuses([ProposalStatus::VotingPeriod, ProposalStatus::Rejected]);
        let submit = MsgSubmitProposal::default();
        let result = ledger
            .broadcast(
                &Wallet::new("faucet", "cosmos1faucet"),
                1,
                vec![codec::to_any(MSG_SUBMIT_PROPOSAL_TYPE_URL, &submit)],
            )
            .await
            .unwrap();
        let id = result.proposal_id().unwrap();
        assert_eq!(id, 1);

        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(query_proposal_status(&ledger, id).await.unwrap());
        }
        assert_eq!(
            seen,
            [
                ProposalStatus::VotingPeriod,
                ProposalStatus::Rejected,
                ProposalStatus::Rejected
            ]
        );
        assert_eq!(ledger.query_count(QUERY_PROPOSAL_PATH), 3);
    }

    #[tokio::test]
    async fn test_gov_module_account() {
        let ledger = MockLedger::default();
        let address = query_module_account_address(&ledger, GOV_MODULE_NAME)
            .await
            .unwrap();
        assert_eq!(address.as_str(), MOCK_GOV_ADDRESS);

        let err = query_module_account_address(&ledger, "mint").await.unwrap_err();
        assert!(matches!(err, QueryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_votes_on_unknown_proposal_are_rejected() {
        let ledger = MockLedger::default();
        let err = ledger.cast_votes(9, VoteOption::Yes).await.unwrap_err();
        assert!(matches!(err, VoteError::Rejected { .. }));
        assert!(ledger.votes().is_empty());
    }

    #[tokio::test]
    async fn test_split_vote_fails_tally() {
        let ledger = MockLedger::default();
        ledger.set_voters([
            ("val-a".to_string(), VoterBehavior::Follow),
            ("val-b".to_string(), VoterBehavior::Cast(VoteOption::No)),
            ("val-c".to_string(), VoterBehavior::Absent),
        ]);
        ledger.enforce_tally(true);
        let submit = MsgSubmitProposal::default();
        let result = ledger
            .broadcast(
                &Wallet::new("faucet", "cosmos1faucet"),
                1,
                vec![codec::to_any(MSG_SUBMIT_PROPOSAL_TYPE_URL, &submit)],
            )
            .await
            .unwrap();
        let id = result.proposal_id().unwrap();
        ledger.cast_votes(id, VoteOption::Yes).await.unwrap();

        let votes = ledger.votes();
        assert_eq!(votes.len(), 2);
        assert_eq!(votes[0].voter, "val-a");
        assert_eq!(votes[0].option, VoteOption::Yes);
        assert_eq!(votes[1].option, VoteOption::No);

        assert_eq!(
            query_proposal_status(&ledger, id).await.unwrap(),
            ProposalStatus::Rejected
        );
        let tally = ledger.proposal(id).unwrap().final_tally_result.unwrap();
        assert_eq!(tally.yes_count, "1");
        assert_eq!(tally.no_count, "1");
        assert_eq!(tally.abstain_count, "0");
    }
}
