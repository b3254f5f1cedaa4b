// Path: crates/cli/src/testing/rpc.rs

use prost::Message;
use wasmlc_api::ledger::LedgerClient;
use wasmlc_types::app::{
    Address, ModuleAccount, Proposal, ProposalStatus, QueryCodeRequest, QueryCodeResponse,
    QueryModuleAccountByNameRequest, QueryModuleAccountByNameResponse, QueryParamsRequest,
    QueryParamsResponse, QueryProposalRequest, QueryProposalResponse,
};
use wasmlc_types::codec;
use wasmlc_types::error::QueryError;
use wasmlc_types::keys::{
    MODULE_ACCOUNT_TYPE_URL, QUERY_GOV_PARAMS_PATH, QUERY_MODULE_ACCOUNT_PATH,
    QUERY_PROPOSAL_PATH, QUERY_WASM_CODE_PATH,
};
use wasmlc_types::prelude::OptionExt;

/// Sends one typed request over the untyped query channel and decodes the response.
async fn typed_query<Req, Resp>(
    client: &dyn LedgerClient,
    path: &str,
    request: &Req,
) -> Result<Resp, QueryError>
where
    Req: Message,
    Resp: Message + Default,
{
    log::trace!("query {} ({} bytes)", path, request.encoded_len());
    let bytes = client.query(path, codec::to_bytes(request)).await?;
    codec::from_bytes(&bytes).map_err(|reason| QueryError::Decode {
        path: path.to_string(),
        reason,
    })
}

/// Fetches a governance proposal by id.
pub async fn query_proposal(
    client: &dyn LedgerClient,
    proposal_id: u64,
) -> Result<Proposal, QueryError> {
    let response: QueryProposalResponse =
        typed_query(client, QUERY_PROPOSAL_PATH, &QueryProposalRequest { proposal_id }).await?;
    response
        .proposal
        .required(|| QueryError::NotFound(format!("proposal {}", proposal_id)))
}

/// Fetches only the status of a governance proposal.
///
/// A status value this build does not know decodes as `Unspecified`.
pub async fn query_proposal_status(
    client: &dyn LedgerClient,
    proposal_id: u64,
) -> Result<ProposalStatus, QueryError> {
    let proposal = query_proposal(client, proposal_id).await?;
    log::trace!(
        "proposal {} status {}",
        proposal_id,
        proposal.status()
    );
    Ok(proposal.status())
}

/// Resolves the bech32 address of a module account, e.g. `gov`.
pub async fn query_module_account_address(
    client: &dyn LedgerClient,
    module_name: &str,
) -> Result<Address, QueryError> {
    let response: QueryModuleAccountByNameResponse = typed_query(
        client,
        QUERY_MODULE_ACCOUNT_PATH,
        &QueryModuleAccountByNameRequest {
            name: module_name.to_string(),
        },
    )
    .await?;
    let any = response
        .account
        .required(|| QueryError::NotFound(format!("module account {}", module_name)))?;
    let account: ModuleAccount =
        codec::from_any(&any, MODULE_ACCOUNT_TYPE_URL).map_err(|reason| QueryError::Decode {
            path: QUERY_MODULE_ACCOUNT_PATH.to_string(),
            reason,
        })?;
    let base = account
        .base_account
        .required(|| QueryError::NotFound(format!("base account of module {}", module_name)))?;
    Ok(Address(base.address))
}

/// Returns the minimum deposit in `denom` for a regular or expedited proposal.
pub async fn query_min_deposit(
    client: &dyn LedgerClient,
    denom: &str,
    expedited: bool,
) -> Result<u128, QueryError> {
    let response: QueryParamsResponse = typed_query(
        client,
        QUERY_GOV_PARAMS_PATH,
        &QueryParamsRequest {
            params_type: "deposit".to_string(),
        },
    )
    .await?;
    let params = response
        .params
        .required(|| QueryError::NotFound("gov params".to_string()))?;
    let coins = if expedited {
        &params.expedited_min_deposit
    } else {
        &params.min_deposit
    };
    let coin = coins
        .iter()
        .find(|c| c.denom == denom)
        .required(|| QueryError::NotFound(format!("minimum deposit in {}", denom)))?;
    coin.amount_u128().required(|| QueryError::Decode {
        path: QUERY_GOV_PARAMS_PATH.to_string(),
        reason: format!("invalid coin amount {:?}", coin.amount),
    })
}

/// Fetches stored light-client code by the hex checksum of its uncompressed bytes.
pub async fn query_code(client: &dyn LedgerClient, checksum: &str) -> Result<Vec<u8>, QueryError> {
    let response: QueryCodeResponse = typed_query(
        client,
        QUERY_WASM_CODE_PATH,
        &QueryCodeRequest {
            checksum: checksum.to_string(),
        },
    )
    .await?;
    if response.data.is_empty() {
        return Err(QueryError::NotFound(format!("code {}", checksum)));
    }
    Ok(response.data)
}
