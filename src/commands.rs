//! The deploy commands: plan construction and end-to-end orchestration

use tracing::{info, warn};

use crate::{
    chain::ChainClient,
    config::NetworkConfig,
    deployer::execute_plan,
    errors::ScriptError,
    explorer::VerificationClient,
    plan::{ArgValue, DeployStep, DeploymentPlan, StepKind},
    storage::{self, AddressStore},
    types::{AddressBook, VerifyStatus},
    utils::next_aligned,
    verifier::{verify_all, RateGate},
    wiring::{self, WiringAction, WiringCall},
};

use alloy_primitives::U256;

/// The book key under which the live reward token is recorded
const REWARD_TOKEN_KEY: &str = "hay";

fn fake_token(name: &str, symbol: &str) -> DeployStep {
    DeployStep {
        name: name.to_string(),
        contract: "FakeERC20".to_string(),
        kind: StepKind::Direct,
        args: vec![
            ArgValue::Str(symbol.to_string()),
            ArgValue::Str(symbol.to_string()),
        ],
    }
}

/// Builds the farming suite plan.
///
/// The three core contracts (bonding, voting, farming) go behind upgradeable
/// proxies when `upgradeable` is set; the fake tokens and strategy mocks are
/// always deployed directly, they hold nothing worth upgrading.
pub fn farming_plan(
    cfg: &NetworkConfig,
    start_time: u64,
    upgradeable: bool,
) -> Result<DeploymentPlan, ScriptError> {
    let core_kind = if upgradeable {
        StepKind::Proxy
    } else {
        StepKind::Direct
    };

    DeploymentPlan::new(vec![
        fake_token("fakeHelio", "FakeHelio"),
        fake_token("fakeHelioLP", "FakeHelioLP"),
        fake_token("fakeHay", "FakeHay"),
        DeployStep {
            name: "tokenBonding".to_string(),
            contract: "TokenBonding".to_string(),
            kind: core_kind,
            args: vec![
                ArgValue::Uint(U256::from(start_time)),
                ArgValue::Array(vec![
                    ArgValue::Ref("fakeHelio".to_string()),
                    ArgValue::Ref("fakeHelioLP".to_string()),
                ]),
                ArgValue::Array(
                    cfg.bonding_coefficients
                        .iter()
                        .map(|c| ArgValue::Uint(*c))
                        .collect(),
                ),
            ],
        },
        DeployStep {
            name: "incentiveVoting".to_string(),
            contract: "IncentiveVoting".to_string(),
            kind: core_kind,
            args: vec![ArgValue::Ref("tokenBonding".to_string())],
        },
        DeployStep {
            name: "farming".to_string(),
            contract: "Farming".to_string(),
            kind: core_kind,
            args: vec![
                ArgValue::Address(cfg.reward_token),
                ArgValue::Ref("incentiveVoting".to_string()),
            ],
        },
        DeployStep {
            name: "fakeHayStrategy".to_string(),
            contract: "StrategyMock".to_string(),
            kind: StepKind::Direct,
            args: vec![
                ArgValue::Ref("fakeHay".to_string()),
                ArgValue::Ref("farming".to_string()),
            ],
        },
        DeployStep {
            name: "hayStrategy".to_string(),
            contract: "StrategyMock".to_string(),
            kind: StepKind::Direct,
            args: vec![
                ArgValue::Address(cfg.reward_token),
                ArgValue::Ref("farming".to_string()),
            ],
        },
    ])
}

/// The wiring that connects voting to farming once everything is deployed:
/// the vote-eligible tokens and the strategies receiving their rewards
pub fn farming_wiring(cfg: &NetworkConfig) -> WiringAction {
    WiringAction {
        name: "connectFarming".to_string(),
        calls: vec![WiringCall {
            target: "incentiveVoting".to_string(),
            method: "setFarming(address,address[],address[])".to_string(),
            args: vec![
                ArgValue::Ref("farming".to_string()),
                ArgValue::Array(vec![
                    ArgValue::Ref("fakeHay".to_string()),
                    ArgValue::Address(cfg.reward_token),
                ]),
                ArgValue::Array(vec![
                    ArgValue::Ref("fakeHayStrategy".to_string()),
                    ArgValue::Ref("hayStrategy".to_string()),
                ]),
            ],
        }],
    }
}

/// Deploys the full farming suite: plan execution, address-book persistence,
/// wiring and (optionally) source verification.
///
/// The book is persisted before wiring, so a wiring failure leaves a
/// complete record of what is already on chain. Verification failures are
/// logged and summarized but never fail the run.
pub async fn deploy_all<C, S, V, G>(
    cfg: &NetworkConfig,
    upgradeable: bool,
    client: &C,
    store: &S,
    verifier: Option<&V>,
    gate: &G,
) -> Result<AddressBook, ScriptError>
where
    C: ChainClient + ?Sized,
    S: AddressStore + ?Sized,
    V: VerificationClient + ?Sized,
    G: RateGate + ?Sized,
{
    let now = client.current_timestamp().await?;
    let start_time = next_aligned(now, cfg.epoch_period)?;
    info!(
        network = %cfg.network,
        start_time,
        epoch_period = cfg.epoch_period,
        "deploying farming suite"
    );

    let plan = farming_plan(cfg, start_time, upgradeable)?;
    let mut book = execute_plan(&plan, client).await?;
    book.insert_fixed(REWARD_TOKEN_KEY.to_string(), cfg.reward_token)?;

    storage::persist(&book, &cfg.network, store)?;

    wiring::apply(&farming_wiring(cfg), &book, client).await?;

    if let Some(verifier) = verifier {
        let tasks = book.verification_tasks();
        let results = verify_all(&tasks, verifier, gate).await;
        let failures = results
            .iter()
            .filter(|r| matches!(r.status, VerifyStatus::Failed(_)))
            .count();
        if failures > 0 {
            warn!(failures, total = results.len(), "some contracts were not verified");
        } else {
            info!(total = results.len(), "all contracts verified");
        }
    }

    Ok(book)
}

/// Deploys a standalone `Farming` contract and logs its address
pub async fn deploy_farming<C: ChainClient + ?Sized>(client: &C) -> Result<(), ScriptError> {
    let address = client
        .deploy("Farming", &[])
        .await
        .map_err(|e| ScriptError::DeploymentFailed {
            step: "farming".to_string(),
            cause: e.to_string(),
        })?;
    info!(address = %format!("{address:#x}"), "farming deployed");
    Ok(())
}
