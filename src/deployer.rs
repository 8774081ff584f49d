//! Execution of a deployment plan against a chain client

use alloy::dyn_abi::DynSolValue;
use tracing::info;

use crate::{
    chain::ChainClient,
    errors::ScriptError,
    plan::{ArgValue, DeploymentPlan, StepKind},
    types::{AddressBook, DeployedContract},
};

/// Resolves a single argument against the address book
fn resolve_arg(
    step: &str,
    arg: &ArgValue,
    book: &AddressBook,
) -> Result<DynSolValue, ScriptError> {
    let unresolved = |reference: &str| ScriptError::UnresolvedReference {
        step: step.to_string(),
        reference: reference.to_string(),
    };

    match arg {
        ArgValue::Address(address) => Ok(DynSolValue::Address(*address)),
        ArgValue::Uint(value) => Ok(DynSolValue::Uint(*value, 256)),
        ArgValue::Str(value) => Ok(DynSolValue::String(value.clone())),
        ArgValue::Array(values) => {
            let resolved = values
                .iter()
                .map(|value| resolve_arg(step, value, book))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(DynSolValue::Array(resolved))
        }
        ArgValue::Ref(name) => book
            .address(name)
            .map(DynSolValue::Address)
            .ok_or_else(|| unresolved(name)),
        ArgValue::ImplRef(name) => book
            .implementation(name)
            .map(DynSolValue::Address)
            .ok_or_else(|| unresolved(name)),
    }
}

/// Resolves an argument list against the address book
pub(crate) fn resolve_args(
    step: &str,
    args: &[ArgValue],
    book: &AddressBook,
) -> Result<Vec<DynSolValue>, ScriptError> {
    args.iter()
        .map(|arg| resolve_arg(step, arg, book))
        .collect()
}

/// Executes the plan step by step, strictly sequentially, and returns the
/// completed address book.
///
/// Each step's arguments are resolved against the addresses produced by
/// earlier steps. Any failure aborts the run immediately: a missing address
/// would make every subsequent step unresolvable, and retrying a
/// state-mutating chain transaction blindly risks duplicate deployments.
pub async fn execute_plan<C: ChainClient + ?Sized>(
    plan: &DeploymentPlan,
    client: &C,
) -> Result<AddressBook, ScriptError> {
    let mut book = AddressBook::new();

    for step in plan.steps() {
        let args = resolve_args(&step.name, &step.args, &book)?;
        let failed = |e: ScriptError| ScriptError::DeploymentFailed {
            step: step.name.clone(),
            cause: e.to_string(),
        };

        let contract = match step.kind {
            StepKind::Direct => {
                let address = client.deploy(&step.contract, &args).await.map_err(failed)?;
                info!(
                    step = %step.name,
                    address = %format!("{address:#x}"),
                    "contract deployed"
                );
                DeployedContract {
                    address,
                    implementation_address: None,
                    constructor_args: args,
                }
            }
            StepKind::Proxy => {
                let deployment = client
                    .deploy_proxy(&step.contract, &args)
                    .await
                    .map_err(failed)?;
                info!(
                    step = %step.name,
                    proxy = %format!("{:#x}", deployment.proxy_address),
                    implementation = %format!("{:#x}", deployment.implementation_address),
                    "proxy deployed"
                );
                DeployedContract {
                    address: deployment.proxy_address,
                    implementation_address: Some(deployment.implementation_address),
                    constructor_args: args,
                }
            }
        };

        book.insert(step.name.clone(), contract)?;
    }

    Ok(book)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;

    use super::*;
    use crate::{chain::testing::MockChainClient, plan::DeployStep};

    fn direct(name: &str, args: Vec<ArgValue>) -> DeployStep {
        DeployStep {
            name: name.to_string(),
            contract: "FakeERC20".to_string(),
            kind: StepKind::Direct,
            args,
        }
    }

    #[tokio::test]
    async fn test_one_entry_per_step_in_order() {
        let plan = DeploymentPlan::new(vec![
            direct("a", vec![]),
            direct("b", vec![]),
            direct("c", vec![]),
        ])
        .unwrap();
        let client = MockChainClient::new();

        let book = execute_plan(&plan, &client).await.unwrap();

        let names: Vec<&str> = book.entries().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(client.deploys.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_forward_reference_resolves_to_earlier_address() {
        let plan = DeploymentPlan::new(vec![
            direct("a", vec![]),
            direct("b", vec![ArgValue::Ref("a".to_string())]),
        ])
        .unwrap();
        let client = MockChainClient::new();

        let book = execute_plan(&plan, &client).await.unwrap();

        let addr_a = book.address("a").unwrap();
        assert_eq!(
            book.get("b").unwrap().constructor_args,
            vec![DynSolValue::Address(addr_a)]
        );
        // The client saw the resolved address, not the reference
        assert_eq!(
            client.deploys.lock().unwrap()[1].1,
            vec![DynSolValue::Address(addr_a)]
        );
    }

    #[tokio::test]
    async fn test_implementation_reference() {
        let plan = DeploymentPlan::new(vec![
            DeployStep {
                name: "bonding".to_string(),
                contract: "TokenBonding".to_string(),
                kind: StepKind::Proxy,
                args: vec![],
            },
            direct("probe", vec![ArgValue::ImplRef("bonding".to_string())]),
        ])
        .unwrap();
        let client = MockChainClient::new();

        let book = execute_plan(&plan, &client).await.unwrap();

        let implementation = book.implementation("bonding").unwrap();
        assert_eq!(
            book.get("probe").unwrap().constructor_args,
            vec![DynSolValue::Address(implementation)]
        );
    }

    #[tokio::test]
    async fn test_failure_aborts_run() {
        let plan = DeploymentPlan::new(vec![direct("a", vec![]), direct("b", vec![])]).unwrap();
        let client = MockChainClient {
            fail_deploy_of: Some("FakeERC20".to_string()),
            ..MockChainClient::new()
        };

        let err = execute_plan(&plan, &client).await.unwrap_err();
        assert!(matches!(err, ScriptError::DeploymentFailed { step, .. } if step == "a"));
        assert!(client.deploys.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bonding_scenario() {
        let ten_pow_18 = U256::from(10).pow(U256::from(18));
        let start_time = U256::from(1_700_003_600u64);

        let plan = DeploymentPlan::new(vec![
            direct("tokenA", vec![]),
            direct("tokenB", vec![]),
            DeployStep {
                name: "bonding".to_string(),
                contract: "TokenBonding".to_string(),
                kind: StepKind::Proxy,
                args: vec![
                    ArgValue::Uint(start_time),
                    ArgValue::Array(vec![
                        ArgValue::Ref("tokenA".to_string()),
                        ArgValue::Ref("tokenB".to_string()),
                    ]),
                    ArgValue::Array(vec![
                        ArgValue::Uint(ten_pow_18),
                        ArgValue::Uint(ten_pow_18 * U256::from(2)),
                    ]),
                ],
            },
        ])
        .unwrap();
        let client = MockChainClient::new();

        let book = execute_plan(&plan, &client).await.unwrap();

        let bonding = book.get("bonding").unwrap();
        assert!(bonding.implementation_address.is_some());
        assert_ne!(bonding.address, bonding.implementation_address.unwrap());

        let addr_a = book.address("tokenA").unwrap();
        let addr_b = book.address("tokenB").unwrap();
        assert_eq!(
            bonding.constructor_args,
            vec![
                DynSolValue::Uint(start_time, 256),
                DynSolValue::Array(vec![
                    DynSolValue::Address(addr_a),
                    DynSolValue::Address(addr_b),
                ]),
                DynSolValue::Array(vec![
                    DynSolValue::Uint(ten_pow_18, 256),
                    DynSolValue::Uint(ten_pow_18 * U256::from(2), 256),
                ]),
            ]
        );
    }
}
