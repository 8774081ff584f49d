//! Post-deployment wiring calls.
//!
//! Some contracts can only be connected after every address they need exists,
//! so wiring runs as a separate phase once the plan has executed and the
//! address book is complete.

use tracing::info;

use crate::{
    chain::ChainClient, deployer::resolve_args, errors::ScriptError, plan::ArgValue,
    types::AddressBook,
};

/// One contract call applied after deployment
#[derive(Debug, Clone)]
pub struct WiringCall {
    /// The step name of the contract to call
    pub target: String,
    /// The solidity signature of the method, e.g. `setFarming(address)`
    pub method: String,
    pub args: Vec<ArgValue>,
}

/// A named group of wiring calls applied as a unit
#[derive(Debug, Clone)]
pub struct WiringAction {
    pub name: String,
    pub calls: Vec<WiringCall>,
}

/// Applies the action's calls in order against the completed address book
pub async fn apply<C: ChainClient + ?Sized>(
    action: &WiringAction,
    book: &AddressBook,
    client: &C,
) -> Result<(), ScriptError> {
    for call in &action.calls {
        let target = book
            .address(&call.target)
            .ok_or_else(|| ScriptError::UnresolvedReference {
                step: action.name.clone(),
                reference: call.target.clone(),
            })?;
        let args = resolve_args(&action.name, &call.args, book)?;

        client
            .call(target, &call.method, &args)
            .await
            .map_err(|e| ScriptError::WiringFailed {
                action: action.name.clone(),
                cause: e.to_string(),
            })?;
        info!(
            action = %action.name,
            target = %call.target,
            method = %call.method,
            "wiring call applied"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use alloy::dyn_abi::DynSolValue;
    use alloy_primitives::Address;

    use super::*;
    use crate::{chain::testing::MockChainClient, types::DeployedContract};

    fn book_with(names: &[&str]) -> AddressBook {
        let mut book = AddressBook::new();
        for (i, name) in names.iter().enumerate() {
            book.insert(
                name.to_string(),
                DeployedContract {
                    address: Address::with_last_byte(i as u8 + 1),
                    implementation_address: None,
                    constructor_args: Vec::new(),
                },
            )
            .unwrap();
        }
        book
    }

    #[tokio::test]
    async fn test_calls_resolved_and_sent() {
        let book = book_with(&["voting", "farming"]);
        let client = MockChainClient::new();
        let action = WiringAction {
            name: "connectFarming".to_string(),
            calls: vec![WiringCall {
                target: "voting".to_string(),
                method: "setFarming(address)".to_string(),
                args: vec![ArgValue::Ref("farming".to_string())],
            }],
        };

        apply(&action, &book, &client).await.unwrap();

        let calls = client.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, book.address("voting").unwrap());
        assert_eq!(calls[0].1, "setFarming(address)");
        assert_eq!(
            calls[0].2,
            vec![DynSolValue::Address(book.address("farming").unwrap())]
        );
    }

    #[tokio::test]
    async fn test_unknown_target_rejected() {
        let book = book_with(&["farming"]);
        let client = MockChainClient::new();
        let action = WiringAction {
            name: "connectFarming".to_string(),
            calls: vec![WiringCall {
                target: "voting".to_string(),
                method: "setFarming(address)".to_string(),
                args: vec![],
            }],
        };

        let err = apply(&action, &book, &client).await.unwrap_err();
        assert!(matches!(
            err,
            ScriptError::UnresolvedReference { reference, .. } if reference == "voting"
        ));
        assert!(client.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_call_failure_surfaces_action_name() {
        let book = book_with(&["voting"]);
        let client = MockChainClient {
            fail_calls: true,
            ..MockChainClient::new()
        };
        let action = WiringAction {
            name: "connectFarming".to_string(),
            calls: vec![WiringCall {
                target: "voting".to_string(),
                method: "setFarming(address)".to_string(),
                args: vec![],
            }],
        };

        let err = apply(&action, &book, &client).await.unwrap_err();
        assert!(matches!(
            err,
            ScriptError::WiringFailed { action, .. } if action == "connectFarming"
        ));
    }
}
