//! The chain client used to deploy and configure contracts.
//!
//! [`ChainClient`] is the capability the orchestrator consumes; the
//! [`RpcChainClient`] implementation drives an RPC node through an alloy
//! provider, loading Hardhat-style compilation artifacts from disk and
//! encoding arguments dynamically against each artifact's ABI.

use std::{fs, path::PathBuf, str::FromStr};

use alloy::{
    dyn_abi::{DynSolValue, JsonAbiExt},
    json_abi::{Function, JsonAbi},
    network::TransactionBuilder,
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use alloy_primitives::Address;
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use crate::{
    constants::{NUM_DEPLOY_CONFIRMATIONS, PROXY_ARTIFACT},
    errors::ScriptError,
    types::ProxyDeployment,
};

/// The chain capability consumed by the deployer and wirer.
///
/// Every method suspends until the underlying transaction is confirmed, so
/// callers observe a strictly sequential, nonce-ordered stream of
/// transactions from the single deployer account.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Deploys `contract` directly with the given constructor arguments
    async fn deploy(&self, contract: &str, args: &[DynSolValue]) -> Result<Address, ScriptError>;

    /// Deploys `contract` behind an upgradeable proxy: the implementation is
    /// deployed without constructor state, then the proxy is deployed with
    /// the encoded initializer call
    async fn deploy_proxy(
        &self,
        contract: &str,
        init_args: &[DynSolValue],
    ) -> Result<ProxyDeployment, ScriptError>;

    /// Calls `method` (a solidity signature) on the contract at `address`
    async fn call(
        &self,
        address: Address,
        method: &str,
        args: &[DynSolValue],
    ) -> Result<(), ScriptError>;

    /// The timestamp of the latest chain block
    async fn current_timestamp(&self) -> Result<u64, ScriptError>;
}

/// A Hardhat-style compilation artifact
#[derive(Debug, Deserialize)]
pub struct ContractArtifact {
    pub abi: JsonAbi,
    /// Creation bytecode as a 0x-prefixed hex string
    pub bytecode: String,
}

impl ContractArtifact {
    fn bytecode_bytes(&self) -> Result<Vec<u8>, ScriptError> {
        hex::decode(self.bytecode.trim_start_matches("0x"))
            .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))
    }

    /// The creation code with the ABI-encoded constructor arguments appended
    fn deploy_code(&self, args: &[DynSolValue]) -> Result<Vec<u8>, ScriptError> {
        let mut code = self.bytecode_bytes()?;
        match (&self.abi.constructor, args.is_empty()) {
            (Some(constructor), _) => {
                let encoded = constructor
                    .abi_encode_input(args)
                    .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?;
                code.extend(encoded);
            }
            (None, true) => {}
            (None, false) => {
                return Err(ScriptError::CalldataConstruction(
                    "constructor arguments supplied for a contract without a constructor"
                        .to_string(),
                ))
            }
        }
        Ok(code)
    }

    /// Encodes a call to the artifact's initializer
    fn initialize_calldata(&self, args: &[DynSolValue]) -> Result<Vec<u8>, ScriptError> {
        let initializer = self
            .abi
            .function("initialize")
            .and_then(|fs| fs.first())
            .ok_or_else(|| {
                ScriptError::CalldataConstruction("artifact has no initialize function".to_string())
            })?;
        initializer
            .abi_encode_input(args)
            .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
    }
}

/// A [`ChainClient`] backed by an alloy HTTP provider with a local signer
pub struct RpcChainClient {
    provider: DynProvider,
    artifacts_dir: PathBuf,
}

impl RpcChainClient {
    /// Sets up the provider and signing wallet for the given RPC endpoint
    pub fn connect(
        rpc_url: &str,
        priv_key: &str,
        artifacts_dir: PathBuf,
    ) -> Result<Self, ScriptError> {
        let url = rpc_url
            .parse::<Url>()
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
        let signer = PrivateKeySigner::from_str(priv_key)
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
        let provider = ProviderBuilder::new().wallet(signer).connect_http(url);

        Ok(Self {
            provider: DynProvider::new(provider),
            artifacts_dir,
        })
    }

    fn load_artifact(&self, contract: &str) -> Result<ContractArtifact, ScriptError> {
        let path = self.artifacts_dir.join(format!("{contract}.json"));
        let contents = fs::read_to_string(&path)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&contents).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))
    }

    async fn send_deploy(&self, code: Vec<u8>) -> Result<Address, ScriptError> {
        let tx = TransactionRequest::default().with_deploy_code(code);
        let receipt = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?
            .with_required_confirmations(NUM_DEPLOY_CONFIRMATIONS)
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

        if !receipt.status() {
            return Err(ScriptError::ContractDeployment(
                "deployment transaction reverted".to_string(),
            ));
        }
        receipt.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment("receipt carries no contract address".to_string())
        })
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    async fn deploy(&self, contract: &str, args: &[DynSolValue]) -> Result<Address, ScriptError> {
        let artifact = self.load_artifact(contract)?;
        self.send_deploy(artifact.deploy_code(args)?).await
    }

    async fn deploy_proxy(
        &self,
        contract: &str,
        init_args: &[DynSolValue],
    ) -> Result<ProxyDeployment, ScriptError> {
        let artifact = self.load_artifact(contract)?;

        // The implementation holds no constructor state; all setup happens
        // through the initializer relayed by the proxy constructor
        let implementation_address = self.send_deploy(artifact.deploy_code(&[])?).await?;

        let init_calldata = artifact.initialize_calldata(init_args)?;
        let proxy_artifact = self.load_artifact(PROXY_ARTIFACT)?;
        let proxy_address = self
            .send_deploy(proxy_artifact.deploy_code(&[
                DynSolValue::Address(implementation_address),
                DynSolValue::Bytes(init_calldata),
            ])?)
            .await?;

        Ok(ProxyDeployment {
            proxy_address,
            implementation_address,
        })
    }

    async fn call(
        &self,
        address: Address,
        method: &str,
        args: &[DynSolValue],
    ) -> Result<(), ScriptError> {
        let function = Function::parse(method)
            .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?;
        let calldata = function
            .abi_encode_input(args)
            .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?;

        let tx = TransactionRequest::default()
            .with_to(address)
            .with_input(calldata);
        let receipt = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            .with_required_confirmations(NUM_DEPLOY_CONFIRMATIONS)
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        if !receipt.status() {
            return Err(ScriptError::ContractInteraction(
                "call transaction reverted".to_string(),
            ));
        }
        Ok(())
    }

    async fn current_timestamp(&self) -> Result<u64, ScriptError> {
        let block = self
            .provider
            .get_block_by_number(alloy::eips::BlockNumberOrTag::Latest)
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            .ok_or_else(|| {
                ScriptError::ContractInteraction("latest block unavailable".to_string())
            })?;
        Ok(block.header.timestamp)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    const ARTIFACT_JSON: &str = r#"{
        "abi": [
            {
                "type": "constructor",
                "inputs": [{ "name": "token", "type": "address" }],
                "stateMutability": "nonpayable"
            },
            {
                "type": "function",
                "name": "initialize",
                "inputs": [{ "name": "token", "type": "address" }],
                "outputs": [],
                "stateMutability": "nonpayable"
            }
        ],
        "bytecode": "0x6001600155"
    }"#;

    #[test]
    fn test_deploy_code_appends_encoded_args() {
        let artifact: ContractArtifact = serde_json::from_str(ARTIFACT_JSON).unwrap();
        let code = artifact
            .deploy_code(&[DynSolValue::Address(Address::with_last_byte(7))])
            .unwrap();

        // 5 bytes of creation code plus one abi-encoded address word
        assert_eq!(code.len(), 5 + 32);
        assert_eq!(&code[..5], &[0x60, 0x01, 0x60, 0x01, 0x55]);
        assert_eq!(code[5 + 31], 7);
    }

    #[test]
    fn test_args_without_constructor_rejected() {
        let artifact: ContractArtifact = serde_json::from_str(
            r#"{ "abi": [], "bytecode": "0x6001" }"#,
        )
        .unwrap();
        let err = artifact
            .deploy_code(&[DynSolValue::Uint(alloy_primitives::U256::ZERO, 256)])
            .unwrap_err();
        assert!(matches!(err, ScriptError::CalldataConstruction(_)));
    }

    #[test]
    fn test_initialize_calldata_has_selector() {
        let artifact: ContractArtifact = serde_json::from_str(ARTIFACT_JSON).unwrap();
        let calldata = artifact
            .initialize_calldata(&[DynSolValue::Address(Address::with_last_byte(7))])
            .unwrap();
        // 4-byte selector plus one argument word
        assert_eq!(calldata.len(), 4 + 32);
    }
}
