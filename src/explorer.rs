//! The block-explorer verification API client

use alloy::dyn_abi::DynSolValue;
use async_trait::async_trait;
use serde::Deserialize;

use crate::{errors::ScriptError, types::VerificationTask};

/// A service that accepts contract verification submissions
#[async_trait]
pub trait VerificationClient: Send + Sync {
    async fn verify(&self, task: &VerificationTask) -> Result<(), ScriptError>;
}

/// An Etherscan-compatible verification endpoint
pub struct EtherscanApi {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

/// The response envelope shared by Etherscan-style endpoints
#[derive(Deserialize)]
struct ApiResponse {
    status: String,
    result: String,
}

impl EtherscanApi {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url,
            api_key,
        }
    }

    /// ABI-encodes the constructor arguments to the unprefixed hex string the
    /// API expects; empty arguments encode to the empty string
    fn encode_constructor_args(args: &[DynSolValue]) -> String {
        if args.is_empty() {
            return String::new();
        }
        hex::encode(DynSolValue::Tuple(args.to_vec()).abi_encode_params())
    }
}

#[async_trait]
impl VerificationClient for EtherscanApi {
    async fn verify(&self, task: &VerificationTask) -> Result<(), ScriptError> {
        let constructor_args = Self::encode_constructor_args(&task.constructor_args);
        let address = format!("{:#x}", task.address);
        let form = [
            ("module", "contract"),
            ("action", "verifysourcecode"),
            ("contractaddress", address.as_str()),
            // The misspelling is part of the API
            ("constructorArguements", constructor_args.as_str()),
            ("apikey", self.api_key.as_str()),
        ];

        let response = self
            .http
            .post(&self.api_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| ScriptError::Verification(e.to_string()))?
            .json::<ApiResponse>()
            .await
            .map_err(|e| ScriptError::Verification(e.to_string()))?;

        if response.status == "1" {
            Ok(())
        } else {
            Err(ScriptError::Verification(response.result))
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, U256};

    use super::*;

    #[test]
    fn test_empty_args_encode_to_empty_string() {
        assert_eq!(EtherscanApi::encode_constructor_args(&[]), "");
    }

    #[test]
    fn test_args_encode_without_prefix() {
        let encoded = EtherscanApi::encode_constructor_args(&[
            DynSolValue::Uint(U256::from(1), 256),
            DynSolValue::Address(Address::with_last_byte(7)),
        ]);

        // Two 32-byte words, hex-encoded without a 0x prefix
        assert_eq!(encoded.len(), 128);
        assert!(encoded.starts_with("00"));
        assert!(encoded.ends_with("07"));
    }
}
