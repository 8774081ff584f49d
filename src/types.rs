//! Types shared between the deploy script modules

use alloy::dyn_abi::DynSolValue;
use alloy_primitives::Address;

use crate::errors::ScriptError;

/// The addresses produced by an upgradeable-proxy deployment
#[derive(Debug, Clone, Copy)]
pub struct ProxyDeployment {
    /// The stable proxy address all calls go through
    pub proxy_address: Address,
    /// The replaceable implementation address behind the proxy
    pub implementation_address: Address,
}

/// One deployed contract as recorded in the address book
#[derive(Debug, Clone)]
pub struct DeployedContract {
    pub address: Address,
    /// Set for proxy deployments only
    pub implementation_address: Option<Address>,
    /// The resolved constructor/initializer arguments, kept for verification
    pub constructor_args: Vec<DynSolValue>,
}

#[derive(Debug)]
struct BookEntry {
    name: String,
    contract: DeployedContract,
    /// Fixed entries are externally owned addresses recorded for downstream
    /// tooling; they were not deployed by this run and are never verified
    fixed: bool,
}

/// The address book of one deployment run: logical contract name to deployed
/// addresses, in insertion order.
///
/// Names are write-once; re-inserting under an existing name indicates a plan
/// error and is rejected.
#[derive(Debug, Default)]
pub struct AddressBook {
    entries: Vec<BookEntry>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a contract deployed by this run
    pub fn insert(&mut self, name: String, contract: DeployedContract) -> Result<(), ScriptError> {
        self.insert_entry(name, contract, false)
    }

    /// Records an externally owned address (e.g. the reward token) so the
    /// persisted book is a complete map for downstream tooling
    pub fn insert_fixed(&mut self, name: String, address: Address) -> Result<(), ScriptError> {
        self.insert_entry(
            name,
            DeployedContract {
                address,
                implementation_address: None,
                constructor_args: Vec::new(),
            },
            true,
        )
    }

    fn insert_entry(
        &mut self,
        name: String,
        contract: DeployedContract,
        fixed: bool,
    ) -> Result<(), ScriptError> {
        if self.get(&name).is_some() {
            return Err(ScriptError::DuplicateStepName(name));
        }
        self.entries.push(BookEntry {
            name,
            contract,
            fixed,
        });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&DeployedContract> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.contract)
    }

    /// The deployed (or proxy) address recorded under `name`
    pub fn address(&self, name: &str) -> Option<Address> {
        self.get(name).map(|c| c.address)
    }

    /// The implementation address recorded under `name`, for proxy entries
    pub fn implementation(&self, name: &str) -> Option<Address> {
        self.get(name).and_then(|c| c.implementation_address)
    }

    /// All entries in insertion order, fixed ones included
    pub fn entries(&self) -> impl Iterator<Item = (&str, &DeployedContract)> {
        self.entries
            .iter()
            .map(|e| (e.name.as_str(), &e.contract))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Derives the verification work list from the book: one task per
    /// deployed contract, plus one per proxy implementation (implementations
    /// are deployed without constructor state, so their task carries no
    /// arguments).
    pub fn verification_tasks(&self) -> Vec<VerificationTask> {
        let mut tasks = Vec::new();
        for entry in self.entries.iter().filter(|e| !e.fixed) {
            tasks.push(VerificationTask {
                name: entry.name.clone(),
                address: entry.contract.address,
                constructor_args: entry.contract.constructor_args.clone(),
            });
            if let Some(implementation) = entry.contract.implementation_address {
                tasks.push(VerificationTask {
                    name: format!("{}Implementation", entry.name),
                    address: implementation,
                    constructor_args: Vec::new(),
                });
            }
        }
        tasks
    }
}

/// A single contract verification submission
#[derive(Debug, Clone)]
pub struct VerificationTask {
    /// The logical name, for logging only
    pub name: String,
    pub address: Address,
    pub constructor_args: Vec<DynSolValue>,
}

/// The outcome of one verification task
#[derive(Debug, Clone, PartialEq)]
pub enum VerifyStatus {
    Verified,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub address: Address,
    pub status: VerifyStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reinsert_rejected() {
        let mut book = AddressBook::new();
        book.insert_fixed("hay".to_string(), Address::with_last_byte(1))
            .unwrap();
        let err = book
            .insert_fixed("hay".to_string(), Address::with_last_byte(2))
            .unwrap_err();
        assert!(matches!(err, ScriptError::DuplicateStepName(name) if name == "hay"));
    }

    #[test]
    fn test_verification_tasks_skip_fixed_and_split_proxies() {
        let mut book = AddressBook::new();
        book.insert(
            "farming".to_string(),
            DeployedContract {
                address: Address::with_last_byte(1),
                implementation_address: Some(Address::with_last_byte(2)),
                constructor_args: vec![DynSolValue::Address(Address::with_last_byte(9))],
            },
        )
        .unwrap();
        book.insert_fixed("hay".to_string(), Address::with_last_byte(3))
            .unwrap();

        let tasks = book.verification_tasks();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].name, "farming");
        assert_eq!(tasks[0].address, Address::with_last_byte(1));
        assert_eq!(tasks[1].name, "farmingImplementation");
        assert_eq!(tasks[1].address, Address::with_last_byte(2));
        assert!(tasks[1].constructor_args.is_empty());
    }
}
