//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug)]
pub enum ScriptError {
    /// A configuration input was invalid, e.g. a zero epoch period
    InvalidArgument(String),
    /// Two steps in a deployment plan share a name
    DuplicateStepName(String),
    /// An argument references a step name the plan does not define,
    /// or a name absent from the address book
    UnresolvedReference {
        /// The step or action whose arguments contain the reference
        step: String,
        /// The name the reference points at
        reference: String,
    },
    /// The plan's reference graph contains a cycle
    CyclicDependency(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error reading or parsing a contract compilation artifact
    ArtifactParsing(String),
    /// Error constructing calldata for a contract method
    CalldataConstruction(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// A deployment step failed, aborting the run
    DeploymentFailed {
        /// The step that failed
        step: String,
        /// The underlying chain error
        cause: String,
    },
    /// A post-deploy wiring call failed, aborting the run
    WiringFailed {
        /// The wiring action that failed
        action: String,
        /// The underlying chain error
        cause: String,
    },
    /// Error writing the address book
    Persistence(String),
    /// Error submitting a contract for verification
    Verification(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::InvalidArgument(s) => write!(f, "invalid argument: {}", s),
            ScriptError::DuplicateStepName(s) => write!(f, "duplicate step name: {}", s),
            ScriptError::UnresolvedReference { step, reference } => {
                write!(f, "step {} references undefined name {}", step, reference)
            }
            ScriptError::CyclicDependency(s) => {
                write!(f, "cyclic dependency in deployment plan: {}", s)
            }
            ScriptError::ClientInitialization(s) => {
                write!(f, "error initializing client: {}", s)
            }
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::CalldataConstruction(s) => {
                write!(f, "error constructing calldata: {}", s)
            }
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::DeploymentFailed { step, cause } => {
                write!(f, "deployment of step {} failed: {}", step, cause)
            }
            ScriptError::WiringFailed { action, cause } => {
                write!(f, "wiring action {} failed: {}", action, cause)
            }
            ScriptError::Persistence(s) => write!(f, "error writing address book: {}", s),
            ScriptError::Verification(s) => write!(f, "error verifying contract: {}", s),
        }
    }
}

impl Error for ScriptError {}
