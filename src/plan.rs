//! The declarative deployment plan and its validation.
//!
//! A plan is a set of named steps whose arguments may reference the addresses
//! produced by other steps. Construction validates the reference graph and
//! fixes the execution order with a topological sort, so an author cannot
//! mis-order steps; duplicate names, unknown references and cycles are all
//! rejected before any chain interaction.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};

use crate::errors::ScriptError;

/// How a step's contract is instantiated on chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// A plain, immutable deployment; the arguments are constructor arguments
    Direct,
    /// An upgradeable-proxy deployment; the arguments are passed to the
    /// implementation's initializer through the proxy constructor
    Proxy,
}

/// A single constructor/initializer argument value.
///
/// `Ref` and `ImplRef` are forward references, resolved to concrete addresses
/// once the named step has executed.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// A literal address, e.g. an externally owned token
    Address(Address),
    /// An unsigned 256-bit integer literal
    Uint(U256),
    /// A string literal
    Str(String),
    /// An ordered list of argument values
    Array(Vec<ArgValue>),
    /// The deployed address of the named step
    Ref(String),
    /// The implementation address of the named proxy step
    ImplRef(String),
}

impl ArgValue {
    /// Collects every step name this value references
    fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            ArgValue::Ref(name) | ArgValue::ImplRef(name) => out.push(name),
            ArgValue::Array(values) => {
                for value in values {
                    value.collect_references(out);
                }
            }
            ArgValue::Address(_) | ArgValue::Uint(_) | ArgValue::Str(_) => {}
        }
    }
}

/// One deployment step of a plan
#[derive(Debug, Clone)]
pub struct DeployStep {
    /// Unique logical identifier, also the key in the address book
    pub name: String,
    /// The name of the contract artifact to deploy
    pub contract: String,
    pub kind: StepKind,
    pub args: Vec<ArgValue>,
}

impl DeployStep {
    /// The step names this step's arguments reference
    fn references(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        for arg in &self.args {
            arg.collect_references(&mut refs);
        }
        refs
    }
}

/// A validated deployment plan, holding its steps in execution order
#[derive(Debug, Clone)]
pub struct DeploymentPlan {
    steps: Vec<DeployStep>,
}

impl DeploymentPlan {
    /// Validates the given steps and computes their execution order.
    ///
    /// The reference graph must be a DAG over the declared step names. The
    /// execution order is a stable topological sort: steps are emitted in
    /// declared order wherever dependencies permit, so a plan without forward
    /// references executes exactly as written.
    pub fn new(steps: Vec<DeployStep>) -> Result<Self, ScriptError> {
        let mut index = HashMap::with_capacity(steps.len());
        for (i, step) in steps.iter().enumerate() {
            if index.insert(step.name.as_str(), i).is_some() {
                return Err(ScriptError::DuplicateStepName(step.name.clone()));
            }
        }

        // Edges run from a dependency to its dependents
        let mut dependents = vec![Vec::new(); steps.len()];
        let mut indegree = vec![0usize; steps.len()];
        for (i, step) in steps.iter().enumerate() {
            for reference in step.references() {
                let dep = *index
                    .get(reference)
                    .ok_or_else(|| ScriptError::UnresolvedReference {
                        step: step.name.clone(),
                        reference: reference.to_string(),
                    })?;
                dependents[dep].push(i);
                indegree[i] += 1;
            }
        }

        // Kahn's algorithm, always picking the lowest declared index among
        // the ready steps to keep the sort stable
        let mut emitted = vec![false; steps.len()];
        let mut order = Vec::with_capacity(steps.len());
        while order.len() < steps.len() {
            let next = (0..steps.len()).find(|&i| !emitted[i] && indegree[i] == 0);
            let Some(i) = next else {
                let stuck: Vec<&str> = steps
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !emitted[*i])
                    .map(|(_, s)| s.name.as_str())
                    .collect();
                return Err(ScriptError::CyclicDependency(stuck.join(", ")));
            };
            emitted[i] = true;
            order.push(i);
            for &dependent in &dependents[i] {
                indegree[dependent] -= 1;
            }
        }

        let mut ordered: Vec<Option<DeployStep>> = steps.into_iter().map(Some).collect();
        let steps = order
            .into_iter()
            .filter_map(|i| ordered[i].take())
            .collect();

        Ok(Self { steps })
    }

    /// The steps in execution order
    pub fn steps(&self) -> &[DeployStep] {
        &self.steps
    }
}
