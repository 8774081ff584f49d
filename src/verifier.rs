//! Source verification of deployed contracts.
//!
//! Verification is best effort: a failed submission is logged and recorded
//! but never aborts the run, since the contracts are already live and the
//! submission can be retried by hand. Explorer APIs rate-limit aggressively,
//! so a [`RateGate`] is consulted after every task, successful or not.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::{
    explorer::VerificationClient,
    types::{VerificationResult, VerificationTask, VerifyStatus},
};

/// Throttles verification submissions
#[async_trait]
pub trait RateGate: Send + Sync {
    /// Suspends until the next submission may be sent
    async fn pause(&self);
}

/// A [`RateGate`] that sleeps for a fixed interval between submissions
pub struct FixedInterval {
    interval: Duration,
}

impl FixedInterval {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

#[async_trait]
impl RateGate for FixedInterval {
    async fn pause(&self) {
        tokio::time::sleep(self.interval).await;
    }
}

/// Submits every task for verification, pausing at the gate between
/// submissions, and returns one result per task
pub async fn verify_all<C: VerificationClient + ?Sized, G: RateGate + ?Sized>(
    tasks: &[VerificationTask],
    client: &C,
    gate: &G,
) -> Vec<VerificationResult> {
    let mut results = Vec::with_capacity(tasks.len());

    for task in tasks {
        let status = match client.verify(task).await {
            Ok(()) => {
                info!(contract = %task.name, address = %format!("{:#x}", task.address), "contract verified");
                VerifyStatus::Verified
            }
            Err(e) => {
                warn!(contract = %task.name, error = %e, "cannot verify contract");
                VerifyStatus::Failed(e.to_string())
            }
        };
        results.push(VerificationResult {
            address: task.address,
            status,
        });
        gate.pause().await;
    }

    results
}
