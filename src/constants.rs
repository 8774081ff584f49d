//! Constants used in the deploy scripts

use std::time::Duration;

use alloy_primitives::{address, Address};

/// The address of the HAY reward token on BNB chain
pub const HAY_ADDRESS: Address = address!("0x7adC9A28Fab850586dB99E7234EA2Eb7014950fA");

/// The cooldown observed between contract verification submissions.
///
/// The explorer API rate-limits aggressively; one submission per 16 seconds
/// stays comfortably under its limit.
pub const VERIFY_COOLDOWN: Duration = Duration::from_secs(16);

/// The number of confirmations to wait for deployment and wiring transactions
pub const NUM_DEPLOY_CONFIRMATIONS: u64 = 1;

/// The artifact name of the upgradeable proxy contract deployed in front of
/// proxy-kind steps
pub const PROXY_ARTIFACT: &str = "ERC1967Proxy";

/// The default directory holding the compiled contract artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The default directory the per-network address books are written to
pub const DEFAULT_ADDRESSES_DIR: &str = "addresses";
