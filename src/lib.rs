//! Scripts for deploying and initializing the farming protocol contracts.
//!
//! A run deploys the token-bonding, incentive-voting and farming contracts in
//! dependency order (directly or behind upgradeable proxies), wires them
//! together, persists the per-network address book, and submits every
//! deployed contract to a block-explorer verification service.

pub mod chain;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod deployer;
pub mod errors;
pub mod explorer;
pub mod plan;
pub mod storage;
pub mod types;
pub mod utils;
pub mod verifier;
pub mod wiring;
