//! navguard — navigation guard for single-site embedded browser shells.
//!
//! Keeps the owned domain (and its subdomains) inside the embedded view and
//! hands every other link to the operating system. The binary entrypoint is
//! in `main.rs`; everything it uses lives here so hosts and tests can drive
//! the policy directly.

pub mod audit;
pub mod bridge;
pub mod cli;
pub mod policy;
pub mod utils;
