//! Client for the shared wallet contract: confirmed contract transactions,
//! balance and allowance reads, and a concurrent event monitor.

pub mod config;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod modules;
