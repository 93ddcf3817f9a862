//! This crate contains the code required to make the deployer observable.
//! Right now that is the initialization logic for logging plus a panic hook
//! that routes panics through the same log output.
pub mod config;
pub mod panic_hook;
pub mod tracing;

pub use config::Config;
