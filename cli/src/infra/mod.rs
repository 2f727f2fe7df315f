//! Infrastructure layer: adapters implementing the application ports.
//!
//! Process execution, HTTP calls to Twitter, and file loading live here.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod config;
pub mod docker;
pub mod transport;
pub mod twitter;
