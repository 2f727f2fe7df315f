//! Command implementations

pub mod config;
pub mod status;
pub mod stop;
pub mod up;
pub mod volume;
