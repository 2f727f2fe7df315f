//! Unit tests for twitter-compose
//!
//! These tests use mocked ports and run fast without external I/O.

mod architecture;
mod reconcile_service;
mod status_stop_volume;
