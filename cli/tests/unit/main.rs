//! Unit tests for movpn CLI
//!
//! These tests use fake executors and run fast without network I/O.

mod helpers;
mod runner_service;
