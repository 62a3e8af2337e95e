//! Integration tests for movpn CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! None of them executes a provisioning step: they stop at validation or
//! use `--dry-run`.

mod cli_tests;
mod dry_run;
