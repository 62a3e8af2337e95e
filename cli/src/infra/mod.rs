//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: local and SSH step
//! execution, terminal prompts, config loading, logging setup and the
//! artifact server.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod config;
pub mod local;
pub mod logging;
pub mod prompt;
pub mod remote;
pub mod serve;
