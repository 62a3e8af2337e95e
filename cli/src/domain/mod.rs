//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod answers;
pub mod artifact;
pub mod config;
pub mod error;
pub mod plan;
pub mod profile;
pub mod step;

pub use answers::{Answers, CertificateRequest, RemoteTarget, Secret};
pub use artifact::{Endpoint, rewrite_remote_lines};
pub use config::ProvisionConfig;
pub use error::{ConnectionError, InputError, RunError};
pub use plan::{Phase, Plan};
pub use profile::{PortRule, SetupProfile, firewall_rules};
pub use step::{ShellCommand, Step, StepResult};
