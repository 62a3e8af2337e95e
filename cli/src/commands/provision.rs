//! Provision command: collect answers, build the plan, run it.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::{ConfigStore, StepExecutor};
use crate::application::services::collect::{InputDefaults, collect_answers};
use crate::application::services::profile::{PlanOptions, build_plan};
use crate::application::services::runner::{RunOptions, RunReport, run_plan};
use crate::domain::profile::DEFAULT_SERVE_PORT;
use crate::domain::{Answers, Plan, SetupProfile};
use crate::infra::config::YamlConfigStore;
use crate::infra::local::LocalExecutor;
use crate::infra::prompt::{DefaultsPrompter, DialoguerPrompter};
use crate::infra::remote::RemoteExecutor;
use crate::infra::serve::{ArtifactIndex, serve_artifacts, shutdown_signal};
use crate::output::{TerminalReporter, progress};

/// Arguments for provisioning.
#[derive(Args, Debug)]
pub struct ProvisionArgs {
    /// Setup to run (prompted when omitted)
    #[arg(long, value_enum)]
    pub setup: Option<SetupProfile>,

    /// Run the steps on this host over SSH instead of locally
    #[arg(long, env = "MOVPN_HOST")]
    pub host: Option<String>,

    /// SSH port
    #[arg(long, default_value_t = 22)]
    pub port: u16,

    /// SSH user
    #[arg(long, default_value = "root")]
    pub username: String,

    /// SSH password (prompted when neither this nor --identity is given)
    #[arg(long, env = "MOVPN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// SSH private key file
    #[arg(long, value_name = "FILE")]
    pub identity: Option<PathBuf>,

    /// Domain for the TLS certificate (vless)
    #[arg(long)]
    pub domain: Option<String>,

    /// Email for the certificate account (vless)
    #[arg(long)]
    pub email: Option<String>,

    /// Comma-separated OpenVPN client names
    #[arg(long, value_name = "NAMES")]
    pub clients: Option<String>,

    /// Print the plan without running anything
    #[arg(long)]
    pub dry_run: bool,

    /// Serve the generated client configs over HTTP after a successful run
    #[arg(long, conflicts_with = "host")]
    pub serve: bool,

    /// Port for --serve
    #[arg(long, default_value_t = DEFAULT_SERVE_PORT)]
    pub serve_port: u16,
}

impl ProvisionArgs {
    fn input_defaults(&self) -> InputDefaults {
        InputDefaults {
            setup: self.setup,
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
            identity: self.identity.clone(),
            domain: self.domain.clone(),
            email: self.email.clone(),
            clients: self.clients.clone(),
        }
    }
}

/// Entry point for provisioning.
///
/// # Errors
///
/// Returns an error if input is invalid, the remote host cannot be reached,
/// a step fails, or the artifact server cannot start.
pub async fn run(app: &AppContext, args: &ProvisionArgs) -> Result<()> {
    let config = YamlConfigStore.load()?;

    let defaults = args.input_defaults();
    let answers = if app.non_interactive {
        collect_answers(&DefaultsPrompter, &defaults)?
    } else {
        collect_answers(&DialoguerPrompter, &defaults)?
    };

    let opts = PlanOptions {
        serve_port: args.serve.then_some(args.serve_port),
    };
    let plan = build_plan(&answers, &config, opts)?;
    if args.serve && !answers.profile.creates_clients() {
        app.output.warn(&format!(
            "--serve ignored: {} produces no client configs",
            answers.profile
        ));
    }

    if args.dry_run {
        print_plan(&plan, &answers);
        return Ok(());
    }

    let report = match &answers.remote {
        Some(target) => {
            let pb = app
                .output
                .spinner(&format!("Connecting to {}@{}...", target.username, target.host));
            let executor = match RemoteExecutor::connect(target).await {
                Ok(executor) => {
                    progress::finish_ok(&pb, &format!("Connected to {}", target.host));
                    executor
                }
                Err(e) => {
                    progress::finish_error(&pb, "Connection failed");
                    return Err(e.into());
                }
            };
            let outcome = execute(app, &executor, &plan).await;
            executor.disconnect().await;
            outcome?
        }
        None => execute(app, &LocalExecutor::new(config.shell.as_str()), &plan).await?,
    };

    print_summary(app, &report);

    if args.serve && !report.artifacts.is_empty() {
        let index = ArtifactIndex::new(report.artifacts.as_slice())
            .with_existing(plan.companions.as_slice());
        app.output.info(&format!(
            "Serving {} file(s) on http://0.0.0.0:{} (Ctrl-C to stop)",
            index.names().len(),
            args.serve_port
        ));
        serve_artifacts(index, args.serve_port, shutdown_signal()).await?;
    }
    Ok(())
}

async fn execute(app: &AppContext, executor: &impl StepExecutor, plan: &Plan) -> Result<RunReport> {
    let reporter = TerminalReporter::new(&app.output);
    run_plan(
        executor,
        plan,
        &reporter,
        RunOptions {
            verbose: app.verbose,
        },
    )
    .await
}

fn print_summary(app: &AppContext, report: &RunReport) {
    let out = &app.output;
    out.kv("started", &report.started_at.format("%Y-%m-%d %H:%M:%S UTC").to_string());
    if !report.tolerated.is_empty() {
        out.warn(&format!(
            "{} step(s) failed but were allowed to fail",
            report.tolerated.len()
        ));
    }
    if !report.artifacts.is_empty() {
        out.header("Client configs:");
        for path in &report.artifacts {
            out.kv("file", path);
        }
    }
}

/// Dry-run listing. Printed regardless of `--quiet`: it is the requested output.
fn print_plan(plan: &Plan, answers: &Answers) {
    let target = answers
        .remote
        .as_ref()
        .map_or_else(|| "local".to_string(), |r| format!("{}@{}", r.username, r.host));
    println!("Plan: {} on {target} ({} steps)", plan.profile, plan.len());
    let mut index = 0;
    for phase in &plan.phases {
        println!();
        println!("{}:", phase.title);
        for step in &phase.steps {
            index += 1;
            println!("  {index:>3}. {}", step.render());
        }
    }
    if !plan.artifacts.is_empty() {
        println!();
        println!("Artifacts:");
        for path in &plan.artifacts {
            println!("  {path}");
        }
        for path in &plan.companions {
            println!("  {path} (if present)");
        }
    }
}
