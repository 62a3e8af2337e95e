//! Runner service tests: ordering, fail-fast, verbose, hints.

#![allow(clippy::expect_used)]

use movpn_cli::application::services::profile::{PlanOptions, build_plan};
use movpn_cli::application::services::runner::{
    PASSWORD_CHANGE_HINT, PASSWORD_CHANGE_MARKER, RunOptions, run_plan,
};
use movpn_cli::domain::{Plan, RunError, SetupProfile, StepResult};

use crate::helpers::{FakeHost, RecordingReporter, answers, config};

fn openvpn_plan() -> Plan {
    build_plan(
        &answers(SetupProfile::OpenVpn, &["c1"]),
        &config(),
        PlanOptions::default(),
    )
    .expect("plan")
}

fn quiet() -> RunOptions {
    RunOptions { verbose: false }
}

#[tokio::test]
async fn test_steps_execute_in_declared_order() {
    let plan = openvpn_plan();
    let host = FakeHost::new();
    let reporter = RecordingReporter::default();

    let report = run_plan(&host, &plan, &reporter, quiet())
        .await
        .expect("run succeeds");

    let declared: Vec<String> = plan.steps().map(|(_, s)| s.display()).collect();
    assert_eq!(host.executed(), declared);
    assert_eq!(report.executed, plan.len());
    assert_eq!(report.artifacts, ["/root/configs/c1.ovpn"]);
    assert!(report.tolerated.is_empty());
    assert_eq!(reporter.tagged("success").len(), 1);
}

#[tokio::test]
async fn test_every_step_is_reported_with_its_position() {
    let plan = openvpn_plan();
    let reporter = RecordingReporter::default();
    run_plan(&FakeHost::new(), &plan, &reporter, quiet())
        .await
        .expect("run succeeds");

    let steps = reporter.tagged("step");
    assert_eq!(steps.len(), plan.len());
    assert_eq!(steps[0], format!("[1/{}] apt-get update", plan.len()));
    assert_eq!(reporter.tagged("phase").len(), plan.phases.len());
}

#[tokio::test]
async fn test_failing_compose_up_skips_client_steps() {
    let plan = openvpn_plan();
    let host = FakeHost::new().failing_on(
        "docker compose up -d",
        StepResult::failed(Some(1), "no configuration file provided: not found"),
    );
    let reporter = RecordingReporter::default();

    let err = run_plan(&host, &plan, &reporter, quiet())
        .await
        .expect_err("run must fail");

    match err.downcast_ref::<RunError>() {
        Some(RunError::StepFailed { phase, command }) => {
            assert_eq!(phase, "clone and init openvpn");
            assert_eq!(command, "docker compose up -d");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let executed = host.executed();
    assert_eq!(executed.last().map(String::as_str), Some("docker compose up -d"));
    assert!(!executed.iter().any(|c| c.contains("easyrsa")));
    assert!(!executed.iter().any(|c| c.contains("ovpn_getclient")));
    assert!(host.file("/root/configs/c1.ovpn").is_none());

    let failures = reporter.tagged("failure");
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("no configuration file provided"));
}

#[tokio::test]
async fn test_failure_warns_that_revert_steps_were_not_run() {
    let plan = openvpn_plan();
    let host = FakeHost::new().failing_on("init.sh", StepResult::failed(Some(127), "not found"));
    let reporter = RecordingReporter::default();

    run_plan(&host, &plan, &reporter, quiet())
        .await
        .expect_err("run must fail");

    assert!(
        reporter
            .tagged("warn")
            .iter()
            .any(|w| w.contains("rollback not performed"))
    );
}

#[tokio::test]
async fn test_first_failure_stops_the_run() {
    let plan = openvpn_plan();
    let host = FakeHost::new().failing_on("apt-get upgrade", StepResult::failed(Some(100), "E: lock"));
    let reporter = RecordingReporter::default();

    run_plan(&host, &plan, &reporter, quiet())
        .await
        .expect_err("run must fail");

    assert_eq!(host.executed(), ["apt-get update", "apt-get upgrade -y"]);
}

#[tokio::test]
async fn test_tolerant_failure_warns_and_continues() {
    let plan = openvpn_plan();
    let host = FakeHost::new().failing_on(
        "apt-get remove",
        StepResult::failed(Some(100), "E: Unable to locate package docker-engine"),
    );
    let reporter = RecordingReporter::default();

    let report = run_plan(&host, &plan, &reporter, quiet())
        .await
        .expect("run succeeds");

    assert_eq!(report.executed, plan.len());
    assert_eq!(report.tolerated.len(), 1);
    assert!(report.tolerated[0].contains("apt-get remove"));
    assert!(reporter.tagged("failure").is_empty());
}

#[tokio::test]
async fn test_verbose_only_changes_output() {
    let plan = openvpn_plan();

    let quiet_host = FakeHost::new().with_stdout("Reading package lists... Done\n");
    let quiet_reporter = RecordingReporter::default();
    run_plan(&quiet_host, &plan, &quiet_reporter, quiet())
        .await
        .expect("run succeeds");

    let loud_host = FakeHost::new().with_stdout("Reading package lists... Done\n");
    let loud_reporter = RecordingReporter::default();
    run_plan(&loud_host, &plan, &loud_reporter, RunOptions { verbose: true })
        .await
        .expect("run succeeds");

    assert_eq!(quiet_host.executed(), loud_host.executed());
    assert!(quiet_reporter.tagged("output").is_empty());
    assert!(!loud_reporter.tagged("output").is_empty());
    assert_eq!(quiet_reporter.tagged("step"), loud_reporter.tagged("step"));
}

#[tokio::test]
async fn test_password_change_marker_emits_hint() {
    let plan = build_plan(
        &answers(SetupProfile::AddOpenVpnUsers, &["c1"]),
        &config(),
        PlanOptions::default(),
    )
    .expect("plan");
    let host = FakeHost::new().failing_on(
        "mkdir -p",
        StepResult::failed(
            Some(1),
            format!("WARNING: Your password has expired.\n{PASSWORD_CHANGE_MARKER}\n"),
        ),
    );
    let reporter = RecordingReporter::default();

    run_plan(&host, &plan, &reporter, quiet())
        .await
        .expect_err("run must fail");

    assert_eq!(reporter.tagged("hint"), [PASSWORD_CHANGE_HINT]);
}

#[tokio::test]
async fn test_hint_is_informational_on_success() {
    let plan = build_plan(
        &answers(SetupProfile::AddOpenVpnUsers, &["c1"]),
        &config(),
        PlanOptions::default(),
    )
    .expect("plan");
    let host = FakeHost::new().failing_on(
        "mkdir -p",
        StepResult {
            success: true,
            exit_code: Some(0),
            stdout: String::new(),
            stderr: PASSWORD_CHANGE_MARKER.to_string(),
        },
    );
    let reporter = RecordingReporter::default();

    let report = run_plan(&host, &plan, &reporter, quiet())
        .await
        .expect("run succeeds");

    assert_eq!(report.executed, plan.len());
    assert_eq!(reporter.tagged("hint").len(), 1);
}
