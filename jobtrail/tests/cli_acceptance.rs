//! Acceptance tests driving the real `jobtrail` binary against a
//! sandboxed XDG environment.

use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_data: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_data = base.join("xdg-data");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_data).expect("failed to create XDG_DATA_HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_data,
            xdg_config,
            xdg_state,
        }
    }

    fn db_path(&self) -> PathBuf {
        self.xdg_data.join("jobtrail/data.db")
    }
}

fn run_cli(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("jobtrail"));

    Command::new(bin_path)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_DATA_HOME", &env.xdg_data)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute jobtrail: {e}"))
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let rendered_args = args
        .iter()
        .map(|arg| OsString::from(arg).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "jobtrail {rendered_args} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        output.status, stdout, stderr
    );
}

#[test]
fn add_and_list_application_round_trip() {
    let env = CliTestEnv::new();

    let add_args = [
        "application",
        "add",
        "--title",
        "Backend Engineer",
        "--company",
        "Acme",
        "--applied",
        "2024-03-15",
    ];
    let output = run_cli(&env, &add_args);
    assert_success(&add_args, &output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Added application"));
    // The applied date triggers an automatic follow-up reminder
    assert!(stdout.contains("Follow-up reminder due"));

    assert!(
        env.db_path().exists(),
        "database file should exist at {}",
        env.db_path().display()
    );

    let list_args = ["application", "list"];
    let output = run_cli(&env, &list_args);
    assert_success(&list_args, &output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Backend Engineer"));
    assert!(stdout.contains("Acme"));
    assert!(stdout.contains("Applied"));

    // The follow-up reminder is a due-dated task
    let task_args = ["task", "list", "--reminders"];
    let output = run_cli(&env, &task_args);
    assert_success(&task_args, &output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Follow up on Backend Engineer at Acme"));
}

#[test]
fn stats_report_counts_applications() {
    let env = CliTestEnv::new();

    for company in ["Acme", "Globex"] {
        let args = [
            "application",
            "add",
            "--title",
            "Engineer",
            "--company",
            company,
            "--no-follow-up",
        ];
        let output = run_cli(&env, &args);
        assert_success(&args, &output);
    }

    let args = ["stats", "--period", "month", "--format", "json"];
    let output = run_cli(&env, &args);
    assert_success(&args, &output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("stats json parses");

    assert_eq!(json["totals"]["applications"], 2);
    assert_eq!(json["totals"]["active"], 2);
    assert_eq!(
        json["applications_over_time"].as_array().unwrap().len(),
        12,
        "monthly window is always 12 buckets"
    );
}

#[test]
fn duplicate_skill_is_rejected() {
    let env = CliTestEnv::new();

    let args = ["skill", "add", "--name", "Python"];
    let output = run_cli(&env, &args);
    assert_success(&args, &output);

    // Same name, different case: rejected before persistence
    let dup_args = ["skill", "add", "--name", "python"];
    let output = run_cli(&env, &dup_args);
    assert!(
        !output.status.success(),
        "duplicate skill add should fail, stdout:\n{}",
        String::from_utf8_lossy(&output.stdout)
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("already exists"));

    let list_args = ["skill", "list"];
    let output = run_cli(&env, &list_args);
    assert_success(&list_args, &output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("Python").count(), 1);
}

#[test]
fn login_flow_updates_session() {
    let env = CliTestEnv::new();

    let login_args = ["login", "--callback", "token=tok_abc&provider=google"];
    let output = run_cli(&env, &login_args);
    assert_success(&login_args, &output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Signed in as"));

    let output = run_cli(&env, &["whoami"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("session: signed in"));

    // A provider error must not sign anyone in
    let err_args = ["login", "--callback", "error=access_denied"];
    let output = run_cli(&env, &err_args);
    assert!(!output.status.success());

    let output = run_cli(&env, &["logout"]);
    assert_success(&["logout"], &output);
    let output = run_cli(&env, &["whoami"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("signed out"));
}

#[test]
fn activity_feed_reflects_changes() {
    let env = CliTestEnv::new();

    let args = [
        "application",
        "add",
        "--title",
        "Engineer",
        "--company",
        "Acme",
        "--no-follow-up",
    ];
    let output = run_cli(&env, &args);
    assert_success(&args, &output);

    let args = ["activity", "--period", "day", "--format", "json"];
    let output = run_cli(&env, &args);
    assert_success(&args, &output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("activity json parses");

    assert_eq!(json["metrics"]["applications"], 1);
    let items = json["items"].as_array().unwrap();
    assert!(items
        .iter()
        .any(|i| i["title"].as_str().unwrap().contains("Engineer at Acme")));
}
