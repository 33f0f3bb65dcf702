use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn refminer(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("refminer").expect("binary exists");
    cmd.current_dir(cwd)
        .env_remove("RUST_LOG")
        // Never reach the network: unknown projects resolve to a missing local remote.
        .env("REFMINER_REMOTE_BASE_URL", format!("file://{}/remote", cwd.display()));
    cmd
}

fn git(dir: &Path, args: &[&str]) {
    let status = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        status.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&status.stderr)
    );
}

fn write(dir: &Path, file: &str, content: &str) {
    let path = dir.join(file);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn commit(dir: &Path, message: &str) {
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-q", "--allow-empty", "-m", message]);
}

/// A repository with one test-only refactor, one mixed refactor and one unrelated commit.
fn seed_repository(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    git(dir, &["init", "-q"]);
    git(dir, &["config", "user.email", "dev@example.com"]);
    git(dir, &["config", "user.name", "Dev"]);
    git(dir, &["config", "commit.gpgsign", "false"]);

    write(dir, "src/Cart.java", "class Cart {}\n");
    write(dir, "src/CartTest.java", "one\ntwo\n");
    commit(dir, "Initial import");

    write(dir, "src/CartTest.java", "one\nTWO\nthree\n");
    commit(dir, "Refactoring the cart tests");

    write(dir, "src/CartTest.java", "one\n");
    write(dir, "src/Cart.java", "class Cart { int n; }\n");
    commit(dir, "refactor: split test fixtures");

    write(dir, "src/Cart.java", "class Cart { long n; }\n");
    commit(dir, "Widen counter");
}

fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    seed_repository(&temp.path().join("repos/acme/cart"));
    std::fs::write(
        temp.path().join("projects.csv"),
        "Project Name,Stars\nacme/cart,10\nacme/gone,3\n",
    )
    .unwrap();
    temp
}

// ---------------------------------------------------------------------------
// CLI smoke tests
// ---------------------------------------------------------------------------

#[test]
fn test_help_output() {
    let temp = TempDir::new().unwrap();
    refminer(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("collect"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("sample"));
}

#[test]
fn test_unknown_command_fails() {
    let temp = TempDir::new().unwrap();
    refminer(temp.path()).arg("complexity").assert().failure();
}

// ---------------------------------------------------------------------------
// collect
// ---------------------------------------------------------------------------

#[test]
fn test_collect_writes_reports() {
    let temp = workspace();
    let output = refminer(temp.path())
        .args(["-f", "json", "collect", "projects.csv"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["repositories_processed"], 2);
    assert_eq!(summary["refactor_commits"], 2);
    assert_eq!(summary["test_only_commits"], 1);
    assert_eq!(summary["repository_errors"][0], format!("file://{}/remote/acme/gone", temp.path().display()));

    let refactor = std::fs::read_to_string(temp.path().join("output/refactor_commits_projects.csv")).unwrap();
    assert!(refactor.starts_with("repository_name,repository_url,commit_id,"));
    assert!(refactor.contains("\"Refactoring the cart tests\n\""));
    assert!(refactor.contains("\"refactor: split test fixtures\n\""));
    assert!(refactor.contains("[src/Cart.java src/CartTest.java]"));
    assert!(!refactor.contains("Widen counter"));

    let test_only = std::fs::read_to_string(
        temp.path().join("output/refactor_commit_only_modified_test_files_projects.csv"),
    )
    .unwrap();
    let rows: Vec<&str> = test_only.lines().collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[1].starts_with("acme/cart,"));
    assert!(rows[1].ends_with(",1,2,1"));

    let errors = std::fs::read_to_string(temp.path().join("error/repository_projects.csv")).unwrap();
    assert_eq!(errors.lines().count(), 1);
    assert!(errors.contains("acme/gone"));
}

#[test]
fn test_collect_custom_directories() {
    let temp = workspace();
    refminer(temp.path())
        .args([
            "collect",
            "projects.csv",
            "--output-dir",
            "reports",
            "--error-dir",
            "failures",
            "--walk-errors",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Refactor Commits: 2"));

    assert!(temp.path().join("reports/refactor_commits_projects.csv").exists());
    assert!(temp.path().join("failures/repository_projects.csv").exists());
    assert!(temp.path().join("failures/commit_projects.csv").exists());
}

#[test]
fn test_collect_other_extension_matches_no_test_files() {
    let temp = workspace();
    let output = refminer(temp.path())
        .args(["-f", "json", "collect", "projects.csv", "--ext", "kt"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["commits_scanned"], 4);
    assert_eq!(summary["refactor_commits"], 0);
    assert_eq!(summary["test_only_commits"], 0);
    assert!(summary["test_only_statistics"].is_null());

    let refactor = std::fs::read_to_string(temp.path().join("output/refactor_commits_projects.csv")).unwrap();
    assert_eq!(refactor.lines().count(), 1);
}

#[test]
fn test_collect_missing_input_fails() {
    let temp = TempDir::new().unwrap();
    refminer(temp.path())
        .args(["collect", "nope.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.csv"));
}

#[test]
fn test_collect_missing_config_fails() {
    let temp = workspace();
    refminer(temp.path())
        .args(["-c", "missing.toml", "collect", "projects.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn test_collect_reads_config_file() {
    let temp = workspace();
    std::fs::write(temp.path().join("refminer.toml"), "[output]\ndir = \"from-config\"\n").unwrap();
    refminer(temp.path())
        .args(["collect", "projects.csv"])
        .assert()
        .success();
    assert!(temp.path().join("from-config/refactor_commits_projects.csv").exists());
}

// ---------------------------------------------------------------------------
// scan
// ---------------------------------------------------------------------------

#[test]
fn test_scan_json_output() {
    let temp = workspace();
    let output = refminer(temp.path())
        .args(["-f", "json", "scan", "--path", "repos/acme/cart", "--name", "acme/cart"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["repository"], "acme/cart");
    assert_eq!(report["commits_scanned"], 4);
    let commits = report["commits"].as_array().unwrap();
    assert_eq!(commits.len(), 2);
    // Newest first.
    assert_eq!(commits[0]["subject"], "refactor: split test fixtures");
    assert_eq!(commits[0]["test_only"], false);
    assert_eq!(commits[1]["test_only"], true);
}

#[test]
fn test_scan_markdown_output() {
    let temp = workspace();
    refminer(temp.path())
        .args(["-f", "markdown", "scan", "-p", "repos/acme/cart"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Commits"))
        .stdout(predicate::str::contains("Refactoring the cart tests"));
}

#[test]
fn test_scan_not_a_repository() {
    let temp = TempDir::new().unwrap();
    refminer(temp.path())
        .args(["scan", "--path", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot open repository"));
}

// ---------------------------------------------------------------------------
// sample
// ---------------------------------------------------------------------------

const TEST_ONLY_REPORT: &str = "refactor_commit_only_modified_test_files_projects.csv";

fn test_only_report(dir: &Path, rows: usize) {
    let mut content = String::from(
        "repository_name,repository_url,commit_id,parent_commit_id,commit_url,commit_date,\
         changed_files_count,total_addition_lines,total_deletions_lines\n",
    );
    for i in 0..rows {
        content.push_str(&format!(
            "acme/cart,https://github.com/acme/cart,c{i},p{i},https://github.com/acme/cart/commit/c{i},\
             2024-01-01T00:00:00+00:00,1,{i},0\n"
        ));
    }
    write(dir, &format!("output/{TEST_ONLY_REPORT}"), &content);
}

#[test]
fn test_sample_writes_csv_and_ndjson() {
    let temp = TempDir::new().unwrap();
    test_only_report(temp.path(), 30);

    let output = refminer(temp.path())
        .args([
            "-f",
            "json",
            "sample",
            &format!("output/{TEST_ONLY_REPORT}"),
            "--size",
            "10",
            "--seed",
            "5",
            "--ndjson",
            "output/sample.ndjson",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["rows_available"], 30);
    assert_eq!(summary["rows_sampled"], 10);
    assert_eq!(summary["seed"], 5);

    let sample = std::fs::read_to_string(temp.path().join(format!("output/sampling_{TEST_ONLY_REPORT}"))).unwrap();
    assert_eq!(sample.lines().count(), 11);
    assert!(sample.starts_with("repository_name,"));

    let ndjson = std::fs::read_to_string(temp.path().join("output/sample.ndjson")).unwrap();
    assert_eq!(ndjson.lines().count(), 10);
    assert!(ndjson.lines().all(|l| l.contains("\"owner\":\"acme\",\"repository\":\"cart\"")));

    // A second run with the same seed draws the same rows.
    refminer(temp.path())
        .args(["sample", &format!("output/{TEST_ONLY_REPORT}"), "--size", "10", "--seed", "5"])
        .assert()
        .success();
    let again = std::fs::read_to_string(temp.path().join(format!("output/sampling_{TEST_ONLY_REPORT}"))).unwrap();
    assert_eq!(again, sample);
}

#[test]
fn test_sample_rejects_refactor_report() {
    let temp = workspace();
    refminer(temp.path()).args(["collect", "projects.csv"]).assert().success();
    refminer(temp.path())
        .args(["sample", "output/refactor_commits_projects.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a test-only report"));
}
