use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::{json, Value};
use tempfile::TempDir;

const PERIOD: &str = "2025-01";
const SEED_HEX: &str = "00112233445566778899aabbccddeeff";

const SNAPSHOT: &str = "shard,user_id,weight\n\
0,3f2504e0-4f89-11d3-9a0c-0305e82c0000,1\n\
0,3f2504e0-4f89-11d3-9a0c-0305e82c0003,4\n\
0,3f2504e0-4f89-11d3-9a0c-0305e82c0006,7\n\
0,3f2504e0-4f89-11d3-9a0c-0305e82c0009,10\n\
1,3f2504e0-4f89-11d3-9a0c-0305e82c0001,2\n\
1,3f2504e0-4f89-11d3-9a0c-0305e82c0004,5\n\
1,3f2504e0-4f89-11d3-9a0c-0305e82c0007,8\n\
2,3f2504e0-4f89-11d3-9a0c-0305e82c0002,3\n\
2,3f2504e0-4f89-11d3-9a0c-0305e82c0005,6\n\
2,3f2504e0-4f89-11d3-9a0c-0305e82c0008,9\n";
const FILE_HASH: &str = "dd9897e63231c71892743fe5d78027f4195e3c936e74d100f38b6936f175a088";
const CANONICAL_HASH: &str = "ab25766d991a0eab7549d239126b5d294589c103332aeac9d22ffaab008c2d71";

fn artifact(hash: &str, seed: Option<&str>, primary: &[&str], alternates: &[&str]) -> Value {
    let mut commit = json!({ "seed_hash_hex": "00" });
    if let Some(seed) = seed {
        commit["seed_hex"] = json!(seed);
    }
    json!({
        "period": PERIOD,
        "snapshot_hash_hex": hash,
        "totals": { "users": 10, "entries": 55 },
        "k_primary": primary.len(),
        "k_alternates": alternates.len(),
        "winners_primary": primary.iter().map(|a| json!({ "alias": a })).collect::<Vec<_>>(),
        "winners_alternates": alternates.iter().map(|a| json!({ "alias": a })).collect::<Vec<_>>(),
        "commit": commit
    })
}

fn expected_winners() -> Value {
    artifact(
        FILE_HASH,
        Some(SEED_HEX),
        &["3f2504e0…0007", "3f2504e0…0006", "3f2504e0…0005"],
        &["3f2504e0…0009"],
    )
}

/// Writes `{dir}/{PERIOD}/winners.json` and `{dir}/{PERIOD}/snapshot.csv`.
fn publish(dir: &Path, winners: &Value, snapshot: &str) {
    let period_dir = dir.join(PERIOD);
    fs::create_dir_all(&period_dir).unwrap();
    fs::write(
        period_dir.join("winners.json"),
        serde_json::to_vec_pretty(winners).unwrap(),
    )
    .unwrap();
    fs::write(period_dir.join("snapshot.csv"), snapshot).unwrap();
}

fn drawaudit(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_drawaudit"))
        .args(args)
        .env_remove("DRAWAUDIT_BASE")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn audit_published(winners: &Value, extra: &[&str]) -> Output {
    let dir = TempDir::new().unwrap();
    publish(dir.path(), winners, SNAPSHOT);
    let base = dir.path().to_str().unwrap();
    let mut args = vec!["audit", "--base", base, "--period", PERIOD];
    args.extend_from_slice(extra);
    drawaudit(&args)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn hash_prints_file_digest() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snapshot.csv");
    fs::write(&path, SNAPSHOT).unwrap();

    let output = drawaudit(&["hash", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output).trim(), FILE_HASH);
}

#[test]
fn canonical_hash_prints_stream_digest() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snapshot.csv");
    fs::write(&path, SNAPSHOT).unwrap();

    let output = drawaudit(&[
        "canonical-hash",
        path.to_str().unwrap(),
        "--period",
        PERIOD,
    ]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output).trim(), CANONICAL_HASH);
}

#[test]
fn integrity_level_passes_with_file_digest() {
    let output = audit_published(&expected_winners(), &["--level", "1"]);
    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("== Draw Audit =="));
    assert!(text.contains("[Level 1] Snapshot integrity"));
    assert!(text.contains("✅ MATCH"));
    assert!(!text.contains("[Level 2]"));
}

#[test]
fn integrity_mismatch_exits_two() {
    let winners = artifact(CANONICAL_HASH, Some(SEED_HEX), &[], &[]);
    let output = audit_published(&winners, &["--quiet"]);
    assert_eq!(output.status.code(), Some(2));
    let text = stdout(&output);
    assert!(!text.contains("== Draw Audit =="));
    assert!(text.contains("❌ MISMATCH"));
    assert!(text.contains("earlier level failed"));
}

#[test]
fn coherence_level_passes_with_canonical_digest() {
    let winners = artifact(CANONICAL_HASH, None, &[], &[]);
    let output = audit_published(&winners, &["--level", "2"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("✅ canonical snapshot hash matches"));
}

#[test]
fn coherence_mismatch_exits_three() {
    let output = audit_published(&expected_winners(), &["--level", "2"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stdout(&output).contains("❌ canonical snapshot hash mismatch"));
}

#[test]
fn reproduction_matches_published_winners() {
    let output = audit_published(&expected_winners(), &["--level", "3"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("✅ aliases match"));
}

#[test]
fn missing_seed_is_skipped_by_default() {
    let winners = artifact(FILE_HASH, None, &["3f2504e0…0007"], &[]);
    let output = audit_published(&winners, &["--level", "3"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("seed is not revealed yet"));
}

#[test]
fn missing_seed_policy_error_exits_four() {
    let winners = artifact(FILE_HASH, None, &["3f2504e0…0007"], &[]);
    let output = audit_published(&winners, &["--level", "3", "--on-missing-seed", "error"]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn missing_seed_policy_warn_succeeds() {
    let winners = artifact(FILE_HASH, None, &["3f2504e0…0007"], &[]);
    let output = audit_published(&winners, &["--level", "3", "--on-missing-seed", "warn"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("⚠️"));
}

#[test]
fn seed_override_reproduces_without_reveal() {
    let winners = artifact(
        FILE_HASH,
        None,
        &["3f2504e0…0007", "3f2504e0…0006", "3f2504e0…0005"],
        &["3f2504e0…0009"],
    );
    let output = audit_published(
        &winners,
        &["--level", "3", "--seed-hex", SEED_HEX, "--on-missing-seed", "error"],
    );
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn size_mismatch_exits_five() {
    let mut winners = expected_winners();
    winners["winners_alternates"] = json!([]);
    let output = audit_published(&winners, &["--level", "3"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stdout(&output).contains("size mismatch (computed 4 vs published 3)"));
}

#[test]
fn content_mismatch_exits_six() {
    let winners = artifact(
        FILE_HASH,
        Some(SEED_HEX),
        &["3f2504e0…0007", "3f2504e0…0005", "3f2504e0…0006"],
        &["3f2504e0…0009"],
    );
    let output = audit_published(&winners, &["--level", "3"]);
    assert_eq!(output.status.code(), Some(6));
    let text = stdout(&output);
    assert!(text.contains("idx 1: computed=3f2504e0…0006 published=3f2504e0…0005"));
    assert!(text.contains("idx 2: computed=3f2504e0…0005 published=3f2504e0…0006"));
}

#[test]
fn null_published_alias_is_a_content_mismatch() {
    let mut winners = expected_winners();
    winners["winners_primary"][2] = json!({ "alias": null });
    let output = audit_published(&winners, &["--level", "3"]);
    assert_eq!(output.status.code(), Some(6));
    assert!(stdout(&output).contains("idx 2: computed=3f2504e0…0005 published=null"));
}

#[test]
fn keep_going_runs_every_level_but_reports_first_failure() {
    let output = audit_published(&expected_winners(), &["--keep-going", "--quiet"]);
    assert_eq!(output.status.code(), Some(3));
    let text = stdout(&output);
    assert!(text.contains("✅ MATCH"));
    assert!(text.contains("❌ canonical snapshot hash mismatch"));
    assert!(text.contains("✅ aliases match"));
}

#[test]
fn json_report_is_machine_readable() {
    let output = audit_published(&expected_winners(), &["--level", "3", "--json"]);
    assert_eq!(output.status.code(), Some(0));
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["exit_code"], 0);
    assert_eq!(report["report"]["period"], PERIOD);
    assert_eq!(report["report"]["integrity"]["state"], "skipped");
    assert!(report["audited_at"].as_str().is_some());
    assert!(report["sources"]["winners"]
        .as_str()
        .unwrap()
        .ends_with("winners.json"));
}

#[test]
fn explicit_paths_require_both_inputs() {
    let output = drawaudit(&["audit", "--winners", "winners.json"]);
    assert_eq!(output.status.code(), Some(1));
    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("provide BOTH --winners and --snapshot"));
}

#[test]
fn unreadable_input_exits_one() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().to_str().unwrap();
    let output = drawaudit(&["audit", "--base", base, "--period", PERIOD]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error: failed to read"));
}

#[test]
fn malformed_snapshot_exits_one() {
    let dir = TempDir::new().unwrap();
    publish(dir.path(), &expected_winners(), "shard,user_id\n1,a\n");
    let base = dir.path().to_str().unwrap();
    let output = drawaudit(&["audit", "--base", base, "--period", PERIOD, "--level", "2"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("must contain columns"));
}
