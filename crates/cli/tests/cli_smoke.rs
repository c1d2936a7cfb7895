//! CLI smoke tests for htpbuild.
//!
//! These tests verify that every command runs against an isolated source root
//! and returns the appropriate exit code.

use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

const UNPACK_DIR: &str = "ironbee-libhtp-e5ea6e9";

/// Get a Command for the htpbuild binary with a clean environment.
fn htpbuild_cmd(root: &Path) -> Command {
  let mut cmd = cargo_bin_cmd!("htpbuild");
  cmd
    .env_remove("HTPBUILD_ROOT")
    .env_remove("HTPBUILD_HOST_OS")
    .env_remove("HTPBUILD_STRICT")
    .env_remove("HTPBUILD_NO_LOCK")
    .env_remove("RUST_LOG")
    .arg("--root")
    .arg(root);
  cmd
}

/// Create a source root whose artifact already exists.
fn built_root() -> TempDir {
  let temp = TempDir::new().unwrap();
  let libs = temp.path().join(UNPACK_DIR).join("htp").join(".libs");
  std::fs::create_dir_all(&libs).unwrap();
  std::fs::write(libs.join("libhtp.a"), b"!<arch>\n").unwrap();
  temp
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  cargo_bin_cmd!("htpbuild")
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  cargo_bin_cmd!("htpbuild")
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("htpbuild"));
}

#[test]
fn subcommand_help_works() {
  for cmd in &["ensure", "locate", "plan", "flags", "info"] {
    cargo_bin_cmd!("htpbuild")
      .arg(cmd)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("Usage"));
  }
}

// =============================================================================
// locate
// =============================================================================

#[test]
fn locate_fails_when_artifact_absent() {
  let temp = TempDir::new().unwrap();
  htpbuild_cmd(temp.path())
    .arg("locate")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Artifact absent"));
}

#[test]
fn locate_succeeds_when_artifact_present() {
  let temp = built_root();
  htpbuild_cmd(temp.path())
    .arg("locate")
    .assert()
    .success()
    .stdout(predicate::str::contains("Artifact present"));
}

#[test]
fn strict_locate_rejects_empty_artifact() {
  let temp = built_root();
  let artifact = temp.path().join(UNPACK_DIR).join("htp").join(".libs").join("libhtp.a");
  std::fs::write(&artifact, b"").unwrap();

  htpbuild_cmd(temp.path())
    .args(["--strict", "locate"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("stale"));
}

// =============================================================================
// ensure
// =============================================================================

#[test]
fn ensure_without_archive_fails() {
  let temp = TempDir::new().unwrap();
  htpbuild_cmd(temp.path())
    .arg("ensure")
    .assert()
    .failure()
    .stderr(predicate::str::contains("source archive not found"));

  assert!(!temp.path().join(UNPACK_DIR).exists());
}

#[test]
fn ensure_reuses_existing_artifact() {
  let temp = built_root();
  htpbuild_cmd(temp.path())
    .arg("ensure")
    .assert()
    .success()
    .stdout(predicate::str::contains("already built"))
    .stdout(predicate::str::contains("-lz"));
}

#[test]
fn ensure_json_reports_state() {
  let temp = built_root();
  let output = htpbuild_cmd(temp.path())
    .args(["ensure", "--format", "json"])
    .output()
    .unwrap();

  assert!(output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["state"], "reused");
  assert!(json["inputs"]["extra_objects"].is_array());
}

// =============================================================================
// plan / flags / info
// =============================================================================

#[test]
fn plan_lists_autotools_steps() {
  let temp = TempDir::new().unwrap();
  htpbuild_cmd(temp.path())
    .arg("plan")
    .assert()
    .success()
    .stdout(predicate::str::contains("autogen.sh -i"))
    .stdout(predicate::str::contains("CFLAGS=-fPIC"))
    .stdout(predicate::str::contains("make"));
}

#[test]
fn plan_shows_scripts_relative_to_source_dir() {
  let temp = TempDir::new().unwrap();
  htpbuild_cmd(temp.path())
    .arg("plan")
    .assert()
    .success()
    .stdout(predicate::str::contains("&& ./autogen.sh -i)"))
    .stdout(predicate::str::contains("&& ./configure CFLAGS=-fPIC)"));
}

#[test]
#[cfg(unix)]
fn plan_fails_when_artifact_cannot_be_checked() {
  let temp = TempDir::new().unwrap();
  // A file where the unpack directory should be makes the lookup fail with ENOTDIR.
  std::fs::write(temp.path().join(UNPACK_DIR), b"not a directory").unwrap();

  htpbuild_cmd(temp.path())
    .arg("plan")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to check"));
}

#[test]
fn plan_has_no_cargo_format() {
  let temp = TempDir::new().unwrap();
  htpbuild_cmd(temp.path())
    .args(["plan", "--format", "cargo"])
    .assert()
    .failure();
}

#[test]
fn flags_cargo_format_links_static_archive() {
  let temp = TempDir::new().unwrap();
  htpbuild_cmd(temp.path())
    .args(["--host", "Linux", "flags", "--format", "cargo"])
    .assert()
    .success()
    .stdout(predicate::str::contains("cargo:rustc-link-lib=static=htp"))
    .stdout(predicate::str::contains("cargo:rustc-link-lib=z"))
    .stdout(predicate::str::contains("iconv").not());
}

#[test]
fn flags_add_iconv_off_linux() {
  let temp = TempDir::new().unwrap();
  htpbuild_cmd(temp.path())
    .args(["--host", "Darwin", "flags"])
    .assert()
    .success()
    .stdout(predicate::str::contains("-liconv"));
}

#[test]
fn info_shows_release_and_host() {
  let temp = TempDir::new().unwrap();
  htpbuild_cmd(temp.path())
    .args(["--host", "FreeBSD", "info"])
    .assert()
    .success()
    .stdout(predicate::str::contains("libhtp 0.2.5 (e5ea6e9)"))
    .stdout(predicate::str::contains("freebsd"))
    .stdout(predicate::str::contains("-liconv"));
}
