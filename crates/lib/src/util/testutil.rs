//! Test utilities for htpbuild-lib.
//!
//! A recording toolchain that stands in for autotools, plus helpers for
//! building tarballs and shell invocations.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::consts::STATIC_ARCHIVE_MAGIC;
use crate::error::BootstrapError;
use crate::toolchain::{Invocation, Phase, Toolchain};

/// A toolchain call captured by [`RecordingToolchain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
  Unpack { archive: PathBuf, into: PathBuf },
  Run(Invocation),
}

impl Recorded {
  pub fn phase(&self) -> Phase {
    match self {
      Recorded::Unpack { .. } => Phase::Unpack,
      Recorded::Run(invocation) => invocation.phase,
    }
  }
}

/// Records every call instead of touching the host.
///
/// When an artifact path is configured the compile step writes a minimal
/// static archive there, mimicking a successful `make`.
#[derive(Debug, Default)]
pub struct RecordingToolchain {
  calls: Mutex<Vec<Recorded>>,
  fail_on: Option<Phase>,
  produces: Option<PathBuf>,
}

impl RecordingToolchain {
  pub fn new() -> Self {
    Self::default()
  }

  /// Fail the given phase with exit code 1.
  pub fn fail_on(mut self, phase: Phase) -> Self {
    self.fail_on = Some(phase);
    self
  }

  /// Write a static archive to `artifact` when the compile step runs.
  pub fn producing(mut self, artifact: &Path) -> Self {
    self.produces = Some(artifact.to_path_buf());
    self
  }

  pub fn calls(&self) -> Vec<Recorded> {
    self.calls.lock().unwrap().clone()
  }

  fn check(&self, phase: Phase, program: &str) -> Result<(), BootstrapError> {
    if self.fail_on == Some(phase) {
      return Err(BootstrapError::ToolFailed {
        phase,
        program: program.to_string(),
        code: Some(1),
      });
    }
    Ok(())
  }
}

impl Toolchain for RecordingToolchain {
  fn unpack(&self, archive: &Path, into: &Path) -> Result<(), BootstrapError> {
    self.calls.lock().unwrap().push(Recorded::Unpack {
      archive: archive.to_path_buf(),
      into: into.to_path_buf(),
    });
    self.check(Phase::Unpack, "tar")
  }

  fn run(&self, invocation: &Invocation) -> Result<(), BootstrapError> {
    self.calls.lock().unwrap().push(Recorded::Run(invocation.clone()));
    self.check(invocation.phase, &invocation.program_name())?;

    if invocation.phase == Phase::Compile
      && let Some(artifact) = &self.produces
    {
      write_static_archive(artifact);
    }
    Ok(())
  }
}

/// Write a file that passes the static archive header check.
pub fn write_static_archive(path: &Path) {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }
  std::fs::write(path, STATIC_ARCHIVE_MAGIC).unwrap();
}

/// Write a gzip tarball at `path` with `(name, contents, mode)` entries.
pub fn write_tarball(path: &Path, entries: &[(&str, &str, u32)]) {
  let file = File::create(path).unwrap();
  let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

  for (name, contents, mode) in entries {
    let mut header = tar::Header::new_gnu();
    header.set_size(contents.len() as u64);
    header.set_mode(*mode);
    header.set_mtime(315532800);
    header.set_cksum();
    builder.append_data(&mut header, name, contents.as_bytes()).unwrap();
  }

  builder.into_inner().unwrap().finish().unwrap();
}

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_script(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

/// Write an executable shell script.
#[cfg(unix)]
pub fn write_script(path: &Path, body: &str) {
  use std::os::unix::fs::PermissionsExt;

  std::fs::write(path, format!("#!/bin/sh\nset -e\n{}", body)).unwrap();
  std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}
