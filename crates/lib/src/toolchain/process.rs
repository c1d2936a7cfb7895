//! Process-backed toolchain.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info, warn};

use crate::error::BootstrapError;
use crate::toolchain::{Invocation, Toolchain, unpack};

/// Runs plan steps on the host: tarballs are extracted in-process, commands
/// are spawned and waited on.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemToolchain;

impl Toolchain for SystemToolchain {
  fn unpack(&self, archive: &Path, into: &Path) -> Result<(), BootstrapError> {
    unpack::unpack_tarball(archive, into)
  }

  fn run(&self, invocation: &Invocation) -> Result<(), BootstrapError> {
    let program = invocation.program_name();
    info!(phase = %invocation.phase, program = %program, "running toolchain step");

    let mut command = Command::new(&invocation.program);
    command.args(&invocation.args);
    if let Some(cwd) = &invocation.cwd {
      command.current_dir(cwd);
    }

    debug!(args = ?invocation.args, cwd = ?invocation.cwd, "spawning process");

    let output = command.output().map_err(|source| BootstrapError::ToolSpawn {
      phase: invocation.phase,
      program: program.clone(),
      source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
      if !stdout.trim().is_empty() {
        debug!(stdout = %stdout.trim_end(), "command stdout");
      }
      if !stderr.trim().is_empty() {
        warn!(phase = %invocation.phase, stderr = %stderr.trim_end(), "command stderr");
      }

      return Err(BootstrapError::ToolFailed {
        phase: invocation.phase,
        program,
        code: output.status.code(),
      });
    }

    if !stdout.trim().is_empty() {
      debug!(stdout = %stdout.trim_end(), "command output");
    }
    if !stderr.trim().is_empty() {
      debug!(stderr = %stderr.trim_end(), "command stderr");
    }

    Ok(())
  }
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
  use super::*;
  use crate::toolchain::Phase;
  use crate::util::testutil::shell_script;
  use tempfile::TempDir;

  #[test]
  fn successful_command() {
    let (program, args) = shell_script("exit 0");
    let invocation = Invocation::new(Phase::Bootstrap, program).args(args);

    SystemToolchain.run(&invocation).unwrap();
  }

  #[test]
  fn failure_reports_phase_and_exit_code() {
    let (program, args) = shell_script("exit 7");
    let invocation = Invocation::new(Phase::Configure, program).args(args);

    let err = SystemToolchain.run(&invocation).unwrap_err();

    match err {
      BootstrapError::ToolFailed { phase, program, code } => {
        assert_eq!(phase, Phase::Configure);
        assert_eq!(program, "/bin/sh");
        assert_eq!(code, Some(7));
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn missing_program_is_a_spawn_error() {
    let invocation = Invocation::new(Phase::Compile, "/nonexistent/htpbuild-make");
    let err = SystemToolchain.run(&invocation).unwrap_err();
    assert!(matches!(
      err,
      BootstrapError::ToolSpawn {
        phase: Phase::Compile,
        ..
      }
    ));
  }

  #[test]
  fn runs_in_invocation_cwd_without_moving_the_process() {
    let temp = TempDir::new().unwrap();
    let before = std::env::current_dir().unwrap();

    let (program, args) = shell_script("touch cwd_marker");
    let invocation = Invocation::new(Phase::Compile, program).args(args).cwd(temp.path());
    SystemToolchain.run(&invocation).unwrap();

    assert!(temp.path().join("cwd_marker").exists());
    assert_eq!(std::env::current_dir().unwrap(), before);
  }
}
