//! Implementation of the `htpbuild locate` command.

use anyhow::{Context, Result};

use htpbuild_lib::{BootstrapConfig, Descriptor, Orchestrator, Presence};

use crate::output::{print_success, print_warning};

/// Returns `true` when the artifact is present and usable.
pub fn cmd_locate(config: BootstrapConfig) -> Result<bool> {
  let orchestrator = Orchestrator::new(config, Descriptor::libhtp()).context("Invalid dependency descriptor")?;
  let artifact = orchestrator.paths().artifact.display().to_string();

  let presence = orchestrator
    .locate()
    .with_context(|| format!("Failed to check {}", artifact))?;

  match presence {
    Presence::Present => {
      print_success(&format!("Artifact present: {}", artifact));
      Ok(true)
    }
    Presence::Absent => {
      print_warning(&format!("Artifact absent: {}", artifact));
      Ok(false)
    }
    Presence::Stale(reason) => {
      print_warning(&format!("Artifact stale ({}): {}", reason, artifact));
      Ok(false)
    }
  }
}
