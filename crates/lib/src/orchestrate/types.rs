//! Result types for orchestration.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::linker::LinkerInputs;

/// How the artifact came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildState {
  /// Found on disk; no toolchain step ran.
  Reused,
  /// Produced by running the toolchain plan.
  Built,
}

impl fmt::Display for BuildState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildState::Reused => write!(f, "reused"),
      BuildState::Built => write!(f, "built"),
    }
  }
}

/// Result of a successful orchestration.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
  pub state: BuildState,
  pub artifact: PathBuf,
  pub inputs: LinkerInputs,
}
