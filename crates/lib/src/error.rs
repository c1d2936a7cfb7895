//! Error types for the bootstrap.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::build_lock::BuildLockError;
use crate::toolchain::Phase;

/// Errors that abort the bootstrap.
///
/// None of these are recovered locally: the enclosing build must stop before
/// compiling against a missing or partial artifact.
#[derive(Debug, Error)]
pub enum BootstrapError {
  /// The vendored source tarball is absent.
  #[error("source archive not found: {path} (the dependency was never vendored)")]
  MissingSourceArchive { path: PathBuf },

  /// An external toolchain step exited unsuccessfully.
  #[error("{phase} step failed with exit code {code:?}: {program}")]
  ToolFailed {
    phase: Phase,
    program: String,
    code: Option<i32>,
  },

  /// An external toolchain step could not be started.
  #[error("failed to run {program} for the {phase} step: {source}")]
  ToolSpawn {
    phase: Phase,
    program: String,
    #[source]
    source: io::Error,
  },

  /// A presence check failed for a reason other than "does not exist".
  #[error("cannot access {path}: {source}")]
  FilesystemAccess {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// A descriptor or configuration path is unusable.
  #[error("invalid path: {0}")]
  InvalidPath(String),

  /// The tarball could not be decompressed or extracted.
  #[error("failed to unpack {archive}: {source}")]
  Unpack {
    archive: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The vendored tarball does not match the pinned digest.
  #[error("checksum mismatch for {archive}: expected {expected}, got {actual}")]
  ChecksumMismatch {
    archive: PathBuf,
    expected: String,
    actual: String,
  },

  /// An entry occupies the artifact path but cannot be used or replaced.
  #[error("unusable artifact at {path}: {reason}")]
  StaleArtifact { path: PathBuf, reason: String },

  /// Every step succeeded but the artifact is still not usable.
  #[error("build finished but {path} was not produced")]
  ArtifactMissing { path: PathBuf },

  #[error(transparent)]
  Lock(#[from] BuildLockError),
}
