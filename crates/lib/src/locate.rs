//! Artifact locator.
//!
//! Existence of the static archive is the only build state the bootstrap
//! tracks. A missing entry is the normal "must build" signal; any other
//! filesystem failure is fatal so that a permission problem is never mistaken
//! for an absent artifact.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::STATIC_ARCHIVE_MAGIC;
use crate::error::BootstrapError;

/// How much evidence an existing entry needs before it is reused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
  /// Any entry at the path counts, file or directory.
  #[default]
  Exists,
  /// The entry must be a regular file starting with the `ar` header.
  ArchiveHeader,
}

/// Result of looking for the artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
  Present,
  Absent,
  /// Something occupies the path but fails the freshness policy.
  Stale(StaleReason),
}

impl Presence {
  pub fn is_present(&self) -> bool {
    matches!(self, Presence::Present)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
  NotAFile,
  Empty,
  BadHeader,
}

impl std::fmt::Display for StaleReason {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      StaleReason::NotAFile => write!(f, "not a regular file"),
      StaleReason::Empty => write!(f, "zero-length file"),
      StaleReason::BadHeader => write!(f, "missing static archive header"),
    }
  }
}

/// Report whether any filesystem entry exists at `path`.
pub fn locate(path: &Path) -> Result<Presence, BootstrapError> {
  locate_with(path, Freshness::Exists)
}

/// Report whether a usable artifact exists at `path` under `freshness`.
pub fn locate_with(path: &Path, freshness: Freshness) -> Result<Presence, BootstrapError> {
  if path.as_os_str().is_empty() {
    return Err(BootstrapError::InvalidPath("artifact path is empty".to_string()));
  }

  let metadata = match fs::metadata(path) {
    Ok(metadata) => metadata,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      debug!(path = ?path, "artifact absent");
      return Ok(Presence::Absent);
    }
    Err(source) => return Err(access_error(path, source)),
  };

  if freshness == Freshness::Exists {
    debug!(path = ?path, "artifact present");
    return Ok(Presence::Present);
  }

  if !metadata.is_file() {
    return Ok(Presence::Stale(StaleReason::NotAFile));
  }
  if metadata.len() == 0 {
    return Ok(Presence::Stale(StaleReason::Empty));
  }

  let mut header = Vec::with_capacity(STATIC_ARCHIVE_MAGIC.len());
  File::open(path)
    .and_then(|f| f.take(STATIC_ARCHIVE_MAGIC.len() as u64).read_to_end(&mut header))
    .map_err(|source| access_error(path, source))?;

  if header != STATIC_ARCHIVE_MAGIC {
    return Ok(Presence::Stale(StaleReason::BadHeader));
  }

  debug!(path = ?path, "artifact present with archive header");
  Ok(Presence::Present)
}

fn access_error(path: &Path, source: io::Error) -> BootstrapError {
  BootstrapError::FilesystemAccess {
    path: path.to_path_buf(),
    source,
  }
}
