//! Gzip tarball extraction, equivalent to `tar -zxf <archive>` run in `into`.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::{debug, info};

use crate::error::BootstrapError;

/// Extract `archive` into `into`, overwriting files that already exist.
///
/// Entries keep their permission bits so generated scripts stay executable.
/// Entries that would land outside `into` are skipped by the `tar` crate.
pub fn unpack_tarball(archive: &Path, into: &Path) -> Result<(), BootstrapError> {
  info!(archive = ?archive, into = ?into, "unpacking source archive");

  let file = File::open(archive).map_err(|source| match source.kind() {
    io::ErrorKind::NotFound => BootstrapError::MissingSourceArchive {
      path: archive.to_path_buf(),
    },
    _ => BootstrapError::Unpack {
      archive: archive.to_path_buf(),
      source,
    },
  })?;

  let mut tarball = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
  tarball.set_preserve_mtime(true);
  tarball.set_overwrite(true);
  tarball.unpack(into).map_err(|source| BootstrapError::Unpack {
    archive: archive.to_path_buf(),
    source,
  })?;

  debug!(into = ?into, "unpack complete");
  Ok(())
}
