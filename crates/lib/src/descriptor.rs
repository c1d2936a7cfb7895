//! Dependency descriptor.
//!
//! A `Descriptor` names one vendored release of the native library: which
//! tarball to unpack, which directory the tarball produces and where the
//! static archive lands once `make` has run. Every path the bootstrap touches
//! is derived from the descriptor and a source root, with no hashing or
//! content addressing, so the same descriptor always maps to the same paths.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::LOCK_SUFFIX;
use crate::error::BootstrapError;

/// Immutable metadata for one vendored dependency release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
  name: String,
  version: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  revision: Option<String>,
  archive: String,
  unpack_dir: String,
  include_subdir: String,
  artifact: String,
  link_name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  sha256: Option<String>,
}

impl Descriptor {
  /// The libhtp release shipped with the bindings.
  ///
  /// Despite the 0.2.5 label this is a snapshot of the ironbee master branch
  /// at commit e5ea6e9.
  pub fn libhtp() -> Self {
    Self::builder("libhtp", "0.2.5")
      .revision("e5ea6e9")
      .archive("ironbee-libhtp-0.2.5-291-ge5ea6e9.tar.gz")
      .unpack_dir("ironbee-libhtp-e5ea6e9")
      .include_subdir("htp")
      .artifact("htp/.libs/libhtp.a")
      .link_name("htp")
      .build()
  }

  pub fn builder(name: &str, version: &str) -> DescriptorBuilder {
    DescriptorBuilder {
      name: name.to_string(),
      version: version.to_string(),
      revision: None,
      archive: None,
      unpack_dir: None,
      include_subdir: None,
      artifact: None,
      link_name: None,
      sha256: None,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn version(&self) -> &str {
    &self.version
  }

  pub fn revision(&self) -> Option<&str> {
    self.revision.as_deref()
  }

  /// Tarball file name, relative to the source root.
  pub fn archive(&self) -> &str {
    &self.archive
  }

  /// Directory the tarball extracts to, relative to the source root.
  pub fn unpack_dir(&self) -> &str {
    &self.unpack_dir
  }

  /// Header directory inside the unpack directory.
  pub fn include_subdir(&self) -> &str {
    &self.include_subdir
  }

  /// Static archive location inside the unpack directory, `/`-separated.
  pub fn artifact(&self) -> &str {
    &self.artifact
  }

  /// Library name as passed to the linker (`htp` for `libhtp.a`).
  pub fn link_name(&self) -> &str {
    &self.link_name
  }

  /// Pinned SHA-256 of the tarball, lowercase hex.
  pub fn sha256(&self) -> Option<&str> {
    self.sha256.as_deref()
  }

  /// Resolve every path against `root`.
  pub fn paths(&self, root: &Path) -> Result<DescriptorPaths, BootstrapError> {
    DescriptorPaths::resolve(self, root)
  }
}

impl fmt::Display for Descriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.revision {
      Some(rev) => write!(f, "{} {} ({})", self.name, self.version, rev),
      None => write!(f, "{} {}", self.name, self.version),
    }
  }
}

/// Builder for [`Descriptor`].
///
/// Unset fields fall back to the conventional autotools layout:
/// `<name>-<version>.tar.gz` unpacking to `<name>-<version>/` with the
/// library under `.libs/`.
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
  name: String,
  version: String,
  revision: Option<String>,
  archive: Option<String>,
  unpack_dir: Option<String>,
  include_subdir: Option<String>,
  artifact: Option<String>,
  link_name: Option<String>,
  sha256: Option<String>,
}

impl DescriptorBuilder {
  pub fn revision(mut self, revision: &str) -> Self {
    self.revision = Some(revision.to_string());
    self
  }

  pub fn archive(mut self, archive: &str) -> Self {
    self.archive = Some(archive.to_string());
    self
  }

  pub fn unpack_dir(mut self, unpack_dir: &str) -> Self {
    self.unpack_dir = Some(unpack_dir.to_string());
    self
  }

  pub fn include_subdir(mut self, include_subdir: &str) -> Self {
    self.include_subdir = Some(include_subdir.to_string());
    self
  }

  pub fn artifact(mut self, artifact: &str) -> Self {
    self.artifact = Some(artifact.to_string());
    self
  }

  pub fn link_name(mut self, link_name: &str) -> Self {
    self.link_name = Some(link_name.to_string());
    self
  }

  pub fn sha256(mut self, sha256: &str) -> Self {
    self.sha256 = Some(sha256.to_ascii_lowercase());
    self
  }

  pub fn build(self) -> Descriptor {
    let stem = format!("{}-{}", self.name, self.version);
    let link_name = self
      .link_name
      .unwrap_or_else(|| self.name.strip_prefix("lib").unwrap_or(&self.name).to_string());

    Descriptor {
      archive: self.archive.unwrap_or_else(|| format!("{}.tar.gz", stem)),
      unpack_dir: self.unpack_dir.unwrap_or(stem),
      include_subdir: self.include_subdir.unwrap_or_else(|| "include".to_string()),
      artifact: self.artifact.unwrap_or_else(|| format!(".libs/lib{}.a", link_name)),
      link_name,
      name: self.name,
      version: self.version,
      revision: self.revision,
      sha256: self.sha256,
    }
  }
}

/// Filesystem locations derived from a descriptor and a source root.
///
/// Resolution never touches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptorPaths {
  pub root: PathBuf,
  pub archive: PathBuf,
  pub unpack_dir: PathBuf,
  pub include_dir: PathBuf,
  pub artifact: PathBuf,
  pub lock: PathBuf,
}

impl DescriptorPaths {
  pub fn resolve(descriptor: &Descriptor, root: &Path) -> Result<Self, BootstrapError> {
    if root.as_os_str().is_empty() {
      return Err(BootstrapError::InvalidPath("source root is empty".to_string()));
    }

    let archive = relative(root, "archive", &descriptor.archive)?;
    let unpack_dir = relative(root, "unpack directory", &descriptor.unpack_dir)?;
    let include_dir = relative(&unpack_dir, "include directory", &descriptor.include_subdir)?;
    let artifact = relative(&unpack_dir, "artifact", &descriptor.artifact)?;
    let lock = root.join(format!(".{}{}", descriptor.unpack_dir, LOCK_SUFFIX));

    Ok(Self {
      root: root.to_path_buf(),
      archive,
      unpack_dir,
      include_dir,
      artifact,
      lock,
    })
  }
}

/// Join a `/`-separated relative path onto `base`, rejecting anything that
/// could escape it.
fn relative(base: &Path, what: &str, value: &str) -> Result<PathBuf, BootstrapError> {
  if value.is_empty() {
    return Err(BootstrapError::InvalidPath(format!("{} path is empty", what)));
  }

  let mut path = base.to_path_buf();
  for part in value.split('/').filter(|p| !p.is_empty() && *p != ".") {
    let mut components = Path::new(part).components();
    match (components.next(), components.next()) {
      (Some(Component::Normal(c)), None) => path.push(c),
      _ => {
        return Err(BootstrapError::InvalidPath(format!(
          "{} path must stay inside {}: {}",
          what,
          base.display(),
          value
        )));
      }
    }
  }

  if path == base {
    return Err(BootstrapError::InvalidPath(format!("{} path is empty", what)));
  }

  Ok(path)
}
