//! Linker input set.
//!
//! The paths and flags handed to the step that compiles and links the binding
//! module. Dependency-specific entries come first, followed by the fixed
//! system search paths.

use std::path::PathBuf;

use serde::Serialize;

use crate::descriptor::{Descriptor, DescriptorPaths};
use crate::platform::link_requirements;
use crate::platform::os::Os;

pub const DEFAULT_INCLUDE_DIRS: &[&str] = &["/usr/local/include", "/opt/local/include", "/usr/include"];

pub const DEFAULT_LIBRARY_DIRS: &[&str] = &["/usr/lib", "/usr/local/lib"];

/// Compression library every libhtp build links against.
pub const ZLIB_FLAG: &str = "-lz";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkerInputs {
  pub include_dirs: Vec<PathBuf>,
  pub library_dirs: Vec<PathBuf>,
  /// The static archive path followed by `-l` flags.
  pub extra_objects: Vec<String>,
  #[serde(skip)]
  artifact: PathBuf,
  #[serde(skip)]
  link_name: String,
}

impl LinkerInputs {
  pub fn resolve(descriptor: &Descriptor, paths: &DescriptorPaths, host: &Os) -> Self {
    let mut include_dirs = vec![paths.unpack_dir.clone(), paths.include_dir.clone()];
    include_dirs.extend(DEFAULT_INCLUDE_DIRS.iter().map(PathBuf::from));

    let library_dirs = DEFAULT_LIBRARY_DIRS.iter().map(PathBuf::from).collect();

    let mut extra_objects = vec![paths.artifact.display().to_string(), ZLIB_FLAG.to_string()];
    extra_objects.extend(link_requirements(host).iter().map(|f| f.to_string()));

    Self {
      include_dirs,
      library_dirs,
      extra_objects,
      artifact: paths.artifact.clone(),
      link_name: descriptor.link_name().to_string(),
    }
  }

  pub fn artifact(&self) -> &std::path::Path {
    &self.artifact
  }

  /// Flags for a C compiler driver: `-I` and `-L` entries, then the extra objects.
  pub fn compiler_flags(&self) -> Vec<String> {
    let includes = self.include_dirs.iter().map(|d| format!("-I{}", d.display()));
    let libs = self.library_dirs.iter().map(|d| format!("-L{}", d.display()));
    includes.chain(libs).chain(self.extra_objects.iter().cloned()).collect()
  }

  /// Directives for a Cargo build script.
  ///
  /// The archive is linked by name from its own directory; `-l` flags become
  /// dynamic `rustc-link-lib` entries. The dependency's header directory is
  /// exported as `include` metadata for dependent crates.
  pub fn cargo_directives(&self) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(dir) = self.artifact.parent() {
      lines.push(format!("cargo:rustc-link-search=native={}", dir.display()));
    }
    for dir in &self.library_dirs {
      lines.push(format!("cargo:rustc-link-search=native={}", dir.display()));
    }

    lines.push(format!("cargo:rustc-link-lib=static={}", self.link_name));
    for flag in &self.extra_objects {
      if let Some(lib) = flag.strip_prefix("-l") {
        lines.push(format!("cargo:rustc-link-lib={}", lib));
      }
    }

    if let Some(include) = self.include_dirs.get(1) {
      lines.push(format!("cargo:include={}", include.display()));
    }
    if let Some(root) = self.include_dirs.first() {
      lines.push(format!("cargo:root={}", root.display()));
    }

    lines
  }
}
