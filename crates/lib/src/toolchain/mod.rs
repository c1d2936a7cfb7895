//! Toolchain invocation plan.
//!
//! The native library is built by a fixed autotools sequence:
//!
//! 1. unpack the vendored tarball into the source root
//! 2. `./autogen.sh -i` to generate `configure`
//! 3. `./configure CFLAGS=-fPIC` (the archive ends up inside a loadable module)
//! 4. `make`
//!
//! Steps 2-4 run with the unpack directory as their working directory. The
//! directory is attached to each child process rather than set on the current
//! process, so the caller's working directory is never disturbed, even when a
//! step fails.
//!
//! # Submodules
//!
//! - [`process`] - [`SystemToolchain`], the real implementation
//! - [`unpack`] - in-process gzip tarball extraction

pub mod process;
pub mod unpack;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::descriptor::DescriptorPaths;
use crate::error::BootstrapError;

pub use process::SystemToolchain;

/// Position-independent code, required for static linking into a shared object.
pub const PIC_FLAG: &str = "-fPIC";

pub const DEFAULT_MAKE: &str = "make";

pub const BOOTSTRAP_SCRIPT: &str = "autogen.sh";

pub const CONFIGURE_SCRIPT: &str = "configure";

/// Tells autogen to install missing auxiliary files.
pub const BOOTSTRAP_INSTALL_FLAG: &str = "-i";

/// One stage of the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
  Unpack,
  Bootstrap,
  Configure,
  Compile,
}

impl Phase {
  pub fn as_str(&self) -> &'static str {
    match self {
      Phase::Unpack => "unpack",
      Phase::Bootstrap => "bootstrap",
      Phase::Configure => "configure",
      Phase::Compile => "compile",
    }
  }
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// A synchronous external command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
  pub phase: Phase,
  pub program: PathBuf,
  pub args: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cwd: Option<PathBuf>,
}

impl Invocation {
  pub fn new(phase: Phase, program: impl Into<PathBuf>) -> Self {
    Self {
      phase,
      program: program.into(),
      args: Vec::new(),
      cwd: None,
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
    self.cwd = Some(dir.into());
    self
  }

  /// The program as shown in logs and errors.
  pub fn program_name(&self) -> String {
    self.program.display().to_string()
  }
}

impl fmt::Display for Invocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program.display())?;
    for arg in &self.args {
      write!(f, " {}", arg)?;
    }
    Ok(())
  }
}

/// One entry of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Step {
  /// Extract a gzip tarball into `into`.
  Unpack { archive: PathBuf, into: PathBuf },
  Command(Invocation),
}

impl Step {
  pub fn phase(&self) -> Phase {
    match self {
      Step::Unpack { .. } => Phase::Unpack,
      Step::Command(invocation) => invocation.phase,
    }
  }
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Step::Unpack { archive, into } => write!(f, "unpack {} into {}", archive.display(), into.display()),
      Step::Command(invocation) => match &invocation.cwd {
        Some(cwd) => write!(f, "(cd {} && {})", cwd.display(), invocation),
        None => write!(f, "{}", invocation),
      },
    }
  }
}

/// Knobs for the configure and compile steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainSettings {
  /// Build tool run in the compile step.
  pub make: PathBuf,
  /// Value passed as `CFLAGS=` to configure; always includes [`PIC_FLAG`].
  pub cflags: String,
  /// Additional arguments appended to the configure command.
  pub configure_args: Vec<String>,
}

impl Default for ToolchainSettings {
  fn default() -> Self {
    Self {
      make: PathBuf::from(DEFAULT_MAKE),
      cflags: PIC_FLAG.to_string(),
      configure_args: Vec::new(),
    }
  }
}

impl ToolchainSettings {
  /// Honour `MAKE` and extend an inherited `CFLAGS` with [`PIC_FLAG`].
  pub fn from_env() -> Self {
    let make = std::env::var_os("MAKE")
      .filter(|m| !m.is_empty())
      .map(PathBuf::from)
      .unwrap_or_else(|| PathBuf::from(DEFAULT_MAKE));

    let cflags = std::env::var("CFLAGS").unwrap_or_default();

    Self {
      make,
      cflags: with_pic(&cflags),
      configure_args: Vec::new(),
    }
  }
}

fn with_pic(cflags: &str) -> String {
  let cflags = cflags.trim();
  if cflags.is_empty() {
    PIC_FLAG.to_string()
  } else if cflags.split_whitespace().any(|f| f == PIC_FLAG) {
    cflags.to_string()
  } else {
    format!("{} {}", cflags, PIC_FLAG)
  }
}

/// The runtime that carries out plan steps.
pub trait Toolchain {
  /// Extract the gzip tarball at `archive` into the directory `into`.
  fn unpack(&self, archive: &Path, into: &Path) -> Result<(), BootstrapError>;

  /// Run `invocation` to completion; non-zero exit is an error.
  fn run(&self, invocation: &Invocation) -> Result<(), BootstrapError>;
}

/// Ordered steps that turn the vendored tarball into the static archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolchainPlan {
  steps: Vec<Step>,
}

impl ToolchainPlan {
  pub fn for_paths(paths: &DescriptorPaths, settings: &ToolchainSettings) -> Self {
    let src = &paths.unpack_dir;
    // Scripts resolve against the step's cwd, not the caller's.
    let here = Path::new(".");

    let bootstrap = Invocation::new(Phase::Bootstrap, here.join(BOOTSTRAP_SCRIPT))
      .arg(BOOTSTRAP_INSTALL_FLAG)
      .cwd(src);

    let configure = Invocation::new(Phase::Configure, here.join(CONFIGURE_SCRIPT))
      .arg(format!("CFLAGS={}", settings.cflags))
      .args(settings.configure_args.iter().cloned())
      .cwd(src);

    let compile = Invocation::new(Phase::Compile, &settings.make).cwd(src);

    Self {
      steps: vec![
        Step::Unpack {
          archive: paths.archive.clone(),
          into: paths.root.clone(),
        },
        Step::Command(bootstrap),
        Step::Command(configure),
        Step::Command(compile),
      ],
    }
  }

  pub fn steps(&self) -> &[Step] {
    &self.steps
  }

  /// Run every step in order, stopping at the first failure.
  pub fn execute<T: Toolchain + ?Sized>(&self, toolchain: &T) -> Result<(), BootstrapError> {
    for (idx, step) in self.steps.iter().enumerate() {
      info!(phase = %step.phase(), step = idx + 1, total = self.steps.len(), "{}", step);
      match step {
        Step::Unpack { archive, into } => toolchain.unpack(archive, into)?,
        Step::Command(invocation) => toolchain.run(invocation)?,
      }
    }
    Ok(())
  }
}
