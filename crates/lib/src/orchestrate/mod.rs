//! Build orchestration.
//!
//! Ensures the static archive exists before the binding module is compiled:
//!
//! ```text
//! INIT -> artifact present -> DONE (reused)
//! INIT -> artifact absent  -> UNPACK -> BOOTSTRAP -> CONFIGURE -> COMPILE -> DONE (built)
//! any step fails           -> error, nothing retried
//! ```
//!
//! Before any toolchain step the vendored archive must exist (and match its
//! pinned digest, when one is set). Parallel jobs serialize on a lock file and
//! re-check the artifact after acquiring it, so a job that waited on another
//! job's build reuses the result instead of rebuilding.

mod types;

use std::fs;
use std::io;

use tracing::{debug, info, warn};

use crate::build_lock::BuildLock;
use crate::config::BootstrapConfig;
use crate::descriptor::{Descriptor, DescriptorPaths};
use crate::error::BootstrapError;
use crate::linker::LinkerInputs;
use crate::locate::{Presence, StaleReason, locate_with};
use crate::toolchain::{SystemToolchain, Toolchain, ToolchainPlan};
use crate::util::hash::sha256_file;

pub use types::{BuildState, Outcome};

pub struct Orchestrator<T = SystemToolchain> {
  config: BootstrapConfig,
  descriptor: Descriptor,
  paths: DescriptorPaths,
  toolchain: T,
}

impl Orchestrator<SystemToolchain> {
  pub fn new(config: BootstrapConfig, descriptor: Descriptor) -> Result<Self, BootstrapError> {
    Self::with_toolchain(config, descriptor, SystemToolchain)
  }
}

impl<T: Toolchain> Orchestrator<T> {
  pub fn with_toolchain(config: BootstrapConfig, descriptor: Descriptor, toolchain: T) -> Result<Self, BootstrapError> {
    let paths = descriptor.paths(&config.root)?;
    Ok(Self {
      config,
      descriptor,
      paths,
      toolchain,
    })
  }

  pub fn descriptor(&self) -> &Descriptor {
    &self.descriptor
  }

  pub fn config(&self) -> &BootstrapConfig {
    &self.config
  }

  pub fn paths(&self) -> &DescriptorPaths {
    &self.paths
  }

  pub fn toolchain(&self) -> &T {
    &self.toolchain
  }

  /// The steps [`ensure`](Self::ensure) runs when the artifact is absent.
  pub fn plan(&self) -> ToolchainPlan {
    ToolchainPlan::for_paths(&self.paths, &self.config.toolchain)
  }

  /// Linker inputs for the configured host. Does not check the artifact.
  pub fn linker_inputs(&self) -> LinkerInputs {
    LinkerInputs::resolve(&self.descriptor, &self.paths, &self.config.host)
  }

  /// Look for the artifact under the configured freshness policy.
  pub fn locate(&self) -> Result<Presence, BootstrapError> {
    locate_with(&self.paths.artifact, self.config.freshness)
  }

  /// Make sure the artifact exists, building it if necessary.
  pub fn ensure(&self) -> Result<Outcome, BootstrapError> {
    info!(descriptor = %self.descriptor, root = ?self.paths.root, "ensuring native dependency");

    if self.artifact_ready()? {
      info!(artifact = ?self.paths.artifact, "reusing existing artifact");
      return Ok(self.outcome(BuildState::Reused));
    }

    self.require_archive()?;
    self.verify_checksum()?;

    let _lock = if self.config.lock {
      Some(BuildLock::acquire(&self.paths.lock, &self.descriptor.to_string())?)
    } else {
      None
    };

    if self.artifact_ready()? {
      info!(artifact = ?self.paths.artifact, "artifact built by a concurrent job");
      return Ok(self.outcome(BuildState::Reused));
    }

    self.plan().execute(&self.toolchain)?;

    if !self.locate()?.is_present() {
      return Err(BootstrapError::ArtifactMissing {
        path: self.paths.artifact.clone(),
      });
    }

    info!(artifact = ?self.paths.artifact, "native dependency built");
    Ok(self.outcome(BuildState::Built))
  }

  fn outcome(&self, state: BuildState) -> Outcome {
    Outcome {
      state,
      artifact: self.paths.artifact.clone(),
      inputs: self.linker_inputs(),
    }
  }

  /// `true` when the artifact can be reused. A stale file is removed so the
  /// rebuild can replace it.
  fn artifact_ready(&self) -> Result<bool, BootstrapError> {
    let artifact = &self.paths.artifact;
    match self.locate()? {
      Presence::Present => Ok(true),
      Presence::Absent => Ok(false),
      Presence::Stale(StaleReason::NotAFile) => Err(BootstrapError::StaleArtifact {
        path: artifact.clone(),
        reason: StaleReason::NotAFile.to_string(),
      }),
      Presence::Stale(reason) => {
        warn!(artifact = ?artifact, reason = %reason, "discarding stale artifact");
        fs::remove_file(artifact).map_err(|source| BootstrapError::FilesystemAccess {
          path: artifact.clone(),
          source,
        })?;
        Ok(false)
      }
    }
  }

  fn require_archive(&self) -> Result<(), BootstrapError> {
    let archive = &self.paths.archive;
    match fs::metadata(archive) {
      Ok(metadata) if metadata.is_file() => Ok(()),
      Ok(_) => Err(BootstrapError::MissingSourceArchive { path: archive.clone() }),
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        Err(BootstrapError::MissingSourceArchive { path: archive.clone() })
      }
      Err(source) => Err(BootstrapError::FilesystemAccess {
        path: archive.clone(),
        source,
      }),
    }
  }

  fn verify_checksum(&self) -> Result<(), BootstrapError> {
    let Some(expected) = self.descriptor.sha256() else {
      return Ok(());
    };

    let archive = &self.paths.archive;
    let actual = sha256_file(archive).map_err(|source| BootstrapError::FilesystemAccess {
      path: archive.clone(),
      source,
    })?;

    if actual != expected {
      return Err(BootstrapError::ChecksumMismatch {
        archive: archive.clone(),
        expected: expected.to_string(),
        actual,
      });
    }

    debug!(archive = ?archive, "archive checksum verified");
    Ok(())
  }
}

/// Build-script entry point: configure from the environment, make sure the
/// artifact exists and return what the linker needs.
pub fn ensure_artifact(descriptor: Descriptor) -> Result<LinkerInputs, BootstrapError> {
  let config = BootstrapConfig::from_env()?;
  Orchestrator::new(config, descriptor)?.ensure().map(|outcome| outcome.inputs)
}
