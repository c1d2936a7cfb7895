//! Bootstrap configuration.
//!
//! The dependency descriptor is fixed at authoring time; everything here is
//! about the environment the bootstrap runs in.

use std::path::PathBuf;

use crate::consts::{ENV_HOST_OS, ENV_NO_LOCK, ENV_ROOT, ENV_STRICT};
use crate::error::BootstrapError;
use crate::locate::Freshness;
use crate::platform::os::Os;
use crate::toolchain::ToolchainSettings;

#[derive(Debug, Clone)]
pub struct BootstrapConfig {
  /// Directory holding the vendored archive; the archive unpacks here.
  pub root: PathBuf,
  /// Host used to pick platform link requirements.
  pub host: Os,
  pub freshness: Freshness,
  /// Hold an exclusive file lock while building.
  pub lock: bool,
  pub toolchain: ToolchainSettings,
}

impl Default for BootstrapConfig {
  fn default() -> Self {
    Self {
      root: PathBuf::from("."),
      host: Os::current(),
      freshness: Freshness::default(),
      lock: true,
      toolchain: ToolchainSettings::default(),
    }
  }
}

impl BootstrapConfig {
  /// Read configuration from the environment.
  ///
  /// - `HTPBUILD_ROOT`: source root (default: current directory)
  /// - `HTPBUILD_HOST_OS`: host identifier (default: running OS)
  /// - `HTPBUILD_STRICT`: require a valid archive header before reuse
  /// - `HTPBUILD_NO_LOCK`: skip the build lock
  /// - `MAKE`, `CFLAGS`: see [`ToolchainSettings::from_env`]
  pub fn from_env() -> Result<Self, BootstrapError> {
    let root = match std::env::var_os(ENV_ROOT).filter(|r| !r.is_empty()) {
      Some(root) => PathBuf::from(root),
      None => std::env::current_dir().map_err(|source| BootstrapError::FilesystemAccess {
        path: PathBuf::from("."),
        source,
      })?,
    };

    let host = std::env::var(ENV_HOST_OS)
      .ok()
      .filter(|h| !h.trim().is_empty())
      .map(|h| Os::from_identifier(&h))
      .unwrap_or_else(Os::current);

    let freshness = if env_flag(ENV_STRICT) {
      Freshness::ArchiveHeader
    } else {
      Freshness::Exists
    };

    Ok(Self {
      root,
      host,
      freshness,
      lock: !env_flag(ENV_NO_LOCK),
      toolchain: ToolchainSettings::from_env(),
    })
  }
}

fn env_flag(name: &str) -> bool {
  std::env::var(name)
    .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
    .unwrap_or(false)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn env_overrides_apply() {
    temp_env::with_vars(
      [
        (ENV_ROOT, Some("/vendor/htpy")),
        (ENV_HOST_OS, Some("Darwin")),
        (ENV_STRICT, Some("1")),
        (ENV_NO_LOCK, Some("true")),
      ],
      || {
        let config = BootstrapConfig::from_env().unwrap();
        assert_eq!(config.root, PathBuf::from("/vendor/htpy"));
        assert_eq!(config.host, Os::MacOs);
        assert_eq!(config.freshness, Freshness::ArchiveHeader);
        assert!(!config.lock);
      },
    );
  }

  #[test]
  #[serial]
  fn defaults_without_env() {
    temp_env::with_vars(
      [
        (ENV_ROOT, None::<&str>),
        (ENV_HOST_OS, None::<&str>),
        (ENV_STRICT, None::<&str>),
        (ENV_NO_LOCK, None::<&str>),
      ],
      || {
        let config = BootstrapConfig::from_env().unwrap();
        assert_eq!(config.root, std::env::current_dir().unwrap());
        assert_eq!(config.host, Os::current());
        assert_eq!(config.freshness, Freshness::Exists);
        assert!(config.lock);
      },
    );
  }

  #[test]
  #[serial]
  fn falsy_flags_are_off() {
    temp_env::with_vars([(ENV_STRICT, Some("0")), (ENV_NO_LOCK, Some("no"))], || {
      let config = BootstrapConfig::from_env().unwrap();
      assert_eq!(config.freshness, Freshness::Exists);
      assert!(config.lock);
    });
  }
}
