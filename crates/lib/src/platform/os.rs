use std::fmt;

/// Host operating system, as far as linking the native library cares.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Os {
  Linux,
  MacOs,
  FreeBsd,
  Windows,
  /// Any other host, holding its lowercased identifier.
  Other(String),
}

impl Os {
  /// Parse a host identifier.
  ///
  /// Accepts both `uname -s` spellings (`Linux`, `Darwin`, `FreeBSD`) and
  /// Rust's `std::env::consts::OS` values (`linux`, `macos`, `freebsd`).
  pub fn from_identifier(identifier: &str) -> Self {
    let id = identifier.trim().to_ascii_lowercase();
    match id.as_str() {
      "linux" => Self::Linux,
      "darwin" | "macos" => Self::MacOs,
      "freebsd" => Self::FreeBsd,
      "windows" | "windows_nt" => Self::Windows,
      _ => Self::Other(id),
    }
  }

  /// Detect the running operating system.
  pub fn current() -> Self {
    Self::from_identifier(std::env::consts::OS)
  }

  /// Returns the lowercase string identifier for this OS
  pub fn as_str(&self) -> &str {
    match self {
      Self::Linux => "linux",
      Self::MacOs => "darwin",
      Self::FreeBsd => "freebsd",
      Self::Windows => "windows",
      Self::Other(id) => id,
    }
  }

  pub fn is_linux(&self) -> bool {
    matches!(self, Self::Linux)
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn uname_spellings_parse() {
    assert_eq!(Os::from_identifier("Linux"), Os::Linux);
    assert_eq!(Os::from_identifier("Darwin"), Os::MacOs);
    assert_eq!(Os::from_identifier("FreeBSD"), Os::FreeBsd);
  }

  #[test]
  fn rust_spellings_parse() {
    assert_eq!(Os::from_identifier("macos"), Os::MacOs);
    assert_eq!(Os::from_identifier("windows"), Os::Windows);
  }

  #[test]
  fn unknown_hosts_keep_their_identifier() {
    let os = Os::from_identifier(" SunOS\n");
    assert_eq!(os, Os::Other("sunos".to_string()));
    assert_eq!(os.as_str(), "sunos");
  }

  #[test]
  fn macos_uses_darwin_identifier() {
    assert_eq!(Os::MacOs.as_str(), "darwin");
  }
}
