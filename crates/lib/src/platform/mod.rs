pub mod os;

use os::Os;

/// Extra link flags per host, keyed by [`Os::as_str`].
///
/// glibc ships iconv in libc; every other C library needs it linked
/// explicitly, so unknown hosts fall back to [`DEFAULT_LINK_REQUIREMENTS`].
const LINK_REQUIREMENTS: &[(&str, &[&str])] = &[
  ("linux", &[]),
  ("darwin", &["-liconv"]),
  ("freebsd", &["-liconv"]),
  ("windows", &["-liconv"]),
];

const DEFAULT_LINK_REQUIREMENTS: &[&str] = &["-liconv"];

/// Returns the host-specific link flags appended after the library itself.
pub fn link_requirements(os: &Os) -> &'static [&'static str] {
  LINK_REQUIREMENTS
    .iter()
    .find(|(id, _)| *id == os.as_str())
    .map(|(_, flags)| *flags)
    .unwrap_or(DEFAULT_LINK_REQUIREMENTS)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn linux_needs_no_iconv() {
    assert!(link_requirements(&Os::Linux).is_empty());
  }

  #[test]
  fn other_hosts_link_iconv() {
    for os in [Os::MacOs, Os::FreeBsd, Os::Windows, Os::from_identifier("SunOS")] {
      assert_eq!(link_requirements(&os), &["-liconv"], "{}", os);
    }
  }
}
