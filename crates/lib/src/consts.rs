/// Source root holding the vendored archive (defaults to the current directory).
pub const ENV_ROOT: &str = "HTPBUILD_ROOT";

/// Overrides the host identifier used to pick link requirements.
pub const ENV_HOST_OS: &str = "HTPBUILD_HOST_OS";

/// Requires the artifact to carry a static archive header before it is reused.
pub const ENV_STRICT: &str = "HTPBUILD_STRICT";

/// Disables the build lock around unpack..compile.
pub const ENV_NO_LOCK: &str = "HTPBUILD_NO_LOCK";

/// First bytes of every `ar` static archive.
pub const STATIC_ARCHIVE_MAGIC: &[u8] = b"!<arch>\n";

pub const LOCK_SUFFIX: &str = ".lock";
