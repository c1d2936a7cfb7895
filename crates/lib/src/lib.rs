//! htpbuild-lib: Native dependency bootstrap for the libhtp bindings
//!
//! This crate makes sure the vendored libhtp static archive exists before the
//! binding module is compiled and linked:
//! - `Descriptor`: the immutable release metadata (archive, unpack directory, artifact)
//! - `locate`: existence check for the built artifact
//! - `Orchestrator`: unpack, autogen, configure and make when the artifact is absent
//! - `LinkerInputs`: include paths, library paths and link objects for the compile step

pub mod build_lock;
pub mod config;
pub mod consts;
pub mod descriptor;
pub mod error;
pub mod linker;
pub mod locate;
pub mod orchestrate;
pub mod platform;
pub mod toolchain;
pub mod util;

pub use config::BootstrapConfig;
pub use descriptor::{Descriptor, DescriptorPaths};
pub use error::BootstrapError;
pub use linker::LinkerInputs;
pub use locate::{Freshness, Presence, locate};
pub use orchestrate::{BuildState, Orchestrator, Outcome, ensure_artifact};
