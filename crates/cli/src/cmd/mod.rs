mod ensure;
mod flags;
mod info;
mod locate;
mod plan;

pub use ensure::cmd_ensure;
pub use flags::cmd_flags;
pub use info::cmd_info;
pub use locate::cmd_locate;
pub use plan::cmd_plan;
