mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use htpbuild_lib::BootstrapConfig;
use htpbuild_lib::locate::Freshness;
use htpbuild_lib::platform::os::Os;
use tracing_subscriber::EnvFilter;

use cmd::{cmd_ensure, cmd_flags, cmd_info, cmd_locate, cmd_plan};
use output::{OutputFormat, print_error};

/// htpbuild - Bootstrap the vendored libhtp static library
#[derive(Parser)]
#[command(name = "htpbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(flatten)]
  env: EnvArgs,

  #[command(subcommand)]
  command: Commands,
}

/// Overrides for the environment-derived configuration.
#[derive(Args)]
struct EnvArgs {
  /// Directory holding the vendored source archive (default: $HTPBUILD_ROOT or cwd)
  #[arg(long, global = true, value_name = "DIR")]
  root: Option<PathBuf>,

  /// Host identifier used for link requirements, e.g. Linux or Darwin
  #[arg(long, global = true, value_name = "OS")]
  host: Option<String>,

  /// Only reuse an artifact that carries a static archive header
  #[arg(long, global = true)]
  strict: bool,

  /// Do not hold the build lock while building
  #[arg(long, global = true)]
  no_lock: bool,
}

impl EnvArgs {
  fn config(&self) -> Result<BootstrapConfig> {
    let mut config = BootstrapConfig::from_env()?;
    if let Some(root) = &self.root {
      config.root = root.clone();
    }
    if let Some(host) = &self.host {
      config.host = Os::from_identifier(host);
    }
    if self.strict {
      config.freshness = Freshness::ArchiveHeader;
    }
    if self.no_lock {
      config.lock = false;
    }
    Ok(config)
  }
}

#[derive(Subcommand)]
enum Commands {
  /// Build the native library if needed and print the linker inputs
  Ensure {
    #[arg(short, long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Report whether the built artifact is present (exit code 1 if not)
  Locate,

  /// Show the toolchain steps a build would run
  Plan {
    #[arg(short, long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Print the linker inputs without building
  Flags {
    #[arg(short, long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Show host, link requirements and the vendored release
  Info,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "info" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match run(cli) {
    Ok(code) => code,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<ExitCode> {
  let config = cli.env.config()?;

  match cli.command {
    Commands::Ensure { format } => cmd_ensure(config, format)?,
    Commands::Locate => {
      if !cmd_locate(config)? {
        return Ok(ExitCode::FAILURE);
      }
    }
    Commands::Plan { format } => cmd_plan(config, format)?,
    Commands::Flags { format } => cmd_flags(config, format)?,
    Commands::Info => cmd_info(config)?,
  }

  Ok(ExitCode::SUCCESS)
}
