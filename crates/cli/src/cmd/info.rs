use anyhow::{Context, Result};

use htpbuild_lib::platform::link_requirements;
use htpbuild_lib::{BootstrapConfig, Descriptor, Orchestrator};

use crate::output::print_stat;

pub fn cmd_info(config: BootstrapConfig) -> Result<()> {
  let orchestrator = Orchestrator::new(config, Descriptor::libhtp()).context("Invalid dependency descriptor")?;
  let config = orchestrator.config();
  let paths = orchestrator.paths();

  let requirements = link_requirements(&config.host);
  let requirements = if requirements.is_empty() {
    "(none)".to_string()
  } else {
    requirements.join(" ")
  };

  println!("System:");
  print_stat("Host", config.host.as_str());
  print_stat("Link requirements", &requirements);
  println!();
  println!("Dependency:");
  print_stat("Release", &orchestrator.descriptor().to_string());
  print_stat("Archive", &paths.archive.display().to_string());
  print_stat("Source", &paths.unpack_dir.display().to_string());
  print_stat("Artifact", &paths.artifact.display().to_string());

  Ok(())
}
