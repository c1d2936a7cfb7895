//! Implementation of the `htpbuild plan` command.
//!
//! Prints the toolchain steps without running them.

use anyhow::{Context, Result, bail};

use htpbuild_lib::{BootstrapConfig, Descriptor, Orchestrator};

use crate::output::{OutputFormat, print_info, print_json, print_step};

pub fn cmd_plan(config: BootstrapConfig, format: OutputFormat) -> Result<()> {
  let orchestrator = Orchestrator::new(config, Descriptor::libhtp()).context("Invalid dependency descriptor")?;
  let plan = orchestrator.plan();

  match format {
    OutputFormat::Json => print_json(&plan)?,
    OutputFormat::Cargo => bail!("plan has no cargo representation; use --format text or json"),
    OutputFormat::Text => {
      println!("Plan for {}:", orchestrator.descriptor());
      for (idx, step) in plan.steps().iter().enumerate() {
        print_step(idx + 1, &step.to_string());
      }

      let presence = orchestrator
        .locate()
        .with_context(|| format!("Failed to check {}", orchestrator.paths().artifact.display()))?;
      if presence.is_present() {
        println!();
        print_info("Artifact already present; ensure would not run any step");
      }
    }
  }

  Ok(())
}
