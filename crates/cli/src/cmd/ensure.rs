//! Implementation of the `htpbuild ensure` command.
//!
//! Builds the vendored library when its static archive is absent, then prints
//! the linker inputs for the enclosing build.

use std::time::Instant;

use anyhow::{Context, Result};

use htpbuild_lib::{BootstrapConfig, BuildState, Descriptor, Orchestrator};

use super::flags::print_inputs;
use crate::output::{OutputFormat, format_duration, print_json, print_stat, print_success};

pub fn cmd_ensure(config: BootstrapConfig, format: OutputFormat) -> Result<()> {
  let orchestrator = Orchestrator::new(config, Descriptor::libhtp()).context("Invalid dependency descriptor")?;
  let descriptor = orchestrator.descriptor();

  let started = Instant::now();
  let outcome = orchestrator
    .ensure()
    .with_context(|| format!("Failed to build {}", descriptor))?;

  match format {
    OutputFormat::Json => print_json(&outcome)?,
    OutputFormat::Cargo => print_inputs(&outcome.inputs, format)?,
    OutputFormat::Text => {
      match outcome.state {
        BuildState::Reused => print_success(&format!("{} already built", descriptor)),
        BuildState::Built => print_success(&format!(
          "Built {} in {}",
          descriptor,
          format_duration(started.elapsed())
        )),
      }
      print_stat("Artifact", &outcome.artifact.display().to_string());
      println!();
      print_inputs(&outcome.inputs, format)?;
    }
  }

  Ok(())
}
