//! Implementation of the `htpbuild flags` command.

use anyhow::{Context, Result};

use htpbuild_lib::{BootstrapConfig, Descriptor, LinkerInputs, Orchestrator};

use crate::output::{OutputFormat, print_json, print_lines, print_stat};

pub fn cmd_flags(config: BootstrapConfig, format: OutputFormat) -> Result<()> {
  let orchestrator = Orchestrator::new(config, Descriptor::libhtp()).context("Invalid dependency descriptor")?;
  print_inputs(&orchestrator.linker_inputs(), format)
}

pub(super) fn print_inputs(inputs: &LinkerInputs, format: OutputFormat) -> Result<()> {
  match format {
    OutputFormat::Json => print_json(inputs)?,
    OutputFormat::Cargo => print_lines(&inputs.cargo_directives()),
    OutputFormat::Text => {
      println!("Include directories:");
      for dir in &inputs.include_dirs {
        print_stat("include", &dir.display().to_string());
      }
      println!("Library directories:");
      for dir in &inputs.library_dirs {
        print_stat("lib", &dir.display().to_string());
      }
      println!("Extra objects:");
      for object in &inputs.extra_objects {
        print_stat("link", object);
      }
    }
  }
  Ok(())
}
