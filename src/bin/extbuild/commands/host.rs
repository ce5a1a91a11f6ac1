//! `extbuild host` command

use anyhow::Result;

use super::Project;
use crate::cli::HostArgs;
use extbuild::core::HostProbe;

pub fn execute(project: &Project, args: HostArgs) -> Result<()> {
    let host = project.probe(&args.python).probe()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&host)?);
        return Ok(());
    }

    let naming = project.config.fallback_naming();
    println!("python {}", host.version());
    println!("  include dir: {}", host.include_dir.display());
    println!(
        "  runtime library: {}",
        host.library_file.as_deref().unwrap_or("(none)")
    );
    println!("  link name: {}", host.library_name(naming));
    println!("  pybind11 include: {}", host.binding_include_dir.display());

    Ok(())
}
