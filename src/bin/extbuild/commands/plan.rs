//! `extbuild plan` command

use anyhow::Result;

use super::{parse_platform, Project};
use crate::cli::PlanArgs;
use extbuild::ops::{plan_extension, ExtensionPlan, PlanOptions};

pub fn execute(project: &Project, args: PlanArgs) -> Result<()> {
    let options = PlanOptions {
        platform: parse_platform(args.platform.as_deref()),
    };
    let probe = project.probe(&args.python);

    let plan = plan_extension(&project.root, &project.config, &options, &probe)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&plan);
    }

    Ok(())
}

fn print_plan(plan: &ExtensionPlan) {
    let ext = &plan.extension;

    println!("{} {}", plan.name, plan.version);
    println!("  language: {}", ext.language);
    println!("  sources ({}):", ext.sources.len());
    for source in &ext.sources {
        println!("    {}", source.display());
    }
    println!("  include dirs:");
    for dir in &ext.include_dirs {
        println!("    {}", dir.display());
    }
    if !ext.libraries.is_empty() {
        println!("  libraries: {}", ext.libraries.join(", "));
    }
    if !ext.library_dirs.is_empty() {
        println!("  library dirs:");
        for dir in &ext.library_dirs {
            println!("    {}", dir.display());
        }
    }
    println!("  compile args: {}", ext.extra_compile_args.join(" "));
    if !plan.requirements.is_empty() {
        println!("  requires: {}", plan.requirements.join(", "));
    }
}
