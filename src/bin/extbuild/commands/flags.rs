//! `extbuild flags` command

use anyhow::Result;

use super::{parse_platform, Project};
use crate::cli::FlagsArgs;
use extbuild::ops::{plan_extension, PlanOptions};

pub fn execute(project: &Project, args: FlagsArgs) -> Result<()> {
    let options = PlanOptions {
        platform: parse_platform(args.platform.as_deref()),
    };
    let probe = project.probe(&args.python);

    let plan = plan_extension(&project.root, &project.config, &options, &probe)?;
    let flags = plan.extension.flags();

    if !args.link {
        println!("# Compile flags for `{}`:", plan.name);
        for flag in &flags.compile {
            println!("  {}", flag);
        }
    }

    if !args.compile && !args.link {
        println!();
    }

    if !args.compile {
        println!("# Link flags for `{}`:", plan.name);
        for flag in &flags.link {
            println!("  {}", flag);
        }
    }

    Ok(())
}
