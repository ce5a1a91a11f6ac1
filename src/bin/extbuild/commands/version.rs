//! `extbuild version` command

use anyhow::Result;

use super::Project;
use extbuild::ops::project_version;

pub fn execute(project: &Project) -> Result<()> {
    println!("{}", project_version(&project.root, &project.config)?);
    Ok(())
}
