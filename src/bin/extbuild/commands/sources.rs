//! `extbuild sources` command

use anyhow::Result;

use super::Project;
use extbuild::ops::discover_project_sources;

pub fn execute(project: &Project) -> Result<()> {
    let sources = discover_project_sources(&project.root, &project.config);

    for source in sources.iter() {
        println!("{}", source.display());
    }

    Ok(())
}
