//! extbuild CLI - build descriptors for native Python extensions

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use extbuild::core::VersionError;
use extbuild::util::diagnostic::{emit, suggestions, Diagnostic};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli, color) {
        let mut diag = Diagnostic::error(format!("{:#}", e));
        if let Some(VersionError::Read { .. }) = e.downcast_ref::<VersionError>() {
            diag = diag.with_suggestion(suggestions::NO_VERSION_FILE);
        }
        emit(&diag, color);
        std::process::exit(1);
    }
}

fn run(cli: Cli, color: bool) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("extbuild=debug")
    } else {
        EnvFilter::new("extbuild=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(color)
        .with_target(false)
        .without_time()
        .init();

    let project = commands::Project::open(cli.project_dir.as_deref())?;

    match cli.command {
        Commands::Plan(args) => commands::plan::execute(&project, args),
        Commands::Sources => commands::sources::execute(&project),
        Commands::Flags(args) => commands::flags::execute(&project, args),
        Commands::Version => commands::version::execute(&project),
        Commands::Host(args) => commands::host::execute(&project, args),
    }
}
