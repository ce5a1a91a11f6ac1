//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// extbuild - build descriptors for native Python extensions
#[derive(Parser)]
#[command(name = "extbuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the full extension build plan
    Plan(PlanArgs),

    /// List the discovered source files
    Sources,

    /// Show compile/link flags for the extension
    Flags(FlagsArgs),

    /// Print the package version
    Version,

    /// Show facts about the host Python installation
    Host(HostArgs),
}

/// Options shared by commands that query the host interpreter.
#[derive(Args, Clone, Default)]
pub struct PythonArgs {
    /// Python interpreter to build against
    #[arg(long, env = "EXTBUILD_PYTHON", value_name = "PATH")]
    pub python: Option<PathBuf>,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Describe the build for this platform instead of the host (linux, windows)
    #[arg(long)]
    pub platform: Option<String>,

    /// Emit the plan as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub python: PythonArgs,
}

#[derive(Args)]
pub struct FlagsArgs {
    /// Describe the build for this platform instead of the host (linux, windows)
    #[arg(long)]
    pub platform: Option<String>,

    /// Show only compile flags
    #[arg(long, conflicts_with = "link")]
    pub compile: bool,

    /// Show only link flags
    #[arg(long)]
    pub link: bool,

    #[command(flatten)]
    pub python: PythonArgs,
}

#[derive(Args)]
pub struct HostArgs {
    /// Emit host facts as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub python: PythonArgs,
}
