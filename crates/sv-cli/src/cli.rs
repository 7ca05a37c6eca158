//! CLI argument definitions using clap derive API

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use sv_core::BumpKind;
use sv_deploy::{NotesLevel, VersionFormat};

/// shipver - forward-only deployments that version your project
#[derive(Parser, Debug)]
#[command(name = "shipver")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the ledger database path
    #[arg(short, long, global = true, env = "SHIPVER_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the deployment ledger table
    Install,

    /// Run every pending deployment
    Deploy(DeployArgs),

    /// Create a new deployment file
    Make(MakeArgs),

    /// Print the current version
    Version(VersionArgs),

    /// Print release notes
    Notes(NotesArgs),

    /// List deployments and whether they have run
    Status,
}

/// Arguments for the deploy command
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Deploy even when the environment is production
    #[arg(short, long)]
    pub force: bool,

    /// Maintenance message shown while deploying
    #[arg(short, long)]
    pub message: Option<String>,
}

/// Arguments for the make command
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("bump").args(["major", "minor", "patch"])))]
pub struct MakeArgs {
    /// Deployment name, normalised to snake_case
    pub name: String,

    /// Bump the major version
    #[arg(long)]
    pub major: bool,

    /// Bump the minor version
    #[arg(long)]
    pub minor: bool,

    /// Bump the patch version (default)
    #[arg(long)]
    pub patch: bool,

    /// Pre-release tag, e.g. alpha or rc.1
    #[arg(long = "pre")]
    pub pre_release: Option<String>,

    /// Run migrations before this deployment
    #[arg(long)]
    pub migrate: bool,

    /// Release note line (repeatable)
    #[arg(short, long = "note")]
    pub notes: Vec<String>,
}

impl MakeArgs {
    pub fn bump(&self) -> BumpKind {
        if self.major {
            BumpKind::Major
        } else if self.minor {
            BumpKind::Minor
        } else {
            BumpKind::Patch
        }
    }
}

/// Arguments for the version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "short")]
    pub format: VersionFormatArg,

    /// Print the deployment date instead of the version
    #[arg(long)]
    pub date: bool,
}

/// Version output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionFormatArg {
    /// X.Y.Z[-pre]
    Release,
    /// vX.Y.Z[-pre]
    Short,
    /// Version X.Y.Z[-pre] (build B)
    Long,
    /// vX.Y.Z[-pre]+B
    Full,
}

impl From<VersionFormatArg> for VersionFormat {
    fn from(arg: VersionFormatArg) -> Self {
        match arg {
            VersionFormatArg::Release => VersionFormat::Release,
            VersionFormatArg::Short => VersionFormat::Short,
            VersionFormatArg::Long => VersionFormat::Long,
            VersionFormatArg::Full => VersionFormat::Full,
        }
    }
}

/// Arguments for the notes command
#[derive(Args, Debug)]
pub struct NotesArgs {
    /// Which releases to include
    #[arg(short, long, value_enum, default_value = "all")]
    pub level: NotesLevelArg,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Release note levels
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotesLevelArg {
    /// Every release
    All,
    /// Releases in the current major version
    Major,
    /// Releases in the current minor version
    Minor,
    /// The current release only
    Single,
}

impl From<NotesLevelArg> for NotesLevel {
    fn from(arg: NotesLevelArg) -> Self {
        match arg {
            NotesLevelArg::All => NotesLevel::All,
            NotesLevelArg::Major => NotesLevel::Major,
            NotesLevelArg::Minor => NotesLevel::Minor,
            NotesLevelArg::Single => NotesLevel::Single,
        }
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
