use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tmerge",
    about = "Merge sharded NUnit and TRX test reports into one report per format",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with output names and writer settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge report files and directories into an output directory
    Merge(MergeArgs),
    /// Show how each input would be classified
    Detect(DetectArgs),
}

#[derive(Args)]
pub struct MergeArgs {
    /// Directory receiving the merged reports
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
    /// Report files or directories, merged in the order given
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
}

#[derive(Args)]
pub struct DetectArgs {
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
}
