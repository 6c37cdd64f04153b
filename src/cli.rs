use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored per-file summary
    Text,
    /// One JSON report object per run
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "mockmigrate")]
#[command(about = "Rewrite JMock-based tests to Mockito", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite serialized syntax trees (*.json) of Java test sources
    Rewrite {
        /// Tree files or directories to search for them
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Configuration file (defaults to the nearest .mockmigrate.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Glob patterns of files to skip
        #[arg(long = "exclude", value_delimiter = ',')]
        exclude: Vec<String>,

        /// Directory that receives the rewritten trees
        #[arg(short, long, conflicts_with = "in_place")]
        output: Option<PathBuf>,

        /// Overwrite each input file with its rewritten tree
        #[arg(long = "in-place")]
        in_place: bool,

        /// Report format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,

        /// Increase verbosity level (can be repeated: -v, -vv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Write a default .mockmigrate.toml into the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
}
