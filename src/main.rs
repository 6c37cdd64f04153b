use anyhow::Result;
use clap::Parser;
use mockmigrate::cli::{Cli, Commands};
use mockmigrate::commands::rewrite::{rewrite_trees, RewriteConfig};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let directive = format!("mockmigrate={}", level);
    let filter = match directive.parse::<tracing_subscriber::filter::Directive>() {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };
    // stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rewrite {
            paths,
            config,
            exclude,
            output,
            in_place,
            format,
            verbosity,
        } => {
            init_tracing(verbosity);
            let report = rewrite_trees(RewriteConfig {
                paths,
                config,
                exclude,
                output,
                in_place,
                format,
            })?;
            if !report.is_success() {
                std::process::exit(1);
            }
        }
        Commands::Init { force } => {
            init_tracing(0);
            mockmigrate::commands::init::init_config(force)?;
        }
    }
    Ok(())
}
