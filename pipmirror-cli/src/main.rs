//! pipmirror CLI
//!
//! Picture-in-picture mirroring of a display or window.
//!
//! # Usage
//!
//! ```bash
//! # List capturable displays and windows
//! pipmirror list
//!
//! # Mirror the third entry of the list for ten seconds
//! pipmirror mirror 2 --seconds 10
//!
//! # Mirror a window by id until Ctrl+C
//! pipmirror mirror --window 4711
//! ```

mod commands;
mod headless;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// pipmirror - picture-in-picture screen and window mirror
#[derive(Parser)]
#[command(name = "pipmirror")]
#[command(version)]
#[command(about = "Picture-in-picture screen and window mirror", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List capturable displays and windows
    #[command(alias = "ls")]
    List,

    /// Mirror a display or window into the preview
    Mirror(commands::MirrorArgs),

    /// Manage the configuration file
    Config(commands::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["pipmirror", "pipmirror_core"] {
        filter = filter.add_directive(format!("{}={}", target, level).parse()?);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::List => commands::list_sources().await?,
        Commands::Mirror(args) => commands::mirror(args).await?,
        Commands::Config(args) => commands::config(args).await?,
    }

    Ok(())
}
