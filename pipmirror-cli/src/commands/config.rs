//! Config command - inspect and create the configuration file

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use pipmirror_core::config::{sample_config, ConfigFile, MirrorConfig};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print where the config file is looked up
    Path,

    /// Print the settings a mirror session would use
    Show,

    /// Write the sample config to the default location
    Init {
        /// Replace an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the sample config
    Sample,
}

pub async fn config(args: ConfigArgs) -> Result<()> {
    let path = ConfigFile::default_path();

    match args.command {
        ConfigCommand::Path => {
            let state = if path.exists() { "present" } else { "missing" };
            println!("{} ({})", path.display(), state);
        }
        ConfigCommand::Show => {
            let (origin, settings) = if path.exists() {
                let file = ConfigFile::load_from(&path)
                    .with_context(|| format!("Failed to load {}", path.display()))?;
                (path.display().to_string(), file.resolve())
            } else {
                ("built-in defaults".to_string(), MirrorConfig::default())
            };
            print_settings(&origin, &settings);
        }
        ConfigCommand::Init { force } => {
            write_sample(&path, force)?;
            println!("Wrote {}", path.display());
        }
        ConfigCommand::Sample => print!("{}", sample_config()),
    }

    Ok(())
}

fn print_settings(origin: &str, settings: &MirrorConfig) {
    println!("Settings from {}\n", origin);
    println!("[capture]");
    println!(
        "  frame_rate        {} fps ({:?} per frame)",
        settings.frame_rate,
        settings.frame_interval()
    );
    match settings.start_timeout {
        Some(timeout) => println!("  start_timeout     {:?}", timeout),
        None => println!("  start_timeout     off"),
    }
    println!("[catalog]");
    println!("  min_window_height {}", settings.min_window_height);
    if settings.desktop_owner_apps.is_empty() {
        println!("  desktop owners    none");
    } else {
        println!(
            "  desktop owners    {}",
            settings.desktop_owner_apps.join(", ")
        );
    }
}

fn write_sample(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists, pass --force to replace it", path.display());
    }

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    std::fs::write(path, sample_config())
        .with_context(|| format!("Failed to write {}", path.display()))
}
