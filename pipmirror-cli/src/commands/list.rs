//! List sources command

use anyhow::{Context, Result};
use pipmirror_core::catalog::{SourceCatalog, TargetEntry};
use pipmirror_core::config::ConfigFile;
use pipmirror_core::XcapProvider;
use std::sync::Arc;

/// List capturable displays and windows
pub async fn list_sources() -> Result<()> {
    println!("pipmirror - Capturable Sources\n");

    let config = ConfigFile::load_or_default().resolve();
    let provider = Arc::new(XcapProvider::new(&config));
    let mut catalog =
        SourceCatalog::new(provider).with_min_window_height(config.min_window_height);

    let list = match catalog.refresh().await {
        Ok(list) => list,
        Err(e) => {
            if let Some(hint) = e.user_hint() {
                eprintln!("Hint: {}", hint);
            }
            return Err(e).context("Failed to enumerate capture sources");
        }
    };

    if list.targets().next().is_none() {
        println!("No sources found.");
        return Ok(());
    }

    println!("{:<6} {:<8} {:<10} {}", "INDEX", "TYPE", "ID", "LABEL");
    println!("{}", "-".repeat(75));

    for (index, entry) in list.entries().iter().enumerate() {
        match entry {
            TargetEntry::Separator => println!("{}", "-".repeat(75)),
            TargetEntry::Target { target, label } => println!(
                "{:<6} {:<8} {:<10} {}",
                index,
                target.kind().to_string(),
                target.id(),
                label
            ),
        }
    }

    println!("\nUse 'pipmirror mirror <INDEX>' to start mirroring a source.");

    Ok(())
}
