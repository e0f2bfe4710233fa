//! CLI command implementations

mod config;
mod list;
mod mirror;

pub use config::{config, ConfigArgs};
pub use list::list_sources;
pub use mirror::{mirror, MirrorArgs};
