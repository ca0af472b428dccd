mod client;
mod config;
mod data_formats;
mod errors;
mod list_view;
mod models;

pub use client::*;
pub use config::*;
pub use data_formats::*;
pub use errors::*;
pub use list_view::*;
pub use models::*;

use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
