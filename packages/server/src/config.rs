//! Server configuration.

use std::{path::PathBuf, time::Duration};

use clap::Parser;

/// Command line configuration of the presence server
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "roomcast-server")]
#[command(about = "Room presence and live-status server", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    pub port: u16,

    /// Inventory endpoint of the media server
    #[arg(long, default_value = "http://127.0.0.1:1985/api/v1/streams")]
    pub inventory_url: String,

    /// Everything in front of the stream key in stored stream URLs
    #[arg(long, default_value = "http://127.0.0.1:8080/live/livestream/")]
    pub stream_url_prefix: String,

    /// Timeout of one inventory request (milliseconds)
    #[arg(long, default_value = "3000", value_parser = clap::value_parser!(u64).range(1..))]
    pub inventory_timeout_ms: u64,

    /// Timeout of one websocket write (milliseconds)
    #[arg(long, default_value = "5000", value_parser = clap::value_parser!(u64).range(1..))]
    pub write_timeout_ms: u64,

    /// Interval between websocket pings (seconds)
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
    pub heartbeat_interval_secs: u64,

    /// JSON file with the videos known to the server
    #[arg(long)]
    pub video_seed: Option<PathBuf>,
}

impl ServerConfig {
    pub fn inventory_timeout(&self) -> Duration {
        Duration::from_millis(self.inventory_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }
}
