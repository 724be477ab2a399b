//! Room presence and live-status server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin roomcast-server
//! cargo run --bin roomcast-server -- --host 0.0.0.0 --port 3000 --video-seed videos.json
//! ```

use std::sync::Arc;

use clap::Parser;
use roomcast_server::{
    config::ServerConfig,
    domain::{RoomRegistry, StreamKeyCodec, VideoRepository},
    infrastructure::{
        inventory::HttpLiveInventory,
        repository::{InMemoryRoomRegistry, InMemoryVideoRepository},
    },
    ui::{ConnectionSettings, Server},
    usecase::{CheckLiveStatusUseCase, GetRoomPresenceUseCase, JoinRoomUseCase},
};
use roomcast_shared::{logger::setup_logger, time::SystemClock};

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(&["roomcast_server", env!("CARGO_BIN_NAME")], "debug");

    let config = ServerConfig::parse();

    // Initialize dependencies in order:
    // 1. Registry / stores / external clients
    // 2. UseCases
    // 3. Server

    // 1. Create process-wide state
    let registry: Arc<dyn RoomRegistry> = Arc::new(InMemoryRoomRegistry::new());

    let videos = match &config.video_seed {
        Some(path) => match InMemoryVideoRepository::from_json_file(path).await {
            Ok(videos) => videos,
            Err(e) => {
                tracing::error!("Failed to load video seed: {}", e);
                std::process::exit(1);
            }
        },
        None => InMemoryVideoRepository::default(),
    };
    tracing::info!("{} videos loaded", videos.len());
    let videos: Arc<dyn VideoRepository> = Arc::new(videos);

    let inventory = HttpLiveInventory::new(&config.inventory_url, config.inventory_timeout());
    let inventory = match inventory {
        Ok(inventory) => Arc::new(inventory),
        Err(e) => {
            tracing::error!("Failed to create live inventory client: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Live inventory endpoint: {}", inventory.endpoint());

    let codec = StreamKeyCodec::new(config.stream_url_prefix.clone());

    // 2. Create UseCases
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(registry.clone(), Arc::new(SystemClock)));
    let check_live_status_usecase = Arc::new(CheckLiveStatusUseCase::new(
        videos,
        inventory,
        codec.clone(),
    ));
    let get_room_presence_usecase = Arc::new(GetRoomPresenceUseCase::new(registry));

    // 3. Create and run the server
    let server = Server::new(
        join_room_usecase,
        check_live_status_usecase,
        get_room_presence_usecase,
        codec,
        ConnectionSettings {
            write_timeout: config.write_timeout(),
            heartbeat_interval: config.heartbeat_interval(),
        },
    );
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
