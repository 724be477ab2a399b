//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{
    domain::StreamKeyCodec,
    usecase::{CheckLiveStatusUseCase, GetRoomPresenceUseCase, JoinRoomUseCase},
};

use super::{
    handler::{
        get_live_status, get_live_videos, get_room_detail, get_rooms, get_stream_url,
        health_check, websocket_handler,
    },
    signal::shutdown_signal,
    state::{AppState, ConnectionSettings},
};

/// Presence server
///
/// This struct encapsulates the server dependencies and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     join_room_usecase,
///     check_live_status_usecase,
///     get_room_presence_usecase,
///     codec,
///     ConnectionSettings::default(),
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// JoinRoomUseCase（Room 参加のユースケース）
    join_room_usecase: Arc<JoinRoomUseCase>,
    /// CheckLiveStatusUseCase（ライブ判定のユースケース）
    check_live_status_usecase: Arc<CheckLiveStatusUseCase>,
    /// GetRoomPresenceUseCase（Room 状態取得のユースケース）
    get_room_presence_usecase: Arc<GetRoomPresenceUseCase>,
    codec: StreamKeyCodec,
    connection: ConnectionSettings,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        join_room_usecase: Arc<JoinRoomUseCase>,
        check_live_status_usecase: Arc<CheckLiveStatusUseCase>,
        get_room_presence_usecase: Arc<GetRoomPresenceUseCase>,
        codec: StreamKeyCodec,
        connection: ConnectionSettings,
    ) -> Self {
        Self {
            join_room_usecase,
            check_live_status_usecase,
            get_room_presence_usecase,
            codec,
            connection,
        }
    }

    /// Build the router with all endpoints
    pub fn into_router(self) -> Router {
        let app_state = Arc::new(AppState {
            join_room_usecase: self.join_room_usecase,
            check_live_status_usecase: self.check_live_status_usecase,
            get_room_presence_usecase: self.get_room_presence_usecase,
            codec: self.codec,
            connection: self.connection,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/api/video/online/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/video/live", get(get_live_status))
            .route("/api/video/live/list", get(get_live_videos))
            .route("/api/live/url", get(get_stream_url))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{vid}", get(get_room_detail))
            .route("/api/health", get(health_check))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the presence server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.into_router();

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Presence server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/api/video/online/ws?vid=<id>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
