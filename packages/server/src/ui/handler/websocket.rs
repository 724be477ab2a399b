//! WebSocket connection handlers.
//!
//! One upgraded connection per viewer. The handler joins the room, relays
//! presence updates to the peer and always leaves the room when the connection
//! ends, whatever the reason.

use std::{fmt::Display, sync::Arc};

use axum::{
    body::Bytes,
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::{Sink, SinkExt},
    stream::{Stream, StreamExt},
};
use serde::Deserialize;
use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};

use crate::{
    domain::{ClientId, PresenceUpdate, RoomId},
    infrastructure::dto::websocket::PresenceMessage,
    ui::state::{AppState, ConnectionSettings},
    usecase::JoinRoomUseCase,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub vid: Option<u64>,
    #[serde(default)]
    pub client_id: String,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // vid が無い / 0 の場合はアップグレードしない
    let Some(Ok(room_id)) = query.vid.map(RoomId::new) else {
        tracing::warn!(
            "Rejected connection of client '{}': missing or zero vid",
            query.client_id
        );
        return Err(StatusCode::BAD_REQUEST);
    };
    let client_id = ClientId::new(query.client_id);

    Ok(ws
        .on_failed_upgrade(|e| tracing::warn!("WebSocket upgrade failed: {}", e))
        .on_upgrade(move |socket| handle_socket(socket, state, room_id, client_id)))
}

/// Spawns a task that relays presence updates to the WebSocket sender.
///
/// Pings are sent every heartbeat interval; every write is bounded by the write
/// timeout. The task ends when the update channel closes or a write fails.
///
/// # Arguments
///
/// * `rx` - Latest presence of the room this client joined
/// * `sender` - WebSocket sink to send messages to this client
/// * `settings` - Write timeout and heartbeat interval
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop<S>(
    mut rx: watch::Receiver<PresenceUpdate>,
    mut sender: S,
    settings: ConnectionSettings,
) -> JoinHandle<()>
where
    S: Sink<Message> + Unpin + Send + 'static,
    S::Error: Display + Send,
{
    tokio::spawn(async move {
        let mut heartbeat = tokio::time::interval_at(
            tokio::time::Instant::now() + settings.heartbeat_interval,
            settings.heartbeat_interval,
        );
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let message = tokio::select! {
                changed = rx.changed() => {
                    // registry から外された
                    if changed.is_err() {
                        break;
                    }
                    let update = *rx.borrow_and_update();
                    match serde_json::to_string(&PresenceMessage::from(update)) {
                        Ok(json) => Message::Text(json.into()),
                        Err(e) => {
                            tracing::error!("Failed to serialize presence update: {}", e);
                            continue;
                        }
                    }
                }
                _ = heartbeat.tick() => Message::Ping(Bytes::new()),
            };

            match tokio::time::timeout(settings.write_timeout, sender.send(message)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::debug!("WebSocket write failed: {}", e);
                    break;
                }
                Err(_) => {
                    tracing::warn!(
                        "WebSocket write timed out after {:?}",
                        settings.write_timeout
                    );
                    break;
                }
            }
        }
    })
}

/// Spawns a task that drains the client's messages until close or error.
///
/// Clients are not required to send anything; application messages are ignored.
fn receiver_loop<R, E>(mut receiver: R, client_id: ClientId) -> JoinHandle<()>
where
    R: Stream<Item = Result<Message, E>> + Unpin + Send + 'static,
    E: Display + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => {
                    tracing::info!("Client '{}' requested close", client_id.as_str());
                    break;
                }
                Ok(Message::Text(text)) => {
                    tracing::debug!(
                        "Ignoring text from client '{}': {}",
                        client_id.as_str(),
                        text.as_str()
                    );
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("WebSocket error from client '{}': {}", client_id.as_str(), e);
                    break;
                }
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    room_id: RoomId,
    client_id: ClientId,
) {
    let (sender, receiver) = socket.split();
    run_connection(
        &state.join_room_usecase,
        state.connection,
        room_id,
        client_id,
        sender,
        receiver,
    )
    .await;
}

/// Joins the room and relays presence until either direction ends, then leaves.
async fn run_connection<S, R, E>(
    join_room_usecase: &JoinRoomUseCase,
    settings: ConnectionSettings,
    room_id: RoomId,
    client_id: ClientId,
    sender: S,
    receiver: R,
) where
    S: Sink<Message> + Unpin + Send + 'static,
    S::Error: Display + Send,
    R: Stream<Item = Result<Message, E>> + Unpin + Send + 'static,
    E: Display + Send + 'static,
{
    let mut session = join_room_usecase.execute(room_id, client_id.clone()).await;
    let Some(updates) = session.take_updates() else {
        session.leave().await;
        return;
    };

    let mut send_task = pusher_loop(updates, sender, settings);
    let mut recv_task = receiver_loop(receiver, client_id);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    session.leave().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::RoomRegistry, infrastructure::repository::InMemoryRoomRegistry};
    use futures_util::{future, sink, stream};
    use roomcast_shared::time::SystemClock;
    use std::{io, time::Duration};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 書き込みの失敗・タイムアウトで接続が終了し、Room から退出すること
    // - クライアントが close を送った場合も退出すること
    //
    // 【なぜこのテストが必要か】
    // - 書き込めない接続が Room に残ると人数が恒久的に過大になる
    // ========================================

    type Incoming = Result<Message, io::Error>;

    fn settings(write_timeout: Duration) -> ConnectionSettings {
        ConnectionSettings {
            write_timeout,
            heartbeat_interval: Duration::from_secs(3600),
        }
    }

    fn create_test_usecase() -> (JoinRoomUseCase, Arc<InMemoryRoomRegistry>) {
        let registry = Arc::new(InMemoryRoomRegistry::new());
        (
            JoinRoomUseCase::new(registry.clone(), Arc::new(SystemClock)),
            registry,
        )
    }

    fn room(id: u64) -> RoomId {
        RoomId::new(id).unwrap()
    }

    fn client(id: &str) -> ClientId {
        ClientId::new(id.to_string())
    }

    #[tokio::test]
    async fn test_write_timeout_leaves_room() {
        // テスト項目: 書き込みが完了しない接続はタイムアウト後に Room から退出する
        // given (前提条件): 送信が永遠に終わらないソケットと、何も送ってこないクライアント
        let (usecase, registry) = create_test_usecase();
        let stalled = Box::pin(sink::unfold((), |(), _message: Message| {
            future::pending::<Result<(), io::Error>>()
        }));
        let silent = stream::pending::<Incoming>();

        // when (操作):
        let finished = tokio::time::timeout(
            Duration::from_secs(2),
            run_connection(
                &usecase,
                settings(Duration::from_millis(50)),
                room(42),
                client("stalled"),
                stalled,
                silent,
            ),
        )
        .await;

        // then (期待する結果):
        assert!(finished.is_ok());
        assert_eq!(registry.count(room(42)).await, 0);
        assert!(registry.presence(room(42)).await.is_none());
    }

    #[tokio::test]
    async fn test_write_error_leaves_room_and_notifies_others() {
        // テスト項目: 書き込みエラーの接続は Room から退出し、残りのメンバーに人数が届く
        // given (前提条件): bob が先に参加している
        let (usecase, registry) = create_test_usecase();
        let mut bob = usecase.execute(room(7), client("bob")).await;
        let mut bob_updates = bob.take_updates().unwrap();
        let broken = Box::pin(sink::unfold((), |(), _message: Message| async {
            Err::<(), _>(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"))
        }));
        let silent = stream::pending::<Incoming>();

        // when (操作):
        run_connection(
            &usecase,
            settings(Duration::from_secs(5)),
            room(7),
            client("broken"),
            broken,
            silent,
        )
        .await;

        // then (期待する結果): bob の最新の人数は 1
        assert_eq!(registry.count(room(7)).await, 1);
        assert_eq!(bob_updates.borrow_and_update().count, 1);
    }

    #[tokio::test]
    async fn test_client_close_leaves_room() {
        // テスト項目: クライアントの close で Room から退出する
        // given (前提条件):
        let (usecase, registry) = create_test_usecase();
        let accepting = sink::drain::<Message>();
        let closing = stream::iter(vec![
            Ok::<_, io::Error>(Message::Text("hello".into())),
            Ok(Message::Close(None)),
        ]);

        // when (操作):
        let finished = tokio::time::timeout(
            Duration::from_secs(2),
            run_connection(
                &usecase,
                settings(Duration::from_secs(5)),
                room(3),
                client("leaving"),
                accepting,
                closing,
            ),
        )
        .await;

        // then (期待する結果):
        assert!(finished.is_ok());
        assert!(registry.presence(room(3)).await.is_none());
    }
}
