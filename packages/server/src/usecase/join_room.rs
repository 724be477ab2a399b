//! UseCase: Room への参加と退出
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() による Registry への登録と人数配信
//! - RoomSession::leave() と Drop による退出
//!
//! ### なぜこのテストが必要か
//! - 接続が異常終了しても leave が必ず 1 回実行されることを保証する
//! - leave 漏れは Room の人数を恒久的に過大計上する
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加して明示的に退出
//! - 異常系：タスクのキャンセルなどで RoomSession が leave されずに破棄される

use std::sync::Arc;

use roomcast_shared::time::Clock;
use tokio::sync::watch;

use crate::domain::{
    ClientConnection, ClientId, ConnectionId, LeaveOutcome, PresenceUpdate, RoomId, RoomRegistry,
    Timestamp,
};

/// Room 参加のユースケース
pub struct JoinRoomUseCase {
    /// Registry（Room ごとの接続集合）
    registry: Arc<dyn RoomRegistry>,
    /// 時刻源（接続時刻の記録用）
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    /// Room に参加する
    ///
    /// # Arguments
    ///
    /// * `room_id` - 参加する Room（検証済みの非ゼロ ID）
    /// * `client_id` - 診断用のクライアント ID
    ///
    /// # Returns
    ///
    /// 参加中の接続を表す `RoomSession`。参加時の人数はすでに未読の更新として届いている。
    pub async fn execute(&self, room_id: RoomId, client_id: ClientId) -> RoomSession {
        // 初期値は既読扱い。最初に読めるのは join 時の配信
        let (tx, rx) = watch::channel(PresenceUpdate { room_id, count: 0 });
        let connected_at = Timestamp::new(self.clock.now_millis());
        let connection = ClientConnection::new(client_id.clone(), tx, connected_at);
        let connection_id = connection.id;

        let count = self.registry.join(room_id, connection).await;
        tracing::info!(
            "Client '{}' joined room {} ({} viewers)",
            client_id.as_str(),
            room_id,
            count
        );

        RoomSession {
            room_id,
            connection_id,
            client_id,
            updates: Some(rx),
            registry: self.registry.clone(),
            left: false,
        }
    }
}

/// Registry に登録された 1 接続
///
/// `leave` を呼ばずに破棄された場合、Drop で leave をスポーンする。
pub struct RoomSession {
    room_id: RoomId,
    connection_id: ConnectionId,
    client_id: ClientId,
    updates: Option<watch::Receiver<PresenceUpdate>>,
    registry: Arc<dyn RoomRegistry>,
    left: bool,
}

impl RoomSession {
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// presence 更新の受信側を取り出す（1 回のみ）
    pub fn take_updates(&mut self) -> Option<watch::Receiver<PresenceUpdate>> {
        self.updates.take()
    }

    /// Room から退出する
    pub async fn leave(mut self) -> LeaveOutcome {
        let outcome = self.registry.leave(self.room_id, &self.connection_id).await;
        // 途中でキャンセルされた場合は Drop が再度 leave する（leave は冪等）
        self.left = true;
        tracing::info!(
            "Client '{}' left room {}: {:?}",
            self.client_id.as_str(),
            self.room_id,
            outcome
        );
        outcome
    }
}

impl Drop for RoomSession {
    fn drop(&mut self) {
        if self.left {
            return;
        }

        let registry = self.registry.clone();
        let room_id = self.room_id;
        let connection_id = self.connection_id;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::warn!(
                    "Session of client '{}' in room {} dropped without leave, cleaning up",
                    self.client_id.as_str(),
                    room_id
                );
                handle.spawn(async move {
                    registry.leave(room_id, &connection_id).await;
                });
            }
            Err(_) => {
                tracing::error!(
                    "No runtime to remove connection {} from room {}",
                    connection_id,
                    room_id
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repository::InMemoryRoomRegistry;
    use roomcast_shared::time::ManualClock;
    use std::time::Duration;

    fn create_test_usecase() -> (JoinRoomUseCase, Arc<InMemoryRoomRegistry>) {
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let clock = Arc::new(ManualClock::new(1672498800000));
        (JoinRoomUseCase::new(registry.clone(), clock), registry)
    }

    fn room(id: u64) -> RoomId {
        RoomId::new(id).unwrap()
    }

    fn client(id: &str) -> ClientId {
        ClientId::new(id.to_string())
    }

    /// 次の人数更新を待つ
    async fn next_count(updates: &mut watch::Receiver<PresenceUpdate>) -> usize {
        tokio::time::timeout(Duration::from_secs(1), updates.changed())
            .await
            .unwrap()
            .unwrap();
        updates.borrow_and_update().count
    }

    #[tokio::test]
    async fn test_join_registers_and_delivers_count() {
        // テスト項目: 参加すると Registry に登録され、人数 1 が受信できる
        // given (前提条件):
        let (usecase, registry) = create_test_usecase();

        // when (操作):
        let mut session = usecase.execute(room(42), client("alice")).await;
        let mut updates = session.take_updates().unwrap();

        // then (期待する結果):
        assert_eq!(registry.count(room(42)).await, 1);
        assert_eq!(next_count(&mut updates).await, 1);
        assert!(session.take_updates().is_none());
        let presence = registry.presence(room(42)).await.unwrap();
        assert_eq!(presence.members[0].connected_at.value(), 1672498800000);
    }

    #[tokio::test]
    async fn test_leave_removes_connection() {
        // テスト項目: leave で Registry から削除され、最後の 1 人なら Room も消える
        // given (前提条件):
        let (usecase, registry) = create_test_usecase();
        let session = usecase.execute(room(42), client("alice")).await;

        // when (操作):
        let outcome = session.leave().await;

        // then (期待する結果):
        assert_eq!(outcome, LeaveOutcome::RoomClosed);
        assert!(registry.presence(room(42)).await.is_none());
    }

    #[tokio::test]
    async fn test_drop_without_leave_cleans_up() {
        // テスト項目: leave せずに破棄された場合も Registry から削除される
        // given (前提条件):
        let (usecase, registry) = create_test_usecase();
        let mut bob = usecase.execute(room(42), client("bob")).await;
        let mut bob_updates = bob.take_updates().unwrap();
        assert_eq!(next_count(&mut bob_updates).await, 1);
        let alice = usecase.execute(room(42), client("alice")).await;
        assert_eq!(next_count(&mut bob_updates).await, 2);

        // when (操作): alice の接続タスクが異常終了した
        drop(alice);

        // then (期待する結果): bob に 1 が届く
        assert_eq!(next_count(&mut bob_updates).await, 1);
        assert_eq!(registry.count(room(42)).await, 1);
    }

    #[tokio::test]
    async fn test_leave_runs_once() {
        // テスト項目: 明示的な leave の後の Drop では再度 leave しない
        // given (前提条件):
        let (usecase, registry) = create_test_usecase();
        let mut bob = usecase.execute(room(9), client("bob")).await;
        let mut bob_updates = bob.take_updates().unwrap();
        let alice = usecase.execute(room(9), client("alice")).await;
        assert_eq!(next_count(&mut bob_updates).await, 2);

        // when (操作):
        let outcome = alice.leave().await;
        tokio::task::yield_now().await;

        // then (期待する結果): leave による配信は 1 回のみ
        assert_eq!(outcome, LeaveOutcome::Left { remaining: 1 });
        assert_eq!(next_count(&mut bob_updates).await, 1);
        assert!(!bob_updates.has_changed().unwrap());
        assert_eq!(registry.count(room(9)).await, 1);
    }
}
