//! InMemory Room Registry 実装
//!
//! ドメイン層が定義する RoomRegistry trait の具体的な実装。
//!
//! ## ロックの構造
//!
//! ```text
//! rooms: Mutex<HashMap<RoomId, Arc<Mutex<RoomEntry>>>>
//!          └ 外側: Room の作成・削除のみ（短時間）
//!                                   └ 内側: Room ごとの join / leave / broadcast を直列化
//! ```
//!
//! 外側のロックを保持したまま内側のロックを取ることはない。空になった Room は
//! `closed` を立ててから外側のマップから外すため、削除と並行して `join` した
//! 接続は閉じた Room を見つけた時点で作り直された Room に入り直す。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ClientConnection, ConnectionId, LeaveOutcome, PresenceUpdate, RoomId, RoomMember,
    RoomPresence, RoomRegistry,
};

/// 1 Room 分の状態
#[derive(Debug, Default)]
struct RoomEntry {
    members: HashMap<ConnectionId, ClientConnection>,
    /// 最後に配信した人数
    last_broadcast: usize,
    /// マップから外された（外されつつある）Room
    closed: bool,
}

impl RoomEntry {
    /// 現在の人数を全員に配信する。1 人への配信失敗は他の配信に影響しない
    fn broadcast(&mut self, room_id: RoomId) -> usize {
        let update = PresenceUpdate {
            room_id,
            count: self.members.len(),
        };

        for connection in self.members.values() {
            if let Err(e) = connection.push(update) {
                tracing::warn!(
                    "Failed to push presence of room {} to client '{}': {}",
                    room_id,
                    connection.client_id.as_str(),
                    e
                );
            } else {
                tracing::debug!(
                    "Pushed presence {} of room {} to client '{}'",
                    update.count,
                    room_id,
                    connection.client_id.as_str()
                );
            }
        }

        self.last_broadcast = update.count;
        update.count
    }

    fn snapshot(&self, room_id: RoomId) -> RoomPresence {
        let mut members: Vec<RoomMember> = self
            .members
            .values()
            .map(|c| RoomMember {
                client_id: c.client_id.clone(),
                connected_at: c.connected_at,
            })
            .collect();
        members.sort_by(|a, b| {
            a.connected_at
                .cmp(&b.connected_at)
                .then_with(|| a.client_id.as_str().cmp(b.client_id.as_str()))
        });

        RoomPresence {
            room_id,
            count: self.members.len(),
            members,
        }
    }
}

/// インメモリ Room Registry 実装
#[derive(Debug, Default)]
pub struct InMemoryRoomRegistry {
    rooms: Mutex<HashMap<RoomId, Arc<Mutex<RoomEntry>>>>,
}

impl InMemoryRoomRegistry {
    /// 新しい InMemoryRoomRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }

    async fn entry(&self, room_id: RoomId) -> Option<Arc<Mutex<RoomEntry>>> {
        let rooms = self.rooms.lock().await;
        rooms.get(&room_id).cloned()
    }

    async fn entry_or_create(&self, room_id: RoomId) -> Arc<Mutex<RoomEntry>> {
        let mut rooms = self.rooms.lock().await;
        rooms
            .entry(room_id)
            .or_insert_with(|| {
                tracing::info!("Room {} created", room_id);
                Arc::new(Mutex::new(RoomEntry::default()))
            })
            .clone()
    }

    /// `entry` がまだマップに残っていれば外す
    async fn remove_closed(&self, room_id: RoomId, entry: &Arc<Mutex<RoomEntry>>) {
        let mut rooms = self.rooms.lock().await;
        if rooms
            .get(&room_id)
            .is_some_and(|current| Arc::ptr_eq(current, entry))
        {
            rooms.remove(&room_id);
            tracing::info!("Room {} removed", room_id);
        }
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn join(&self, room_id: RoomId, connection: ClientConnection) -> usize {
        loop {
            let entry = self.entry_or_create(room_id).await;
            let mut room = entry.lock().await;

            if room.closed {
                // 最後の leave と競合した。閉じた Room を外してから作り直す
                drop(room);
                self.remove_closed(room_id, &entry).await;
                continue;
            }

            tracing::debug!(
                "Connection {} (client '{}') joined room {}",
                connection.id,
                connection.client_id.as_str(),
                room_id
            );
            room.members.insert(connection.id, connection);
            return room.broadcast(room_id);
        }
    }

    async fn leave(&self, room_id: RoomId, connection_id: &ConnectionId) -> LeaveOutcome {
        let Some(entry) = self.entry(room_id).await else {
            return LeaveOutcome::NotMember;
        };

        let mut room = entry.lock().await;
        if room.closed || room.members.remove(connection_id).is_none() {
            return LeaveOutcome::NotMember;
        }
        tracing::debug!("Connection {} left room {}", connection_id, room_id);

        if room.members.is_empty() {
            room.closed = true;
            drop(room);
            self.remove_closed(room_id, &entry).await;
            return LeaveOutcome::RoomClosed;
        }

        let remaining = room.broadcast(room_id);
        LeaveOutcome::Left { remaining }
    }

    async fn broadcast(&self, room_id: RoomId) -> Option<usize> {
        let entry = self.entry(room_id).await?;
        let mut room = entry.lock().await;
        if room.closed {
            return None;
        }
        Some(room.broadcast(room_id))
    }

    async fn count(&self, room_id: RoomId) -> usize {
        match self.entry(room_id).await {
            Some(entry) => entry.lock().await.members.len(),
            None => 0,
        }
    }

    async fn presence(&self, room_id: RoomId) -> Option<RoomPresence> {
        let entry = self.entry(room_id).await?;
        let room = entry.lock().await;
        if room.closed {
            return None;
        }
        Some(room.snapshot(room_id))
    }

    async fn rooms(&self) -> Vec<RoomPresence> {
        let entries: Vec<(RoomId, Arc<Mutex<RoomEntry>>)> = {
            let rooms = self.rooms.lock().await;
            rooms.iter().map(|(id, e)| (*id, e.clone())).collect()
        };

        let mut snapshots = Vec::with_capacity(entries.len());
        for (room_id, entry) in entries {
            let room = entry.lock().await;
            if !room.closed {
                snapshots.push(room.snapshot(room_id));
            }
        }
        snapshots.sort_by_key(|p| p.room_id);
        snapshots
    }
}
