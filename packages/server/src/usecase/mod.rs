//! UseCase layer

mod check_live_status;
mod error;
mod get_room_presence;
mod join_room;

pub use check_live_status::CheckLiveStatusUseCase;
pub use error::{GetRoomPresenceError, LiveStatusError};
pub use get_room_presence::GetRoomPresenceUseCase;
pub use join_room::{JoinRoomUseCase, RoomSession};
