//! ドメイン層
//!
//! エンティティ・Value Object・ドメインエラーと、Infrastructure 層が
//! 実装する 2 つのインターフェース（RoomRegistry / MessagePusher）を
//! 定義します。

pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{Comment, Participant, Room};
pub use error::{MessagePushError, RegistryError, RoomError, ValueObjectError};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{LeaveOutcome, RoomRegistry, RoomSnapshot};
pub use value_object::{
    Color, CommentId, CommentText, ConnectionId, RoomId, Timestamp, UserId, UserName,
    DEFAULT_COLOR,
};

#[cfg(test)]
pub use repository::MockRoomRegistry;
