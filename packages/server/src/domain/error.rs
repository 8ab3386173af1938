//! ドメイン層のエラー定義

use thiserror::Error;

/// Value Object の構築エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("room id must not be empty")]
    EmptyRoomId,
    #[error("user id must not be empty")]
    EmptyUserId,
    #[error("username must not be empty")]
    EmptyUserName,
    #[error("color must not be empty")]
    EmptyColor,
    #[error("comment text must not be empty")]
    EmptyCommentText,
    #[error("comment id must not be empty")]
    EmptyCommentId,
}

/// Room エンティティ操作のエラー
///
/// 既存エンティティの上書きは一切行わない、という不変条件の違反を表します。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("user '{0}' already joined this room")]
    DuplicateUserId(String),
    #[error("comment '{0}' already exists in this room")]
    DuplicateCommentId(String),
}

/// RoomRegistry 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),
    #[error("connection is not a participant of room '{0}'")]
    ParticipantNotFound(String),
    #[error("user '{0}' already joined this room")]
    DuplicateUserId(String),
    #[error("comment '{0}' already exists in this room")]
    DuplicateCommentId(String),
}

/// MessagePusher のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' not found")]
    ConnectionNotFound(String),
    #[error("failed to push message: {0}")]
    PushFailed(String),
}
