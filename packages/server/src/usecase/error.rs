//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::RegistryError;

/// Room 参加のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    /// 同じ user id の参加者が既に Room にいる（既存参加者は上書きされない）
    #[error("user '{0}' already joined this room")]
    DuplicateUserId(String),
    /// その他の Registry エラー
    #[error(transparent)]
    Registry(RegistryError),
}

impl From<RegistryError> for JoinRoomError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::DuplicateUserId(id) => Self::DuplicateUserId(id),
            other => Self::Registry(other),
        }
    }
}

/// Room 詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),
}
