//! UseCase: サーバ統計の取得（ヘルスチェック用）

use std::sync::Arc;

use crate::domain::RoomRegistry;

/// サーバ統計
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerStats {
    /// 現在の Room 数（grace 中の空 Room を含む）
    pub rooms: usize,
    /// 全 Room の参加者数の合計
    pub total_users: usize,
}

/// サーバ統計取得のユースケース
pub struct GetServerStatsUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl GetServerStatsUseCase {
    /// 新しい GetServerStatsUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// 現在の Room 数と参加者数を返す
    pub async fn execute(&self) -> ServerStats {
        ServerStats {
            rooms: self.registry.room_count().await,
            total_users: self.registry.participant_count().await,
        }
    }
}
