//! UseCase: Room 一覧の取得（読み取り専用）

use std::sync::Arc;

use crate::domain::{Room, RoomRegistry};

/// Room 一覧取得のユースケース
pub struct GetRoomsUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl GetRoomsUseCase {
    /// 新しい GetRoomsUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// 現在アクティブな（grace 中も含む）全 Room のスナップショットを返す
    pub async fn execute(&self) -> Vec<Room> {
        self.registry.list_rooms().await
    }
}
