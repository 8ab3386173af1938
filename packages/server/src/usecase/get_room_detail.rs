//! UseCase: 単一 Room の詳細取得（読み取り専用）

use std::sync::Arc;

use crate::domain::{Room, RoomId, RoomRegistry};

use super::error::GetRoomDetailError;

/// Room 詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl GetRoomDetailUseCase {
    /// 新しい GetRoomDetailUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Room 詳細取得を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Room)` - Room のスナップショット
    /// * `Err(GetRoomDetailError)` - その room id の Room が存在しない
    pub async fn execute(&self, room_id: &RoomId) -> Result<Room, GetRoomDetailError> {
        self.registry
            .get_room(room_id)
            .await
            .ok_or_else(|| GetRoomDetailError::RoomNotFound(room_id.as_str().to_string()))
    }
}
