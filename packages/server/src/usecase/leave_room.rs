//! UseCase: Room からの離脱
//!
//! 切断・離脱は冪等です。Room や参加者が既にいない場合は `None` を返し、
//! 呼び出し側は何も通知しません。最後の参加者の離脱は Registry 側で
//! 破棄予約（grace timer）を起動します。

use std::sync::Arc;

use crate::domain::{ConnectionId, LeaveOutcome, RoomId, RoomRegistry};

/// Room 離脱のユースケース
pub struct LeaveRoomUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Room 離脱を実行
    ///
    /// # Returns
    ///
    /// * `Some(LeaveOutcome)` - 離脱した参加者と `user_left` の通知対象
    /// * `None` - Room か参加者が既に存在しない（何も起きない）
    pub async fn execute(&self, room_id: &RoomId, conn: &ConnectionId) -> Option<LeaveOutcome> {
        let outcome = self.registry.leave(room_id, conn).await?;
        tracing::info!(
            "User '{}' left room '{}'{}",
            outcome.participant.id.as_str(),
            room_id.as_str(),
            if outcome.room_empty {
                " (room empty, destruction scheduled)"
            } else {
                ""
            }
        );
        Some(outcome)
    }
}
