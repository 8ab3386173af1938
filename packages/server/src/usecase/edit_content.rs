//! UseCase: ドキュメント本文の編集
//!
//! 本文はドキュメント全体の全置換（last-write-wins）です。差分適用や
//! マージは行いません。戻り値の通知対象に著者自身は含まれません。

use std::sync::Arc;

use crate::domain::{ConnectionId, RegistryError, RoomId, RoomRegistry};

/// 本文編集のユースケース
pub struct EditContentUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl EditContentUseCase {
    /// 新しい EditContentUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// 本文編集を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - 編集を通知すべき接続（著者を除く）
    /// * `Err(RegistryError)` - Room がない、または著者が参加者でない
    pub async fn execute(
        &self,
        room_id: &RoomId,
        author: &ConnectionId,
        content: String,
    ) -> Result<Vec<ConnectionId>, RegistryError> {
        self.registry.set_content(room_id, author, content).await
    }
}
