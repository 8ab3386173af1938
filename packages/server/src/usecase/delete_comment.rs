//! UseCase: コメントの削除
//!
//! 存在しない comment id の削除は no-op として成功させ、その場合も
//! `delete_comment` イベントは中継します（削除は収束操作のため、重複
//! 削除の競合をエラーにしません）。

use std::sync::Arc;

use crate::domain::{CommentId, ConnectionId, RegistryError, RoomId, RoomRegistry};

/// コメント削除のユースケース
pub struct DeleteCommentUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl DeleteCommentUseCase {
    /// 新しい DeleteCommentUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// コメント削除を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - 削除を通知すべき接続（著者を除く）
    /// * `Err(RegistryError)` - Room がない、または著者が参加者でない
    pub async fn execute(
        &self,
        room_id: &RoomId,
        author: &ConnectionId,
        comment_id: &CommentId,
    ) -> Result<Vec<ConnectionId>, RegistryError> {
        self.registry.delete_comment(room_id, author, comment_id).await
    }
}
