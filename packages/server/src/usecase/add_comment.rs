//! UseCase: コメントの追加
//!
//! コメント id と作成時刻はクライアントではなくサーバが採番します。
//! 著者の表示名・カラーは Registry がロック内で送信者の参加者情報から
//! コピーするため、なりすましはできません。

use std::sync::Arc;

use quillsync_shared::time::get_jst_timestamp;

use crate::domain::{
    Comment, CommentId, CommentText, ConnectionId, RegistryError, RoomId, RoomRegistry, Timestamp,
};

/// コメント追加のユースケース
pub struct AddCommentUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl AddCommentUseCase {
    /// 新しい AddCommentUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// コメント追加を実行
    ///
    /// # Returns
    ///
    /// * `Ok((Comment, Vec<ConnectionId>))` - 確定したコメントと通知対象
    ///   （著者を除く）
    /// * `Err(RegistryError)` - Room がない、または著者が参加者でない
    pub async fn execute(
        &self,
        room_id: &RoomId,
        author: &ConnectionId,
        text: CommentText,
    ) -> Result<(Comment, Vec<ConnectionId>), RegistryError> {
        let comment_id = CommentId::generate();
        let created_at = Timestamp::new(get_jst_timestamp());
        self.registry
            .add_comment(room_id, author, comment_id, text, created_at)
            .await
    }
}
