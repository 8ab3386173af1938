//! RoomRegistry trait 定義
//!
//! ドメイン層が必要とする Room ストアのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 排他制御の契約
//!
//! 変更系の各メソッドは「Room の状態変更 + ブロードキャスト対象の計算」を
//! 1 つのクリティカルセクションとして実行します。呼び出し側（UseCase 層）が
//! 受け取った対象リストへの送信はロックの外で行われます。
//! 異なる Room への操作は並行に進んでよく、Room 間の順序保証はありません。

use async_trait::async_trait;

use super::entity::{Comment, Participant, Room};
use super::error::RegistryError;
use super::value_object::{CommentId, CommentText, ConnectionId, RoomId, Timestamp};

/// `join` 成功時に新規参加者へ返す Room の全量スナップショット
///
/// この時点の状態から以降のブロードキャストを再生すれば、参加者のローカルな
/// ビューは常にサーバー状態と一致します（init が照合点）。
#[derive(Debug, Clone)]
pub struct RoomSnapshot {
    /// 現在のドキュメント本文
    pub content: String,
    /// 現在の参加者ロスター（新規参加者自身を含む、参加順）
    pub participants: Vec<Participant>,
    /// 現在のコメントスレッド（追記順）
    pub comments: Vec<Comment>,
    /// `user_joined` を通知すべき接続（新規参加者自身を除く）
    pub notify_targets: Vec<ConnectionId>,
}

/// `leave` が実際に参加者を削除したときの結果
#[derive(Debug, Clone)]
pub struct LeaveOutcome {
    /// 削除された参加者
    pub participant: Participant,
    /// `user_left` を通知すべき接続（残りの全参加者）
    pub notify_targets: Vec<ConnectionId>,
    /// 削除の結果 Room が空になったか
    pub room_empty: bool,
}

/// Room Registry trait
///
/// プロセス全体で room id → Room の対応を管理するストアのインターフェース。
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には
/// 依存しません。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// Room に参加する
    ///
    /// 未知の room id なら空の Room を作ってから参加させます。
    /// 参加はその Room の破棄予約（grace timer）をキャンセルします。
    /// 同じ `UserId` が既に Room にいる場合は何も変更せずエラーを返します。
    async fn join(
        &self,
        room_id: RoomId,
        participant: Participant,
    ) -> Result<RoomSnapshot, RegistryError>;

    /// Room から離脱する
    ///
    /// Room か参加者が既にない場合は `None`（冪等）。最後の参加者の離脱は
    /// 破棄タイマーを起動します。
    async fn leave(&self, room_id: &RoomId, conn: &ConnectionId) -> Option<LeaveOutcome>;

    /// ドキュメント本文を全置換する（last-write-wins）
    ///
    /// 戻り値は通知対象（送信者を除く全参加者）。
    async fn set_content(
        &self,
        room_id: &RoomId,
        author: &ConnectionId,
        content: String,
    ) -> Result<Vec<ConnectionId>, RegistryError>;

    /// コメントを追加する
    ///
    /// 著者の表示名・カラーはロック内で送信者の参加者情報からコピーします。
    /// 戻り値は確定したコメントと通知対象（送信者を除く全参加者）。
    async fn add_comment(
        &self,
        room_id: &RoomId,
        author: &ConnectionId,
        comment_id: CommentId,
        text: CommentText,
        created_at: Timestamp,
    ) -> Result<(Comment, Vec<ConnectionId>), RegistryError>;

    /// コメントを削除する（存在しなければ no-op）
    ///
    /// 戻り値は通知対象（送信者を除く全参加者）。
    async fn delete_comment(
        &self,
        room_id: &RoomId,
        author: &ConnectionId,
        comment_id: &CommentId,
    ) -> Result<Vec<ConnectionId>, RegistryError>;

    /// Room を取得する（スナップショットのクローン）
    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    /// 全ての Room を取得する
    async fn list_rooms(&self) -> Vec<Room>;

    /// 現在の Room 数
    async fn room_count(&self) -> usize;

    /// 全 Room の参加者数の合計
    async fn participant_count(&self) -> usize;
}
