//! ドメインエンティティ定義
//!
//! `Room` が共有状態の中心です。1 つの Room が 1 つのドキュメント本文、
//! 参加者ロスター、コメントスレッドを所有し、全ての変更はこのエンティティの
//! メソッドを通ります。排他制御はエンティティの外側
//! （Infrastructure 層の Room 単位の Mutex）で行います。
//!
//! ## 不変条件
//!
//! - 参加者は `UserId` で Room 内一意（上書きせず拒否）
//! - コメントは `CommentId` で Room 内一意（上書きせず拒否）
//! - `content` は last-write-wins：マージも差分も行わず全置換する

use super::value_object::{
    Color, CommentId, CommentText, ConnectionId, RoomId, Timestamp, UserId, UserName,
};
use super::error::RoomError;

/// Room に参加している 1 ユーザー
///
/// `conn` は参加者が所有する唯一の接続の識別子で、クライアントには公開しません。
/// 一度作られた Participant は変更されません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// この参加者が所有する接続
    pub conn: ConnectionId,
    /// Room 内で一意な参加者 ID（クライアントが指定）
    pub id: UserId,
    /// 表示名
    pub name: UserName,
    /// 表示用カラートークン
    pub color: Color,
    /// 参加時刻
    pub joined_at: Timestamp,
}

impl Participant {
    pub fn new(
        conn: ConnectionId,
        id: UserId,
        name: UserName,
        color: Color,
        joined_at: Timestamp,
    ) -> Self {
        Self {
            conn,
            id,
            name,
            color,
            joined_at,
        }
    }
}

/// ドキュメントに付くコメント
///
/// `author` と `color` は作成時点の参加者からコピーされた値であり、
/// その後の参加者の変化に追従しません。編集操作は存在しません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Room 内で一意なコメント ID
    pub id: CommentId,
    /// 作成時点の著者表示名
    pub author: UserName,
    /// 作成時点の著者カラー
    pub color: Color,
    /// 本文
    pub text: CommentText,
    /// 作成時刻
    pub created_at: Timestamp,
}

/// 1 つのコラボレーションセッション
#[derive(Debug, Clone)]
pub struct Room {
    /// Room の識別子（Registry のキー）
    pub id: RoomId,
    /// ドキュメント本文（差分ログではなく現在値そのもの）
    pub content: String,
    /// 参加者ロスター（挿入順 = 参加順）
    pub participants: Vec<Participant>,
    /// コメントスレッド（追記順）
    pub comments: Vec<Comment>,
    /// 作成時刻
    pub created_at: Timestamp,
}

impl Room {
    /// 空の Room を作成
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            content: String::new(),
            participants: Vec::new(),
            comments: Vec::new(),
            created_at,
        }
    }

    /// 参加者を追加
    ///
    /// 同じ `UserId` の参加者が既にいる場合は追加せずエラーを返します。
    pub fn add_participant(&mut self, participant: Participant) -> Result<(), RoomError> {
        if self.participants.iter().any(|p| p.id == participant.id) {
            return Err(RoomError::DuplicateUserId(
                participant.id.as_str().to_string(),
            ));
        }
        self.participants.push(participant);
        Ok(())
    }

    /// 接続 ID で参加者を削除し、削除した参加者を返す
    ///
    /// 既にいない場合は `None`（二重クローズ対策のため冪等）。
    pub fn remove_participant(&mut self, conn: &ConnectionId) -> Option<Participant> {
        let pos = self.participants.iter().position(|p| &p.conn == conn)?;
        Some(self.participants.remove(pos))
    }

    /// 接続 ID で参加者を引く
    pub fn participant_by_conn(&self, conn: &ConnectionId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.conn == conn)
    }

    /// ドキュメント本文を全置換する（last-write-wins）
    pub fn set_content(&mut self, content: String) {
        self.content = content;
    }

    /// コメントを追加
    ///
    /// 同じ `CommentId` のコメントが既にある場合は追加せずエラーを返します。
    pub fn add_comment(&mut self, comment: Comment) -> Result<(), RoomError> {
        if self.comments.iter().any(|c| c.id == comment.id) {
            return Err(RoomError::DuplicateCommentId(
                comment.id.as_str().to_string(),
            ));
        }
        self.comments.push(comment);
        Ok(())
    }

    /// コメントを ID で削除する（存在しなければ何もしない）
    ///
    /// 削除した場合 `true` を返します。
    pub fn delete_comment(&mut self, comment_id: &CommentId) -> bool {
        let before = self.comments.len();
        self.comments.retain(|c| &c.id != comment_id);
        self.comments.len() < before
    }

    /// 指定した接続を除く全参加者の接続 ID（ブロードキャスト対象）
    pub fn broadcast_targets(&self, exclude: &ConnectionId) -> Vec<ConnectionId> {
        self.participants
            .iter()
            .filter(|p| &p.conn != exclude)
            .map(|p| p.conn.clone())
            .collect()
    }

    /// 全参加者の接続 ID
    pub fn all_connections(&self) -> Vec<ConnectionId> {
        self.participants.iter().map(|p| p.conn.clone()).collect()
    }

    /// 参加者がいなければ true
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
