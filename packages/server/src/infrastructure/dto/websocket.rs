//! WebSocket メッセージ DTO
//!
//! ワイヤ上のイベントを閉じたタグ付き enum としてモデル化します。
//! `type` フィールドが判別子で、既知のイベント以外はデシリアライズの時点で
//! 弾かれます（ad hoc なフィールド検査はしない）。フィールド名はワイヤ上では
//! camelCase です。

use serde::{Deserialize, Serialize};

/// クライアント → サーバーのイベント
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Room への参加要求
    #[serde(rename_all = "camelCase")]
    Join {
        room_id: String,
        user_id: String,
        username: String,
        #[serde(default)]
        color: Option<String>,
    },
    /// ドキュメント本文の全置換（last-write-wins）
    Edit {
        content: String,
        /// クライアント描画用のヒント。サーバーは解釈せず素通しする。
        #[serde(default)]
        cursor: Option<u64>,
    },
    /// コメントの追加
    Comment { text: String },
    /// コメントの削除
    #[serde(rename_all = "camelCase")]
    DeleteComment { comment_id: String },
    /// キープアライブ
    Ping,
}

/// サーバー → クライアントのイベント
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// join した本人にだけ送る Room の全量スナップショット
    Init {
        content: String,
        users: Vec<UserDto>,
        comments: Vec<CommentDto>,
    },
    /// 新しい参加者の通知（本人以外へ）
    UserJoined { user: UserDto },
    /// 参加者の離脱通知（残りの参加者へ）
    #[serde(rename_all = "camelCase")]
    UserLeft { user_id: String },
    /// ドキュメント本文の変更通知（著者以外へ）
    #[serde(rename_all = "camelCase")]
    Edit {
        content: String,
        user_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        cursor: Option<u64>,
    },
    /// コメントの追加通知（著者以外へ）
    Comment { comment: CommentDto },
    /// コメントの削除通知（操作した本人以外へ）
    #[serde(rename_all = "camelCase")]
    DeleteComment { comment_id: String },
    /// `ping` への応答（送信者にだけ）
    Pong,
}

/// 参加者の表示用情報
///
/// 接続のハンドルや ConnectionId は含めません。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// コメントの表示用情報
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub comment_id: String,
    pub author: String,
    pub color: String,
    pub text: String,
    pub timestamp: i64,
}
