//! Value Object 定義
//!
//! ドメインで使う識別子・属性の newtype 群。
//! 不正な値（空文字列など）は構築時に弾き、ドメイン層の中では
//! 常に妥当な値だけが流れるようにします。

use uuid::Uuid;

use super::error::ValueObjectError;

/// 参加者未指定時のデフォルトカーソルカラー
pub const DEFAULT_COLOR: &str = "#3b82f6";

/// Room の識別子（クライアントが指定する opaque な文字列）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    /// 新しい RoomId を作成（空文字列は不可）
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyRoomId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// 参加者の識別子（Room 内で一意、グローバルには一意でない）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// 新しい UserId を作成（空文字列は不可）
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyUserId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// 参加者の表示名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    /// 新しい UserName を作成（空文字列は不可）
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyUserName);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// 表示用のカラートークン
///
/// サーバーはこの値を解釈しません。未指定なら [`DEFAULT_COLOR`] になります。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Color(String);

impl Color {
    /// 新しい Color を作成（空文字列は不可）
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyColor);
        }
        Ok(Self(value))
    }

    /// 省略可能な入力から Color を作成（None / 空文字列はデフォルト値）
    pub fn from_option(value: Option<String>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Self(v),
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self(DEFAULT_COLOR.to_string())
    }
}

/// コメント本文（空は不可）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentText(String);

impl CommentText {
    /// 新しい CommentText を作成（空文字列は不可）
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyCommentText);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// コメントの識別子（サーバー側で生成、Room 内で一意）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommentId(String);

impl CommentId {
    /// 既存の文字列から CommentId を作成（空文字列は不可）
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyCommentId);
        }
        Ok(Self(value))
    }

    /// 新しい CommentId を生成（UUID v4）
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// 接続の識別子（サーバー側で生成、接続ごとに一意）
///
/// クライアントには一切公開しません。MessagePusher のキーおよび
/// ブロードキャスト対象の計算にのみ使います。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// 新しい ConnectionId を生成（UUID v4）
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// タイムスタンプ（JST エポックミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_rejects_empty_string() {
        // テスト項目: 空の RoomId は構築できない
        // given (前提条件):
        let value = String::new();

        // when (操作):
        let result = RoomId::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::EmptyRoomId));
    }

    #[test]
    fn test_user_id_accepts_non_empty_string() {
        // テスト項目: 空でない UserId は構築できる
        // given (前提条件):
        let value = "alice".to_string();

        // when (操作):
        let result = UserId::new(value);

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "alice");
    }

    #[test]
    fn test_user_name_rejects_empty_string() {
        // テスト項目: 空の UserName は構築できない
        // given (前提条件):
        let value = String::new();

        // when (操作):
        let result = UserName::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::EmptyUserName));
    }

    #[test]
    fn test_color_from_option_uses_default_when_absent() {
        // テスト項目: color 未指定時はデフォルトカラーになる
        // given (前提条件):
        let value: Option<String> = None;

        // when (操作):
        let color = Color::from_option(value);

        // then (期待する結果):
        assert_eq!(color.as_str(), DEFAULT_COLOR);
    }

    #[test]
    fn test_color_from_option_keeps_given_value() {
        // テスト項目: color 指定時は指定値がそのまま使われる
        // given (前提条件):
        let value = Some("#ff0000".to_string());

        // when (操作):
        let color = Color::from_option(value);

        // then (期待する結果):
        assert_eq!(color.as_str(), "#ff0000");
    }

    #[test]
    fn test_comment_text_rejects_empty_string() {
        // テスト項目: 空のコメント本文は構築できない
        // given (前提条件):
        let value = String::new();

        // when (操作):
        let result = CommentText::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::EmptyCommentText));
    }

    #[test]
    fn test_comment_id_generate_produces_unique_ids() {
        // テスト項目: 生成される CommentId が一意である
        // given (前提条件):

        // when (操作):
        let id1 = CommentId::generate();
        let id2 = CommentId::generate();

        // then (期待する結果):
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_connection_id_generate_produces_unique_ids() {
        // テスト項目: 生成される ConnectionId が一意である
        // given (前提条件):

        // when (操作):
        let id1 = ConnectionId::generate();
        let id2 = ConnectionId::generate();

        // then (期待する結果):
        assert_ne!(id1, id2);
    }
}
