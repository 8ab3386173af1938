//! HTTP API レスポンス DTO
//!
//! 運用者向けの読み取り専用ステータス面のレスポンス。
//! Room の状態を変更するエンドポイントはありません。

use serde::Serialize;

/// `GET /api/health` のレスポンス
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDto {
    pub status: String,
    /// RFC 3339 形式の現在時刻
    pub timestamp: String,
    /// 現在の Room 数
    pub rooms: usize,
    /// 全 Room の参加者数の合計
    pub total_users: usize,
}

/// `GET /api/rooms` のレスポンス
#[derive(Debug, Clone, Serialize)]
pub struct RoomListDto {
    pub rooms: Vec<RoomSummaryDto>,
}

/// Room 一覧の 1 エントリ
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub user_count: usize,
    pub users: Vec<RoomUserSummaryDto>,
}

/// Room 一覧に載せる参加者の要約（名前とカラーのみ）
#[derive(Debug, Clone, Serialize)]
pub struct RoomUserSummaryDto {
    pub name: String,
    pub color: String,
}

/// `GET /api/rooms/{room_id}` のレスポンス
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub id: String,
    pub users: Vec<super::websocket::UserDto>,
    pub user_count: usize,
    /// RFC 3339 形式の作成時刻
    pub created_at: String,
}

/// 404 など、エラー時の JSON ボディ
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDto {
    pub error: String,
}
