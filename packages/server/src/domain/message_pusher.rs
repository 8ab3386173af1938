//! MessagePusher trait 定義
//!
//! クライアントへのメッセージ送信（通知）の抽象化。
//! 具体的な実装（WebSocket）は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::MessagePushError;
use super::value_object::ConnectionId;

/// 接続ごとの送信チャンネル
///
/// 送信はノンブロッキングで、Room のクリティカルセクションを塞ぎません。
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Message Pusher trait
///
/// 接続の登録・解除と、シリアライズ済みメッセージの送信を担います。
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録する
    async fn register_connection(&self, conn: ConnectionId, sender: PusherChannel);

    /// 接続を解除する
    async fn unregister_connection(&self, conn: &ConnectionId);

    /// 特定の接続にメッセージを送信する
    async fn push_to(&self, conn: &ConnectionId, message: &str) -> Result<(), MessagePushError>;

    /// 複数の接続にメッセージを送信する
    ///
    /// 配送はベストエフォートです。一部の接続への送信失敗はログに残すだけで、
    /// 他の接続への配送を中断しません。
    async fn broadcast(&self, targets: &[ConnectionId], message: &str);
}
