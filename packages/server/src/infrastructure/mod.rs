//! Infrastructure 層
//!
//! ドメイン層が定義するインターフェースの具体的な実装（インメモリの
//! RoomRegistry、WebSocket の MessagePusher）と、プロトコルごとの DTO。

pub mod dto;
pub mod message_pusher;
pub mod repository;
