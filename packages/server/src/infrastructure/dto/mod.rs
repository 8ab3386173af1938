//! Data Transfer Objects (DTOs) for the room coordinator.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket event DTOs (tagged with `type`)
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
