//! RoomRegistry の実装
//!
//! ドメイン層が定義する `RoomRegistry` trait の実装を提供します。

pub mod inmemory;

pub use inmemory::{DEFAULT_GRACE_PERIOD, InMemoryRoomRegistry};
