//! インメモリ実装
//!
//! プロセス内の HashMap を使った RoomRegistry 実装。
//! 再起動をまたぐ永続化は行いません。

mod registry;

pub use registry::{DEFAULT_GRACE_PERIOD, InMemoryRoomRegistry};
