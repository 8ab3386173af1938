//! UseCase 層
//!
//! WebSocket / HTTP ハンドラから呼ばれるアプリケーションロジック。
//! どの UseCase も `RoomRegistry` trait にのみ依存し、送信（イベントの
//! 直列化と配信）は UI 層に委ねます。

pub mod add_comment;
pub mod delete_comment;
pub mod edit_content;
pub mod error;
pub mod get_room_detail;
pub mod get_rooms;
pub mod get_server_stats;
pub mod join_room;
pub mod leave_room;

pub use add_comment::AddCommentUseCase;
pub use delete_comment::DeleteCommentUseCase;
pub use edit_content::EditContentUseCase;
pub use error::{GetRoomDetailError, JoinRoomError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use get_server_stats::{GetServerStatsUseCase, ServerStats};
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
