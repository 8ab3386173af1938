//! Server state shared across handlers.

use std::sync::Arc;

use crate::domain::MessagePusher;
use crate::usecase::{
    AddCommentUseCase, DeleteCommentUseCase, EditContentUseCase, GetRoomDetailUseCase,
    GetRoomsUseCase, GetServerStatsUseCase, JoinRoomUseCase, LeaveRoomUseCase,
};

/// Shared application state
pub struct AppState {
    /// JoinRoomUseCase（Room 参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// LeaveRoomUseCase（Room 離脱のユースケース）
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// EditContentUseCase（本文編集のユースケース）
    pub edit_content_usecase: Arc<EditContentUseCase>,
    /// AddCommentUseCase（コメント追加のユースケース）
    pub add_comment_usecase: Arc<AddCommentUseCase>,
    /// DeleteCommentUseCase（コメント削除のユースケース）
    pub delete_comment_usecase: Arc<DeleteCommentUseCase>,
    /// GetRoomsUseCase（Room 一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（Room 詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// GetServerStatsUseCase（サーバ統計取得のユースケース）
    pub get_server_stats_usecase: Arc<GetServerStatsUseCase>,
    /// MessagePusher（メッセージ通知の抽象化）
    pub message_pusher: Arc<dyn MessagePusher>,
}
