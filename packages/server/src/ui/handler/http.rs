//! HTTP API endpoint handlers.
//!
//! Read-only status surface for operators and dashboards. None of these
//! endpoints mutate room state.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::RoomId,
    infrastructure::dto::http::{
        ErrorDto, HealthDto, RoomDetailDto, RoomListDto, RoomSummaryDto, RoomUserSummaryDto,
    },
    infrastructure::dto::websocket::UserDto,
    ui::state::AppState,
    usecase::GetRoomDetailError,
};
use quillsync_shared::time::{get_jst_timestamp, timestamp_to_jst_rfc3339};

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    let stats = state.get_server_stats_usecase.execute().await;
    Json(HealthDto {
        status: "ok".to_string(),
        timestamp: timestamp_to_jst_rfc3339(get_jst_timestamp()),
        rooms: stats.rooms,
        total_users: stats.total_users,
    })
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<RoomListDto> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    let room_summaries: Vec<RoomSummaryDto> = rooms
        .into_iter()
        .map(|room| RoomSummaryDto {
            id: room.id.as_str().to_string(),
            user_count: room.participants.len(),
            users: room
                .participants
                .iter()
                .map(|p| RoomUserSummaryDto {
                    name: p.name.as_str().to_string(),
                    color: p.color.as_str().to_string(),
                })
                .collect(),
        })
        .collect();

    Json(RoomListDto {
        rooms: room_summaries,
    })
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, (StatusCode, Json<ErrorDto>)> {
    let room_id_vo = match RoomId::new(room_id.clone()) {
        Ok(id) => id,
        Err(_) => return Err(not_found(&room_id)),
    };

    match state.get_room_detail_usecase.execute(&room_id_vo).await {
        Ok(room) => {
            // Domain Model から DTO への変換
            let room_detail = RoomDetailDto {
                id: room.id.as_str().to_string(),
                users: room.participants.iter().map(UserDto::from).collect(),
                user_count: room.participants.len(),
                created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
            };
            Ok(Json(room_detail))
        }
        Err(GetRoomDetailError::RoomNotFound(_)) => Err(not_found(&room_id)),
    }
}

fn not_found(room_id: &str) -> (StatusCode, Json<ErrorDto>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorDto {
            error: format!("room '{}' not found", room_id),
        }),
    )
}
