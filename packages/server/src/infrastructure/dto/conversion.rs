//! Conversion logic between DTOs and domain entities.

use crate::domain::{Comment, Participant};
use crate::infrastructure::dto::websocket::{CommentDto, UserDto};

// ========================================
// Domain Entity → DTO
// ========================================
// ConnectionId は表示用情報に含めない（接続ハンドルをクライアントに
// 漏らさない）。

impl From<&Participant> for UserDto {
    fn from(participant: &Participant) -> Self {
        Self {
            id: participant.id.as_str().to_string(),
            name: participant.name.as_str().to_string(),
            color: participant.color.as_str().to_string(),
        }
    }
}

impl From<&Comment> for CommentDto {
    fn from(comment: &Comment) -> Self {
        Self {
            comment_id: comment.id.as_str().to_string(),
            author: comment.author.as_str().to_string(),
            color: comment.color.as_str().to_string(),
            text: comment.text.as_str().to_string(),
            timestamp: comment.created_at.value(),
        }
    }
}
