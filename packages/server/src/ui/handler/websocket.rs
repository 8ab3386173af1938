//! WebSocket connection handlers.
//!
//! 接続ごとのライフサイクル（OPEN → JOINED → CLOSED）をここで管理します。
//! 受信フレームのデシリアライズ、Value Object への変換、UseCase の呼び出し、
//! そして確定したイベントの配信までがこのモジュールの責務です。
//! 不正なフレームや前提条件を満たさないイベントは警告ログを残して捨て、
//! 接続は切断しません。

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{
        Color, CommentId, CommentText, ConnectionId, Participant, RoomId, Timestamp, UserId,
        UserName,
    },
    infrastructure::dto::websocket::{ClientEvent, CommentDto, ServerEvent, UserDto},
    ui::state::AppState,
    usecase::JoinRoomError,
};
use quillsync_shared::time::get_jst_timestamp;

/// join 済みの接続が持つコンテキスト
///
/// 1 つの接続は高々 1 つの Room にしか参加できません。
struct JoinedContext {
    room_id: RoomId,
    user_id: UserId,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// Messages addressed to this connection (via the pusher channel) are written
/// to the socket here, outside of any room lock.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // 接続ハンドルはサーバー側で採番し、クライアントには一切公開しない
    let conn = ConnectionId::generate();
    let (sender, mut receiver) = socket.split();

    // join 前でも ping に応答できるよう、登録は upgrade 直後に行う
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .message_pusher
        .register_connection(conn.clone(), tx)
        .await;
    let mut send_task = pusher_loop(rx, sender);

    tracing::debug!("Connection '{}' opened", conn);

    let conn_clone = conn.clone();
    let state_clone = state.clone();

    // Spawn a task to receive messages from this client
    let session: Arc<tokio::sync::Mutex<Option<JoinedContext>>> =
        Arc::new(tokio::sync::Mutex::new(None));
    let session_clone = session.clone();

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error on '{}': {}", conn_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let event = match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!(
                                "Dropping malformed frame from '{}': {}",
                                conn_clone,
                                e
                            );
                            continue;
                        }
                    };
                    dispatch_event(&state_clone, &conn_clone, &session_clone, event).await;
                }
                Message::Close(_) => {
                    tracing::debug!("Connection '{}' requested close", conn_clone);
                    break;
                }
                // Ping/pong frames are handled by the WebSocket protocol layer
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // 切断処理: 登録解除してから、join 済みなら Room から離脱させる
    state.message_pusher.unregister_connection(&conn).await;

    let joined = session.lock().await.take();
    if let Some(ctx) = joined {
        if let Some(outcome) = state.leave_room_usecase.execute(&ctx.room_id, &conn).await {
            let left_event = ServerEvent::UserLeft {
                user_id: outcome.participant.id.into_string(),
            };
            push_to_targets(&state, &outcome.notify_targets, &left_event).await;
        }
    }
    tracing::debug!("Connection '{}' closed", conn);
}

/// 受信イベント 1 件を処理する
async fn dispatch_event(
    state: &Arc<AppState>,
    conn: &ConnectionId,
    session: &Arc<tokio::sync::Mutex<Option<JoinedContext>>>,
    event: ClientEvent,
) {
    match event {
        ClientEvent::Join {
            room_id,
            user_id,
            username,
            color,
        } => {
            handle_join(state, conn, session, room_id, user_id, username, color).await;
        }
        ClientEvent::Edit { content, cursor } => {
            let guard = session.lock().await;
            let Some(ctx) = guard.as_ref() else {
                tracing::warn!("Dropping edit from '{}': not joined to any room", conn);
                return;
            };
            match state
                .edit_content_usecase
                .execute(&ctx.room_id, conn, content.clone())
                .await
            {
                Ok(targets) => {
                    let event = ServerEvent::Edit {
                        content,
                        user_id: ctx.user_id.as_str().to_string(),
                        cursor,
                    };
                    push_to_targets(state, &targets, &event).await;
                }
                Err(e) => {
                    tracing::warn!("Dropping edit from '{}': {}", conn, e);
                }
            }
        }
        ClientEvent::Comment { text } => {
            let guard = session.lock().await;
            let Some(ctx) = guard.as_ref() else {
                tracing::warn!("Dropping comment from '{}': not joined to any room", conn);
                return;
            };
            let text = match CommentText::new(text) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Dropping comment from '{}': {}", conn, e);
                    return;
                }
            };
            match state
                .add_comment_usecase
                .execute(&ctx.room_id, conn, text)
                .await
            {
                Ok((comment, targets)) => {
                    let event = ServerEvent::Comment {
                        comment: CommentDto::from(&comment),
                    };
                    push_to_targets(state, &targets, &event).await;
                }
                Err(e) => {
                    tracing::warn!("Dropping comment from '{}': {}", conn, e);
                }
            }
        }
        ClientEvent::DeleteComment { comment_id } => {
            let guard = session.lock().await;
            let Some(ctx) = guard.as_ref() else {
                tracing::warn!(
                    "Dropping delete_comment from '{}': not joined to any room",
                    conn
                );
                return;
            };
            let comment_id_vo = match CommentId::new(comment_id.clone()) {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!("Dropping delete_comment from '{}': {}", conn, e);
                    return;
                }
            };
            match state
                .delete_comment_usecase
                .execute(&ctx.room_id, conn, &comment_id_vo)
                .await
            {
                Ok(targets) => {
                    let event = ServerEvent::DeleteComment { comment_id };
                    push_to_targets(state, &targets, &event).await;
                }
                Err(e) => {
                    tracing::warn!("Dropping delete_comment from '{}': {}", conn, e);
                }
            }
        }
        ClientEvent::Ping => {
            // join 前でも応答する（接続確認に使えるように）
            push_to_conn(state, conn, &ServerEvent::Pong).await;
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn handle_join(
    state: &Arc<AppState>,
    conn: &ConnectionId,
    session: &Arc<tokio::sync::Mutex<Option<JoinedContext>>>,
    room_id: String,
    user_id: String,
    username: String,
    color: Option<String>,
) {
    let mut guard = session.lock().await;
    if guard.is_some() {
        tracing::warn!("Dropping join from '{}': already joined a room", conn);
        return;
    }

    // String -> Value Object（Domain Model）への変換
    let converted = RoomId::new(room_id).and_then(|room_id| {
        let user_id = UserId::new(user_id)?;
        let username = UserName::new(username)?;
        Ok((room_id, user_id, username))
    });
    let (room_id_vo, user_id_vo, username_vo) = match converted {
        Ok(values) => values,
        Err(e) => {
            tracing::warn!("Dropping join from '{}': {}", conn, e);
            return;
        }
    };

    let participant = Participant::new(
        conn.clone(),
        user_id_vo.clone(),
        username_vo,
        Color::from_option(color),
        Timestamp::new(get_jst_timestamp()),
    );
    let joined_user = UserDto::from(&participant);

    match state
        .join_room_usecase
        .execute(room_id_vo.clone(), participant)
        .await
    {
        Ok(snapshot) => {
            *guard = Some(JoinedContext {
                room_id: room_id_vo,
                user_id: user_id_vo,
            });

            // join した本人にだけ Room の全量スナップショットを返す
            let init_event = ServerEvent::Init {
                content: snapshot.content,
                users: snapshot.participants.iter().map(UserDto::from).collect(),
                comments: snapshot.comments.iter().map(CommentDto::from).collect(),
            };
            push_to_conn(state, conn, &init_event).await;

            // 既存の参加者には新規参加者の表示情報だけを通知する
            let joined_event = ServerEvent::UserJoined { user: joined_user };
            push_to_targets(state, &snapshot.notify_targets, &joined_event).await;
        }
        Err(JoinRoomError::DuplicateUserId(user_id)) => {
            tracing::warn!(
                "Rejecting join from '{}': user '{}' already in room",
                conn,
                user_id
            );
        }
        Err(e) => {
            tracing::warn!("Dropping join from '{}': {}", conn, e);
        }
    }
}

/// 確定したイベントを複数の接続に配信する（ベストエフォート）
async fn push_to_targets(state: &Arc<AppState>, targets: &[ConnectionId], event: &ServerEvent) {
    if targets.is_empty() {
        return;
    }
    let json = serde_json::to_string(event).unwrap();
    state.message_pusher.broadcast(targets, &json).await;
}

/// 確定したイベントを単一の接続に送信する
async fn push_to_conn(state: &Arc<AppState>, conn: &ConnectionId, event: &ServerEvent) {
    let json = serde_json::to_string(event).unwrap();
    if let Err(e) = state.message_pusher.push_to(conn, &json).await {
        tracing::debug!("Failed to push to '{}': {}", conn, e);
    }
}
