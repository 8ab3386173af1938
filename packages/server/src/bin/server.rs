//! Collaborative text editing room server.
//!
//! Clients join named rooms over WebSocket, share a document body
//! (last-write-wins) and a comment thread, and observers can inspect rooms
//! over a read-only HTTP API.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin quillsync-server
//! cargo run --bin quillsync-server -- --host 0.0.0.0 --port 3000
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use quillsync_server::{
    domain::RoomRegistry,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRegistry},
    ui::Server,
    usecase::{
        AddCommentUseCase, DeleteCommentUseCase, EditContentUseCase, GetRoomDetailUseCase,
        GetRoomsUseCase, GetServerStatsUseCase, JoinRoomUseCase, LeaveRoomUseCase,
    },
};
use quillsync_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "quillsync-server")]
#[command(about = "Collaborative text editing room server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Seconds an empty room survives before it is destroyed
    #[arg(long, default_value = "300")]
    grace_period_secs: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Registry
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Create Registry (in-memory room store)
    let registry: Arc<dyn RoomRegistry> = Arc::new(InMemoryRoomRegistry::new(Duration::from_secs(
        args.grace_period_secs,
    )));
    tracing::info!(
        "Room registry created (grace period: {}s)",
        args.grace_period_secs
    );

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create UseCases
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(registry.clone()));
    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(registry.clone()));
    let edit_content_usecase = Arc::new(EditContentUseCase::new(registry.clone()));
    let add_comment_usecase = Arc::new(AddCommentUseCase::new(registry.clone()));
    let delete_comment_usecase = Arc::new(DeleteCommentUseCase::new(registry.clone()));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(registry.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(registry.clone()));
    let get_server_stats_usecase = Arc::new(GetServerStatsUseCase::new(registry.clone()));

    // 4. Create and run the server
    let server = Server::new(
        join_room_usecase,
        leave_room_usecase,
        edit_content_usecase,
        add_comment_usecase,
        delete_comment_usecase,
        get_rooms_usecase,
        get_room_detail_usecase,
        get_server_stats_usecase,
        message_pusher,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
