//! # GET /api/messages
//!
//! 全メッセージを追加順で返す。

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use signboard_types::MessageRecord;

use crate::config::BoardState;

/// GET /api/messages — 全メッセージの取得。
pub async fn handle_messages(State(state): State<Arc<BoardState>>) -> Json<Vec<MessageRecord>> {
    Json(state.store.all().await)
}
