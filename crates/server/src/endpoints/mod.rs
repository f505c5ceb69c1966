//! # Signboardエンドポイント
//!
//! - `POST /api/send-message` — 署名付きメッセージの投稿
//! - `GET /api/messages` — 全メッセージの取得
//! - `POST /api/admin/messages-file` — 管理者によるデータファイルのダウンロード

pub mod admin_file;
pub mod messages;
pub mod send_message;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use admin_file::handle_admin_messages_file;
pub use messages::handle_messages;
pub use send_message::handle_send_message;

use std::sync::Arc;

use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::BoardState;
use crate::error::BoardError;

/// 全エンドポイントをまとめたルーターを構築する。
///
/// CORSは全オリジン・全メソッド・全ヘッダーを許可する。
pub fn router(state: Arc<BoardState>) -> axum::Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    axum::Router::new()
        .route("/api/send-message", post(handle_send_message))
        .route("/api/messages", get(handle_messages))
        .route("/api/admin/messages-file", post(handle_admin_messages_file))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 必須フィールドを取り出す。欠落・空文字列のフィールド名を列挙して返す。
pub(crate) fn require_fields<const N: usize>(
    fields: [(&str, Option<String>); N],
) -> Result<[String; N], BoardError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
        .map(|(name, _)| *name)
        .collect();

    if !missing.is_empty() {
        return Err(BoardError::MissingFields(missing.join(", ")));
    }

    Ok(fields.map(|(_, value)| value.unwrap_or_default()))
}
