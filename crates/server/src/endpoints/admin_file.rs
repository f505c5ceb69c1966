//! # POST /api/admin/messages-file
//!
//! 管理者チャレンジ文字列への署名で管理者であることを示し、
//! データファイルをそのままダウンロードする。

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use signboard_types::AdminFileRequest;

use crate::config::BoardState;
use crate::endpoints::require_fields;
use crate::error::BoardError;

/// POST /api/admin/messages-file — データファイルのダウンロード。
///
/// 署名から復元したアドレスが管理者アドレスと一致した場合のみ、
/// 永続化ドキュメントのバイト列を添付ファイルとして返す。
pub async fn handle_admin_messages_file(
    State(state): State<Arc<BoardState>>,
    payload: Result<Json<AdminFileRequest>, JsonRejection>,
) -> Result<Response, BoardError> {
    let Json(body) = payload.map_err(|e| BoardError::BadRequest(e.body_text()))?;
    let [signature] = require_fields([("signature", body.signature)])?;

    let recovered =
        signboard_crypto::recover_address(state.admin_challenge.as_bytes(), &signature)
            .map_err(|e| {
                tracing::warn!(error = %e, "管理者署名の検証に失敗");
                BoardError::InvalidSignature(e.to_string())
            })?;

    if recovered != state.admin_address {
        tracing::warn!(recovered = %recovered, "管理者以外からのダウンロード要求を拒否");
        return Err(BoardError::Unauthorized);
    }

    let document = state
        .store
        .raw_document()
        .await?
        .ok_or_else(|| BoardError::NotFound("データファイルがまだ作成されていません".to_string()))?;

    tracing::info!(admin = %recovered, bytes = document.len(), "データファイルをダウンロード");

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", state.download_name),
            ),
        ],
        document,
    )
        .into_response())
}
