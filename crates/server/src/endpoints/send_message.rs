//! # POST /api/send-message
//!
//! 署名付きメッセージの投稿。
//!
//! ## 処理フロー
//! 1. walletAddress, message, signature の存在確認
//! 2. message に対する署名から署名者アドレスを復元
//! 3. 復元アドレスと walletAddress を比較（大文字小文字を区別しない）
//! 4. 本文をサニタイズし、サーバー時刻を付与してストアに追加

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use signboard_types::{MessageRecord, SendMessageRequest, SendMessageResponse};

use crate::config::BoardState;
use crate::endpoints::require_fields;
use crate::error::BoardError;
use crate::sanitize::sanitize;

/// POST /api/send-message — 署名付きメッセージの投稿。
///
/// 署名検証はサニタイズ前の本文（ウォレットが署名した文字列）に対して行う。
pub async fn handle_send_message(
    State(state): State<Arc<BoardState>>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<SendMessageResponse>, BoardError> {
    let Json(body) = payload.map_err(|e| BoardError::BadRequest(e.body_text()))?;

    let [wallet_address, message, signature] = require_fields([
        ("walletAddress", body.wallet_address),
        ("message", body.message),
        ("signature", body.signature),
    ])?;

    let recovered = signboard_crypto::recover_address(message.as_bytes(), &signature)
        .map_err(|e| {
            tracing::warn!(wallet = %wallet_address, error = %e, "署名の検証に失敗");
            BoardError::InvalidSignature(e.to_string())
        })?;

    if !recovered.matches(&wallet_address) {
        tracing::warn!(
            wallet = %wallet_address,
            recovered = %recovered,
            "署名者がウォレットアドレスと一致しません"
        );
        return Err(BoardError::AddressMismatch);
    }

    let record = MessageRecord {
        wallet_address,
        message: sanitize(&message),
        timestamp: Utc::now(),
    };
    state.store.append(record).await?;

    tracing::info!(wallet = %recovered, "メッセージを受信しました");
    Ok(Json(SendMessageResponse { success: true }))
}
