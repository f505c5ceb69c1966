//! # Signboard サーバー
//!
//! ウォレット署名付きメッセージを受け付ける掲示板バックエンド。
//!
//! ## 役割
//! - `personal_sign` 署名からの署名者アドレス復元と照合
//! - 投稿本文のサニタイズ
//! - JSONファイルへのメッセージ永続化
//! - 管理者署名によるデータファイルのダウンロード
//!
//! ## API エンドポイント
//! - `POST /api/send-message` — 署名付きメッセージの投稿
//! - `GET /api/messages` — 全メッセージの取得
//! - `POST /api/admin/messages-file` — データファイルのダウンロード（管理者のみ）

mod config;
mod endpoints;
mod error;
mod sanitize;
mod storage;

use std::sync::Arc;

use config::{BoardConfig, BoardState};
use storage::JsonFileStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = BoardConfig::from_env()?;
    let store = JsonFileStore::load(&config.data_file).await?;
    tracing::info!(
        admin = %config.admin_address,
        data_file = %store.path().display(),
        "設定を読み込みました"
    );

    let state = Arc::new(BoardState {
        store: Box::new(store),
        admin_address: config.admin_address,
        admin_challenge: config.admin_challenge.clone(),
        download_name: config.download_name(),
    });

    let app = endpoints::router(state);

    tracing::info!("Signboardを {} で起動します", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
