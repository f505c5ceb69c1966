//! # エンドポイントテスト用共通ヘルパー
//!
//! send_message, messages, admin_fileテストで共有するモックストアとサーバー起動処理。

use std::sync::{Arc, Mutex};

use signboard_crypto::{address_of, SigningKey};
use signboard_types::{MessageRecord, SendMessageRequest};

use crate::config::BoardState;
use crate::storage::{MessageStore, StoreError};

/// テスト用の管理者チャレンジ文字列
pub const TEST_CHALLENGE: &str = "I am the board admin";

/// テスト用のモックMessageStore。
/// ファイルを使わずにメモリ上で列とドキュメントを保持する。
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<Vec<MessageRecord>>>,
    document: Arc<Mutex<Option<Vec<u8>>>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 書き込みが常に失敗するストア
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<MessageRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MessageStore for MemoryStore {
    async fn append(&self, record: MessageRecord) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Io(std::io::Error::other("disk full")));
        }
        let mut records = self.records.lock().unwrap();
        records.push(record);
        *self.document.lock().unwrap() = Some(serde_json::to_vec_pretty(&*records)?);
        Ok(())
    }

    async fn all(&self) -> Vec<MessageRecord> {
        self.records()
    }

    async fn raw_document(&self) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.document.lock().unwrap().clone())
    }
}

/// ランダムなsecp256k1署名鍵
pub fn random_key() -> SigningKey {
    SigningKey::random(&mut rand::rngs::OsRng)
}

/// 指定した管理者鍵でテスト用BoardStateを構築する
pub fn state_with_admin(store: Box<dyn MessageStore>, admin: &SigningKey) -> Arc<BoardState> {
    Arc::new(BoardState {
        store,
        admin_address: address_of(admin),
        admin_challenge: TEST_CHALLENGE.to_string(),
        download_name: "messages.json".to_string(),
    })
}

/// 管理者鍵をランダムに決めてテスト用BoardStateを構築する
pub fn test_state(store: MemoryStore) -> (Arc<BoardState>, MemoryStore) {
    let state = state_with_admin(Box::new(store.clone()), &random_key());
    (state, store)
}

pub fn send_request(wallet_address: &str, message: &str, signature: &str) -> SendMessageRequest {
    SendMessageRequest {
        wallet_address: Some(wallet_address.to_string()),
        message: Some(message.to_string()),
        signature: Some(signature.to_string()),
    }
}

/// ルーター全体を127.0.0.1の空きポートで起動し、ベースURLを返す。
pub async fn serve(state: Arc<BoardState>) -> String {
    let app = crate::endpoints::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    format!("http://127.0.0.1:{port}")
}
