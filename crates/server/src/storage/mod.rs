//! # メッセージストア
//!
//! 受信メッセージの順序付き列を保持し、単一のJSONドキュメントとして永続化する。
//! ファイル実装は `file` サブモジュールを参照。

pub mod file;

pub use file::JsonFileStore;

use signboard_types::MessageRecord;

/// ストア操作のエラー型。
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// データファイルの読み書きに失敗
    #[error("データファイルの入出力に失敗: {0}")]
    Io(#[from] std::io::Error),
    /// メッセージ列のシリアライズに失敗
    #[error("メッセージのシリアライズに失敗: {0}")]
    Serialize(#[from] serde_json::Error),
    /// データファイルがメッセージ配列として解釈できない
    #[error("データファイルが破損しています: {0}")]
    Corrupt(String),
}

/// メッセージストアの抽象インターフェース。
///
/// 追加専用。メモリ上の列と永続化ドキュメントは常に同じ内容を保つ。
#[async_trait::async_trait]
pub trait MessageStore: Send + Sync {
    /// レコードを末尾に追加し、列全体を永続化する。
    ///
    /// 永続化に失敗した場合、メモリ上の列も追加前の状態に戻す。
    async fn append(&self, record: MessageRecord) -> Result<(), StoreError>;

    /// 全レコードを追加順で返す。
    async fn all(&self) -> Vec<MessageRecord>;

    /// 永続化ドキュメントの生バイト列。まだ一度も書き込まれていなければ `None`。
    async fn raw_document(&self) -> Result<Option<Vec<u8>>, StoreError>;
}
