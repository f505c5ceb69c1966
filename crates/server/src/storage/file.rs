//! # JSONファイルストア
//!
//! メッセージ列全体を整形済みJSON配列（2スペースインデント）として1ファイルに保存する。
//! 書き込みは一時ファイルへの書き出し + rename で行い、途中でクラッシュしても
//! 既存ファイルが切り詰められることはない。

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use signboard_types::MessageRecord;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::{MessageStore, StoreError};

/// JSONファイルによるメッセージストア実装。
pub struct JsonFileStore {
    path: PathBuf,
    /// append / raw_document はこのロックで直列化する
    records: Mutex<Vec<MessageRecord>>,
}

impl JsonFileStore {
    /// 起動時にデータファイルを読み込む。
    ///
    /// - ファイルがなければ空の列で開始する。
    /// - 内容が壊れていれば退避ファイルへ移動し、空の列で開始する。
    ///   退避に失敗しても起動は止めず、エラーを記録して空の列で開始する。
    /// - 親ディレクトリがなければ作成する。
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::load_with(path.into(), quarantine).await
    }

    /// 壊れたファイルの退避処理を差し替えられる `load`。
    async fn load_with<F, Fut>(path: PathBuf, move_aside: F) -> Result<Self, StoreError>
    where
        F: FnOnce(PathBuf) -> Fut,
        Fut: Future<Output = Result<PathBuf, StoreError>>,
    {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let records = match fs::read(&path).await {
            Ok(bytes) => match parse_document(&bytes) {
                Ok(records) => {
                    tracing::info!(
                        path = %path.display(),
                        count = records.len(),
                        "メッセージを読み込みました"
                    );
                    records
                }
                Err(e) => {
                    match move_aside(path.clone()).await {
                        Ok(backup) => tracing::error!(
                            path = %path.display(),
                            backup = %backup.display(),
                            error = %e,
                            "データファイルを読み込めません。退避して空の状態で開始します"
                        ),
                        Err(rename_error) => tracing::error!(
                            path = %path.display(),
                            error = %e,
                            rename_error = %rename_error,
                            "データファイルを読み込めず、退避にも失敗しました。空の状態で開始します"
                        ),
                    }
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    /// データファイルのパス。
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, records: &[MessageRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(records)?;
        let tmp = sibling(&self.path, ".tmp");

        let written: std::io::Result<()> = async {
            let mut file = fs::File::create(&tmp).await?;
            file.write_all(&json).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&tmp, &self.path).await
        }
        .await;

        if let Err(e) = written {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl MessageStore for JsonFileStore {
    async fn append(&self, record: MessageRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        records.push(record);

        if let Err(e) = self.persist(&records).await {
            records.pop();
            tracing::error!(path = %self.path.display(), error = %e, "メッセージの保存に失敗");
            return Err(e);
        }
        Ok(())
    }

    async fn all(&self) -> Vec<MessageRecord> {
        self.records.lock().await.clone()
    }

    async fn raw_document(&self) -> Result<Option<Vec<u8>>, StoreError> {
        let _guard = self.records.lock().await;
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn parse_document(bytes: &[u8]) -> Result<Vec<MessageRecord>, StoreError> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Corrupt(e.to_string()))
}

/// `messages.json` → `messages.json<suffix>`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// 壊れたデータファイルを `<file>.corrupt-<unix ms>` に移動する。
async fn quarantine(path: PathBuf) -> Result<PathBuf, StoreError> {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let backup = sibling(&path, &format!(".corrupt-{millis}"));
    fs::rename(&path, &backup).await?;
    Ok(backup)
}
