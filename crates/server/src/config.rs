//! # Signboard設定・共有状態
//!
//! 環境変数からの設定読み込みとサーバーの共有状態の定義。

use std::path::PathBuf;

use anyhow::Context;
use signboard_crypto::Address;

use crate::storage::MessageStore;

/// デフォルトの待ち受けアドレス
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
/// デフォルトのデータファイル
pub const DEFAULT_DATA_FILE: &str = "data/messages.json";
/// デフォルトの管理者アドレス
pub const DEFAULT_ADMIN_WALLET: &str = "0x4794d0B88F5579117Ca8e7ab8FF8b5f95DbD0213";
/// 管理者が署名するデフォルトのチャレンジ文字列
pub const DEFAULT_ADMIN_CHALLENGE: &str = "Soy el administrador de la dApp";

/// 起動時設定。
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// 待ち受けアドレス（`BOARD_BIND_ADDR`）
    pub bind_addr: String,
    /// データファイルのパス（`BOARD_DATA_FILE`）
    pub data_file: PathBuf,
    /// 管理者ウォレットアドレス（`BOARD_ADMIN_WALLET`）
    pub admin_address: Address,
    /// 管理者チャレンジ文字列（`BOARD_ADMIN_CHALLENGE`）
    pub admin_challenge: String,
}

impl BoardConfig {
    /// 環境変数から構築する。
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = lookup("BOARD_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let data_file = lookup("BOARD_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        let admin_wallet =
            lookup("BOARD_ADMIN_WALLET").unwrap_or_else(|| DEFAULT_ADMIN_WALLET.to_string());
        let admin_address: Address = admin_wallet
            .parse()
            .with_context(|| format!("BOARD_ADMIN_WALLETが不正です: {admin_wallet}"))?;

        let admin_challenge = lookup("BOARD_ADMIN_CHALLENGE")
            .unwrap_or_else(|| DEFAULT_ADMIN_CHALLENGE.to_string());

        Ok(Self {
            bind_addr,
            data_file,
            admin_address,
            admin_challenge,
        })
    }

    /// 管理者ダウンロード時に提示するファイル名。
    pub fn download_name(&self) -> String {
        self.data_file
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("messages.json")
            .to_string()
    }
}

/// Signboardの共有状態。
pub struct BoardState {
    /// メッセージストア（ファイル実装等、トレイトで抽象化）
    pub store: Box<dyn MessageStore>,
    /// 管理者ウォレットアドレス
    pub admin_address: Address,
    /// 管理者が署名するチャレンジ文字列
    pub admin_challenge: String,
    /// ダウンロード時のファイル名
    pub download_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = BoardConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3001");
        assert_eq!(config.data_file, PathBuf::from("data/messages.json"));
        assert!(config.admin_address.matches(DEFAULT_ADMIN_WALLET));
        assert_eq!(config.admin_challenge, "Soy el administrador de la dApp");
        assert_eq!(config.download_name(), "messages.json");
    }

    #[test]
    fn test_overrides() {
        let config = BoardConfig::from_lookup(lookup_from(&[
            ("BOARD_BIND_ADDR", "127.0.0.1:8080"),
            ("BOARD_DATA_FILE", "/var/lib/board/wall.json"),
            ("BOARD_ADMIN_WALLET", "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"),
            ("BOARD_ADMIN_CHALLENGE", "I am the admin"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.download_name(), "wall.json");
        assert_eq!(
            config.admin_address.to_string(),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
        assert_eq!(config.admin_challenge, "I am the admin");
    }

    #[test]
    fn test_invalid_admin_wallet_rejected() {
        let result = BoardConfig::from_lookup(lookup_from(&[("BOARD_ADMIN_WALLET", "admin")]));
        assert!(result.is_err());
    }
}
