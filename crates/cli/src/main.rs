//! # Signboard CLI
//!
//! 秘密鍵による `personal_sign` 署名と、Signboardサーバーへの投稿・取得を行う。
//!
//! 秘密鍵は `--key` または環境変数 `BOARD_PRIVATE_KEY` から読み込む。

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use signboard_crypto::{address_of, parse_signing_key, sign_personal_message, SigningKey};
use signboard_types::{AdminFileRequest, ErrorResponse, MessageRecord, SendMessageRequest};

const DEFAULT_SERVER: &str = "http://localhost:3001";
const DEFAULT_CHALLENGE: &str = "Soy el administrador de la dApp";

#[derive(Parser)]
#[command(name = "signboard-cli", version, about = "Signboard wallet-signed message board client")]
struct Cli {
    /// 16進秘密鍵（未指定時は BOARD_PRIVATE_KEY）
    #[arg(long, global = true, value_name = "HEX")]
    key: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 秘密鍵のアドレス（EIP-55）を表示
    Address,
    /// テキストに personal_sign 署名して表示
    Sign { text: String },
    /// 署名してメッセージを投稿
    Send {
        #[arg(long, default_value = DEFAULT_SERVER)]
        server: String,
        text: String,
    },
    /// 全メッセージを取得
    List {
        #[arg(long, default_value = DEFAULT_SERVER)]
        server: String,
    },
    /// 管理者チャレンジに署名してデータファイルをダウンロード
    AdminDownload {
        #[arg(long, default_value = DEFAULT_SERVER)]
        server: String,
        #[arg(long, default_value = DEFAULT_CHALLENGE)]
        challenge: String,
        /// 保存先（未指定時は標準出力）
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

fn load_key(flag: Option<String>) -> anyhow::Result<SigningKey> {
    let hex = match flag {
        Some(hex) => hex,
        None => std::env::var("BOARD_PRIVATE_KEY")
            .context("--key か BOARD_PRIVATE_KEY で秘密鍵を指定してください")?,
    };
    Ok(parse_signing_key(&hex)?)
}

/// エラーレスポンスを `{"error": ...}` から取り出して失敗させる。
async fn check(response: reqwest::Response) -> anyhow::Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|e| e.error)
        .unwrap_or(text);
    bail!("サーバーがエラーを返しました: HTTP {status} - {message}")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Command::Address => {
            let key = load_key(cli.key)?;
            println!("{}", address_of(&key));
        }
        Command::Sign { text } => {
            let key = load_key(cli.key)?;
            println!("{}", sign_personal_message(&key, text.as_bytes())?);
        }
        Command::Send { server, text } => {
            let key = load_key(cli.key)?;
            let request = SendMessageRequest {
                wallet_address: Some(address_of(&key).to_string()),
                signature: Some(sign_personal_message(&key, text.as_bytes())?),
                message: Some(text),
            };
            let response = client
                .post(format!("{server}/api/send-message"))
                .json(&request)
                .send()
                .await?;
            check(response).await?;
            println!("送信しました");
        }
        Command::List { server } => {
            let response = client.get(format!("{server}/api/messages")).send().await?;
            let records: Vec<MessageRecord> = check(response).await?.json().await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::AdminDownload {
            server,
            challenge,
            out,
        } => {
            let key = load_key(cli.key)?;
            let request = AdminFileRequest {
                signature: Some(sign_personal_message(&key, challenge.as_bytes())?),
            };
            let response = client
                .post(format!("{server}/api/admin/messages-file"))
                .json(&request)
                .send()
                .await?;
            let bytes = check(response).await?.bytes().await?;
            match out {
                Some(path) => {
                    std::fs::write(&path, &bytes)
                        .with_context(|| format!("{} に書き込めません", path.display()))?;
                    eprintln!("{} バイトを {} に保存しました", bytes.len(), path.display());
                }
                None => println!("{}", String::from_utf8_lossy(&bytes)),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_send_defaults_server() {
        let cli = Cli::try_parse_from(["signboard-cli", "--key", "0x01", "send", "gm"]).unwrap();
        assert_eq!(cli.key.as_deref(), Some("0x01"));
        match cli.command {
            Command::Send { server, text } => {
                assert_eq!(server, DEFAULT_SERVER);
                assert_eq!(text, "gm");
            }
            _ => panic!("expected send"),
        }
    }

    #[test]
    fn test_parse_admin_download() {
        let cli = Cli::try_parse_from([
            "signboard-cli",
            "admin-download",
            "--server",
            "http://board:3001",
            "--out",
            "dump.json",
        ])
        .unwrap();
        match cli.command {
            Command::AdminDownload {
                server,
                challenge,
                out,
            } => {
                assert_eq!(server, "http://board:3001");
                assert_eq!(challenge, DEFAULT_CHALLENGE);
                assert_eq!(out, Some(PathBuf::from("dump.json")));
            }
            _ => panic!("expected admin-download"),
        }
    }

    #[test]
    fn test_load_key_from_flag() {
        let key = load_key(Some(
            "0000000000000000000000000000000000000000000000000000000000000001".to_string(),
        ))
        .unwrap();
        assert_eq!(
            address_of(&key).to_string(),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
    }
}
