//! # Signboard 共有型定義
//!
//! HTTP APIとデータファイルで使用するデータ構造をRust構造体として提供する。
//!
//! ## エンコーディング規則
//! - JSONキーはcamelCase
//! - ウォレットアドレス: `0x` 付き16進文字列（大文字小文字を区別しない）
//! - タイムスタンプ: RFC 3339、ミリ秒精度、`Z` サフィックス

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// 永続化レコード
// ---------------------------------------------------------------------------

/// 掲示板に保存される1件のメッセージ。
///
/// 一度追加されたレコードは変更・削除されない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    /// 送信者が申告したウォレットアドレス（受信時の表記のまま保存）
    pub wallet_address: String,
    /// サニタイズ済みの本文（タグ・属性を含まない）
    pub message: String,
    /// サーバーが付与した受信時刻（UTC）
    #[serde(with = "timestamp_millis")]
    pub timestamp: DateTime<Utc>,
}

/// タイムスタンプのシリアライズ形式。
///
/// 書き出しは `2025-05-01T12:00:00.000Z` 形式に固定し、
/// 読み込みはRFC 3339であれば精度・オフセットを問わない。
pub mod timestamp_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// API リクエスト / レスポンス
// ---------------------------------------------------------------------------

/// POST /api/send-message のリクエストボディ。
///
/// 欠落を400として報告できるよう、全フィールドをOptionで受ける。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    /// 申告するウォレットアドレス
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    /// 本文（署名対象そのもの）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// `personal_sign` 形式の16進署名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// POST /api/send-message の成功レスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub success: bool,
}

/// POST /api/admin/messages-file のリクエストボディ。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminFileRequest {
    /// 管理者チャレンジ文字列に対する署名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// 全エンドポイント共通のエラーレスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
