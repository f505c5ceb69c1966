//! # Signboard エラー型
//!
//! 全エンドポイントで共通のエラー型。
//! ハンドラ境界で `{"error": "..."}` 形式のJSONとHTTPステータスに変換する。

use axum::http::StatusCode;
use axum::Json;
use signboard_types::ErrorResponse;

use crate::storage::StoreError;

/// Signboardエラー型。
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// 必須フィールドの欠落（空文字列を含む）
    #[error("必須フィールドがありません: {0}")]
    MissingFields(String),
    /// リクエストボディをパースできない
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),
    /// 署名の形式不正、または公開鍵の復元失敗
    #[error("署名が不正です: {0}")]
    InvalidSignature(String),
    /// 復元したアドレスが申告されたアドレスと一致しない
    #[error("署名者がウォレットアドレスと一致しません")]
    AddressMismatch,
    /// 復元したアドレスが管理者アドレスではない
    #[error("権限がありません")]
    Unauthorized,
    /// 対象が存在しない
    #[error("{0}")]
    NotFound(String),
    /// データファイルの入出力・シリアライズ失敗
    #[error("ストレージ操作に失敗: {0}")]
    Storage(String),
}

impl BoardError {
    pub fn status(&self) -> StatusCode {
        match self {
            BoardError::MissingFields(_)
            | BoardError::BadRequest(_)
            | BoardError::InvalidSignature(_) => StatusCode::BAD_REQUEST,
            BoardError::AddressMismatch | BoardError::Unauthorized => StatusCode::FORBIDDEN,
            BoardError::NotFound(_) => StatusCode::NOT_FOUND,
            BoardError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for BoardError {
    fn from(e: StoreError) -> Self {
        BoardError::Storage(e.to_string())
    }
}

impl axum::response::IntoResponse for BoardError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            BoardError::MissingFields("message".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            BoardError::InvalidSignature("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(BoardError::AddressMismatch.status(), StatusCode::FORBIDDEN);
        assert_eq!(BoardError::Unauthorized.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            BoardError::NotFound("none".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            BoardError::Storage("disk".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_into_response_sets_status() {
        let response = BoardError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
    }
}
