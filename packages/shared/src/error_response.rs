//! # エラーレスポンス
//!
//! すべてのエラー応答が共有する JSON エンベロープ。
//!
//! ```json
//! {
//!   "error": {
//!     "message": "User with id '...' not found",
//!     "code": "NOT_FOUND",
//!     "statusCode": 404,
//!     "details": { "resource": "User", "id": "..." }
//!   }
//! }
//! ```
//!
//! ## 設計
//!
//! - 純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換は API 側の責務
//! - `details` と `stack` は値があるときだけ出力する

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// エラーレスポンスのトップレベル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
   pub error: ErrorBody,
}

/// `error` フィールドの中身
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
   /// 人間可読なメッセージ
   pub message:     String,
   /// 機械可読なエラーコード（例: `NOT_FOUND`）
   pub code:        String,
   /// HTTP ステータスコード
   pub status_code: u16,
   /// 任意の補足情報
   #[serde(default, skip_serializing_if = "Option::is_none")]
   #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
   pub details:     Option<Map<String, Value>>,
   /// 診断用トレース（開発モードのみ）
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub stack:       Option<String>,
}

impl ErrorResponse {
   pub fn new(message: impl Into<String>, code: impl Into<String>, status_code: u16) -> Self {
      Self {
         error: ErrorBody {
            message: message.into(),
            code: code.into(),
            status_code,
            details: None,
            stack: None,
         },
      }
   }

   pub fn with_details(mut self, details: Map<String, Value>) -> Self {
      self.error.details = Some(details);
      self
   }

   pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
      self.error.stack = Some(stack.into());
      self
   }

   /// 400 Validation Error
   ///
   /// スキーマ検証に失敗したときの定型エンベロープ。
   pub fn validation_failed(details: Map<String, Value>) -> Self {
      Self::new("Validation failed", "VALIDATION_ERROR", 400).with_details(details)
   }

   /// 500 Internal Server Error
   ///
   /// 本番モードで内部情報を出さないための固定メッセージ。
   pub fn internal_server_error(status_code: u16) -> Self {
      Self::new("Internal server error", "INTERNAL_ERROR", status_code)
   }
}
