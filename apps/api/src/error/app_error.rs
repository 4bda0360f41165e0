//! # AppError
//!
//! ハンドラやユースケースが意図的に返す、ステータスとコードを持つエラー。
//!
//! 生成時に [`SpanTrace`] を捕捉し、開発モードではエンベロープの
//! `stack` として返す。値オブジェクトであり、生成後は変更しない
//! （`with_*` は `self` を消費して新しい値を返す）。
//!
//! ## 使用例
//!
//! ```rust
//! use keystone_api::error::AppError;
//!
//! let err = AppError::not_found("User", Some("42"));
//! assert_eq!(err.status().as_u16(), 404);
//! assert_eq!(err.code(), "NOT_FOUND");
//! assert_eq!(err.message(), "User with id '42' not found");
//! ```

use axum::http::StatusCode;
use keystone_shared::ErrorResponse;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing_error::SpanTrace;

/// 構造化エラー
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
   message:    String,
   status:     StatusCode,
   code:       String,
   details:    Option<Map<String, Value>>,
   span_trace: SpanTrace,
}

/// `details` 用のマップを組み立てる
pub fn details<const N: usize>(entries: [(&str, Value); N]) -> Map<String, Value> {
   entries
      .into_iter()
      .map(|(key, value)| (key.to_string(), value))
      .collect()
}

impl AppError {
   /// 500 / `INTERNAL_ERROR` を既定値として作成する
   pub fn new(message: impl Into<String>) -> Self {
      Self {
         message:    message.into(),
         status:     StatusCode::INTERNAL_SERVER_ERROR,
         code:       "INTERNAL_ERROR".to_string(),
         details:    None,
         span_trace: SpanTrace::capture(),
      }
   }

   pub fn with_status(self, status: StatusCode) -> Self {
      Self { status, ..self }
   }

   pub fn with_code(self, code: impl Into<String>) -> Self {
      Self {
         code: code.into(),
         ..self
      }
   }

   pub fn with_details(self, details: Map<String, Value>) -> Self {
      Self {
         details: Some(details),
         ..self
      }
   }

   pub fn message(&self) -> &str {
      &self.message
   }

   pub fn status(&self) -> StatusCode {
      self.status
   }

   pub fn code(&self) -> &str {
      &self.code
   }

   pub fn details(&self) -> Option<&Map<String, Value>> {
      self.details.as_ref()
   }

   pub fn span_trace(&self) -> &SpanTrace {
      &self.span_trace
   }

   /// 診断用トレースを文字列化する
   ///
   /// 1 行目は `コード: メッセージ`、続けて捕捉時のスパン階層。
   pub fn stack(&self) -> String {
      let trace = self.span_trace.to_string();
      if trace.trim().is_empty() {
         format!("{}: {}", self.code, self.message)
      } else {
         format!("{}: {}\n{}", self.code, self.message, trace)
      }
   }

   /// エラーエンベロープに変換する
   ///
   /// `details` は指定時のみ、`stack` は `include_trace` が真のときのみ含める。
   pub fn to_envelope(&self, include_trace: bool) -> ErrorResponse {
      let mut response = ErrorResponse::new(&self.message, &self.code, self.status.as_u16());
      if let Some(details) = &self.details {
         response = response.with_details(details.clone());
      }
      if include_trace {
         response = response.with_stack(self.stack());
      }
      response
   }

   // --- ファクトリ ---

   /// 404 Not Found
   ///
   /// `details` には `resource` と（指定時のみ）`id` を含める。
   pub fn not_found(resource: &str, id: Option<&str>) -> Self {
      let (message, details) = match id {
         Some(id) => (
            format!("{resource} with id '{id}' not found"),
            details([("resource", Value::from(resource)), ("id", Value::from(id))]),
         ),
         None => (
            format!("{resource} not found"),
            details([("resource", Value::from(resource))]),
         ),
      };

      Self::new(message)
         .with_status(StatusCode::NOT_FOUND)
         .with_code("NOT_FOUND")
         .with_details(details)
   }

   /// 400 Bad Request
   pub fn bad_request(message: impl Into<String>, details: Option<Map<String, Value>>) -> Self {
      Self::new(message)
         .with_status(StatusCode::BAD_REQUEST)
         .with_code("BAD_REQUEST")
         .with_optional_details(details)
   }

   /// 401 Unauthorized
   pub fn unauthorized(message: Option<&str>) -> Self {
      Self::new(message.unwrap_or("Authentication required"))
         .with_status(StatusCode::UNAUTHORIZED)
         .with_code("UNAUTHORIZED")
   }

   /// 403 Forbidden
   pub fn forbidden(message: Option<&str>) -> Self {
      Self::new(message.unwrap_or("Access denied"))
         .with_status(StatusCode::FORBIDDEN)
         .with_code("FORBIDDEN")
   }

   /// 409 Conflict
   pub fn conflict(message: impl Into<String>, details: Option<Map<String, Value>>) -> Self {
      Self::new(message)
         .with_status(StatusCode::CONFLICT)
         .with_code("CONFLICT")
         .with_optional_details(details)
   }

   /// 500 Internal Server Error
   pub fn internal(message: Option<&str>) -> Self {
      Self::new(message.unwrap_or("An unexpected error occurred"))
   }

   fn with_optional_details(self, details: Option<Map<String, Value>>) -> Self {
      match details {
         Some(details) => self.with_details(details),
         None => self,
      }
   }
}
