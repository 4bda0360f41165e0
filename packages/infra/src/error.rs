//! # インフラ層エラー定義
//!
//! ストア操作で発生するエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別
//!
//! convenience constructor でエラーを生成すると、その時点のスパン情報
//! （`request_id` を含むリクエストスパンなど）が自動的に記録される。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
   kind:       InfraErrorKind,
   span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
   /// メールアドレスの一意制約違反
   ///
   /// 別 ID のユーザーが同じメールアドレスを保持している。
   #[error("メールアドレスが既に使われています: {email}")]
   EmailConflict { email: String },

   /// 予期しないエラー
   ///
   /// 外部ストアとの通信失敗など、上記に分類できないもの。
   #[error("予期しないエラー: {0}")]
   Unexpected(String),
}

impl InfraError {
   pub fn kind(&self) -> &InfraErrorKind {
      &self.kind
   }

   pub fn span_trace(&self) -> &SpanTrace {
      &self.span_trace
   }

   /// EmailConflict の場合、衝突したメールアドレスを返す
   pub fn as_email_conflict(&self) -> Option<&str> {
      match &self.kind {
         InfraErrorKind::EmailConflict { email } => Some(email),
         InfraErrorKind::Unexpected(_) => None,
      }
   }

   // ===== Convenience constructors =====

   pub fn email_conflict(email: impl Into<String>) -> Self {
      Self {
         kind:       InfraErrorKind::EmailConflict {
            email: email.into(),
         },
         span_trace: SpanTrace::capture(),
      }
   }

   pub fn unexpected(msg: impl Into<String>) -> Self {
      Self {
         kind:       InfraErrorKind::Unexpected(msg.into()),
         span_trace: SpanTrace::capture(),
      }
   }
}

// ===== トレイト実装 =====

impl fmt::Debug for InfraError {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("InfraError")
         .field("kind", &self.kind)
         .field("span_trace", &self.span_trace)
         .finish()
   }
}

impl std::error::Error for InfraError {
   fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
      Some(&self.kind)
   }
}
