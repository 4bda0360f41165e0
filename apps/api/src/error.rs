//! # API エラーハンドリング
//!
//! ハンドラから返るエラーを閉じた列挙型 [`ApiError`] で表し、
//! HTTP レスポンスのエラーエンベロープへ変換する。
//!
//! ## エラーの分類
//!
//! | ApiError | ステータス | code | details |
//! |----------|-----------|------|---------|
//! | `App` | AppError が持つ値 | AppError が持つ値 | AppError が持つ値 |
//! | `Validation` | 400 | `VALIDATION_ERROR` | `{issues: [...]}` |
//! | `Rejection` | 400 | `VALIDATION_ERROR` | `{validation: [...]}` |
//! | `Unexpected` | 保持する値（既定 500） | `INTERNAL_ERROR` | なし |
//!
//! ## レスポンス生成の流れ
//!
//! ```text
//! handler → Err(ApiError)
//!        ↓ IntoResponse（本番向けの安全な本文 + ErrorReport を extensions に格納）
//! handle_errors ミドルウェア
//!        ↓ ログ出力 + 実行モードに応じた本文で再描画
//! HTTP レスポンス
//! ```
//!
//! ミドルウェアを通らない場合でも、内部情報を含まない本文が返る。

pub mod app_error;

use std::sync::Arc;

use axum::{
   Json,
   http::StatusCode,
   response::{IntoResponse, Response},
};
pub use app_error::{AppError, details};
use keystone_infra::InfraError;
use keystone_shared::ErrorResponse;
use serde_json::{Value, json};
use thiserror::Error;
use validator::ValidationErrors;

/// リクエストのどの部分で解釈に失敗したか
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum RequestPart {
   Body,
   Querystring,
   Params,
}

/// API 層で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
   /// 意図的に返す構造化エラー
   #[error(transparent)]
   App(#[from] AppError),

   /// 入力スキーマ（validator）の検証失敗
   #[error("Validation failed: {0}")]
   Validation(#[from] ValidationErrors),

   /// axum の extractor がリクエストを解釈できなかった
   ///
   /// 不正な JSON、型の合わないクエリ・パスパラメータなど。
   #[error("{message}")]
   Rejection { part: RequestPart, message: String },

   /// 予期しないエラー
   ///
   /// # セキュリティ注意
   ///
   /// 開発モード以外ではメッセージとトレースをクライアントに返さない。
   #[error("{error}")]
   Unexpected {
      status: StatusCode,
      error:  anyhow::Error,
   },
}

impl ApiError {
   /// 500 の予期しないエラー
   pub fn unexpected(error: impl Into<anyhow::Error>) -> Self {
      Self::Unexpected {
         status: StatusCode::INTERNAL_SERVER_ERROR,
         error:  error.into(),
      }
   }

   /// ステータス、エンベロープを組み立てる
   ///
   /// `expose_internals` が真（開発モード）のときだけ
   /// AppError の `stack` と予期しないエラーの元メッセージを含める。
   pub fn render(&self, expose_internals: bool) -> (StatusCode, ErrorResponse) {
      match self {
         Self::App(err) => (err.status(), err.to_envelope(expose_internals)),
         Self::Validation(errors) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::validation_failed(details([("issues", validation_issues(errors))])),
         ),
         Self::Rejection { part, message } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::validation_failed(details([(
               "validation",
               json!([{ "source": part.to_string(), "message": message }]),
            )])),
         ),
         Self::Unexpected { status, error } => {
            let body = if expose_internals {
               ErrorResponse::new(error.to_string(), "INTERNAL_ERROR", status.as_u16())
                  .with_stack(format!("{error:?}"))
            } else {
               ErrorResponse::internal_server_error(status.as_u16())
            };
            (*status, body)
         }
      }
   }
}

/// validator のエラーを `[{code, path, message}]` に変換する
///
/// 出力順を安定させるためフィールド名でソートする。
fn validation_issues(errors: &ValidationErrors) -> Value {
   let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
   fields.sort_by(|(a, _), (b, _)| a.cmp(b));

   let issues: Vec<Value> = fields
      .into_iter()
      .flat_map(|(field, errors)| {
         let field = field.to_string();
         errors.iter().map(move |error| {
            let message = error
               .message
               .as_ref()
               .map_or_else(|| format!("Invalid value for '{field}'"), |m| m.to_string());
            json!({
               "code": error.code,
               "path": [field.as_str()],
               "message": message,
            })
         })
      })
      .collect();

   Value::Array(issues)
}

/// handle_errors ミドルウェアへエラーを引き渡すためのレスポンス拡張
#[derive(Debug, Clone)]
pub struct ErrorReport(pub Arc<ApiError>);

impl IntoResponse for ApiError {
   fn into_response(self) -> Response {
      let (status, body) = self.render(false);
      let mut response = (status, Json(body)).into_response();
      response.extensions_mut().insert(ErrorReport(Arc::new(self)));
      response
   }
}

/// 分類できないインフラ層エラーは予期しないエラーとして扱う
///
/// 一意制約違反などの意味のあるエラーはユースケース層で個別に変換する。
impl From<InfraError> for ApiError {
   fn from(err: InfraError) -> Self {
      Self::unexpected(err)
   }
}
