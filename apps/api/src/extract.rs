//! # 検証付き extractor
//!
//! axum 標準の `Json` / `Query` / `Path` をラップし、解釈失敗を
//! [`ApiError::Rejection`]、スキーマ検証失敗を [`ApiError::Validation`] に揃える。
//!
//! ハンドラは引数に書くだけで、検証済みの値だけを受け取れる。
//!
//! ```rust,ignore
//! async fn create_user(
//!     ValidatedJson(body): ValidatedJson<CreateUserRequest>,
//! ) -> Result<impl IntoResponse, ApiError> { ... }
//! ```

use axum::{
   Json,
   body::Bytes,
   extract::{
      FromRequest,
      FromRequestParts,
      Path,
      Query,
      Request,
      rejection::{BytesRejection, JsonRejection, PathRejection, QueryRejection},
   },
   http::{HeaderMap, StatusCode, header, request::Parts},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{ApiError, RequestPart};

/// JSON ボディを読み取り、validator で検証する
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

/// クエリ文字列を読み取り、validator で検証する
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

/// パスパラメータを読み取る（UUID 形式の検証など型による検証のみ）
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedPath<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
   S: Send + Sync,
   T: DeserializeOwned + Validate,
{
   type Rejection = ApiError;

   async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
      let json_content_type = has_json_content_type(req.headers());
      let bytes = Bytes::from_request(req, state)
         .await
         .map_err(|rejection: BytesRejection| {
            rejection_error(RequestPart::Body, rejection.status(), rejection.body_text())
         })?;

      // 空のボディは content-type に関係なく入力エラーとする
      if !bytes.is_empty() && !json_content_type {
         return Err(rejection_error(
            RequestPart::Body,
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Expected request with `Content-Type: application/json`".to_string(),
         ));
      }

      let Json(value) = Json::<T>::from_bytes(&bytes).map_err(|rejection: JsonRejection| {
         rejection_error(RequestPart::Body, rejection.status(), rejection.body_text())
      })?;
      value.validate()?;
      Ok(Self(value))
   }
}

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
   S: Send + Sync,
   T: DeserializeOwned + Validate,
{
   type Rejection = ApiError;

   async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
      let Query(value) = Query::<T>::from_request_parts(parts, state)
         .await
         .map_err(|rejection: QueryRejection| {
            rejection_error(
               RequestPart::Querystring,
               rejection.status(),
               rejection.body_text(),
            )
         })?;
      value.validate()?;
      Ok(Self(value))
   }
}

impl<S, T> FromRequestParts<S> for ValidatedPath<T>
where
   S: Send + Sync,
   T: DeserializeOwned + Send,
{
   type Rejection = ApiError;

   async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
      let Path(value) = Path::<T>::from_request_parts(parts, state)
         .await
         .map_err(|rejection: PathRejection| {
            rejection_error(RequestPart::Params, rejection.status(), rejection.body_text())
         })?;
      Ok(Self(value))
   }
}

/// `application/json` または `application/*+json` か
fn has_json_content_type(headers: &HeaderMap) -> bool {
   let Some(content_type) = headers
      .get(header::CONTENT_TYPE)
      .and_then(|value| value.to_str().ok())
   else {
      return false;
   };

   let essence = content_type
      .split(';')
      .next()
      .unwrap_or_default()
      .trim()
      .to_ascii_lowercase();
   essence == "application/json"
      || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// extractor の失敗を ApiError に変換する
///
/// サーバー側の問題（ルート定義ミスなど）、巨大すぎるボディ、非対応の content-type は
/// 入力エラーではないため、元のステータスのまま予期しないエラーとする。
fn rejection_error(part: RequestPart, status: StatusCode, message: String) -> ApiError {
   if status.is_server_error()
      || status == StatusCode::PAYLOAD_TOO_LARGE
      || status == StatusCode::UNSUPPORTED_MEDIA_TYPE
   {
      ApiError::Unexpected {
         status,
         error: anyhow::anyhow!("{part} の読み取りに失敗しました: {message}"),
      }
   } else {
      ApiError::Rejection { part, message }
   }
}
