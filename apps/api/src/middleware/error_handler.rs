//! # エラーハンドリングミドルウェア
//!
//! ハンドラ・extractor・panic から返ったエラーをここで一度だけログに出し、
//! 実行モードに応じたエラーエンベロープに描き直す。
//!
//! [`ApiError`] の `IntoResponse` はレスポンス extensions に [`ErrorReport`] を残す。
//! このミドルウェアはそれを取り出して処理し、extensions からは取り除く。
//! エラーでないレスポンスには手を加えない。

use std::any::Any;

use axum::{
   Json,
   extract::{Request, State},
   http::{HeaderValue, Method, Uri, header},
   middleware::Next,
   response::{IntoResponse, Response},
};

use crate::{
   config::Environment,
   error::{ApiError, AppError, ErrorReport},
};

/// エラーレスポンスをログに出し、実行モードに合わせて本文を描き直す
pub async fn handle_errors(
   State(environment): State<Environment>,
   request: Request,
   next: Next,
) -> Response {
   let response = next.run(request).await;

   let Some(ErrorReport(error)) = response.extensions().get::<ErrorReport>().cloned() else {
      return response;
   };

   let (status, body) = error.render(environment.is_development());

   tracing::error!(
      error = ?error,
      status = status.as_u16(),
      code = %body.error.code,
      "Request error"
   );

   let (mut parts, _) = response.into_parts();
   parts.status = status;
   parts.extensions.remove::<ErrorReport>();
   parts.headers.remove(header::CONTENT_LENGTH);
   parts.headers.insert(
      header::CONTENT_TYPE,
      HeaderValue::from_static("application/json"),
   );

   (parts, Json(body)).into_response()
}

/// panic をエラーレスポンスに変換する（`CatchPanicLayer::custom` 用）
///
/// panic は予期しないエラーとして扱い、メッセージは開発モードでのみ返る。
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
   let detail = if let Some(message) = payload.downcast_ref::<String>() {
      message.clone()
   } else if let Some(message) = payload.downcast_ref::<&str>() {
      (*message).to_string()
   } else {
      "unknown panic payload".to_string()
   };

   ApiError::unexpected(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}

/// どのルートにも一致しないリクエストへの 404
///
/// パスは存在するがメソッドが合わない場合も同じ扱いにする。
pub async fn route_not_found(method: Method, uri: Uri) -> ApiError {
   AppError::new(format!("Route {method}:{} not found", uri.path()))
      .with_status(axum::http::StatusCode::NOT_FOUND)
      .with_code("NOT_FOUND")
      .into()
}
