//! # ルート・疎通確認ハンドラ
//!
//! - `GET /` - 稼働確認（`{"root": true}`）
//! - `GET /ping` - 疎通確認（`{"message": "Pong"}`）
//!
//! コンテナのヘルスチェック（`healthcheck` バイナリ）は `GET /` を叩く。

use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `GET /` のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
   pub root: bool,
}

/// メッセージだけを返すレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
   pub message: String,
}

impl MessageResponse {
   pub fn new(message: impl Into<String>) -> Self {
      Self {
         message: message.into(),
      }
   }
}

#[utoipa::path(
   get,
   path = "/",
   tag = "root",
   responses(
      (status = 200, description = "稼働中", body = RootResponse)
   )
)]
pub async fn root() -> Json<RootResponse> {
   Json(RootResponse { root: true })
}

#[utoipa::path(
   get,
   path = "/ping",
   tag = "root",
   responses(
      (status = 200, description = "疎通確認", body = MessageResponse)
   )
)]
pub async fn ping() -> Json<MessageResponse> {
   Json(MessageResponse::new("Pong"))
}
