//! # サンプルハンドラ
//!
//! - `GET /example` - 固定メッセージを返す

use axum::Json;

use super::root::MessageResponse;

#[utoipa::path(
   get,
   path = "/example",
   tag = "root",
   responses(
      (status = 200, description = "サンプルメッセージ", body = MessageResponse)
   )
)]
pub async fn example() -> Json<MessageResponse> {
   Json(MessageResponse::new("Hello, world!"))
}
