//! # OpenAPI 仕様定義
//!
//! utoipa を使用して API の OpenAPI 仕様を Rust の型から自動生成する。
//! `ApiDoc::openapi()` で OpenAPI ドキュメントを取得できる。
//!
//! `/docs` で Swagger UI、`/api-docs/openapi.json` で JSON を配信する
//! （[`crate::app_builder`] 参照）。

use utoipa::OpenApi;

use crate::handler::{example, root, user};

#[derive(OpenApi)]
#[openapi(
   info(
      title = "Keystone API",
      version = "1.0.0",
      description = "Keystone API サーバー"
   ),
   paths(
      // root
      root::root,
      root::ping,
      example::example,
      // users
      user::list_users,
      user::get_user,
      user::create_user,
      user::update_user,
      user::delete_user,
   ),
   components(schemas(
      keystone_shared::ErrorResponse,
   )),
   tags(
      (name = "root", description = "稼働確認"),
      (name = "users", description = "ユーザー管理"),
   )
)]
pub struct ApiDoc;
