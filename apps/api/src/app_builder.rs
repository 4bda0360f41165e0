//! # アプリケーション構築
//!
//! DI（ユースケース・State）の初期化とルーター構築を担当する。
//! `main.rs` は設定読み込みとサーバー起動に集中する。
//!
//! ## ミドルウェアの順序（外側から）
//!
//! ```text
//! RequestContextLayer   相関 ID 決定・完了ログ・X-Request-Id 付与
//! TraceLayer            request_id 付きスパン
//! CorsLayer
//! set_security_headers
//! handle_errors         エラーのログ出力とエンベロープ描画
//! CatchPanicLayer       panic → 500
//! handler
//! ```
//!
//! 統合テストも [`build_app`] を通すため、本番と同じ順序で検証される。

use std::sync::Arc;

use axum::{Router, body::Body, middleware::from_fn_with_state, routing::get};
use keystone_domain::clock::Clock;
use keystone_infra::repository::UserRepository;
use keystone_shared::{observability::make_request_span, request_context::RequestContextLayer};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
   config::AppConfig,
   handler::{
      UserState,
      create_user,
      delete_user,
      example,
      get_user,
      list_users,
      ping,
      root,
      update_user,
   },
   middleware::{
      SecurityHeaders,
      cors_layer,
      handle_errors,
      handle_panic,
      route_not_found,
      set_security_headers,
   },
   openapi::ApiDoc,
   usecase::UserUseCaseImpl,
};

/// DI コンテナの構築とルーター定義を行う
///
/// ストアと時刻は外から受け取る。本番ではシード済みのインメモリストアと
/// システム時刻、テストでは固定時刻や障害を起こすストアを渡す。
pub fn build_app(
   config: &AppConfig,
   user_repository: Arc<dyn UserRepository>,
   clock: Arc<dyn Clock>,
) -> Router {
   let user_state = Arc::new(UserState {
      usecase: UserUseCaseImpl::new(user_repository, clock),
   });

   let routes = Router::new()
      .route("/", get(root))
      .route("/ping", get(ping))
      .route("/example", get(example))
      .route("/users", get(list_users).post(create_user))
      .route(
         "/users/{id}",
         get(get_user).patch(update_user).delete(delete_user),
      )
      .with_state(user_state)
      .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
      .fallback(route_not_found)
      .method_not_allowed_fallback(route_not_found);

   let security_headers = Arc::new(SecurityHeaders::for_environment(config.environment));

   routes
      .layer(CatchPanicLayer::custom(handle_panic))
      .layer(from_fn_with_state(config.environment, handle_errors))
      .layer(from_fn_with_state(security_headers, set_security_headers))
      .layer(cors_layer(config.environment, &config.cors_origins))
      .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
      .layer(RequestContextLayer)
}
