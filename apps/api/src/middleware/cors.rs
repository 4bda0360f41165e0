//! # CORS
//!
//! tower-http の `CorsLayer` を設定から組み立てる。
//!
//! - development: リクエストの Origin をそのまま許可する
//! - それ以外: `CORS_ORIGINS` に列挙されたオリジンのみ（未設定なら許可なし）

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method, header};
use keystone_shared::observability::REQUEST_ID_HEADER;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Environment;

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(86_400);

pub fn cors_layer(environment: Environment, origins: &[String]) -> CorsLayer {
   let allow_origin = if environment.is_development() {
      AllowOrigin::mirror_request()
   } else {
      AllowOrigin::list(
         origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok()),
      )
   };

   CorsLayer::new()
      .allow_origin(allow_origin)
      .allow_methods([
         Method::GET,
         Method::POST,
         Method::PUT,
         Method::PATCH,
         Method::DELETE,
         Method::OPTIONS,
      ])
      .allow_headers([
         header::CONTENT_TYPE,
         header::AUTHORIZATION,
         HeaderName::from_static("x-requested-with"),
         header::ACCEPT,
         HeaderName::from_static(REQUEST_ID_HEADER),
      ])
      .expose_headers([
         HeaderName::from_static(REQUEST_ID_HEADER),
         HeaderName::from_static("x-ratelimit-limit"),
         HeaderName::from_static("x-ratelimit-remaining"),
      ])
      .max_age(PREFLIGHT_MAX_AGE)
}
