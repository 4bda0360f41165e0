//! # セキュリティヘッダミドルウェア
//!
//! 全レスポンスに一般的なセキュリティヘッダを付与する。
//!
//! ヘッダの組は起動時に [`SecurityHeaders::for_environment`] で一度だけ組み立てる。
//! HSTS は本番モードでのみ付与する（開発時に localhost へ HTTPS を強制しないため）。

use std::sync::Arc;

use axum::{
   extract::{Request, State},
   http::{HeaderName, HeaderValue, header},
   middleware::Next,
   response::Response,
};

use crate::config::Environment;

/// Swagger UI のインラインスクリプト・スタイルを許可した CSP
const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; base-uri 'self'; \
   font-src 'self' https: data:; form-action 'self'; frame-ancestors 'self'; \
   img-src 'self' data: https:; object-src 'none'; \
   script-src 'self' 'unsafe-inline' 'unsafe-eval'; script-src-attr 'none'; \
   style-src 'self' 'unsafe-inline'; upgrade-insecure-requests";

const STRICT_TRANSPORT_SECURITY: &str = "max-age=31536000; includeSubDomains; preload";

/// 付与するヘッダの組
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
   headers: Vec<(HeaderName, HeaderValue)>,
}

impl SecurityHeaders {
   pub fn for_environment(environment: Environment) -> Self {
      let mut headers = vec![
         (
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY),
         ),
         (
            HeaderName::from_static("cross-origin-opener-policy"),
            HeaderValue::from_static("same-origin"),
         ),
         (
            HeaderName::from_static("cross-origin-resource-policy"),
            HeaderValue::from_static("cross-origin"),
         ),
         (
            HeaderName::from_static("origin-agent-cluster"),
            HeaderValue::from_static("?1"),
         ),
         (header::REFERRER_POLICY, HeaderValue::from_static("no-referrer")),
         (
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
         ),
         (
            header::X_DNS_PREFETCH_CONTROL,
            HeaderValue::from_static("off"),
         ),
         (
            HeaderName::from_static("x-download-options"),
            HeaderValue::from_static("noopen"),
         ),
         (header::X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN")),
         (
            HeaderName::from_static("x-permitted-cross-domain-policies"),
            HeaderValue::from_static("none"),
         ),
         (header::X_XSS_PROTECTION, HeaderValue::from_static("0")),
      ];

      if environment.is_production() {
         headers.push((
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(STRICT_TRANSPORT_SECURITY),
         ));
      }

      Self { headers }
   }

   pub fn iter(&self) -> impl Iterator<Item = &(HeaderName, HeaderValue)> {
      self.headers.iter()
   }
}

/// レスポンスにセキュリティヘッダを付与する
pub async fn set_security_headers(
   State(security_headers): State<Arc<SecurityHeaders>>,
   request: Request,
   next: Next,
) -> Response {
   let mut response = next.run(request).await;
   let headers = response.headers_mut();
   for (name, value) in security_headers.iter() {
      headers.insert(name.clone(), value.clone());
   }
   response
}
