//! # セキュリティヘッダ・CORS 統合テスト

mod common;

use axum::{
   body::Body,
   http::{self, Method, StatusCode, header},
};
use common::{send, send_request, test_app};
use keystone_api::config::Environment;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_全レスポンスにセキュリティヘッダが付く() {
   let res = send(&test_app(Environment::Test), Method::GET, "/", None).await;

   assert_eq!(res.status, StatusCode::OK);
   assert_eq!(res.headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
   assert_eq!(res.headers[header::X_FRAME_OPTIONS], "SAMEORIGIN");
   assert_eq!(res.headers[header::REFERRER_POLICY], "no-referrer");
   assert_eq!(res.headers["cross-origin-opener-policy"], "same-origin");
   assert!(
      res.headers[header::CONTENT_SECURITY_POLICY]
         .to_str()
         .unwrap()
         .starts_with("default-src 'self'")
   );
}

#[tokio::test]
async fn test_エラーレスポンスにもセキュリティヘッダが付く() {
   let res = send(&test_app(Environment::Test), Method::GET, "/missing", None).await;

   assert_eq!(res.status, StatusCode::NOT_FOUND);
   assert_eq!(res.headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
}

#[tokio::test]
async fn test_hstsは本番モードのみ() {
   let production = send(&test_app(Environment::Production), Method::GET, "/", None).await;
   assert_eq!(
      production.headers[header::STRICT_TRANSPORT_SECURITY],
      "max-age=31536000; includeSubDomains; preload"
   );

   for environment in [Environment::Development, Environment::Test] {
      let res = send(&test_app(environment), Method::GET, "/", None).await;
      assert!(
         res.headers.get(header::STRICT_TRANSPORT_SECURITY).is_none(),
         "{environment}"
      );
   }
}

// ===== CORS =====

fn preflight(origin: &str) -> http::Request<Body> {
   http::Request::builder()
      .method(Method::OPTIONS)
      .uri("/users")
      .header(header::ORIGIN, origin)
      .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
      .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
      .body(Body::empty())
      .unwrap()
}

#[tokio::test]
async fn test_許可したオリジンのプリフライト() {
   let res = send_request(
      &test_app(Environment::Production),
      preflight("https://app.example"),
   )
   .await;

   assert_eq!(res.status, StatusCode::OK);
   assert_eq!(
      res.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
      "https://app.example"
   );
   assert_eq!(res.headers[header::ACCESS_CONTROL_MAX_AGE], "86400");
   let methods = res.headers[header::ACCESS_CONTROL_ALLOW_METHODS]
      .to_str()
      .unwrap();
   assert!(methods.contains("PATCH"), "methods: {methods}");
}

#[tokio::test]
async fn test_許可していないオリジンにはallow_originを返さない() {
   let res = send_request(
      &test_app(Environment::Production),
      preflight("https://evil.example"),
   )
   .await;

   assert!(res.headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn test_開発モードは任意のオリジンを許可する() {
   let res = send_request(
      &test_app(Environment::Development),
      preflight("http://localhost:5173"),
   )
   .await;

   assert_eq!(
      res.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
      "http://localhost:5173"
   );
}

#[tokio::test]
async fn test_通常レスポンスでx_request_idを公開する() {
   let request = http::Request::builder()
      .uri("/ping")
      .header(header::ORIGIN, "https://app.example")
      .body(Body::empty())
      .unwrap();

   let res = send_request(&test_app(Environment::Production), request).await;

   let exposed = res.headers[header::ACCESS_CONTROL_EXPOSE_HEADERS]
      .to_str()
      .unwrap();
   assert!(exposed.contains("x-request-id"), "exposed: {exposed}");
}
