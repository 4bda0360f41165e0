//! 統合テスト共通ヘルパー
//!
//! 本番と同じ [`build_app`] でルーターを組み立て、`oneshot` で 1 リクエストずつ送る。

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{
   Router,
   body::{Body, to_bytes},
   http::{HeaderMap, Method, Request, StatusCode, header},
};
use chrono::{DateTime, Utc};
use keystone_api::{
   app_builder::build_app,
   config::{AppConfig, Environment, LogLevel, ServerConfig},
};
use keystone_domain::{
   clock::FixedClock,
   user::{User, UserId, UserPatch},
   user_query::{Page, UserListQuery},
};
use keystone_infra::{
   InfraError,
   repository::{InMemoryUserRepository, UserRepository},
};
use keystone_shared::observability::LogFormat;
use serde_json::Value;
use tower::ServiceExt;

/// シードユーザー（John Doe）の ID
pub const SEED_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

pub fn fixed_now() -> DateTime<Utc> {
   DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

pub fn config(environment: Environment) -> AppConfig {
   AppConfig {
      environment,
      server: ServerConfig {
         host: "127.0.0.1".to_string(),
         port: 3000,
      },
      close_grace_delay: Duration::from_millis(500),
      cors_origins: vec!["https://app.example".to_string()],
      log_level: LogLevel::Info,
      log_format: LogFormat::Pretty,
   }
}

/// シード済みインメモリストアを使うアプリ
pub fn test_app(environment: Environment) -> Router {
   test_app_with_repository(
      environment,
      Arc::new(InMemoryUserRepository::seeded(fixed_now())),
   )
}

pub fn test_app_with_repository(
   environment: Environment,
   repository: Arc<dyn UserRepository>,
) -> Router {
   build_app(
      &config(environment),
      repository,
      Arc::new(FixedClock::new(fixed_now())),
   )
}

/// テスト用レスポンス
pub struct TestResponse {
   pub status:  StatusCode,
   pub headers: HeaderMap,
   pub body:    Value,
}

/// リクエストを 1 件送る
///
/// `body` が `Some` なら JSON として送る。レスポンス本文が空なら `Value::Null`。
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
   let builder = Request::builder().method(method).uri(uri);
   let request = match body {
      Some(json) => builder
         .header(header::CONTENT_TYPE, "application/json")
         .body(Body::from(json.to_string()))
         .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
   };

   send_request(app, request).await
}

pub async fn send_request(app: &Router, request: Request<Body>) -> TestResponse {
   let response = app.clone().oneshot(request).await.unwrap();
   let status = response.status();
   let headers = response.headers().clone();
   let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
   let body = if bytes.is_empty() {
      Value::Null
   } else {
      serde_json::from_slice(&bytes).unwrap_or_else(|_| {
         Value::String(String::from_utf8_lossy(&bytes).into_owned())
      })
   };

   TestResponse {
      status,
      headers,
      body,
   }
}

/// すべての操作が失敗するストア
pub struct FailingRepository;

#[async_trait]
impl UserRepository for FailingRepository {
   async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, InfraError> {
      Err(InfraError::unexpected("database is on fire"))
   }

   async fn list(&self, _query: &UserListQuery) -> Result<Page<User>, InfraError> {
      Err(InfraError::unexpected("database is on fire"))
   }

   async fn put(&self, _user: &User) -> Result<(), InfraError> {
      Err(InfraError::unexpected("database is on fire"))
   }

   async fn update(&self, _id: &UserId, _patch: UserPatch) -> Result<Option<User>, InfraError> {
      Err(InfraError::unexpected("database is on fire"))
   }

   async fn delete(&self, _id: &UserId) -> Result<bool, InfraError> {
      Err(InfraError::unexpected("database is on fire"))
   }
}

/// 呼ばれると panic するストア
pub struct PanickingRepository;

#[async_trait]
impl UserRepository for PanickingRepository {
   async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, InfraError> {
      panic!("unexpected state in find_by_id")
   }

   async fn list(&self, _query: &UserListQuery) -> Result<Page<User>, InfraError> {
      panic!("unexpected state in list")
   }

   async fn put(&self, _user: &User) -> Result<(), InfraError> {
      panic!("unexpected state in put")
   }

   async fn update(&self, _id: &UserId, _patch: UserPatch) -> Result<Option<User>, InfraError> {
      panic!("unexpected state in update")
   }

   async fn delete(&self, _id: &UserId) -> Result<bool, InfraError> {
      panic!("unexpected state in delete")
   }
}
