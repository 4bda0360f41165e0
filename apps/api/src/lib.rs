//! # Keystone API サーバー
//!
//! HTTP API サーバーのスターター。構造化エラー、相関 ID、
//! セキュリティヘッダ、OpenAPI ドキュメントを備え、
//! デモとしてインメモリのユーザー CRUD を提供する。
//!
//! ## モジュール構成
//!
//! - [`config`] - アプリケーション設定（環境変数からの読み込み）
//! - [`error`] - API エラー定義と HTTP レスポンスへの変換
//! - [`extract`] - 検証付き extractor
//! - [`middleware`] - エラーハンドリング・セキュリティヘッダ・CORS
//! - [`handler`] - HTTP リクエストハンドラ
//! - [`usecase`] - ビジネスロジック
//! - [`openapi`] - OpenAPI 仕様
//! - [`app_builder`] - ルーターとミドルウェアの組み立て
//! - [`healthcheck`] - コンテナ用ヘルスチェックプローブ
//!
//! ## 依存関係
//!
//! - `keystone_domain`: ユーザーモデル、一覧クエリ、Clock
//! - `keystone_infra`: ユーザーストア
//! - `keystone_shared`: エラーエンベロープ、相関 ID、トレーシング
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use keystone_api::{app_builder::build_app, config::AppConfig};
//!
//! let config = AppConfig::from_env()?;
//! let app = build_app(&config, repository, clock);
//! ```

pub mod app_builder;
pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod healthcheck;
pub mod middleware;
pub mod openapi;
pub mod usecase;
