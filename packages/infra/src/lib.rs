//! # Keystone インフラ層
//!
//! ストア実装とインフラ層エラーを提供する。
//!
//! ## モジュール構成
//!
//! - [`error`] - インフラ層エラー（SpanTrace 付き）
//! - [`repository`] - リポジトリトレイトとメモリ実装

pub mod error;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
