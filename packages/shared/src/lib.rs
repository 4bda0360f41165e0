//! # Keystone 共有ユーティリティ
//!
//! ワークスペース全体で使う、ビジネスロジックを含まない部品を提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain, infra, api）から依存される
//! - axum には依存しない（HTTP 型は `http` クレートのみ）
//! - tower / tracing-subscriber を使う部品は `observability` feature で有効化する

pub mod correlation_id;
pub mod error_response;
pub mod observability;
pub mod paginated_response;
#[cfg(feature = "observability")]
pub mod request_context;

pub use correlation_id::CorrelationId;
pub use error_response::{ErrorBody, ErrorResponse};
pub use paginated_response::{PaginatedResponse, Pagination};
