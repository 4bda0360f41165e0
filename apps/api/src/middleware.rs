//! # ミドルウェア
//!
//! API サーバー用のミドルウェアを提供する。
//!
//! リクエストコンテキスト（相関 ID・所要時間ログ）は
//! `keystone_shared::request_context` にある。

mod cors;
mod error_handler;
mod security_headers;

pub use cors::cors_layer;
pub use error_handler::{handle_errors, handle_panic, route_not_found};
pub use security_headers::{SecurityHeaders, set_security_headers};
