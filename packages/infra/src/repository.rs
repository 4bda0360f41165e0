//! # リポジトリ
//!
//! ストアへのアクセスをトレイトで抽象化する。

pub mod user_repository;

pub use user_repository::{InMemoryUserRepository, SEED_USER_ID, UserRepository};
