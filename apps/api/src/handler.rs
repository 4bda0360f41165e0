//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、判断はユースケース層に委譲
//! - 入力検証は [`crate::extract`] の検証付き extractor で行う
//!
//! ## モジュール構成
//!
//! ```text
//! handler.rs          # 親モジュール（re-export）
//! └── handler/
//!     ├── root.rs     # GET /, GET /ping
//!     ├── example.rs  # GET /example
//!     └── user.rs     # /users CRUD
//! ```

pub mod example;
pub mod root;
pub mod user;

pub use example::example;
pub use root::{MessageResponse, ping, root};
pub use user::{UserState, create_user, delete_user, get_user, list_users, update_user};
