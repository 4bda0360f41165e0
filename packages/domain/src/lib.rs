//! # Keystone ドメイン層
//!
//! HTTP やストレージに依存しないモデルと純粋なロジックを置く。
//!
//! ## モジュール構成
//!
//! - [`user`] - ユーザーエンティティ、ロール、部分更新
//! - [`user_query`] - 一覧取得の絞り込み・並び替え・ページ分割
//! - [`clock`] - 時刻プロバイダ

pub mod clock;
pub mod user;
pub mod user_query;
