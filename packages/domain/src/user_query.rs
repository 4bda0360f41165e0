//! # ユーザー一覧クエリ
//!
//! 一覧取得時の絞り込み・並び替え・ページ分割を純粋関数として定義する。
//! ストア実装はこの [`UserListQuery::apply`] を呼ぶだけでよい。
//!
//! ## 処理順
//!
//! 1. `role` の完全一致で絞り込む
//! 2. `search` を名前またはメールに対する大文字小文字を区別しない部分一致で絞り込む
//! 3. `sort_by` / `sort_order` で並び替える
//! 4. 1 始まりの `page` と `limit` で切り出す
//!
//! ストア内の順序に依存しないよう、並び替えキーが等しい場合は ID 昇順で決定的に並べる。

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::user::{User, UserRole};

/// 並び替えキー
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SortBy {
   Name,
   Email,
   #[default]
   CreatedAt,
}

/// 並び順
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
   Asc,
   #[default]
   Desc,
}

/// ユーザー一覧の取得条件
///
/// 値域（`page >= 1`, `1 <= limit <= 100`）の検証は API 層の入力スキーマで行う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListQuery {
   pub page:       u32,
   pub limit:      u32,
   pub role:       Option<UserRole>,
   pub search:     Option<String>,
   pub sort_by:    SortBy,
   pub sort_order: SortOrder,
}

impl Default for UserListQuery {
   fn default() -> Self {
      Self {
         page:       1,
         limit:      10,
         role:       None,
         search:     None,
         sort_by:    SortBy::default(),
         sort_order: SortOrder::default(),
      }
   }
}

/// 1 ページ分の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
   /// このページに含まれる要素
   pub items: Vec<T>,
   /// 絞り込み後（ページ分割前）の総件数
   pub total: u64,
}

impl UserListQuery {
   /// 絞り込み条件に一致するか
   pub fn matches(&self, user: &User) -> bool {
      if self.role.is_some_and(|role| role != user.role()) {
         return false;
      }

      match &self.search {
         Some(search) => {
            let needle = search.to_lowercase();
            user.name().to_lowercase().contains(&needle)
               || user.email().to_lowercase().contains(&needle)
         }
         None => true,
      }
   }

   /// 並び替え条件での比較
   pub fn compare(&self, a: &User, b: &User) -> Ordering {
      let ordering = match self.sort_by {
         SortBy::Name => a.name().cmp(b.name()),
         SortBy::Email => a.email().cmp(b.email()),
         SortBy::CreatedAt => a.created_at().cmp(&b.created_at()),
      };

      let ordering = match self.sort_order {
         SortOrder::Asc => ordering,
         SortOrder::Desc => ordering.reverse(),
      };

      ordering.then_with(|| a.id().as_uuid().cmp(b.id().as_uuid()))
   }

   /// 絞り込み・並び替え・ページ分割をまとめて適用する
   ///
   /// 範囲外のページは空の `items` を返す（`total` は変わらない）。
   pub fn apply<I>(&self, users: I) -> Page<User>
   where
      I: IntoIterator<Item = User>,
   {
      let mut filtered: Vec<User> = users.into_iter().filter(|u| self.matches(u)).collect();
      filtered.sort_by(|a, b| self.compare(a, b));

      let total = filtered.len() as u64;
      let limit = self.limit as usize;
      let start = (self.page.saturating_sub(1) as usize).saturating_mul(limit);

      let items = filtered.into_iter().skip(start).take(limit).collect();

      Page { items, total }
   }
}
