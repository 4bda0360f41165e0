//! # ページネーション付きレスポンス
//!
//! ページ番号ベースの一覧 API レスポンス型。

use serde::{Deserialize, Serialize};

/// ページネーション付きレスポンス
///
/// ## JSON 形式
///
/// ```json
/// {
///   "data": [...],
///   "pagination": { "page": 1, "limit": 10, "total": 42, "totalPages": 5 }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PaginatedResponse<T> {
   pub data:       Vec<T>,
   pub pagination: Pagination,
}

/// ページ情報
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
   /// 1 始まりのページ番号
   pub page:        u32,
   /// 1 ページあたりの件数
   pub limit:       u32,
   /// 絞り込み後の総件数
   pub total:       u64,
   /// `ceil(total / limit)`
   pub total_pages: u64,
}

impl Pagination {
   /// 総ページ数を計算して作成する
   ///
   /// `limit` が 0 の場合は総ページ数も 0 とする。
   pub fn new(page: u32, limit: u32, total: u64) -> Self {
      let total_pages = match u64::from(limit) {
         0 => 0,
         limit => total.div_ceil(limit),
      };

      Self {
         page,
         limit,
         total,
         total_pages,
      }
   }
}

impl<T> PaginatedResponse<T> {
   pub fn new(data: Vec<T>, pagination: Pagination) -> Self {
      Self { data, pagination }
   }
}
