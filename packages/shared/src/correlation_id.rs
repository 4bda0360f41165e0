//! # リクエスト相関 ID
//!
//! 1 件の HTTP リクエストに紐づくログとレスポンスヘッダを突き合わせるための識別子。
//!
//! ## 決定規則
//!
//! - クライアントが `X-Request-Id` に空でない値を送ってきた場合はそれを再利用する
//! - それ以外は UUID v4 を新規に生成する
//!
//! ## 使用例
//!
//! ```rust
//! use keystone_shared::CorrelationId;
//!
//! // ヘッダ未指定なら新規生成
//! let generated = CorrelationId::resolve(None);
//! assert_eq!(generated.as_str().len(), 36);
//!
//! // 受け取った値はそのまま使う
//! let propagated = CorrelationId::resolve(Some("custom-trace-id-12345"));
//! assert_eq!(propagated.as_str(), "custom-trace-id-12345");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// リクエスト単位の相関 ID
///
/// 受信ヘッダ由来の任意文字列もありうるため、内部は `String` で保持する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationId(String);

impl CorrelationId {
   /// UUID v4 で新しい ID を生成する
   pub fn new() -> Self {
      Self(Uuid::new_v4().to_string())
   }

   /// 受信した値から ID を作成する
   pub fn from_string(s: impl Into<String>) -> Self {
      Self(s.into())
   }

   /// ヘッダ値から ID を決定する
   ///
   /// 値が存在し、かつ空文字列でなければ再利用する。
   /// それ以外は [`CorrelationId::new`] で生成する。
   pub fn resolve(inbound: Option<&str>) -> Self {
      match inbound {
         Some(value) if !value.is_empty() => Self::from_string(value),
         _ => Self::new(),
      }
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }
}

impl Default for CorrelationId {
   fn default() -> Self {
      Self::new()
   }
}

impl fmt::Display for CorrelationId {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str(&self.0)
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::{assert_eq, assert_ne};

   use super::*;

   #[test]
   fn test_newで生成したidはuuid_v4形式である() {
      let id = CorrelationId::new();
      let uuid = Uuid::parse_str(id.as_str()).unwrap();

      assert_eq!(uuid.get_version(), Some(uuid::Version::Random));
   }

   #[test]
   fn test_newは毎回異なるidを返す() {
      assert_ne!(CorrelationId::new(), CorrelationId::new());
   }

   #[test]
   fn test_resolve_受信値があればそのまま使う() {
      let id = CorrelationId::resolve(Some("custom-trace-id-12345"));
      assert_eq!(id.as_str(), "custom-trace-id-12345");
   }

   #[test]
   fn test_resolve_空文字列は無視して生成する() {
      let id = CorrelationId::resolve(Some(""));
      assert!(Uuid::parse_str(id.as_str()).is_ok());
   }

   #[test]
   fn test_resolve_未指定なら生成する() {
      let id = CorrelationId::resolve(None);
      assert!(Uuid::parse_str(id.as_str()).is_ok());
   }

   #[test]
   fn test_displayは内部文字列を出力する() {
      let id = CorrelationId::from_string("display-test");
      assert_eq!(format!("{id}"), "display-test");
   }
}
