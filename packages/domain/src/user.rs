//! # ユーザー
//!
//! デモ用 CRUD の対象となるユーザーエンティティと、その部分更新を定義する。
//!
//! ## 設計方針
//!
//! - **Newtype パターン**: UserId は UUID v4 をラップし、他の ID との取り違えを防ぐ
//! - **不変性**: フィールドは非公開、変更は [`User::apply`] で新しい値を返す
//! - **検証は入口で**: 名前・メール形式の検証は API 層の入力スキーマで行う
//!
//! ## 使用例
//!
//! ```rust
//! use keystone_domain::user::{User, UserId, UserPatch, UserRole};
//!
//! let user = User::new(
//!     UserId::new(),
//!     "John Doe",
//!     "john@example.com",
//!     UserRole::Admin,
//!     chrono::Utc::now(),
//! );
//!
//! let renamed = user.apply(UserPatch {
//!     name: Some("Jane Doe".to_string()),
//!     ..Default::default()
//! });
//! assert_eq!(renamed.name(), "Jane Doe");
//! assert_eq!(renamed.email(), "john@example.com");
//! ```

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use uuid::Uuid;

/// ユーザー ID（一意識別子）
///
/// UUID v4 を使用する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct UserId(Uuid);

impl UserId {
   /// 新しいユーザー ID を生成する
   pub fn new() -> Self {
      Self(Uuid::new_v4())
   }

   /// 既存の UUID からユーザー ID を作成する
   pub fn from_uuid(uuid: Uuid) -> Self {
      Self(uuid)
   }

   pub fn as_uuid(&self) -> &Uuid {
      &self.0
   }
}

impl Default for UserId {
   fn default() -> Self {
      Self::new()
   }
}

/// ユーザーロール
///
/// 作成時に省略された場合は [`User`](UserRole::User) になる。
#[derive(
   Debug,
   Clone,
   Copy,
   Default,
   PartialEq,
   Eq,
   Hash,
   Serialize,
   Deserialize,
   IntoStaticStr,
   strum::Display,
   strum::EnumString,
)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserRole {
   Admin,
   #[default]
   User,
   Guest,
}

/// ユーザーエンティティ
///
/// # 不変条件
///
/// - `email` はストア内で一意（ストア側で保証する）
/// - `id` と `created_at` は作成後に変わらない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
   id:         UserId,
   name:       String,
   email:      String,
   role:       UserRole,
   created_at: DateTime<Utc>,
}

impl User {
   /// 新しいユーザーを作成する
   ///
   /// `created_at` は呼び出し元（Clock）から注入する。
   pub fn new(
      id: UserId,
      name: impl Into<String>,
      email: impl Into<String>,
      role: UserRole,
      created_at: DateTime<Utc>,
   ) -> Self {
      Self {
         id,
         name: name.into(),
         email: email.into(),
         role,
         created_at,
      }
   }

   pub fn id(&self) -> &UserId {
      &self.id
   }

   pub fn name(&self) -> &str {
      &self.name
   }

   pub fn email(&self) -> &str {
      &self.email
   }

   pub fn role(&self) -> UserRole {
      self.role
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }

   /// 部分更新を適用した新しいユーザーを返す
   ///
   /// `None` のフィールドは元の値を維持する。
   pub fn apply(self, patch: UserPatch) -> Self {
      Self {
         name: patch.name.unwrap_or(self.name),
         email: patch.email.unwrap_or(self.email),
         role: patch.role.unwrap_or(self.role),
         ..self
      }
   }
}

/// ユーザーの部分更新
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
   pub name:  Option<String>,
   pub email: Option<String>,
   pub role:  Option<UserRole>,
}

impl UserPatch {
   /// 変更対象のフィールドが 1 つも無いか
   pub fn is_empty(&self) -> bool {
      self.name.is_none() && self.email.is_none() && self.role.is_none()
   }
}

#[cfg(test)]
mod tests {
   use std::str::FromStr;

   use pretty_assertions::assert_eq;
   use rstest::{fixture, rstest};

   use super::*;

   // フィクスチャ

   #[fixture]
   fn now() -> DateTime<Utc> {
      DateTime::from_timestamp(1_700_000_000, 0).unwrap()
   }

   #[fixture]
   fn user(now: DateTime<Utc>) -> User {
      User::new(
         UserId::new(),
         "John Doe",
         "john@example.com",
         UserRole::Admin,
         now,
      )
   }

   // UserId のテスト

   #[test]
   fn test_user_idはuuid_v4で生成される() {
      let id = UserId::new();
      assert_eq!(id.as_uuid().get_version(), Some(uuid::Version::Random));
   }

   #[test]
   fn test_user_idの表示はハイフン付きuuid() {
      let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
      assert_eq!(
         UserId::from_uuid(uuid).to_string(),
         "550e8400-e29b-41d4-a716-446655440000"
      );
   }

   // UserRole のテスト

   #[rstest]
   #[case(UserRole::Admin, "admin")]
   #[case(UserRole::User, "user")]
   #[case(UserRole::Guest, "guest")]
   fn test_ロールは小文字で文字列化される(#[case] role: UserRole, #[case] expected: &str) {
      assert_eq!(role.to_string(), expected);
      assert_eq!(UserRole::from_str(expected).unwrap(), role);
      assert_eq!(serde_json::to_value(role).unwrap(), expected);
   }

   #[test]
   fn test_ロールの既定値はuser() {
      assert_eq!(UserRole::default(), UserRole::User);
   }

   #[test]
   fn test_未知のロールは拒否される() {
      assert!(UserRole::from_str("root").is_err());
   }

   // User のテスト

   #[rstest]
   fn test_空のパッチは何も変えない(user: User) {
      let patched = user.clone().apply(UserPatch::default());
      assert_eq!(patched, user);
   }

   #[rstest]
   fn test_名前だけ更新すると他のフィールドは維持される(user: User, now: DateTime<Utc>) {
      let id = *user.id();
      let patched = user.apply(UserPatch {
         name: Some("X".to_string()),
         ..Default::default()
      });

      assert_eq!(patched.id(), &id);
      assert_eq!(patched.name(), "X");
      assert_eq!(patched.email(), "john@example.com");
      assert_eq!(patched.role(), UserRole::Admin);
      assert_eq!(patched.created_at(), now);
   }

   #[rstest]
   fn test_全フィールドを更新できる(user: User) {
      let patched = user.apply(UserPatch {
         name:  Some("Jane".to_string()),
         email: Some("jane@example.com".to_string()),
         role:  Some(UserRole::Guest),
      });

      assert_eq!(patched.name(), "Jane");
      assert_eq!(patched.email(), "jane@example.com");
      assert_eq!(patched.role(), UserRole::Guest);
   }

   #[test]
   fn test_is_empty() {
      assert!(UserPatch::default().is_empty());
      assert!(
         !UserPatch {
            role: Some(UserRole::User),
            ..Default::default()
         }
         .is_empty()
      );
   }
}
