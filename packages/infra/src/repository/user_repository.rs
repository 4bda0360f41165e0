//! # UserRepository
//!
//! ユーザーの保存先を抽象化するトレイトと、プロセス内メモリ実装。
//!
//! ## 一意性の保証
//!
//! メールアドレスの一意チェックは [`UserRepository::put`] の内部で、
//! 書き込みと同じロック区間で行う。呼び出し側が事前に検索して判定する必要はない。
//!
//! 部分更新も [`UserRepository::update`] が検索・重複チェック・反映を 1 つのロック区間で行う。
//! 削除済みのユーザーが更新で復活することはない。

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use keystone_domain::{
   user::{User, UserId, UserPatch, UserRole},
   user_query::{Page, UserListQuery},
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::InfraError;

/// 起動時に投入するサンプルユーザーの ID
pub const SEED_USER_ID: Uuid = uuid::uuid!("550e8400-e29b-41d4-a716-446655440000");

/// ユーザーリポジトリトレイト
///
/// ユースケース層からは `Arc<dyn UserRepository>` として注入する。
#[async_trait]
pub trait UserRepository: Send + Sync {
   /// ID でユーザーを検索
   async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError>;

   /// 条件に一致するユーザーを 1 ページ分取得
   async fn list(&self, query: &UserListQuery) -> Result<Page<User>, InfraError>;

   /// ユーザーを保存する（新規作成または置き換え）
   ///
   /// # エラー
   ///
   /// 別 ID のユーザーが同じメールアドレスを持つ場合は
   /// [`InfraErrorKind::EmailConflict`](crate::error::InfraErrorKind::EmailConflict) を返し、
   /// ストアは変更しない。
   async fn put(&self, user: &User) -> Result<(), InfraError>;

   /// 既存ユーザーに部分更新を適用して保存する
   ///
   /// # 戻り値
   ///
   /// - `Ok(Some(user))`: 更新後のユーザー
   /// - `Ok(None)`: 対象が存在しなかった（ストアは変更しない）
   ///
   /// # エラー
   ///
   /// 更新後のメールアドレスが別ユーザーと重複する場合は `put` と同じく
   /// `EmailConflict` を返し、ストアは変更しない。
   async fn update(&self, id: &UserId, patch: UserPatch) -> Result<Option<User>, InfraError>;

   /// ユーザーを削除する
   ///
   /// # 戻り値
   ///
   /// - `Ok(true)`: 削除した
   /// - `Ok(false)`: 対象が存在しなかった
   async fn delete(&self, id: &UserId) -> Result<bool, InfraError>;
}

/// メモリ上の UserRepository 実装
///
/// プロセス終了で内容は失われる。書き込みは `RwLock` の書き込みロックで直列化する。
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
   users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
   pub fn new() -> Self {
      Self::default()
   }

   /// サンプルユーザー（John Doe / admin）を 1 件入れた状態で作成する
   pub fn seeded(now: DateTime<Utc>) -> Self {
      let seed = User::new(
         UserId::from_uuid(SEED_USER_ID),
         "John Doe",
         "john@example.com",
         UserRole::Admin,
         now,
      );
      Self::with_users([seed])
   }

   /// 任意のユーザー群で初期化する
   ///
   /// 同じ ID が複数ある場合は後勝ちになる。
   pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
      let users = users.into_iter().map(|u| (*u.id(), u)).collect();
      Self {
         users: RwLock::new(users),
      }
   }
}

/// 別 ID のユーザーが同じメールアドレスを使っていないか確認する
///
/// 書き込みロックを保持したまま呼ぶこと。
fn ensure_email_available(users: &HashMap<UserId, User>, user: &User) -> Result<(), InfraError> {
   let taken = users
      .values()
      .any(|existing| existing.email() == user.email() && existing.id() != user.id());
   if taken {
      tracing::debug!(email = user.email(), "メールアドレスの重複を検出");
      return Err(InfraError::email_conflict(user.email()));
   }
   Ok(())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
   async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError> {
      Ok(self.users.read().await.get(id).cloned())
   }

   async fn list(&self, query: &UserListQuery) -> Result<Page<User>, InfraError> {
      let users = self.users.read().await;
      Ok(query.apply(users.values().cloned()))
   }

   async fn put(&self, user: &User) -> Result<(), InfraError> {
      let mut users = self.users.write().await;
      ensure_email_available(&users, user)?;

      users.insert(*user.id(), user.clone());
      Ok(())
   }

   async fn update(&self, id: &UserId, patch: UserPatch) -> Result<Option<User>, InfraError> {
      let mut users = self.users.write().await;

      let Some(current) = users.get(id) else {
         return Ok(None);
      };
      let updated = current.clone().apply(patch);
      ensure_email_available(&users, &updated)?;

      users.insert(*id, updated.clone());
      Ok(Some(updated))
   }

   async fn delete(&self, id: &UserId) -> Result<bool, InfraError> {
      Ok(self.users.write().await.remove(id).is_some())
   }
}
