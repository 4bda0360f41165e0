//! ユーザー管理ユースケース

use std::sync::Arc;

use keystone_domain::{
   clock::Clock,
   user::{User, UserId, UserPatch, UserRole},
   user_query::{Page, UserListQuery},
};
use keystone_infra::{InfraError, repository::UserRepository};
use serde_json::Value;

use crate::error::{ApiError, AppError, details};

/// ユーザー作成の入力
#[derive(Debug, Clone)]
pub struct CreateUserInput {
   pub name:  String,
   pub email: String,
   pub role:  UserRole,
}

/// ユーザー管理ユースケース
pub struct UserUseCaseImpl {
   user_repository: Arc<dyn UserRepository>,
   clock:           Arc<dyn Clock>,
}

impl UserUseCaseImpl {
   pub fn new(user_repository: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> Self {
      Self {
         user_repository,
         clock,
      }
   }

   /// 条件に一致するユーザーを 1 ページ分取得する
   pub async fn list_users(&self, query: &UserListQuery) -> Result<Page<User>, ApiError> {
      Ok(self.user_repository.list(query).await?)
   }

   /// ID でユーザーを取得する
   pub async fn get_user(&self, id: UserId) -> Result<User, ApiError> {
      self
         .user_repository
         .find_by_id(&id)
         .await?
         .ok_or_else(|| user_not_found(id))
   }

   /// ユーザーを作成する
   ///
   /// ID と作成時刻はここで決める。メールアドレスの重複はストアが検出する。
   pub async fn create_user(&self, input: CreateUserInput) -> Result<User, ApiError> {
      let user = User::new(
         UserId::new(),
         input.name,
         input.email,
         input.role,
         self.clock.now(),
      );

      self
         .user_repository
         .put(&user)
         .await
         .map_err(convert_write_error)?;

      tracing::info!(user_id = %user.id(), "ユーザーを作成しました");
      Ok(user)
   }

   /// ユーザーを部分更新する
   ///
   /// 変更のないパッチでも存在確認は行い、現在の値を返す。
   /// 検索から保存まではストアが 1 操作で行うため、並行する削除や更新と競合しない。
   pub async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<User, ApiError> {
      if patch.is_empty() {
         return self.get_user(id).await;
      }

      let updated = self
         .user_repository
         .update(&id, patch)
         .await
         .map_err(convert_write_error)?
         .ok_or_else(|| user_not_found(id))?;

      tracing::info!(user_id = %id, "ユーザーを更新しました");
      Ok(updated)
   }

   /// ユーザーを削除する
   pub async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
      if !self.user_repository.delete(&id).await? {
         return Err(user_not_found(id));
      }

      tracing::info!(user_id = %id, "ユーザーを削除しました");
      Ok(())
   }
}

fn user_not_found(id: UserId) -> ApiError {
   AppError::not_found("User", Some(&id.to_string())).into()
}

/// 保存・更新時のエラーを変換する
///
/// メールアドレスの重複だけは 409 として返し、それ以外は予期しないエラーとする。
fn convert_write_error(err: InfraError) -> ApiError {
   match err.as_email_conflict() {
      Some(email) => AppError::conflict(
         "A user with this email already exists",
         Some(details([("email", Value::from(email))])),
      )
      .into(),
      None => err.into(),
   }
}

#[cfg(test)]
mod tests {
   use async_trait::async_trait;
   use chrono::{DateTime, Utc};
   use keystone_domain::clock::FixedClock;
   use keystone_infra::repository::{InMemoryUserRepository, SEED_USER_ID};
   use pretty_assertions::assert_eq;
   use serde_json::json;
   use tokio_test::assert_ok;

   use super::*;

   fn now() -> DateTime<Utc> {
      DateTime::from_timestamp(1_700_000_000, 0).unwrap()
   }

   fn sut() -> UserUseCaseImpl {
      UserUseCaseImpl::new(
         Arc::new(InMemoryUserRepository::seeded(now())),
         Arc::new(FixedClock::new(now())),
      )
   }

   fn seed_id() -> UserId {
      UserId::from_uuid(SEED_USER_ID)
   }

   fn input(email: &str) -> CreateUserInput {
      CreateUserInput {
         name:  "Jane Roe".to_string(),
         email: email.to_string(),
         role:  UserRole::User,
      }
   }

   fn app_error(err: ApiError) -> AppError {
      match err {
         ApiError::App(err) => err,
         other => panic!("AppError を期待したが {other:?} だった"),
      }
   }

   // --- create_user ---

   #[tokio::test]
   async fn test_create_userは注入した時刻で作成する() {
      let sut = sut();

      let created = assert_ok!(sut.create_user(input("jane@example.com")).await);

      assert_eq!(created.created_at(), now());
      assert_eq!(created.email(), "jane@example.com");
      assert_eq!(sut.get_user(*created.id()).await.unwrap(), created);
   }

   #[tokio::test]
   async fn test_create_userは重複メールで409を返す() {
      let sut = sut();

      let err = app_error(sut.create_user(input("john@example.com")).await.unwrap_err());

      assert_eq!(err.status().as_u16(), 409);
      assert_eq!(err.code(), "CONFLICT");
      assert_eq!(err.message(), "A user with this email already exists");
      assert_eq!(
         err.details(),
         Some(&details([("email", json!("john@example.com"))]))
      );
   }

   // --- get_user ---

   #[tokio::test]
   async fn test_get_userは存在しないidで404を返す() {
      let sut = sut();
      let id = UserId::new();

      let err = app_error(sut.get_user(id).await.unwrap_err());

      assert_eq!(err.status().as_u16(), 404);
      assert_eq!(err.message(), format!("User with id '{id}' not found"));
   }

   // --- update_user ---

   #[tokio::test]
   async fn test_update_userは指定したフィールドだけ変更する() {
      let sut = sut();

      let updated = assert_ok!(
         sut.update_user(seed_id(), UserPatch {
            role: Some(UserRole::Guest),
            ..Default::default()
         })
         .await
      );

      assert_eq!(updated.role(), UserRole::Guest);
      assert_eq!(updated.name(), "John Doe");
      assert_eq!(updated.created_at(), now());
   }

   #[tokio::test]
   async fn test_update_userは空のパッチで現在の値を返す() {
      let sut = sut();

      let unchanged = assert_ok!(sut.update_user(seed_id(), UserPatch::default()).await);

      assert_eq!(unchanged, sut.get_user(seed_id()).await.unwrap());
   }

   #[tokio::test]
   async fn test_update_userは他人のメールへの変更で409を返す() {
      let sut = sut();
      let other = sut.create_user(input("other@example.com")).await.unwrap();

      let err = app_error(
         sut.update_user(*other.id(), UserPatch {
            email: Some("john@example.com".to_string()),
            ..Default::default()
         })
         .await
         .unwrap_err(),
      );

      assert_eq!(err.code(), "CONFLICT");
      let stored = sut.get_user(*other.id()).await.unwrap();
      assert_eq!(stored.email(), "other@example.com");
   }

   #[tokio::test]
   async fn test_update_userは自分の現在のメールならそのまま保存できる() {
      let sut = sut();

      let updated = assert_ok!(
         sut.update_user(seed_id(), UserPatch {
            email: Some("john@example.com".to_string()),
            name: Some("Johnny".to_string()),
            ..Default::default()
         })
         .await
      );

      assert_eq!(updated.name(), "Johnny");
   }

   #[tokio::test]
   async fn test_update_userは存在しないidで404を返す() {
      let err = app_error(
         sut()
            .update_user(UserId::new(), UserPatch {
               name: Some("x".to_string()),
               ..Default::default()
            })
            .await
            .unwrap_err(),
      );

      assert_eq!(err.code(), "NOT_FOUND");
   }

   #[tokio::test]
   async fn test_update_userは削除済みユーザーを復活させず404を返す() {
      let sut = sut();
      assert_ok!(sut.delete_user(seed_id()).await);

      let err = app_error(
         sut.update_user(seed_id(), UserPatch {
            name: Some("Back".to_string()),
            ..Default::default()
         })
         .await
         .unwrap_err(),
      );

      assert_eq!(err.code(), "NOT_FOUND");
      assert_eq!(app_error(sut.get_user(seed_id()).await.unwrap_err()).code(), "NOT_FOUND");
   }

   // --- delete_user ---

   #[tokio::test]
   async fn test_delete_userは2回目に404を返す() {
      let sut = sut();

      assert_ok!(sut.delete_user(seed_id()).await);
      let err = app_error(sut.delete_user(seed_id()).await.unwrap_err());

      assert_eq!(err.status().as_u16(), 404);
   }

   // --- list_users ---

   #[tokio::test]
   async fn test_list_usersはストアの結果を返す() {
      let page = assert_ok!(sut().list_users(&UserListQuery::default()).await);

      assert_eq!(page.total, 1);
      assert_eq!(page.items[0].name(), "John Doe");
   }

   // --- ストア障害 ---

   struct BrokenRepository;

   #[async_trait]
   impl UserRepository for BrokenRepository {
      async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, InfraError> {
         Err(InfraError::unexpected("connection reset"))
      }

      async fn list(&self, _query: &UserListQuery) -> Result<Page<User>, InfraError> {
         Err(InfraError::unexpected("connection reset"))
      }

      async fn put(&self, _user: &User) -> Result<(), InfraError> {
         Err(InfraError::unexpected("connection reset"))
      }

      async fn update(&self, _id: &UserId, _patch: UserPatch) -> Result<Option<User>, InfraError> {
         Err(InfraError::unexpected("connection reset"))
      }

      async fn delete(&self, _id: &UserId) -> Result<bool, InfraError> {
         Err(InfraError::unexpected("connection reset"))
      }
   }

   #[tokio::test]
   async fn test_ストア障害は予期しないエラーになる() {
      let sut = UserUseCaseImpl::new(Arc::new(BrokenRepository), Arc::new(FixedClock::new(now())));

      let err = sut.create_user(input("a@example.com")).await.unwrap_err();
      assert!(matches!(err, ApiError::Unexpected { .. }));

      let err = sut
         .update_user(seed_id(), UserPatch {
            name: Some("x".to_string()),
            ..Default::default()
         })
         .await
         .unwrap_err();
      assert!(matches!(err, ApiError::Unexpected { .. }));
   }
}
