//! # ユーザーハンドラ
//!
//! インメモリストア上のユーザー CRUD を提供する。
//!
//! ## エンドポイント
//!
//! - `GET /users` - 一覧（絞り込み・並び替え・ページ分割）
//! - `GET /users/{id}` - 詳細
//! - `POST /users` - 作成
//! - `PATCH /users/{id}` - 部分更新
//! - `DELETE /users/{id}` - 削除

use std::sync::Arc;

use axum::{
   Json,
   extract::State,
   http::StatusCode,
   response::IntoResponse,
};
use chrono::SecondsFormat;
use keystone_domain::{
   user::{User, UserId, UserPatch, UserRole},
   user_query::{SortBy, SortOrder, UserListQuery},
};
use keystone_shared::{ErrorResponse, PaginatedResponse, Pagination};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
   error::ApiError,
   extract::{ValidatedJson, ValidatedPath, ValidatedQuery},
   usecase::user::{CreateUserInput, UserUseCaseImpl},
};

/// ユーザー API の共有状態
pub struct UserState {
   pub usecase: UserUseCaseImpl,
}

// --- リクエスト型 ---

/// ユーザー作成リクエスト
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
   #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
   pub name:  String,
   #[validate(email(message = "Invalid email format"))]
   pub email: String,
   /// 省略時は `user`
   #[serde(default)]
   pub role:  UserRole,
}

/// ユーザー部分更新リクエスト
///
/// 指定したフィールドだけを変更する。
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
   #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
   pub name:  Option<String>,
   #[validate(email(message = "Invalid email format"))]
   pub email: Option<String>,
   pub role:  Option<UserRole>,
}

impl From<UpdateUserRequest> for UserPatch {
   fn from(req: UpdateUserRequest) -> Self {
      Self {
         name:  req.name,
         email: req.email,
         role:  req.role,
      }
   }
}

// --- クエリパラメータ型 ---

/// ユーザー一覧クエリパラメータ
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
   /// 1 始まりのページ番号
   #[serde(default = "default_page")]
   #[validate(range(min = 1))]
   #[param(minimum = 1, default = 1)]
   pub page:       u32,
   /// 1 ページあたりの件数（最大 100）
   #[serde(default = "default_limit")]
   #[validate(range(min = 1, max = 100))]
   #[param(minimum = 1, maximum = 100, default = 10)]
   pub limit:      u32,
   /// ロールで絞り込む
   pub role:       Option<UserRole>,
   /// 名前またはメールの部分一致（大文字小文字を区別しない）
   #[validate(length(min = 1, max = 100))]
   pub search:     Option<String>,
   #[serde(default)]
   pub sort_by:    SortBy,
   #[serde(default)]
   pub sort_order: SortOrder,
}

fn default_page() -> u32 {
   1
}

fn default_limit() -> u32 {
   10
}

impl From<ListUsersQuery> for UserListQuery {
   fn from(query: ListUsersQuery) -> Self {
      Self {
         page:       query.page,
         limit:      query.limit,
         role:       query.role,
         search:     query.search,
         sort_by:    query.sort_by,
         sort_order: query.sort_order,
      }
   }
}

// --- レスポンス型 ---

/// ユーザーデータ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
   pub id:         Uuid,
   pub name:       String,
   pub email:      String,
   pub role:       UserRole,
   /// ISO 8601（UTC、ミリ秒精度）
   pub created_at: String,
}

impl From<&User> for UserData {
   fn from(user: &User) -> Self {
      Self {
         id:         *user.id().as_uuid(),
         name:       user.name().to_string(),
         email:      user.email().to_string(),
         role:       user.role(),
         created_at: user
            .created_at()
            .to_rfc3339_opts(SecondsFormat::Millis, true),
      }
   }
}

// --- ハンドラ ---

/// GET /users
#[utoipa::path(
   get,
   path = "/users",
   tag = "users",
   params(ListUsersQuery),
   responses(
      (status = 200, description = "ユーザー一覧", body = PaginatedResponse<UserData>),
      (status = 400, description = "クエリパラメータが不正", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn list_users(
   State(state): State<Arc<UserState>>,
   ValidatedQuery(query): ValidatedQuery<ListUsersQuery>,
) -> Result<Json<PaginatedResponse<UserData>>, ApiError> {
   let query = UserListQuery::from(query);
   let page = state.usecase.list_users(&query).await?;

   let data = page.items.iter().map(UserData::from).collect();
   let pagination = Pagination::new(query.page, query.limit, page.total);
   Ok(Json(PaginatedResponse::new(data, pagination)))
}

/// GET /users/{id}
#[utoipa::path(
   get,
   path = "/users/{id}",
   tag = "users",
   params(("id" = Uuid, Path, description = "ユーザー ID")),
   responses(
      (status = 200, description = "ユーザー詳細", body = UserData),
      (status = 400, description = "ID の形式が不正", body = ErrorResponse),
      (status = 404, description = "ユーザーが見つからない", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all, fields(user_id = %id))]
pub async fn get_user(
   State(state): State<Arc<UserState>>,
   ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<UserData>, ApiError> {
   let user = state.usecase.get_user(UserId::from_uuid(id)).await?;
   Ok(Json(UserData::from(&user)))
}

/// POST /users
#[utoipa::path(
   post,
   path = "/users",
   tag = "users",
   request_body = CreateUserRequest,
   responses(
      (status = 201, description = "作成成功", body = UserData),
      (status = 400, description = "入力が不正", body = ErrorResponse),
      (status = 409, description = "メールアドレスが使用済み", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn create_user(
   State(state): State<Arc<UserState>>,
   ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
   let user = state
      .usecase
      .create_user(CreateUserInput {
         name:  req.name,
         email: req.email,
         role:  req.role,
      })
      .await?;

   Ok((StatusCode::CREATED, Json(UserData::from(&user))))
}

/// PATCH /users/{id}
#[utoipa::path(
   patch,
   path = "/users/{id}",
   tag = "users",
   params(("id" = Uuid, Path, description = "ユーザー ID")),
   request_body = UpdateUserRequest,
   responses(
      (status = 200, description = "更新成功", body = UserData),
      (status = 400, description = "入力が不正", body = ErrorResponse),
      (status = 404, description = "ユーザーが見つからない", body = ErrorResponse),
      (status = 409, description = "メールアドレスが使用済み", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all, fields(user_id = %id))]
pub async fn update_user(
   State(state): State<Arc<UserState>>,
   ValidatedPath(id): ValidatedPath<Uuid>,
   ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserData>, ApiError> {
   let user = state
      .usecase
      .update_user(UserId::from_uuid(id), UserPatch::from(req))
      .await?;
   Ok(Json(UserData::from(&user)))
}

/// DELETE /users/{id}
#[utoipa::path(
   delete,
   path = "/users/{id}",
   tag = "users",
   params(("id" = Uuid, Path, description = "ユーザー ID")),
   responses(
      (status = 204, description = "削除成功"),
      (status = 400, description = "ID の形式が不正", body = ErrorResponse),
      (status = 404, description = "ユーザーが見つからない", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all, fields(user_id = %id))]
pub async fn delete_user(
   State(state): State<Arc<UserState>>,
   ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<StatusCode, ApiError> {
   state.usecase.delete_user(UserId::from_uuid(id)).await?;
   Ok(StatusCode::NO_CONTENT)
}
