//! Handlers for the `users` resource.

use std::sync::Arc;

use axum::{Json, extract::Path, extract::State, http::StatusCode};
use launchpad_data::users::{self, NewUser};
use tracing::info;

use crate::http::errors::ApiError;
use crate::http::extract::{ValidatedJson, ValidatedQuery};
use crate::models::{CreateUserRequest, DataBody, Paged, PageQuery, Pagination, UserResponse};
use crate::state::ApiState;

pub(crate) async fn list_users(
    State(state): State<Arc<ApiState>>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> Result<Json<Paged<UserResponse>>, ApiError> {
    let total = users::count_users(&state.pool)
        .await
        .map_err(|err| ApiError::internal(state.env(), "users.count", err))?;
    let rows = users::list_users(&state.pool, query.per_page(), query.offset())
        .await
        .map_err(|err| ApiError::internal(state.env(), "users.list", err))?;

    Ok(Json(Paged {
        data: rows.into_iter().map(UserResponse::from).collect(),
        pagination: Pagination::new(
            query.page(),
            query.per_page(),
            u64::try_from(total).unwrap_or_default(),
        ),
    }))
}

pub(crate) async fn get_user(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<u64>,
) -> Result<Json<DataBody<UserResponse>>, ApiError> {
    let row = users::fetch_user(&state.pool, id)
        .await
        .map_err(|err| ApiError::internal(state.env(), "users.fetch", err))?
        .ok_or_else(|| ApiError::not_found("user not found"))?;
    Ok(Json(DataBody {
        data: UserResponse::from(row),
    }))
}

pub(crate) async fn create_user(
    State(state): State<Arc<ApiState>>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<DataBody<UserResponse>>), ApiError> {
    let new_user = NewUser {
        name: request.name.trim(),
        email: request.email.trim(),
    };

    let id = users::insert_user(&state.pool, &new_user)
        .await
        .map_err(|err| {
            if users::is_unique_violation(&err) {
                ApiError::bad_request("email is already in use")
            } else {
                ApiError::internal(state.env(), "users.create", err)
            }
        })?;

    let row = users::fetch_user(&state.pool, id)
        .await
        .map_err(|err| ApiError::internal(state.env(), "users.create", err))?
        .ok_or_else(|| {
            ApiError::internal(state.env(), "users.create", "inserted user row not found")
        })?;

    info!(user_id = id, "user created");
    Ok((
        StatusCode::CREATED,
        Json(DataBody {
            data: UserResponse::from(row),
        }),
    ))
}
