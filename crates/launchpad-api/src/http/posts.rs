//! Handlers for the `posts` resource.

use std::sync::Arc;

use axum::{Json, extract::Path, extract::State, http::StatusCode};
use launchpad_data::posts::{self, NewPost};
use launchpad_data::users;
use tracing::info;

use crate::http::errors::ApiError;
use crate::http::extract::{ValidatedJson, ValidatedQuery};
use crate::models::{CreatePostRequest, DataBody, Paged, PageQuery, Pagination, PostResponse};
use crate::state::ApiState;

pub(crate) async fn list_posts(
    State(state): State<Arc<ApiState>>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> Result<Json<Paged<PostResponse>>, ApiError> {
    let total = posts::count_posts(&state.pool)
        .await
        .map_err(|err| ApiError::internal(state.env(), "posts.count", err))?;
    let rows = posts::list_posts(&state.pool, query.per_page(), query.offset())
        .await
        .map_err(|err| ApiError::internal(state.env(), "posts.list", err))?;

    Ok(Json(Paged {
        data: rows.into_iter().map(PostResponse::from).collect(),
        pagination: Pagination::new(
            query.page(),
            query.per_page(),
            u64::try_from(total).unwrap_or_default(),
        ),
    }))
}

pub(crate) async fn get_post(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<u64>,
) -> Result<Json<DataBody<PostResponse>>, ApiError> {
    let row = posts::fetch_post(&state.pool, id)
        .await
        .map_err(|err| ApiError::internal(state.env(), "posts.fetch", err))?
        .ok_or_else(|| ApiError::not_found("post not found"))?;
    Ok(Json(DataBody {
        data: PostResponse::from(row),
    }))
}

pub(crate) async fn create_post(
    State(state): State<Arc<ApiState>>,
    ValidatedJson(request): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<DataBody<PostResponse>>), ApiError> {
    if let Some(author_id) = request.author_id {
        let author = users::fetch_user(&state.pool, author_id)
            .await
            .map_err(|err| ApiError::internal(state.env(), "posts.create", err))?;
        if author.is_none() {
            return Err(ApiError::bad_request("author does not exist"));
        }
    }

    let new_post = NewPost {
        author_id: request.author_id,
        title: request.title.trim(),
        content: request.content.trim(),
        published: request.published.unwrap_or(false),
    };

    let id = posts::insert_post(&state.pool, &new_post)
        .await
        .map_err(|err| ApiError::internal(state.env(), "posts.create", err))?;

    let row = posts::fetch_post(&state.pool, id)
        .await
        .map_err(|err| ApiError::internal(state.env(), "posts.create", err))?
        .ok_or_else(|| {
            ApiError::internal(state.env(), "posts.create", "inserted post row not found")
        })?;

    info!(post_id = id, "post created");
    Ok((
        StatusCode::CREATED,
        Json(DataBody {
            data: PostResponse::from(row),
        }),
    ))
}
