//! Users resource handlers
//!
//! Thin adapters over `UserService`: extract, call, map the result into
//! the HAL representation or an `ApiError` in the request locale.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, FromRef, Query, State},
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    Json,
};

use super::dto::{
    page_request_from_query, user_href, UserCollectionDto, UserDto, UserRequest,
};
use crate::application::UserService;
use crate::interfaces::http::common::{ApiError, ApiErrorBody, IdPath, JsonBody, RequestLocale};
use crate::shared::Locale;

/// Users handler state
#[derive(Clone)]
pub struct UsersState {
    pub service: Arc<UserService>,
    pub default_locale: Locale,
}

impl FromRef<UsersState> for Locale {
    fn from_ref(state: &UsersState) -> Self {
        state.default_locale
    }
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(
        ("page" = Option<u64>, Query, description = "Zero-based page index"),
        ("size" = Option<u64>, Query, description = "Page size (default 20)"),
        ("sort" = Option<Vec<String>>, Query, description = "property[,asc|desc], repeatable")
    ),
    responses(
        (status = 200, description = "User page", body = UserCollectionDto),
        (status = 400, description = "Bad paging or sort parameter", body = ApiErrorBody)
    )
)]
pub async fn list_users(
    State(state): State<UsersState>,
    RequestLocale(locale): RequestLocale,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<UserCollectionDto>, ApiError> {
    let Query(pairs) = query.map_err(|e| ApiError::malformed(e.body_text()))?;
    let dto = page_request_from_query(&pairs).map_err(|e| ApiError::from_domain(e, locale))?;
    let sort = dto.sort.clone();

    let result = state
        .service
        .list_users(dto)
        .await
        .map_err(|e| ApiError::from_domain(e, locale))?;

    Ok(Json(UserCollectionDto::new(result, &sort)))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = UserDto),
        (status = 404, description = "Not found", body = ApiErrorBody)
    )
)]
pub async fn get_user(
    State(state): State<UsersState>,
    RequestLocale(locale): RequestLocale,
    IdPath(id): IdPath,
) -> Result<Json<UserDto>, ApiError> {
    match state.service.get_user(id).await {
        Ok(user) => Ok(Json(user.into())),
        Err(e) => Err(ApiError::from_domain(e, locale)),
    }
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 400, description = "Validation error", body = ApiErrorBody),
        (status = 409, description = "E-mail already taken", body = ApiErrorBody)
    )
)]
pub async fn create_user(
    State(state): State<UsersState>,
    RequestLocale(locale): RequestLocale,
    JsonBody(request): JsonBody<UserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .service
        .create_user(request.into())
        .await
        .map_err(|e| ApiError::from_domain(e, locale))?;

    let location = user_href(user.id);
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(UserDto::from(user)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User replaced", body = UserDto),
        (status = 400, description = "Validation error", body = ApiErrorBody),
        (status = 404, description = "Not found", body = ApiErrorBody),
        (status = 409, description = "E-mail already taken", body = ApiErrorBody)
    )
)]
pub async fn replace_user(
    State(state): State<UsersState>,
    RequestLocale(locale): RequestLocale,
    IdPath(id): IdPath,
    JsonBody(request): JsonBody<UserRequest>,
) -> Result<Json<UserDto>, ApiError> {
    match state.service.replace_user(id, request.into()).await {
        Ok(user) => Ok(Json(user.into())),
        Err(e) => Err(ApiError::from_domain(e, locale)),
    }
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = UserDto),
        (status = 400, description = "Validation error", body = ApiErrorBody),
        (status = 404, description = "Not found", body = ApiErrorBody),
        (status = 409, description = "E-mail already taken", body = ApiErrorBody)
    )
)]
pub async fn patch_user(
    State(state): State<UsersState>,
    RequestLocale(locale): RequestLocale,
    IdPath(id): IdPath,
    JsonBody(request): JsonBody<UserRequest>,
) -> Result<Json<UserDto>, ApiError> {
    match state.service.patch_user(id, request.into()).await {
        Ok(user) => Ok(Json(user.into())),
        Err(e) => Err(ApiError::from_domain(e, locale)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "Not found", body = ApiErrorBody)
    )
)]
pub async fn delete_user(
    State(state): State<UsersState>,
    RequestLocale(locale): RequestLocale,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    state
        .service
        .delete_user(id)
        .await
        .map_err(|e| ApiError::from_domain(e, locale))?;
    Ok(StatusCode::NO_CONTENT)
}
