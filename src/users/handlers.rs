use axum::{
    body::Bytes,
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderName, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    error::AppError,
    state::AppState,
    users::{
        dto::{CreateUserRequest, CreatedUserResponse, ListParams, UpdateUserRequest},
        password::hash_password_blocking,
        repo::RepoError,
        repo_types::{NewUser, User, UserChanges},
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(create_user).get(list_users))
        .route(
            "/api/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

fn user_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    let Path(id) = id.map_err(|e| {
        warn!(error = %e, "bad user id");
        AppError::from(e)
    })?;
    Ok(id)
}

/// Decodes a JSON body whatever its Content-Type header says.
fn body<T: DeserializeOwned>(raw: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(raw).map_err(|e| {
        warn!(error = %e, "bad request body");
        AppError::Invalid(format!("Invalid JSON: {e}"))
    })
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = CreatedUserResponse),
        (status = 400, description = "Malformed JSON body"),
        (status = 500, description = "Storage failure"),
    )
)]
#[instrument(skip(state, raw))]
pub async fn create_user(
    State(state): State<AppState>,
    raw: Bytes,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<CreatedUserResponse>), AppError> {
    let payload: CreateUserRequest = body(&raw)?;

    let now = OffsetDateTime::now_utc();
    let new_user = NewUser {
        username: payload.username,
        email: payload.email,
        password_hash: hash_password_blocking(payload.password).await?,
        created_at: now,
        updated_at: now,
    };

    let id = state.users.create(new_user).await?;

    info!(user_id = id, "user created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/users/{id}"))],
        Json(CreatedUserResponse {
            message: "User created successfully".into(),
            id,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 400, description = "Non-numeric id"),
        (status = 404, description = "No such user"),
        (status = 500, description = "Storage failure"),
    )
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<User>, AppError> {
    let id = user_id(id)?;
    match state.users.get_by_id(id).await {
        Ok(user) => Ok(Json(user)),
        Err(RepoError::NotFound) => {
            warn!(user_id = id, "user not found");
            Err(AppError::NotFound)
        }
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User replaced"),
        (status = 400, description = "Malformed JSON body or id mismatch"),
        (status = 404, description = "No such user"),
        (status = 500, description = "Storage failure"),
    )
)]
#[instrument(skip(state, raw))]
pub async fn update_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    raw: Bytes,
) -> Result<StatusCode, AppError> {
    let id = user_id(id)?;
    let payload: UpdateUserRequest = body(&raw)?;

    if let Some(body_id) = payload.id {
        if body_id != id {
            warn!(user_id = id, body_id, "id mismatch");
            return Err(AppError::Invalid(format!(
                "body id {body_id} does not match path id {id}"
            )));
        }
    }

    let changes = UserChanges {
        username: payload.username,
        email: payload.email,
        password_hash: hash_password_blocking(payload.password).await?,
        updated_at: OffsetDateTime::now_utc(),
    };

    match state.users.update(id, changes).await {
        Ok(()) => {
            info!(user_id = id, "user updated");
            Ok(StatusCode::OK)
        }
        Err(RepoError::NotFound) => {
            warn!(user_id = id, "update of unknown user");
            Err(AppError::NotFound)
        }
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "deleted_at set; the row stays readable"),
        (status = 400, description = "Non-numeric id"),
        (status = 404, description = "No such user"),
        (status = 500, description = "Storage failure"),
    )
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = user_id(id)?;

    match state.users.delete(id).await {
        Ok(()) => {
            info!(user_id = id, "user marked deleted");
            Ok(StatusCode::OK)
        }
        Err(RepoError::NotFound) => {
            warn!(user_id = id, "delete of unknown user");
            Err(AppError::NotFound)
        }
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(ListParams),
    responses(
        (status = 200, description = "A page of users in id order", body = [User]),
        (status = 400, description = "Missing, non-integer or negative limit/offset"),
        (status = 500, description = "Storage failure"),
    )
)]
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<User>>, AppError> {
    let Query(p) = params.map_err(|e| {
        warn!(error = %e, "bad list params");
        AppError::from(e)
    })?;

    if p.limit < 0 || p.offset < 0 {
        return Err(AppError::Invalid(
            "limit and offset must not be negative".into(),
        ));
    }

    let users = state.users.list(p.limit, p.offset).await?;
    Ok(Json(users))
}
