mod dto;
pub mod handlers;
pub mod password;
pub mod repo;
pub mod repo_types;
#[cfg(test)]
pub(crate) mod testing;

use crate::state::AppState;
use axum::Router;
use utoipa::OpenApi;

pub use repo::{PgUserRepository, RepoError, UserRepository};
pub use repo_types::User;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}

/// OpenAPI document served next to the Swagger UI.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_user,
        handlers::get_user,
        handlers::update_user,
        handlers::delete_user,
        handlers::list_users,
    ),
    components(schemas(
        User,
        dto::CreateUserRequest,
        dto::UpdateUserRequest,
        dto::CreatedUserResponse,
    )),
    tags((name = "users", description = "User CRUD"))
)]
pub struct ApiDoc;
