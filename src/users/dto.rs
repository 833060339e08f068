use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Full user document; every mutable field must be present.
/// Other fields a client echoes back (timestamps) are ignored.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    /// Optional; must equal the id in the path when given.
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedUserResponse {
    pub message: String,
    pub id: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Page size, required, not negative.
    pub limit: i64,
    /// Rows to skip, required, not negative.
    pub offset: i64,
}
