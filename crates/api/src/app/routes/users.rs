use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Extension, Path},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use tinyledger_core::UserId;

use crate::app::dto::{self, CreateEntityResponse, UserResponse, ValidJson};
use crate::app::errors::ApiError;
use crate::app::routes::system::method_not_allowed;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/users", post(create_user).fallback(method_not_allowed))
        .route("/users/:id", get(get_user).fallback(method_not_allowed))
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    ValidJson(body): ValidJson<dto::CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateEntityResponse>), ApiError> {
    let user = services
        .users
        .create_user(body.first_name, body.last_name, body.email_address)?;
    Ok((
        StatusCode::CREATED,
        Json(CreateEntityResponse::new(user.id_typed())),
    ))
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Path(id) = id?;
    let id = id.parse::<UserId>()?;
    let user = services.users.get_user(id)?;
    Ok(Json(UserResponse::from(user.as_ref())))
}
