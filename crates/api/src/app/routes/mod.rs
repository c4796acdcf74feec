use axum::Router;

pub mod ledgers;
pub mod system;
pub mod users;

/// Router for all domain endpoints.
pub fn router() -> Router {
    Router::new()
        .merge(users::router())
        .merge(ledgers::router())
}
