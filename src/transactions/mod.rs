use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod repo;
pub mod summary;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::expense_routes())
        .merge(handlers::income_routes())
}
