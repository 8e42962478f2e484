//! API routes module

pub mod health;
pub mod products;

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

pub const WELCOME_MESSAGE: &str = "welcome to the commerce shop api";

#[derive(Serialize)]
struct Welcome {
    message: &'static str,
}

/// Create all API routes, mounted under `/api`
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/products", products::router(state))
        .merge(health::router(state.clone()))
}

/// Routes served outside `/api`
pub fn root_router() -> Router {
    Router::new().route(
        "/",
        get(|| async {
            Json(Welcome {
                message: WELCOME_MESSAGE,
            })
        }),
    )
}

/// Initialize database indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    products::init_indexes(state).await
}
