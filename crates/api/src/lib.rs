pub mod error;
pub mod routes;
pub mod state;
pub mod ws;

use axum::Router;

pub use error::ApiError;
pub use state::AppState;

pub fn app(state: AppState) -> Router {
    routes::router(state)
}
