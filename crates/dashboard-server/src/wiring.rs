use api::AppState;
use axum::{routing::get, Router};

pub fn build_app(state: AppState) -> Router {
    api::app(state).route("/health", get(healthcheck))
}

async fn healthcheck() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use api::AppState;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use runtime::{shared, MarketEngine};
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState::new(shared(MarketEngine::for_test_seed(1)))
    }

    #[tokio::test]
    async fn server_healthcheck_responds_ok() {
        let app = super::build_app(test_state());

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn market_routes_are_mounted() {
        let app = super::build_app(test_state());

        let response = app
            .oneshot(Request::get("/market/series").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
