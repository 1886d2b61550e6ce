use crate::environment::Environment;
use axum::Router;
use routes::{
    crawl::create_crawl_router, heartbeat::create_heartbeat_router,
    liveness::create_liveness_router, ping::create_ping_router, search::create_search_router,
    status::create_status_router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::{Config, SwaggerUi};

pub mod environment;
mod routes;
pub mod tfidf;

#[derive(OpenApi)]
#[openapi()]
struct ApiDoc;

pub async fn build_api(env: Arc<Environment>, port: u16) {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", create_ping_router())
        .nest("/api", create_crawl_router())
        .nest("/api", create_search_router())
        .nest("/api", create_heartbeat_router())
        .nest("/api", create_status_router())
        .nest("/api", create_liveness_router())
        .with_state(env)
        .split_for_parts();

    let router = router.merge(
        SwaggerUi::new("/docs")
            .config(Config::default())
            .url("/docs/openapi.json", api.clone()),
    );

    let app = Router::new().merge(router);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    tracing::info!(%addr, "control service listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
