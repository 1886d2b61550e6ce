use crate::environment::ApiState;
use axum::http::StatusCode;
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn create_ping_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(get_ping_handler))
}

#[utoipa::path(
    get,
    path = "/ping",
    description = "Ping the Control Service",
    responses(
        (status = OK)
    )
)]
#[axum::debug_handler]
async fn get_ping_handler() -> StatusCode {
    StatusCode::OK
}
