use crate::environment::{ApiState, NodeState, ThreadInfo};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use database::models::NewHeartbeatRow;
use database::schema::heartbeat;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utils::sql::get_sql_timestamp;
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn create_heartbeat_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(post_heartbeat_handler))
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct HeartbeatRequest {
    node_id: String,
    role: String,
    ip: String,
    url_count: i32,
    threads_info: Vec<ThreadInfo>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct HeartbeatResponse {
    message: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct HeartbeatError {
    error: String,
}

#[utoipa::path(
    post,
    path = "/heartbeat",
    description = "Report liveness and counters from a worker node",
    request_body = HeartbeatRequest,
    responses(
        (status = OK, body = HeartbeatResponse),
        (status = BAD_REQUEST, description = "Missing fields", body = HeartbeatError),
    )
)]
#[axum::debug_handler]
async fn post_heartbeat_handler(
    State(state): State<ApiState>,
    Json(payload): Json<HeartbeatRequest>,
) -> Response {
    if payload.node_id.trim().is_empty() || payload.role.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(HeartbeatError {
                error: "missing fields".to_string(),
            }),
        )
            .into_response();
    }

    let now = get_sql_timestamp();

    let mut conn = match state.db_pool.get() {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(error = %e, "failed to get db connection");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let row = NewHeartbeatRow {
        node_id: payload.node_id.clone(),
        role: payload.role.clone(),
        ip: payload.ip.clone(),
        last_seen: now,
        url_count: payload.url_count,
    };

    let result = diesel::insert_into(heartbeat::table)
        .values(&row)
        .on_conflict(heartbeat::node_id)
        .do_update()
        .set(&row)
        .execute(&mut conn);

    if let Err(e) = result {
        tracing::error!(error = %e, "failed to upsert heartbeat row");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    state.heartbeat_sidecar.insert(
        payload.node_id.clone(),
        NodeState {
            role: payload.role,
            ip: payload.ip,
            url_count: payload.url_count,
            last_seen: now,
            threads_info: payload.threads_info,
        },
    );

    Json(HeartbeatResponse {
        message: "heartbeat recorded".to_string(),
    })
    .into_response()
}
