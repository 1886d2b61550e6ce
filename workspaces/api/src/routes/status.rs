use crate::environment::{ApiState, ThreadInfo};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use database::models::HeartbeatRow;
use database::schema::heartbeat;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utils::sql::get_sql_timestamp;
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn create_status_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(get_status_handler))
}

const STALE_THRESHOLD_MS: i64 = 10_000;

#[derive(Deserialize, utoipa::IntoParams)]
pub struct StatusQuery {
    detailed: Option<bool>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct NodeStatusResponse {
    node_id: String,
    role: String,
    ip: String,
    url_count: i32,
    last_seen: i64,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    threads_info: Option<Vec<ThreadInfo>>,
}

#[utoipa::path(
    get,
    path = "/status",
    description = "Aggregate status of every worker node that has reported a heartbeat",
    params(StatusQuery),
    responses(
        (status = OK, body = [NodeStatusResponse]),
    )
)]
#[axum::debug_handler]
async fn get_status_handler(
    State(state): State<ApiState>,
    Query(query): Query<StatusQuery>,
) -> Response {
    let detailed = query.detailed.unwrap_or(false);

    let mut conn = match state.db_pool.get() {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(error = %e, "failed to get db connection");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let rows: Vec<HeartbeatRow> = match heartbeat::table.load(&mut conn) {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "failed to load heartbeat rows");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let now = get_sql_timestamp();
    let mut response = Vec::with_capacity(rows.len());

    for row in rows {
        let age = now - row.last_seen;

        let status = if age > STALE_THRESHOLD_MS {
            "not active"
        } else {
            let previous = state.previous_counts.get(&row.node_id).map(|v| *v);
            if previous.map(|p| row.url_count > p).unwrap_or(true) {
                "running"
            } else {
                "idle"
            }
        };

        state
            .previous_counts
            .insert(row.node_id.clone(), row.url_count);

        let threads_info = if detailed {
            state
                .heartbeat_sidecar
                .get(&row.node_id)
                .map(|entry| entry.threads_info.clone())
        } else {
            None
        };

        response.push(NodeStatusResponse {
            node_id: row.node_id,
            role: row.role,
            ip: row.ip,
            url_count: row.url_count,
            last_seen: row.last_seen,
            status: status.to_string(),
            threads_info,
        });
    }

    Json(response).into_response()
}
