use crate::environment::ApiState;
use axum::{extract::State, response::Json};
use database::schema::heartbeat;
use diesel::prelude::*;
use serde::Serialize;
use utils::sql::get_sql_timestamp;
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn create_liveness_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(get_crawler1_status))
        .routes(routes!(get_crawler2_status))
        .routes(routes!(get_indexer1_status))
}

const CRAWLER_THRESHOLD_MS: i64 = 4_000;
const INDEXER_THRESHOLD_MS: i64 = 5_000;

#[derive(Serialize, utoipa::ToSchema)]
pub struct LivenessResponse {
    active: bool,
}

fn is_active(state: &ApiState, node_id: &str, threshold_ms: i64) -> LivenessResponse {
    let mut conn = match state.db_pool.get() {
        Ok(conn) => conn,
        Err(_) => return LivenessResponse { active: false },
    };

    let last_seen: Option<i64> = heartbeat::table
        .filter(heartbeat::node_id.eq(node_id))
        .select(heartbeat::last_seen)
        .first(&mut conn)
        .optional()
        .unwrap_or(None);

    let active = match last_seen {
        Some(last_seen) => get_sql_timestamp() - last_seen <= threshold_ms,
        None => false,
    };

    LivenessResponse { active }
}

#[utoipa::path(
    get,
    path = "/crawler1-status",
    description = "Liveness of the primary crawler",
    responses((status = OK, body = LivenessResponse))
)]
#[axum::debug_handler]
async fn get_crawler1_status(State(state): State<ApiState>) -> Json<LivenessResponse> {
    Json(is_active(&state, "crawler-1", CRAWLER_THRESHOLD_MS))
}

#[utoipa::path(
    get,
    path = "/crawler2-status",
    description = "Liveness of the secondary crawler",
    responses((status = OK, body = LivenessResponse))
)]
#[axum::debug_handler]
async fn get_crawler2_status(State(state): State<ApiState>) -> Json<LivenessResponse> {
    Json(is_active(&state, "crawler-2", CRAWLER_THRESHOLD_MS))
}

#[utoipa::path(
    get,
    path = "/indexer1-status",
    description = "Liveness of the primary indexer",
    responses((status = OK, body = LivenessResponse))
)]
#[axum::debug_handler]
async fn get_indexer1_status(State(state): State<ApiState>) -> Json<LivenessResponse> {
    Json(is_active(&state, "indexer-1", INDEXER_THRESHOLD_MS))
}
