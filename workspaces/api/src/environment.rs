use dashmap::DashMap;
use database::DbPool;
use queue::PgTaskQueue;
use std::sync::Arc;

/// Ephemeral per-node state kept only in memory, never persisted, mirroring
/// the `threads_info` the monitoring UI needs but the `heartbeat` table does
/// not carry.
#[derive(Clone)]
pub struct NodeState {
    pub role: String,
    pub ip: String,
    pub url_count: i32,
    pub last_seen: i64,
    pub threads_info: Vec<ThreadInfo>,
}

#[derive(Clone, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ThreadInfo {
    pub id: String,
    pub status: String,
}

pub struct Environment {
    pub db_pool: DbPool,
    pub task_queue: PgTaskQueue,
    /// `node_id -> NodeState`, written only by the heartbeat handler and read
    /// by the status and per-rank liveness handlers.
    pub heartbeat_sidecar: DashMap<String, NodeState>,
    /// `node_id -> url_count` as of the previous `/api/status` response, used
    /// to derive `running` vs `idle`.
    pub previous_counts: DashMap<String, i32>,
}

pub type ApiState = Arc<Environment>;
