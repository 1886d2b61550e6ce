#[derive(Clone)]
pub struct CrawlerConfig {
    /// Stable identifier for this node, used as the heartbeat `node_id`.
    pub node_id: String,
    pub ip: String,
    /// 0-based rank within the crawler priority list (0 = crawler-1, primary).
    pub rank: usize,
    pub user_agent: String,
    pub threads: usize,
    /// Base URL of the Control Service, e.g. `http://localhost:5000`.
    pub control_service_base_url: String,
    /// `/api/crawlerN-status` paths of every higher-priority rank, in order.
    /// Empty for the primary, which never consults the gate.
    pub liveness_paths: Vec<String>,
}

impl CrawlerConfig {
    /// Builds the liveness endpoint list for a given 0-based rank: rank 0
    /// (the primary) needs none, rank `r` needs crawler-1..=crawler-r.
    pub fn liveness_paths_for_rank(rank: usize) -> Vec<String> {
        (1..=rank)
            .map(|r| format!("/api/crawler{r}-status"))
            .collect()
    }
}
