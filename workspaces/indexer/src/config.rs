#[derive(Clone)]
pub struct IndexerConfig {
    pub node_id: String,
    pub ip: String,
    /// 0-based rank within the indexer priority list (0 = indexer-1, primary).
    pub rank: usize,
    pub threads: usize,
    pub control_service_base_url: String,
    /// `/api/indexerN-status` paths of every higher-priority rank, in order.
    pub liveness_paths: Vec<String>,
}

impl IndexerConfig {
    pub fn liveness_paths_for_rank(rank: usize) -> Vec<String> {
        (1..=rank)
            .map(|r| format!("/api/indexer{r}-status"))
            .collect()
    }
}
