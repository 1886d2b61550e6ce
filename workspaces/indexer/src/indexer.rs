use crate::config::IndexerConfig;
use crate::worker;
use database::DbPool;
use queue::TaskQueue;
use reqwest::Client;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task;
use tokio::time::sleep;
use utils::failover::LivenessClient;

/// The thread-status map and the URL counter, behind one lock, so a reader
/// (the heartbeat loop) can never observe a status transition and a counter
/// increment from two different instants.
#[derive(Default)]
pub struct IndexerState {
    pub thread_status: HashMap<String, String>,
    pub url_count: u64,
}

pub struct Indexer {
    pub config: IndexerConfig,
    pub db_pool: DbPool,
    pub indexer_queue: Arc<dyn TaskQueue + Send + Sync>,
    pub web_client: Client,
    pub liveness_client: LivenessClient,
    pub state: Mutex<IndexerState>,
}

#[derive(Serialize)]
struct HeartbeatPayload<'a> {
    node_id: &'a str,
    role: &'a str,
    ip: &'a str,
    url_count: u64,
    threads_info: Vec<ThreadInfo>,
}

#[derive(Serialize)]
struct ThreadInfo {
    id: String,
    status: String,
}

impl Indexer {
    pub fn new(
        config: IndexerConfig,
        db_pool: DbPool,
        indexer_queue: Arc<dyn TaskQueue + Send + Sync>,
    ) -> Self {
        Self {
            config,
            db_pool,
            indexer_queue,
            web_client: Client::new(),
            liveness_client: LivenessClient::new(Duration::from_secs(2)),
            state: Mutex::new(IndexerState::default()),
        }
    }

    pub async fn start_indexing(self: Arc<Self>) {
        tracing::info!(threads = self.config.threads, node_id = %self.config.node_id, "starting indexer");

        let mut handles = Vec::new();

        for i in 0..self.config.threads {
            let manager = self.clone();
            let thread_name = format!("indexer-worker-{i}");
            handles.push(task::spawn(worker::run(thread_name, manager)));
        }

        handles.push(task::spawn(self.clone().heartbeat_loop()));

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "indexer task panicked");
            }
        }
    }

    async fn heartbeat_loop(self: Arc<Self>) {
        let endpoint = format!("{}/api/heartbeat", self.config.control_service_base_url);

        loop {
            let (threads_info, url_count) = {
                let state = self.state.lock().expect("indexer state mutex poisoned");
                let threads_info = state
                    .thread_status
                    .iter()
                    .map(|(id, status)| ThreadInfo {
                        id: id.clone(),
                        status: status.clone(),
                    })
                    .collect();
                (threads_info, state.url_count)
            };

            let payload = HeartbeatPayload {
                node_id: &self.config.node_id,
                role: "indexer",
                ip: &self.config.ip,
                url_count,
                threads_info,
            };

            if let Err(e) = self.web_client.post(&endpoint).json(&payload).send().await {
                tracing::warn!(error = %e, "failed to send heartbeat");
            }

            sleep(Duration::from_secs(2)).await;
        }
    }
}
