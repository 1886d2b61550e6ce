use crate::clean::clean_text;
use crate::error::IndexError;
use crate::indexer::Indexer;
use database::models::NewIndexedPage;
use database::schema::indexed_pages;
use diesel::prelude::*;
use queue::PagePayload;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

const GATE_RETRY_INTERVAL: Duration = Duration::from_millis(500);
const EMPTY_QUEUE_SLEEP: Duration = Duration::from_secs(1);
const VISIBILITY_TIMEOUT_MS: i64 = 30_000;
const DUMMY_OBJ_ID: &str = "dummy-id";

pub async fn run(thread_name: String, manager: Arc<Indexer>) {
    loop {
        set_status(&manager, &thread_name, "Waiting for task");

        if manager.config.rank > 0 && !gate_allows(&manager).await {
            sleep(GATE_RETRY_INTERVAL).await;
            continue;
        }

        let message = match manager.indexer_queue.receive(VISIBILITY_TIMEOUT_MS) {
            Ok(Some(msg)) => msg,
            Ok(None) => {
                sleep(EMPTY_QUEUE_SLEEP).await;
                continue;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to receive page payload");
                sleep(EMPTY_QUEUE_SLEEP).await;
                continue;
            }
        };

        let payload: PagePayload = match serde_json::from_value(message.body.clone()) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "dropping unparsable page payload");
                ack(&manager, message.id);
                continue;
            }
        };

        set_status(&manager, &thread_name, &format!("Indexing {}", payload.url));

        if let Err(e) = handle_payload(&manager, &payload) {
            tracing::warn!(url = %payload.url, error = %e, "error indexing page");
        } else {
            manager
                .state
                .lock()
                .expect("indexer state mutex poisoned")
                .url_count += 1;
        }

        ack(&manager, message.id);
        set_status(&manager, &thread_name, "Idle");
    }
}

fn set_status(manager: &Arc<Indexer>, thread_name: &str, status: &str) {
    let mut state = manager.state.lock().expect("indexer state mutex poisoned");
    state
        .thread_status
        .insert(thread_name.to_string(), status.to_string());
}

async fn gate_allows(manager: &Arc<Indexer>) -> bool {
    let mut liveness = Vec::with_capacity(manager.config.liveness_paths.len());
    for path in &manager.config.liveness_paths {
        let url = format!("{}{}", manager.config.control_service_base_url, path);
        liveness.push(manager.liveness_client.is_active(&url).await);
    }
    utils::failover::evaluate(manager.config.rank, &liveness)
}

fn ack(manager: &Arc<Indexer>, id: i32) {
    if let Err(e) = manager.indexer_queue.delete(id) {
        tracing::warn!(error = %e, "failed to ack page payload");
    }
}

fn handle_payload(manager: &Arc<Indexer>, payload: &PagePayload) -> Result<(), IndexError> {
    let cleaned = clean_text(&payload.text);

    let row = NewIndexedPage {
        url: payload.url.clone(),
        content: Some(cleaned),
        indexed_obj_id: DUMMY_OBJ_ID.to_string(),
    };

    let mut conn = manager.db_pool.get()?;
    diesel::insert_into(indexed_pages::table)
        .values(&row)
        .on_conflict(indexed_pages::url)
        .do_update()
        .set((
            indexed_pages::content.eq(&row.content),
            indexed_pages::indexed_obj_id.eq(&row.indexed_obj_id),
        ))
        .execute(&mut conn)?;

    Ok(())
}
