use crate::crawler::Crawler;
use crate::error::CrawlError;
use crate::scraper::{scrape_page, ScrapedPage};
use crate::utils::{get_content_type, is_crawlable_url};
use queue::{CrawlTask, PagePayload, TaskQueue};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

const GATE_RETRY_INTERVAL: Duration = Duration::from_millis(500);
const EMPTY_QUEUE_SLEEP: Duration = Duration::from_secs(1);
const POLITENESS_DELAY: Duration = Duration::from_secs(2);
const VISIBILITY_TIMEOUT_MS: i64 = 30_000;

/// One fetcher thread's main loop: gate, receive, validate, fetch, extract,
/// emit, ack — steps 1-8 of the crawler worker contract.
pub async fn run(thread_name: String, manager: Arc<Crawler>) {
    loop {
        set_status(&manager, &thread_name, "Waiting for task");

        if manager.config.rank > 0 && !gate_allows(&manager).await {
            sleep(GATE_RETRY_INTERVAL).await;
            continue;
        }

        let message = match manager.task_queue.receive(VISIBILITY_TIMEOUT_MS) {
            Ok(Some(msg)) => msg,
            Ok(None) => {
                sleep(EMPTY_QUEUE_SLEEP).await;
                continue;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to receive crawl task");
                sleep(EMPTY_QUEUE_SLEEP).await;
                continue;
            }
        };

        let task: CrawlTask = match serde_json::from_value(message.body.clone()) {
            Ok(task) => task,
            Err(e) => {
                tracing::warn!(error = %e, "dropping unparsable crawl task");
                ack(&manager, message.id);
                continue;
            }
        };

        set_status(&manager, &thread_name, &format!("Crawling {}", task.url));

        if let Err(e) = handle_task(&manager, &task).await {
            tracing::warn!(url = %task.url, error = %e, "error handling crawl task");
        }

        ack(&manager, message.id);
        set_status(&manager, &thread_name, "Idle");
    }
}

fn set_status(manager: &Arc<Crawler>, thread_name: &str, status: &str) {
    let mut state = manager.state.lock().expect("crawler state mutex poisoned");
    state
        .thread_status
        .insert(thread_name.to_string(), status.to_string());
}

async fn gate_allows(manager: &Arc<Crawler>) -> bool {
    let mut liveness = Vec::with_capacity(manager.config.liveness_paths.len());
    for path in &manager.config.liveness_paths {
        let url = format!("{}{}", manager.config.control_service_base_url, path);
        liveness.push(manager.liveness_client.is_active(&url).await);
    }
    utils::failover::evaluate(manager.config.rank, &liveness)
}

fn ack(manager: &Arc<Crawler>, id: i32) {
    if let Err(e) = manager.task_queue.delete(id) {
        tracing::warn!(error = %e, "failed to ack crawl task");
    }
}

async fn handle_task(manager: &Arc<Crawler>, task: &CrawlTask) -> Result<(), CrawlError> {
    let url = normalize_task_url(&task.url);

    if !should_crawl(&url) || !task.is_within_depth() {
        return Ok(());
    }

    sleep(POLITENESS_DELAY).await;

    let scraped = fetch_and_scrape(manager, &url).await?;

    let links = filter_links(task, &scraped);

    if !scraped.text.trim().is_empty() {
        send_page_payload(manager, &url, scraped.text, links.clone())?;
    }

    if task.depth + 1 <= task.max_depth {
        for link in &links {
            send_child_task(manager, task, link)?;
        }
    }

    manager
        .state
        .lock()
        .expect("crawler state mutex poisoned")
        .url_count += 1;

    Ok(())
}

fn normalize_task_url(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("//") {
        format!("https://{rest}")
    } else {
        url.to_string()
    }
}

fn should_crawl(url: &str) -> bool {
    if url.is_empty() || url.starts_with('#') || url.starts_with("javascript:") {
        return false;
    }
    is_crawlable_url(url)
}

fn filter_links(task: &CrawlTask, scraped: &ScrapedPage) -> Vec<String> {
    scraped
        .links
        .iter()
        .filter(|link| !task.restrict_domain || link.starts_with(&task.domain_prefix))
        .cloned()
        .collect()
}

async fn fetch_and_scrape(manager: &Arc<Crawler>, url: &str) -> Result<ScrapedPage, CrawlError> {
    let response = manager.web_client.get(url).send().await?;
    let status = response.status();

    if status.is_server_error() {
        return Err(CrawlError::ServerError);
    }
    if !status.is_success() {
        return Err(CrawlError::NotCrawlable);
    }

    let headers = response.headers().clone();
    if let Some(content_type) = get_content_type(&headers, url) {
        if content_type != "text/html" {
            return Err(CrawlError::InvalidContentType);
        }
    }

    let body = response.text().await?;
    scrape_page(url, &body).map_err(|e| CrawlError::ParseError(e.to_string()))
}

fn send_page_payload(
    manager: &Arc<Crawler>,
    url: &str,
    text: String,
    links: Vec<String>,
) -> Result<(), CrawlError> {
    let payload = PagePayload {
        url: url.to_string(),
        text,
        links,
    };
    let dedup_key = queue::dedup_key_for_url(&payload.url);
    let body = serde_json::to_value(&payload).expect("PagePayload always serializes");
    manager
        .indexer_queue
        .send(body, Some(dedup_key))
        .map_err(CrawlError::from)
}

fn send_child_task(manager: &Arc<Crawler>, parent: &CrawlTask, link: &str) -> Result<(), CrawlError> {
    let child = CrawlTask {
        url: link.to_string(),
        depth: parent.depth + 1,
        max_depth: parent.max_depth,
        restrict_domain: parent.restrict_domain,
        domain_prefix: parent.domain_prefix.clone(),
    };
    let dedup_key = queue::dedup_key_for_url(&child.url);
    let body = serde_json::to_value(&child).expect("CrawlTask always serializes");
    manager
        .task_queue
        .send(body, Some(dedup_key))
        .map_err(CrawlError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_scheme_relative_urls() {
        assert_eq!(
            normalize_task_url("//example.com/page"),
            "https://example.com/page"
        );
        assert_eq!(
            normalize_task_url("https://example.com/page"),
            "https://example.com/page"
        );
    }

    #[test]
    fn rejects_junk_urls() {
        assert!(!should_crawl(""));
        assert!(!should_crawl("#section"));
        assert!(!should_crawl("javascript:void(0)"));
        assert!(should_crawl("https://example.com"));
    }
}
