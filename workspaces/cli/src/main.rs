use anyhow::{Context, Result};
use api::environment::Environment;
use crawler::config::CrawlerConfig;
use crawler::crawler::Crawler;
use database::{create_pool, DbPool};
use dashmap::DashMap;
use dotenvy::dotenv;
use indexer::config::IndexerConfig;
use indexer::indexer::Indexer;
use queue::{PgIndexerQueue, PgTaskQueue};
use refresher::config::RefresherConfig;
use std::{env, sync::Arc, thread};
use tokio::runtime::Runtime;

pub const SERVICES: [&str; 4] = ["api", "crawler", "indexer", "refresher"];

fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let version = env!("CARGO_PKG_VERSION");
    tracing::info!(%version, "starting epsilon");

    let args: Vec<String> = if let Ok(services) = env::var("SERVICES") {
        services.split(' ').map(String::from).collect::<Vec<_>>()
    } else {
        Vec::from(&env::args().collect::<Vec<_>>()[1..])
    };

    if args.is_empty() {
        anyhow::bail!("no services provided");
    }

    let mut services = Vec::new();
    let is_exclude_mode = args.first().map_or(false, |v| v == "-");

    if is_exclude_mode {
        services.extend(SERVICES.iter().map(|x| x.to_string()));
    }

    for arg in &args[(if is_exclude_mode { 1 } else { 0 })..] {
        if !SERVICES.iter().any(|x| x == &arg.as_str()) {
            anyhow::bail!("invalid service provided: {arg}");
        }

        if is_exclude_mode {
            services.retain(|x| x != arg);
        } else {
            services.push(arg.to_string());
        }
    }

    let runtime = Runtime::new().context("failed to create tokio runtime")?;
    runtime.block_on(start_services(services))
}

async fn start_services(services: Vec<String>) -> Result<()> {
    let db_url = env::var("DATABASE_URL").context("DATABASE_URL env must be set")?;
    let db_pool = create_pool(&db_url);

    let mut handles = Vec::new();

    for s in services {
        let db_pool = db_pool.clone();
        let handle = thread::spawn(move || {
            tracing::info!(service = %s, "starting service");
            let rt = Runtime::new().expect("failed to create tokio runtime");

            match s.as_str() {
                "api" => rt.block_on(start_api(db_pool)),
                "crawler" => rt.block_on(start_crawler(db_pool)),
                "indexer" => rt.block_on(start_indexer(db_pool)),
                "refresher" => rt.block_on(start_refresher(db_pool)),
                _ => panic!("invalid service: {s}"),
            }
        });

        handles.push(handle);
    }

    for h in handles {
        h.join().expect("a service thread panicked");
    }

    Ok(())
}

fn env_rank() -> usize {
    env::var("RANK")
        .unwrap_or_else(|_| "0".to_string())
        .parse()
        .expect("RANK must be a non-negative integer")
}

async fn start_api(db_pool: DbPool) {
    let port = env::var("PORT").expect("PORT env must be set");
    let port = port.parse::<u16>().expect("cannot convert PORT to number");

    let task_queue = PgTaskQueue::new(db_pool.clone());

    let environment = Arc::new(Environment {
        db_pool,
        task_queue,
        heartbeat_sidecar: DashMap::new(),
        previous_counts: DashMap::new(),
    });

    api::build_api(environment, port).await;
}

async fn start_crawler(db_pool: DbPool) {
    let node_id = env::var("NODE_ID").expect("NODE_ID env must be set");
    let ip = env::var("NODE_IP").unwrap_or_else(|_| "0.0.0.0".to_string());
    let rank = env_rank();
    let user_agent = env::var("USER_AGENT").expect("USER_AGENT env must be set");
    let threads = env::var("CRAWLER_THREADS")
        .expect("CRAWLER_THREADS env must be set")
        .parse::<usize>()
        .expect("cannot convert CRAWLER_THREADS to usize");
    let control_service_base_url =
        env::var("CONTROL_SERVICE_BASE_URL").expect("CONTROL_SERVICE_BASE_URL env must be set");

    let config = CrawlerConfig {
        liveness_paths: CrawlerConfig::liveness_paths_for_rank(rank),
        node_id,
        ip,
        rank,
        user_agent,
        threads,
        control_service_base_url,
    };

    let task_queue = Arc::new(PgTaskQueue::new(db_pool.clone()));
    let indexer_queue = Arc::new(PgIndexerQueue::new(db_pool));

    let crawler = Arc::new(Crawler::new(config, task_queue, indexer_queue));
    crawler.start_crawling().await;
}

async fn start_indexer(db_pool: DbPool) {
    let node_id = env::var("NODE_ID").expect("NODE_ID env must be set");
    let ip = env::var("NODE_IP").unwrap_or_else(|_| "0.0.0.0".to_string());
    let rank = env_rank();
    let threads = env::var("INDEXER_THREADS")
        .expect("INDEXER_THREADS env must be set")
        .parse::<usize>()
        .expect("cannot convert INDEXER_THREADS to usize");
    let control_service_base_url =
        env::var("CONTROL_SERVICE_BASE_URL").expect("CONTROL_SERVICE_BASE_URL env must be set");

    let config = IndexerConfig {
        liveness_paths: IndexerConfig::liveness_paths_for_rank(rank),
        node_id,
        ip,
        rank,
        threads,
        control_service_base_url,
    };

    let indexer_queue = Arc::new(PgIndexerQueue::new(db_pool.clone()));

    let indexer = Arc::new(Indexer::new(config, db_pool, indexer_queue));
    indexer.start_indexing().await;
}

async fn start_refresher(db_pool: DbPool) {
    let interval_secs = env::var("REFRESH_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| RefresherConfig::default().interval_secs);

    refresher::refresher::run(db_pool, RefresherConfig { interval_secs }).await;
}
