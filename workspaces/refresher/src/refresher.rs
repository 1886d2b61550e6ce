use crate::config::RefresherConfig;
use crate::tokenize::build_inverted_index;
use database::models::{IndexedPage, NewKeywordEntry};
use database::schema::{indexed_pages, keyword_index};
use database::DbPool;
use diesel::dsl::{count_star, max};
use diesel::prelude::*;
use std::time::Duration;
use tokio::time::sleep;

#[derive(PartialEq, Eq, Clone, Copy)]
struct ChangeSignature {
    count: i64,
    max_id: Option<i32>,
}

/// Watches `indexed_pages` and rebuilds `keyword_index` whenever its content
/// changes. Safe to run as a singleton sidecar of any indexer process; no
/// distributed lock is taken because only one instance is ever deployed.
pub async fn run(db_pool: DbPool, config: RefresherConfig) {
    tracing::info!(interval_secs = config.interval_secs, "starting index refresher");

    let mut last_signature = match compute_signature(&db_pool) {
        Ok(sig) => Some(sig),
        Err(e) => {
            tracing::warn!(error = %e, "failed to compute initial change signature");
            None
        }
    };

    loop {
        sleep(Duration::from_secs(config.interval_secs)).await;

        match compute_signature(&db_pool) {
            Ok(current) => {
                if Some(current) != last_signature {
                    match rebuild_keyword_index(&db_pool) {
                        Ok(()) => last_signature = Some(current),
                        Err(e) => {
                            tracing::warn!(error = %e, "failed to rebuild keyword index, retrying next cycle");
                        }
                    }
                } else {
                    tracing::debug!("no changes detected, skipping rebuild");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to compute change signature, retrying next cycle");
            }
        }
    }
}

fn compute_signature(db_pool: &DbPool) -> Result<ChangeSignature, crate::error::RefreshError> {
    let mut conn = db_pool.get()?;
    let (count, max_id): (i64, Option<i32>) = indexed_pages::table
        .select((count_star(), max(indexed_pages::id)))
        .first(&mut conn)?;

    Ok(ChangeSignature { count, max_id })
}

fn rebuild_keyword_index(db_pool: &DbPool) -> Result<(), crate::error::RefreshError> {
    tracing::info!("rebuilding keyword inverted index");

    let mut conn = db_pool.get()?;

    let pages: Vec<IndexedPage> = indexed_pages::table.load(&mut conn)?;
    let pages_with_content: Vec<(&str, &str)> = pages
        .iter()
        .filter_map(|p| p.content.as_deref().map(|c| (p.url.as_str(), c)))
        .collect();

    let inverted = build_inverted_index(pages_with_content.into_iter());

    let rows: Vec<NewKeywordEntry> = inverted
        .into_iter()
        .map(|(keyword, urls)| NewKeywordEntry {
            keyword,
            urls: serde_json::to_value(urls.into_iter().collect::<Vec<_>>())
                .expect("a vec of strings always serializes"),
        })
        .collect();

    conn.transaction::<(), diesel::result::Error, _>(|conn| {
        diesel::delete(keyword_index::table).execute(conn)?;
        if !rows.is_empty() {
            diesel::insert_into(keyword_index::table)
                .values(&rows)
                .execute(conn)?;
        }
        Ok(())
    })?;

    tracing::info!(keywords = rows.len(), "keyword inverted index updated");

    Ok(())
}
