use database::models::{IndexerQueueRow, NewIndexerQueueRow, NewTaskQueueRow, TaskQueueRow};
use database::DbPool;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

pub mod message;

pub use message::{CrawlTask, PagePayload};

pub const DEFAULT_VISIBILITY_TIMEOUT_MS: i64 = 30_000;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

pub struct QueueMessage {
    pub id: i32,
    pub body: Value,
}

/// A durable, at-least-once task queue backed by a Postgres table.
///
/// `receive` hides a row from further receivers for `visibility_timeout_ms`
/// milliseconds by bumping its `visible_at` column into the future. A
/// message that is never `delete`d becomes visible again once that window
/// elapses, which is how redelivery happens when a worker crashes mid-task.
pub trait TaskQueue {
    fn send(&self, body: Value, dedup_key: Option<String>) -> Result<(), QueueError>;
    fn receive(&self, visibility_timeout_ms: i64) -> Result<Option<QueueMessage>, QueueError>;
    fn delete(&self, id: i32) -> Result<(), QueueError>;
}

/// Deterministic dedup key so the same URL enqueued twice collapses to a
/// single row instead of being crawled or indexed twice.
pub fn dedup_key_for_url(url: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, url.as_bytes()).to_string()
}

pub struct PgTaskQueue {
    pool: DbPool,
}

impl PgTaskQueue {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl TaskQueue for PgTaskQueue {
    fn send(&self, body: Value, dedup_key: Option<String>) -> Result<(), QueueError> {
        use database::schema::task_queue;

        let now = utils::sql::get_sql_timestamp();
        let new_row = NewTaskQueueRow {
            body,
            dedup_key,
            enqueued_at: now,
            visible_at: now,
        };

        let mut conn = self.pool.get()?;
        diesel::insert_into(task_queue::table)
            .values(&new_row)
            .on_conflict(task_queue::dedup_key)
            .do_nothing()
            .execute(&mut conn)?;

        Ok(())
    }

    fn receive(&self, visibility_timeout_ms: i64) -> Result<Option<QueueMessage>, QueueError> {
        let now = utils::sql::get_sql_timestamp();
        let next_visible_at = now + visibility_timeout_ms;

        let mut conn = self.pool.get()?;
        let rows: Vec<TaskQueueRow> = diesel::sql_query(
            "UPDATE task_queue SET visible_at = $1 \
             WHERE id = ( \
                 SELECT id FROM task_queue \
                 WHERE visible_at <= $2 \
                 ORDER BY enqueued_at ASC \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING id, body, dedup_key, enqueued_at, visible_at",
        )
        .bind::<BigInt, _>(next_visible_at)
        .bind::<BigInt, _>(now)
        .load(&mut conn)?;

        Ok(rows.into_iter().next().map(|row| QueueMessage {
            id: row.id,
            body: row.body,
        }))
    }

    fn delete(&self, id: i32) -> Result<(), QueueError> {
        use database::schema::task_queue;

        let mut conn = self.pool.get()?;
        diesel::delete(task_queue::table.filter(task_queue::id.eq(id))).execute(&mut conn)?;

        Ok(())
    }
}

pub struct PgIndexerQueue {
    pool: DbPool,
}

impl PgIndexerQueue {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl TaskQueue for PgIndexerQueue {
    fn send(&self, body: Value, dedup_key: Option<String>) -> Result<(), QueueError> {
        use database::schema::indexer_queue;

        let now = utils::sql::get_sql_timestamp();
        let new_row = NewIndexerQueueRow {
            body,
            dedup_key,
            enqueued_at: now,
            visible_at: now,
        };

        let mut conn = self.pool.get()?;
        diesel::insert_into(indexer_queue::table)
            .values(&new_row)
            .on_conflict(indexer_queue::dedup_key)
            .do_nothing()
            .execute(&mut conn)?;

        Ok(())
    }

    fn receive(&self, visibility_timeout_ms: i64) -> Result<Option<QueueMessage>, QueueError> {
        let now = utils::sql::get_sql_timestamp();
        let next_visible_at = now + visibility_timeout_ms;

        let mut conn = self.pool.get()?;
        let rows: Vec<IndexerQueueRow> = diesel::sql_query(
            "UPDATE indexer_queue SET visible_at = $1 \
             WHERE id = ( \
                 SELECT id FROM indexer_queue \
                 WHERE visible_at <= $2 \
                 ORDER BY enqueued_at ASC \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING id, body, dedup_key, enqueued_at, visible_at",
        )
        .bind::<BigInt, _>(next_visible_at)
        .bind::<BigInt, _>(now)
        .load(&mut conn)?;

        Ok(rows.into_iter().next().map(|row| QueueMessage {
            id: row.id,
            body: row.body,
        }))
    }

    fn delete(&self, id: i32) -> Result<(), QueueError> {
        use database::schema::indexer_queue;

        let mut conn = self.pool.get()?;
        diesel::delete(indexer_queue::table.filter(indexer_queue::id.eq(id))).execute(&mut conn)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_key_is_stable_per_url() {
        let a = dedup_key_for_url("https://example.com/page");
        let b = dedup_key_for_url("https://example.com/page");
        let c = dedup_key_for_url("https://example.com/other");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
