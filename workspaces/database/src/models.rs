use diesel::prelude::*;
use serde_json::Value;

// Queue (shared shape for task_queue and indexer_queue) //

#[derive(QueryableByName, Queryable, Selectable)]
#[diesel(table_name = crate::schema::task_queue)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskQueueRow {
    pub id: i32,
    pub body: Value,
    pub dedup_key: Option<String>,
    pub enqueued_at: i64,
    pub visible_at: i64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::task_queue)]
pub struct NewTaskQueueRow {
    pub body: Value,
    pub dedup_key: Option<String>,
    pub enqueued_at: i64,
    pub visible_at: i64,
}

#[derive(QueryableByName, Queryable, Selectable)]
#[diesel(table_name = crate::schema::indexer_queue)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IndexerQueueRow {
    pub id: i32,
    pub body: Value,
    pub dedup_key: Option<String>,
    pub enqueued_at: i64,
    pub visible_at: i64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::indexer_queue)]
pub struct NewIndexerQueueRow {
    pub body: Value,
    pub dedup_key: Option<String>,
    pub enqueued_at: i64,
    pub visible_at: i64,
}

// Indexed pages //

#[derive(Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::indexed_pages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IndexedPage {
    pub id: i32,
    pub url: String,
    pub content: Option<String>,
    pub indexed_obj_id: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::indexed_pages)]
pub struct NewIndexedPage {
    pub url: String,
    pub content: Option<String>,
    pub indexed_obj_id: String,
}

// Keyword index //

#[derive(Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::keyword_index)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct KeywordEntry {
    pub keyword: String,
    pub urls: Value,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::keyword_index)]
pub struct NewKeywordEntry {
    pub keyword: String,
    pub urls: Value,
}

// Heartbeat //

#[derive(Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::heartbeat)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HeartbeatRow {
    pub node_id: String,
    pub role: String,
    pub ip: String,
    pub last_seen: i64,
    pub url_count: i32,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::heartbeat)]
pub struct NewHeartbeatRow {
    pub node_id: String,
    pub role: String,
    pub ip: String,
    pub last_seen: i64,
    pub url_count: i32,
}
