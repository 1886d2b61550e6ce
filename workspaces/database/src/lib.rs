use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};

pub mod models;
pub mod schema;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
pub type DbConn = PooledConnection<ConnectionManager<PgConnection>>;

pub const MAX_POOL_SIZE: u32 = 40;

pub fn create_pool(db_url: &str) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(db_url);
    Pool::builder()
        .max_size(MAX_POOL_SIZE)
        .build(manager)
        .expect("Failed to create DB pool")
}
