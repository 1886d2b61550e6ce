use thiserror::Error;

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}
