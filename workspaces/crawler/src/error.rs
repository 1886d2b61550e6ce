use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("server returned an error status")]
    ServerError,
    #[error("response content-type is not text/html")]
    InvalidContentType,
    #[error("http error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("url is not crawlable")]
    NotCrawlable,
    #[error("failed to parse page: {0}")]
    ParseError(String),
    #[error("queue error: {0}")]
    Queue(#[from] queue::QueueError),
}
