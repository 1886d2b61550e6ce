use serde::{Deserialize, Serialize};

/// Message body carried on the TaskQueue. Produced by the Control Service
/// (`depth = 0`) and by crawlers (`depth + 1`) for every extracted link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlTask {
    pub url: String,
    pub depth: u32,
    pub max_depth: u32,
    pub restrict_domain: bool,
    pub domain_prefix: String,
}

impl CrawlTask {
    /// `depth > max_depth` tasks must never have been produced, but a worker
    /// still checks on receipt in case a stale or hand-crafted message slips
    /// through the queue.
    pub fn is_within_depth(&self) -> bool {
        self.depth <= self.max_depth
    }
}

/// Message body carried on the IndexerQueue, emitted once per successful
/// crawl with non-empty visible text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagePayload {
    pub url: String,
    pub text: String,
    pub links: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_guard() {
        let task = CrawlTask {
            url: "https://example.com".into(),
            depth: 3,
            max_depth: 2,
            restrict_domain: false,
            domain_prefix: String::new(),
        };
        assert!(!task.is_within_depth());

        let task = CrawlTask { depth: 2, ..task };
        assert!(task.is_within_depth());
    }
}
