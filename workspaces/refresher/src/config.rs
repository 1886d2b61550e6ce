#[derive(Clone)]
pub struct RefresherConfig {
    pub interval_secs: u64,
}

impl Default for RefresherConfig {
    fn default() -> Self {
        Self { interval_secs: 3 }
    }
}
