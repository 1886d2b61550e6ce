use reqwest::Client;
use std::time::Duration;

/// Strict-priority liveness predicate for a standby worker.
///
/// `my_rank` is 0 for the primary (`R1`), 1 for the first standby (`R2`), and
/// so on. `liveness[i]` reports whether rank `i` is currently seen as active
/// by the Control Service. The primary is always allowed; a standby is
/// allowed only when every higher-priority rank is down.
pub fn evaluate(my_rank: usize, liveness: &[bool]) -> bool {
    if my_rank == 0 {
        return true;
    }

    liveness[..my_rank.min(liveness.len())]
        .iter()
        .all(|&active| !active)
}

/// Polls the Control Service's per-rank liveness endpoints.
///
/// Any network error or non-2xx response is treated as "not active" —
/// the gate fails closed so a partitioned standby never promotes itself.
pub struct LivenessClient {
    client: Client,
}

impl LivenessClient {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build liveness HTTP client");

        Self { client }
    }

    pub async fn is_active(&self, status_url: &str) -> bool {
        match self.client.get(status_url).send().await {
            Ok(resp) if resp.status().is_success() => resp
                .json::<LivenessResponse>()
                .await
                .map(|body| body.active)
                .unwrap_or(false),
            _ => false,
        }
    }
}

#[derive(serde::Deserialize)]
struct LivenessResponse {
    active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_always_allowed() {
        assert!(evaluate(0, &[false, false]));
        assert!(evaluate(0, &[true, true]));
    }

    #[test]
    fn standby_allowed_only_when_all_higher_ranks_down() {
        // crawler-2 (rank 1) allowed only if crawler-1 is down.
        assert!(evaluate(1, &[false]));
        assert!(!evaluate(1, &[true]));

        // crawler-3 (rank 2) needs both crawler-1 and crawler-2 down.
        assert!(evaluate(2, &[false, false]));
        assert!(!evaluate(2, &[false, true]));
        assert!(!evaluate(2, &[true, false]));
    }
}
