use crate::environment::ApiState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use queue::{CrawlTask, TaskQueue};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn create_crawl_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(post_crawl_handler))
}

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(https?://)?([a-z0-9-]+\.)+[a-z]{2,}(/.*)?$").expect("static regex is valid")
});

const DEFAULT_MAX_DEPTH: u32 = 2;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CrawlRequest {
    url: String,
    max_depth: Option<u32>,
    domain_restricted: Option<bool>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CrawlResponse {
    message: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CrawlError {
    error: String,
}

#[utoipa::path(
    post,
    path = "/crawl",
    description = "Submit a URL to be crawled",
    request_body = CrawlRequest,
    responses(
        (status = OK, body = CrawlResponse),
        (status = BAD_REQUEST, description = "Invalid URL", body = CrawlError),
    )
)]
#[axum::debug_handler]
async fn post_crawl_handler(
    State(state): State<ApiState>,
    Json(payload): Json<CrawlRequest>,
) -> Response {
    if !URL_RE.is_match(payload.url.trim()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(CrawlError {
                error: "Invalid URL".to_string(),
            }),
        )
            .into_response();
    }

    let url = if payload.url.starts_with("http://") || payload.url.starts_with("https://") {
        payload.url.clone()
    } else {
        format!("https://{}", payload.url)
    };

    let restrict_domain = payload.domain_restricted.unwrap_or(false);
    let domain_prefix = if restrict_domain {
        match url::Url::parse(&url) {
            Ok(parsed) => match parsed.host_str() {
                Some(host) => format!("{}//{}", parsed.scheme(), host),
                None => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(CrawlError {
                            error: "Invalid URL".to_string(),
                        }),
                    )
                        .into_response();
                }
            },
            Err(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(CrawlError {
                        error: "Invalid URL".to_string(),
                    }),
                )
                    .into_response();
            }
        }
    } else {
        String::new()
    };

    let task = CrawlTask {
        url: url.clone(),
        depth: 0,
        max_depth: payload.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
        restrict_domain,
        domain_prefix,
    };

    let body = serde_json::to_value(&task).expect("CrawlTask always serializes");
    let dedup_key = queue::dedup_key_for_url(&url);

    if let Err(e) = state.task_queue.send(body, Some(dedup_key)) {
        tracing::error!(error = %e, "failed to enqueue crawl task");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    tracing::info!(url = %url, "new crawl task enqueued");

    Json(CrawlResponse {
        message: "URL added to the queue".to_string(),
    })
    .into_response()
}
