use crate::environment::ApiState;
use crate::tfidf;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use database::models::IndexedPage;
use database::schema::indexed_pages;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn create_search_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(get_search_handler))
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct SearchQuery {
    keyword: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SearchResponse {
    keyword: String,
    urls: Vec<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SearchError {
    error: String,
}

#[utoipa::path(
    get,
    path = "/search",
    description = "Search indexed pages by keyword",
    params(SearchQuery),
    responses(
        (status = OK, body = SearchResponse),
        (status = BAD_REQUEST, description = "Missing keyword", body = SearchError),
    )
)]
#[axum::debug_handler]
async fn get_search_handler(
    State(state): State<ApiState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let keyword = match query.keyword.as_deref().map(str::trim) {
        Some(k) if !k.is_empty() => k.to_string(),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(SearchError {
                    error: "missing keyword".to_string(),
                }),
            )
                .into_response();
        }
    };

    let mut conn = match state.db_pool.get() {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(error = %e, "failed to get db connection");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let pages: Vec<IndexedPage> = match indexed_pages::table
        .filter(indexed_pages::content.is_not_null())
        .load(&mut conn)
    {
        Ok(pages) => pages,
        Err(e) => {
            tracing::error!(error = %e, "failed to load indexed pages");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let documents: Vec<(&str, &str)> = pages
        .iter()
        .filter_map(|p| p.content.as_deref().map(|c| (p.url.as_str(), c)))
        .collect();

    let urls = tfidf::search(&documents, &keyword)
        .into_iter()
        .map(|doc| doc.key.to_string())
        .collect();

    Json(SearchResponse { keyword, urls }).into_response()
}
