//! FAQ routes.
//!
//! Reads take an optional `?lang=` and never fail on translation problems.
//! They snapshot the cache epoch before loading entries, so a read that
//! races a write cannot cache a translation of the replaced answer. Writes
//! return the stored source-language entry.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::server::AppState;
use crate::faq::{Faq, FaqPatch, NewFaq};
use crate::resolver::ResolvedFaq;

#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

/// GET /api/faqs?lang=xx
pub async fn list_faqs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LangQuery>,
) -> Json<Vec<ResolvedFaq>> {
    let snapshot = state.resolver.snapshot();
    let faqs = state.service.list().await;
    Json(
        state
            .resolver
            .resolve_all_at(&faqs, query.lang.as_deref(), snapshot)
            .await,
    )
}

/// GET /api/faqs/{id}?lang=xx
pub async fn get_faq(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Query(query): Query<LangQuery>,
) -> ApiResult<Json<ResolvedFaq>> {
    let snapshot = state.resolver.snapshot();
    let faq = state.service.get(id).await?;
    Ok(Json(
        state
            .resolver
            .resolve_at(&faq, query.lang.as_deref(), snapshot)
            .await,
    ))
}

/// POST /api/faqs
pub async fn create_faq(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewFaq>,
) -> ApiResult<(StatusCode, Json<Faq>)> {
    let faq = state.service.create(body).await?;
    Ok((StatusCode::CREATED, Json(faq)))
}

/// PUT /api/faqs/{id}
pub async fn replace_faq(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(body): Json<NewFaq>,
) -> ApiResult<Json<Faq>> {
    Ok(Json(state.service.update_full(id, body).await?))
}

/// PATCH /api/faqs/{id}
pub async fn patch_faq(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(body): Json<FaqPatch>,
) -> ApiResult<Json<Faq>> {
    Ok(Json(state.service.update_partial(id, body).await?))
}

/// DELETE /api/faqs/{id}
pub async fn delete_faq(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
