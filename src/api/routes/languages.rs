//! Language registry listing.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::server::AppState;

/// GET /api/languages: the source language and every supported code.
pub async fn list_languages(State(state): State<Arc<AppState>>) -> Json<Value> {
    let registry = state.resolver.registry();
    let source = state.resolver.source_lang();
    Json(json!({
        "source": {
            "code": source,
            "name": registry.display_name(source),
        },
        "languages": registry.list(),
    }))
}
