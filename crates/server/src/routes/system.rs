use actix_web::{get, web, HttpResponse};

use crate::state::AppState;
use crate::types::HealthResponse;

/// Loaded resource summary
#[get("/health")]
pub async fn health(state: web::Data<std::sync::Arc<AppState>>) -> actix_web::Result<HttpResponse> {
    let resources = &state.resources;

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        vocabulary: resources.store.len(),
        dimension: resources.store.dimension(),
        stop_words: resources.stop_words.len(),
        filtered_tags: resources.filtered_tags.len(),
    }))
}
