use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{GradingSessionService, load_session};
use crate::models::ApiResponse;

pub async fn discard_session(
    service: &GradingSessionService,
    request: &HttpRequest,
    session_id: &str,
) -> ActixResult<HttpResponse> {
    let store = service.session_store(request);
    if let Err(response) = load_session(&store, session_id).await {
        return Ok(response);
    }

    store.remove(session_id).await;
    info!("Session {}: discarded without writing results", session_id);

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Grading session discarded",
    )))
}
