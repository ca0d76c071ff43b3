use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{GradingSessionService, load_session, save_and_respond};
use crate::models::ErrorCode;
use crate::models::results::requests::ChangeScaleRequest;
use crate::services::{error_response, resolve_scale};

pub async fn change_scale(
    service: &GradingSessionService,
    request: &HttpRequest,
    session_id: &str,
    body: ChangeScaleRequest,
) -> ActixResult<HttpResponse> {
    let scale = match resolve_scale(Some(body.scale_id.as_str())) {
        Ok(scale) => scale.clone(),
        Err(e) => return Ok(error_response(&e, ErrorCode::GradingScaleNotFound)),
    };

    let store = service.session_store(request);
    let mut session = match load_session(&store, session_id).await {
        Ok(session) => session,
        Err(response) => return Ok(response),
    };

    let previous = session.working_set.scale().id.clone();
    session.working_set.change_scale(scale);
    info!(
        "Session {}: grading scale changed from {} to {}",
        session_id,
        previous,
        session.working_set.scale().id
    );

    save_and_respond(&store, &session, "Grading scale changed successfully").await
}
