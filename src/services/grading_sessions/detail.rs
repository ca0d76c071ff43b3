use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GradingSessionService, load_session};
use crate::models::ApiResponse;
use crate::models::results::responses::GradingSessionResponse;

pub async fn get_session(
    service: &GradingSessionService,
    request: &HttpRequest,
    session_id: &str,
) -> ActixResult<HttpResponse> {
    let store = service.session_store(request);
    let session = match load_session(&store, session_id).await {
        Ok(session) => session,
        Err(response) => return Ok(response),
    };

    let view = GradingSessionResponse::new(&session.id, &session.exam, &session.working_set);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        view,
        "Grading session retrieved successfully",
    )))
}
