use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{GradingSessionService, load_session};
use crate::grading::{FailureReason, submit};
use crate::models::results::responses::SubmitResultsResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn submit_session(
    service: &GradingSessionService,
    request: &HttpRequest,
    session_id: &str,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let store = service.session_store(request);
    let session = match load_session(&store, session_id).await {
        Ok(session) => session,
        Err(response) => return Ok(response),
    };

    let working_set = &session.working_set;
    let outcome = submit(working_set, storage.as_ref()).await;
    let exam_id = working_set.exam_id();

    let Some(failure) = outcome.failure.clone() else {
        // 写入成功后会话结束
        store.remove(session_id).await;
        info!(
            "Session {}: submitted {} results for exam {}",
            session_id, outcome.written, exam_id
        );
        let response = SubmitResultsResponse {
            exam_id,
            outcome,
            stats: working_set.stats(),
        };
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Results submitted successfully",
        )));
    };

    // 失败时保留会话，修正后可重新提交
    warn!(
        "Session {}: submission for exam {} failed ({:?}): {}",
        session_id, exam_id, failure.reason, failure.message
    );
    let response = SubmitResultsResponse {
        exam_id,
        outcome,
        stats: working_set.stats(),
    };
    let (mut builder, code) = match failure.reason {
        FailureReason::NotEnrolled => (
            HttpResponse::UnprocessableEntity(),
            ErrorCode::ResultNotEnrolled,
        ),
        FailureReason::OutOfRange => (HttpResponse::BadRequest(), ErrorCode::ResultOutOfRange),
        FailureReason::StorageFailure => (HttpResponse::BadGateway(), ErrorCode::ResultSubmitFailed),
    };
    Ok(builder.json(ApiResponse::error(code, response, failure.message)))
}
