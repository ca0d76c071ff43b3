use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::{GradingSessionService, entry_error_code, load_session, save_and_respond};
use crate::models::ErrorCode;
use crate::models::results::requests::{
    UpdateAbsenceRequest, UpdateMarksRequest, UpdateRemarksRequest,
};
use crate::services::error_response;
use crate::utils::validate::{parse_marks_input, validate_remarks};

pub async fn update_marks(
    service: &GradingSessionService,
    request: &HttpRequest,
    session_id: &str,
    student_id: i64,
    body: UpdateMarksRequest,
) -> ActixResult<HttpResponse> {
    let marks = match parse_marks_input(body.marks) {
        Ok(marks) => marks,
        Err(e) => return Ok(error_response(&e, ErrorCode::MarksInvalid)),
    };

    let store = service.session_store(request);
    let mut session = match load_session(&store, session_id).await {
        Ok(session) => session,
        Err(response) => return Ok(response),
    };

    // 校验失败时工作集不变，也无需写回
    if let Err(e) = session.working_set.set_marks(student_id, marks) {
        return Ok(error_response(
            &e,
            entry_error_code(&e, ErrorCode::MarksInvalid),
        ));
    }
    debug!(
        "Session {}: marks for student {} set to {:?}",
        session_id, student_id, marks
    );

    save_and_respond(&store, &session, "Marks updated successfully").await
}

pub async fn update_absence(
    service: &GradingSessionService,
    request: &HttpRequest,
    session_id: &str,
    student_id: i64,
    body: UpdateAbsenceRequest,
) -> ActixResult<HttpResponse> {
    let store = service.session_store(request);
    let mut session = match load_session(&store, session_id).await {
        Ok(session) => session,
        Err(response) => return Ok(response),
    };

    if let Err(e) = session.working_set.set_absent(student_id, body.absent) {
        return Ok(error_response(&e, entry_error_code(&e, ErrorCode::BadRequest)));
    }
    debug!(
        "Session {}: student {} absent = {}",
        session_id, student_id, body.absent
    );

    save_and_respond(&store, &session, "Absence updated successfully").await
}

pub async fn update_remarks(
    service: &GradingSessionService,
    request: &HttpRequest,
    session_id: &str,
    student_id: i64,
    body: UpdateRemarksRequest,
) -> ActixResult<HttpResponse> {
    let max_length = service.get_settings().max_remarks_length;
    if let Err(e) = validate_remarks(body.remarks.as_deref(), max_length) {
        return Ok(error_response(&e, ErrorCode::RemarksInvalid));
    }

    let store = service.session_store(request);
    let mut session = match load_session(&store, session_id).await {
        Ok(session) => session,
        Err(response) => return Ok(response),
    };

    if let Err(e) = session.working_set.set_remarks(student_id, body.remarks) {
        return Ok(error_response(
            &e,
            entry_error_code(&e, ErrorCode::RemarksInvalid),
        ));
    }

    save_and_respond(&store, &session, "Remarks updated successfully").await
}
