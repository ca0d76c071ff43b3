use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::results::requests::{
    ChangeScaleRequest, UpdateAbsenceRequest, UpdateMarksRequest, UpdateRemarksRequest,
};
use crate::services::GradingSessionService;
use crate::utils::{SafeSessionId, SafeStudentIdI64};

static GRADING_SESSION_SERVICE: Lazy<GradingSessionService> =
    Lazy::new(GradingSessionService::new_lazy);

pub async fn get_session(req: HttpRequest, session_id: SafeSessionId) -> ActixResult<HttpResponse> {
    GRADING_SESSION_SERVICE.get_session(&req, &session_id.0).await
}

pub async fn update_marks(
    req: HttpRequest,
    session_id: SafeSessionId,
    student_id: SafeStudentIdI64,
    body: web::Json<UpdateMarksRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SESSION_SERVICE
        .update_marks(&req, &session_id.0, student_id.0, body.into_inner())
        .await
}

pub async fn update_absence(
    req: HttpRequest,
    session_id: SafeSessionId,
    student_id: SafeStudentIdI64,
    body: web::Json<UpdateAbsenceRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SESSION_SERVICE
        .update_absence(&req, &session_id.0, student_id.0, body.into_inner())
        .await
}

pub async fn update_remarks(
    req: HttpRequest,
    session_id: SafeSessionId,
    student_id: SafeStudentIdI64,
    body: web::Json<UpdateRemarksRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SESSION_SERVICE
        .update_remarks(&req, &session_id.0, student_id.0, body.into_inner())
        .await
}

pub async fn change_scale(
    req: HttpRequest,
    session_id: SafeSessionId,
    body: web::Json<ChangeScaleRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SESSION_SERVICE
        .change_scale(&req, &session_id.0, body.into_inner())
        .await
}

pub async fn submit_session(
    req: HttpRequest,
    session_id: SafeSessionId,
) -> ActixResult<HttpResponse> {
    GRADING_SESSION_SERVICE
        .submit_session(&req, &session_id.0)
        .await
}

pub async fn discard_session(
    req: HttpRequest,
    session_id: SafeSessionId,
) -> ActixResult<HttpResponse> {
    GRADING_SESSION_SERVICE
        .discard_session(&req, &session_id.0)
        .await
}

pub fn configure_grading_session_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/grading-sessions/{session_id}")
            .service(
                web::resource("")
                    .route(web::get().to(get_session))
                    .route(web::delete().to(discard_session)),
            )
            .service(
                web::resource("/entries/{student_id}/marks").route(web::put().to(update_marks)),
            )
            .service(
                web::resource("/entries/{student_id}/absence")
                    .route(web::put().to(update_absence)),
            )
            .service(
                web::resource("/entries/{student_id}/remarks")
                    .route(web::put().to(update_remarks)),
            )
            .service(web::resource("/scale").route(web::put().to(change_scale)))
            .service(web::resource("/submit").route(web::post().to(submit_session))),
    );
}
