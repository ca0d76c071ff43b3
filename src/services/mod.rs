pub mod exams;
pub mod grading_scales;
pub mod grading_sessions;

pub use exams::ExamService;
pub use grading_scales::GradingScaleService;
pub use grading_sessions::GradingSessionService;

use actix_web::HttpResponse;
use tracing::error;

use crate::errors::{GradebookError, Result};
use crate::grading::{GradingScale, ScaleRegistry};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_scale_id;

/// 将业务错误转换为 HTTP 响应
///
/// `code` 用于可预期的错误（校验失败、资源不存在等），其余错误统一为服务器内部错误。
pub(crate) fn error_response(err: &GradebookError, code: ErrorCode) -> HttpResponse {
    let body = ApiResponse::error_empty(code, err.message());
    match err {
        GradebookError::InputValidation(_) | GradebookError::GradingScale(_) => {
            HttpResponse::BadRequest().json(body)
        }
        GradebookError::NotFound(_) => HttpResponse::NotFound().json(body),
        GradebookError::Eligibility(_) => HttpResponse::UnprocessableEntity().json(body),
        GradebookError::Submission(_) => HttpResponse::BadGateway().json(body),
        _ => {
            error!("{}", err.format_simple());
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                err.format_simple(),
            ))
        }
    }
}

/// 解析请求中的等级表，缺省时使用默认等级表
pub(crate) fn resolve_scale(scale_id: Option<&str>) -> Result<&'static GradingScale> {
    if let Some(id) = scale_id {
        validate_scale_id(id)?;
    }
    ScaleRegistry::global().resolve(scale_id)
}
