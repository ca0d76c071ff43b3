//! 路径参数提取器
//!
//! 解析失败时直接返回 400 和统一格式的错误响应，处理函数无需再做校验。

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use std::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_path_param(message: String) -> actix_web::Error {
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

fn positive_i64(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(name).unwrap_or_default();
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(bad_path_param(format!(
            "Path parameter '{name}' must be a positive integer, got '{raw}'"
        ))),
    }
}

macro_rules! define_safe_id_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(positive_i64(req, $param).map($name))
            }
        }
    };
}

define_safe_id_extractor!(SafeExamIdI64, "exam_id");
define_safe_id_extractor!(SafeStudentIdI64, "student_id");

/// 录入会话 ID（v4 UUID）
#[derive(Debug, Clone)]
pub struct SafeSessionId(pub String);

impl FromRequest for SafeSessionId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("session_id").unwrap_or_default();
        ready(
            uuid::Uuid::parse_str(raw)
                .map(|id| SafeSessionId(id.to_string()))
                .map_err(|_| bad_path_param(format!("Invalid grading session id '{raw}'"))),
        )
    }
}
