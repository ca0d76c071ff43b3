use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradingScaleService;
use crate::models::{ApiResponse, results::responses::GradingScaleListResponse};

pub async fn list_scales(
    service: &GradingScaleService,
    _request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let registry = service.get_registry();

    let response = GradingScaleListResponse {
        default_scale_id: registry.default_scale().id.clone(),
        items: registry.list_scales().to_vec(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Grading scales retrieved successfully",
    )))
}
