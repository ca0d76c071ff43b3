use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::GradingScaleService;

static GRADING_SCALE_SERVICE: Lazy<GradingScaleService> =
    Lazy::new(GradingScaleService::new_lazy);

pub async fn list_scales(req: HttpRequest) -> ActixResult<HttpResponse> {
    GRADING_SCALE_SERVICE.list_scales(&req).await
}

pub fn configure_grading_scale_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/grading-scales")
            .service(web::resource("").route(web::get().to(list_scales))),
    );
}
