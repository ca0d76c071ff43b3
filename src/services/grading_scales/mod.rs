pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::grading::ScaleRegistry;

/// 等级表目录在启动时确定，服务本身无状态
pub struct GradingScaleService;

impl GradingScaleService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_registry(&self) -> &'static ScaleRegistry {
        ScaleRegistry::global()
    }

    pub async fn list_scales(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_scales(self, request).await
    }
}
