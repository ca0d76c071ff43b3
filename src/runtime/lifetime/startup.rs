use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::{AppConfig, GradingConfig};
use crate::errors::{GradebookError, Result};
use crate::grading::ScaleRegistry;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 按名称构造缓存后端
async fn build_cache(name: &str) -> Result<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name).ok_or_else(|| {
        GradebookError::cache_plugin_not_found(format!("Cache backend '{name}' not found in registry"))
    })?;
    let cache = constructor().await?;
    Ok(Arc::from(cache))
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let config = AppConfig::get();
    let cache_type = config.cache.cache_type.as_str();

    warn!("Attempting to create {} cache backend", cache_type);

    match build_cache(cache_type).await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", cache_type);
            return Ok(cache);
        }
        Err(e) => warn!("Failed to create {} cache: {}", cache_type, e),
    }

    if cache_type == "moka" {
        return Err(GradebookError::cache_connection(
            "No cache backend available (tried: moka)",
        ));
    }

    warn!("Falling back to memory cache");
    let cache = build_cache("moka").await.map_err(|e| {
        GradebookError::cache_connection(format!(
            "No cache backend available (tried: {cache_type}, moka): {}",
            e.message()
        ))
    })?;
    warn!("Successfully created fallback Moka (in-memory) cache backend");
    Ok(cache)
}

/// 根据配置建立等级表目录
///
/// 自定义等级表追加在内置目录之后；区间有空洞或重叠时只告警，
/// 落在空洞里的百分比不会得到等级。
pub fn build_scale_registry(grading: &GradingConfig) -> Result<ScaleRegistry> {
    let registry = ScaleRegistry::with_custom(grading.custom_scales.clone())?
        .with_default(&grading.default_scale)?;

    for scale in registry.list_scales() {
        for issue in scale.partition_issues() {
            warn!("Grading scale '{}': {}", scale.id, issue);
        }
    }

    Ok(registry)
}

/// 准备服务器启动的上下文
/// 包括等级表目录、存储和缓存
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let config = AppConfig::get();
    let registry = build_scale_registry(&config.grading).expect("Invalid grading scale configuration");
    let scale_count = registry.list_scales().len();
    ScaleRegistry::init(registry).expect("Failed to initialize grading scale registry");
    warn!(
        "Grading scale registry initialized ({} scales, default: {})",
        scale_count, config.grading.default_scale
    );

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    StartupContext { storage, cache }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::{GradeBand, GradingScale, PassPolicy};

    fn grading(default_scale: &str, custom_scales: Vec<GradingScale>) -> GradingConfig {
        GradingConfig {
            default_scale: default_scale.to_string(),
            pass_policy: PassPolicy::default(),
            max_remarks_length: 255,
            session_ttl: 3600,
            custom_scales,
        }
    }

    fn custom_scale(id: &str) -> GradingScale {
        GradingScale {
            id: id.to_string(),
            name: "Two band".to_string(),
            bands: vec![
                GradeBand::new("Merit", 50.0, 100.0, ""),
                // 40 到 50 之间是空洞，只告警
                GradeBand::new("Low", 0.0, 39.99, ""),
            ],
        }
    }

    #[test]
    fn test_registry_from_config() {
        let registry =
            build_scale_registry(&grading("two_band", vec![custom_scale("two_band")])).unwrap();
        assert_eq!(registry.default_scale().id, "two_band");
        assert!(registry.get("standard").is_some());
        assert_eq!(registry.list_scales().last().unwrap().id, "two_band");
    }

    #[test]
    fn test_unknown_default_scale_is_rejected() {
        let err = build_scale_registry(&grading("missing", vec![])).unwrap_err();
        assert_eq!(err.code(), "E013");
    }

    #[test]
    fn test_custom_scale_cannot_shadow_builtin() {
        assert!(build_scale_registry(&grading("standard", vec![custom_scale("standard")])).is_err());
    }
}
