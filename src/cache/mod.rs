//! 缓存层
//!
//! 对象缓存以字符串形式存取，由调用方负责序列化。后端以插件形式通过
//! [`declare_object_cache_plugin!`] 在程序加载时自动注册，启动时按配置选择。

pub mod object_cache;
pub mod register;
pub mod sessions;

use async_trait::async_trait;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端出错或值无法读取
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// `ttl` 为 0 时使用默认过期时间（秒）
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 声明并自动注册一个缓存插件
///
/// 插件类型需提供 `fn new() -> Result<Self, String>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ident) => {
        paste::paste! {
            #[ctor::ctor]
            unsafe fn [<__register_object_cache_ $ty:snake>]() {
                let constructor: $crate::cache::register::ObjectCacheConstructor =
                    std::sync::Arc::new(|| {
                        let future: $crate::cache::register::BoxedObjectCacheFuture =
                            Box::pin(async {
                                let cache = $ty::new()
                                    .map_err($crate::errors::GradebookError::cache_connection)?;
                                Ok::<Box<dyn $crate::cache::ObjectCache>, $crate::errors::GradebookError>(
                                    Box::new(cache),
                                )
                            });
                        future
                    });
                $crate::cache::register::register_object_cache_plugin($name, constructor);
            }
        }
    };
}
