use crate::core::engine::{EngineSettings, JsonEngine};
use crate::core::entity::TypeDescriptor;
use crate::core::mapper::JsonMapper;
use crate::core::registry::CodecRegistry;
use crate::utils::error::Result;
use std::sync::Arc;

/// 宿主框架內容協商層向 provider 取得 `C` 的介面
pub trait ContextResolver<C>: Send + Sync {
    fn context(&self, descriptor: &TypeDescriptor) -> Arc<C>;
}

/// 持有唯一一個共用的 `JsonMapper`。
///
/// 只能透過 `new` 建立，建立成功即代表已就緒；之後不論以哪個型別詢問，
/// 都回傳同一個實例。
#[derive(Debug, Clone)]
pub struct MapperProvider {
    mapper: Arc<JsonMapper>,
}

impl MapperProvider {
    /// 建立基礎引擎並套用 registry 一次。設定無效時回傳 `ConstructionFailure`。
    pub fn new(registry: CodecRegistry, settings: EngineSettings) -> Result<Self> {
        let engine = JsonEngine::new(settings).map_err(|e| {
            tracing::error!("❌ Failed to create base JSON engine: {}", e);
            e
        })?;

        Ok(Self::with_engine(registry, engine))
    }

    pub fn with_engine(registry: CodecRegistry, engine: JsonEngine) -> Self {
        tracing::debug!("Applying codec registry: {:?}", registry);
        let mapper = registry.apply(engine);
        tracing::info!("✅ JSON mapper ready ({:?})", mapper);

        Self {
            mapper: Arc::new(mapper),
        }
    }

    pub fn get_instance(&self) -> Arc<JsonMapper> {
        Arc::clone(&self.mapper)
    }

    pub fn mapper(&self) -> &JsonMapper {
        &self.mapper
    }
}

impl ContextResolver<JsonMapper> for MapperProvider {
    fn context(&self, _descriptor: &TypeDescriptor) -> Arc<JsonMapper> {
        self.get_instance()
    }
}
