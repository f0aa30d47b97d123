use crate::core::dispatch::InstalledCodec;
use crate::core::engine::JsonEngine;
use crate::core::entity::EntityType;
use crate::core::mapper::JsonMapper;
use crate::utils::error::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub type Serializer<T> = Arc<dyn Fn(&T) -> Result<Value> + Send + Sync>;
pub type Deserializer<T> = Arc<dyn Fn(&Value) -> Result<T> + Send + Sync>;

/// 單一實體型別的序列化／反序列化函式對
pub struct Codec<T> {
    serializer: Serializer<T>,
    deserializer: Deserializer<T>,
}

impl<T> Codec<T> {
    pub fn new<S, D>(serializer: S, deserializer: D) -> Self
    where
        S: Fn(&T) -> Result<Value> + Send + Sync + 'static,
        D: Fn(&Value) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            serializer: Arc::new(serializer),
            deserializer: Arc::new(deserializer),
        }
    }

    pub fn serialize(&self, entity: &T) -> Result<Value> {
        (self.serializer)(entity)
    }

    pub fn deserialize(&self, value: &Value) -> Result<T> {
        (self.deserializer)(value)
    }
}

impl<T> Clone for Codec<T> {
    fn clone(&self) -> Self {
        Self {
            serializer: Arc::clone(&self.serializer),
            deserializer: Arc::clone(&self.deserializer),
        }
    }
}

impl<T: 'static> fmt::Debug for Codec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("entity", &EntityType::of::<T>().short_name())
            .finish()
    }
}

/// 以物件形式提供一組 codec，方便需要持有協作者（例如查詢服務）的實作
pub trait EntityCodec<T>: Send + Sync + 'static {
    fn serialize(&self, entity: &T) -> Result<Value>;
    fn deserialize(&self, value: &Value) -> Result<T>;
}

/// 啟動階段建立的 型別 → codec 對照表。建好之後交給 `MapperProvider`，之後不再變動。
#[derive(Default)]
pub struct CodecRegistry {
    entries: Vec<(EntityType, InstalledCodec)>,
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新增或取代 `T` 的 codec，同一型別以最後一次註冊為準
    pub fn register<T, S, D>(&mut self, serializer: S, deserializer: D) -> &mut Self
    where
        T: 'static,
        S: Fn(&T) -> Result<Value> + Send + Sync + 'static,
        D: Fn(&Value) -> Result<T> + Send + Sync + 'static,
    {
        let entity = EntityType::of::<T>();
        let codec: InstalledCodec = Arc::new(Codec::<T>::new(serializer, deserializer));

        match self.entries.iter_mut().find(|(existing, _)| *existing == entity) {
            Some(slot) => {
                tracing::debug!("Replacing codec for {}", entity);
                slot.1 = codec;
            }
            None => {
                tracing::debug!("Registering codec for {}", entity);
                self.entries.push((entity, codec));
            }
        }

        self
    }

    pub fn register_codec<T, C>(&mut self, codec: C) -> &mut Self
    where
        T: 'static,
        C: EntityCodec<T>,
    {
        let serializer = Arc::new(codec);
        let deserializer = Arc::clone(&serializer);
        self.register(
            move |entity: &T| serializer.serialize(entity),
            move |value: &Value| deserializer.deserialize(value),
        )
    }

    /// 依註冊順序把每個 codec 安裝到引擎上，產生一個完整設定好的 mapper。
    /// 每次呼叫都會得到獨立的 mapper。
    pub fn apply(&self, engine: JsonEngine) -> JsonMapper {
        let mut installed = HashMap::with_capacity(self.entries.len());
        for (entity, codec) in &self.entries {
            tracing::debug!("Installing codec for {}", entity);
            installed.insert(entity.id(), (*entity, Arc::clone(codec)));
        }

        tracing::debug!("Mapper configured with {} codec(s)", installed.len());
        JsonMapper::new(engine, installed)
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(entity, _)| entity.short_name()))
            .finish()
    }
}
