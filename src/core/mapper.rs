use crate::core::dispatch::{self, CodecTable, InstalledCodec};
use crate::core::engine::{EngineSettings, JsonEngine};
use crate::core::entity::EntityType;
use crate::utils::error::{CodecError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 設定完成的 JSON mapper。
///
/// 已註冊的實體型別不論出現在哪一層（頂層、`Vec`、`Option`、其他結構的欄位）
/// 都使用其 codec，其餘型別走 serde 的預設結構映射。巢狀派送需要實體的 serde
/// 實作經過 [`dispatch::serialize_entity`] / [`dispatch::deserialize_entity`]。
/// 建立後不可變，可安全地跨執行緒共用。
pub struct JsonMapper {
    engine: JsonEngine,
    codecs: Arc<CodecTable>,
}

impl JsonMapper {
    pub(crate) fn new(
        engine: JsonEngine,
        codecs: HashMap<TypeId, (EntityType, InstalledCodec)>,
    ) -> Self {
        Self {
            engine,
            codecs: Arc::new(CodecTable::new(codecs)),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        self.engine.settings()
    }

    pub fn to_value<T: Serialize + 'static>(&self, entity: &T) -> Result<Value> {
        let scope = dispatch::enter(Arc::clone(&self.codecs));

        // 頂層直接呼叫 codec，型別本身的 serde 實作是否派送都不影響
        let result = match self.codecs.codec::<T>() {
            Some(codec) => {
                let _suspended = dispatch::suspend::<T>();
                codec.serialize(entity)
            }
            None => serde_json::to_value(entity).map_err(CodecError::from),
        };

        let failure = scope.finish();
        match (result, failure) {
            (Ok(value), _) => Ok(value),
            (Err(_), Some(inner)) => Err(inner),
            (Err(e), None) => Err(e),
        }
    }

    pub fn from_value<T: DeserializeOwned + 'static>(&self, value: &Value) -> Result<T> {
        let scope = dispatch::enter(Arc::clone(&self.codecs));

        let result = match self.codecs.codec::<T>() {
            Some(codec) => {
                let _suspended = dispatch::suspend::<T>();
                codec.deserialize(value)
            }
            None => T::deserialize(value).map_err(|e| {
                CodecError::malformed(EntityType::of::<T>().short_name(), e.to_string())
            }),
        };

        // 巢狀 codec 失敗時回報實際失敗的實體，而不是外層容器
        let failure = scope.finish();
        match (result, failure) {
            (Ok(entity), _) => Ok(entity),
            (Err(_), Some(inner)) => Err(inner),
            (Err(e), None) => Err(e),
        }
    }

    /// 與 `to_value(&entities)` 相同，錯誤訊息另外標出元素位置
    pub fn to_value_seq<T: Serialize + 'static>(&self, entities: &[T]) -> Result<Value> {
        entities
            .iter()
            .map(|entity| self.to_value(entity))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }

    pub fn from_value_seq<T: DeserializeOwned + 'static>(&self, value: &Value) -> Result<Vec<T>> {
        let items = value.as_array().ok_or_else(|| {
            CodecError::malformed(
                EntityType::of::<T>().short_name(),
                format!("expected a JSON array, found {}", json_kind(value)),
            )
        })?;

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                self.from_value(item).map_err(|e| match e {
                    CodecError::MalformedPayload { entity, reason } => {
                        CodecError::MalformedPayload {
                            entity,
                            reason: format!("element {}: {}", index, reason),
                        }
                    }
                    other => other,
                })
            })
            .collect()
    }

    pub fn to_json_vec<T: Serialize + 'static>(&self, entity: &T) -> Result<Vec<u8>> {
        let value = self.to_value(entity)?;
        self.engine.write(&value)
    }

    pub fn to_json_string<T: Serialize + 'static>(&self, entity: &T) -> Result<String> {
        let bytes = self.to_json_vec(entity)?;
        String::from_utf8(bytes)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
    }

    pub fn from_slice<T: DeserializeOwned + 'static>(&self, bytes: &[u8]) -> Result<T> {
        let value: Value = serde_json::from_slice(bytes).map_err(|e| {
            CodecError::malformed(
                EntityType::of::<T>().short_name(),
                format!("invalid JSON: {}", e),
            )
        })?;
        self.from_value(&value)
    }

    pub fn from_str<T: DeserializeOwned + 'static>(&self, text: &str) -> Result<T> {
        self.from_slice(text.as_bytes())
    }
}

impl fmt::Debug for JsonMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonMapper")
            .field("settings", self.engine.settings())
            .field("codecs", &self.codecs.len())
            .finish()
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
