//! 巢狀派送：讓已註冊的實體出現在 `Vec`、`Option` 或其他結構裡時也經過 codec。
//!
//! `JsonMapper` 在每次 (反)序列化期間把自己的 codec 表推入執行緒區域的 scope 堆疊。
//! 實體型別的 `Serialize`/`Deserialize` 透過 [`serialize_entity`] 與
//! [`deserialize_entity`] 查詢目前的 scope；沒有 scope 時使用結構映射。
//!
//! ```ignore
//! impl Serialize for Customer {
//!     fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
//!         dispatch::serialize_entity(self, serializer, CustomerLayout::serialize)
//!     }
//! }
//! ```
//!
//! codec 執行期間，同一型別的巢狀請求會退回結構映射，因此 codec 可以用
//! `serde_json::to_value(entity)` 取得自身的結構版面而不會遞迴。

use crate::core::entity::EntityType;
use crate::core::registry::Codec;
use crate::utils::error::CodecError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

/// 型別抹除後的 codec，實際內容是 `Codec<T>`
pub(crate) type InstalledCodec = Arc<dyn Any + Send + Sync>;

/// mapper 持有的 型別 → codec 表
pub(crate) struct CodecTable {
    codecs: HashMap<TypeId, (EntityType, InstalledCodec)>,
}

impl CodecTable {
    pub(crate) fn new(codecs: HashMap<TypeId, (EntityType, InstalledCodec)>) -> Self {
        Self { codecs }
    }

    pub(crate) fn codec<T: 'static>(&self) -> Option<&Codec<T>> {
        self.codecs
            .get(&TypeId::of::<T>())
            .and_then(|(_, codec)| codec.downcast_ref::<Codec<T>>())
    }

    pub(crate) fn len(&self) -> usize {
        self.codecs.len()
    }
}

struct Scope {
    table: Arc<CodecTable>,
    suspended: Option<TypeId>,
    failure: Option<CodecError>,
}

thread_local! {
    static ACTIVE: RefCell<Vec<Scope>> = const { RefCell::new(Vec::new()) };
}

/// 離開時彈出 scope；`finish` 同時取回 codec 留下的第一個錯誤
pub(crate) struct ScopeGuard {
    finished: bool,
}

impl ScopeGuard {
    pub(crate) fn finish(mut self) -> Option<CodecError> {
        self.finished = true;
        ACTIVE.with(|stack| stack.borrow_mut().pop().and_then(|scope| scope.failure))
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        if !self.finished {
            ACTIVE.with(|stack| {
                stack.borrow_mut().pop();
            });
        }
    }
}

pub(crate) fn enter(table: Arc<CodecTable>) -> ScopeGuard {
    ACTIVE.with(|stack| {
        stack.borrow_mut().push(Scope {
            table,
            suspended: None,
            failure: None,
        })
    });
    ScopeGuard { finished: false }
}

/// codec 執行期間暫停 `T` 的派送，結束時還原
pub(crate) struct SuspendGuard {
    previous: Option<TypeId>,
}

impl Drop for SuspendGuard {
    fn drop(&mut self) {
        let previous = self.previous;
        ACTIVE.with(|stack| {
            if let Some(scope) = stack.borrow_mut().last_mut() {
                scope.suspended = previous;
            }
        });
    }
}

pub(crate) fn suspend<T: 'static>() -> SuspendGuard {
    let previous = ACTIVE.with(|stack| {
        stack
            .borrow_mut()
            .last_mut()
            .and_then(|scope| scope.suspended.replace(TypeId::of::<T>()))
    });
    SuspendGuard { previous }
}

// 取出時複製 codec（兩個 Arc），呼叫 codec 時不持有 RefCell 借用
fn active_codec<T: 'static>() -> Option<Codec<T>> {
    ACTIVE.with(|stack| {
        let stack = stack.borrow();
        let scope = stack.last()?;
        if scope.suspended == Some(TypeId::of::<T>()) {
            return None;
        }
        scope.table.codec::<T>().cloned()
    })
}

/// 只保留第一個錯誤，也就是最內層實際失敗的實體
fn record_failure(error: CodecError) -> String {
    let message = error.to_string();
    ACTIVE.with(|stack| {
        if let Some(scope) = stack.borrow_mut().last_mut() {
            scope.failure.get_or_insert(error);
        }
    });
    message
}

pub fn serialize_entity<T, S, F>(
    entity: &T,
    serializer: S,
    structural: F,
) -> Result<S::Ok, S::Error>
where
    T: 'static,
    S: Serializer,
    F: FnOnce(&T, S) -> Result<S::Ok, S::Error>,
{
    let Some(codec) = active_codec::<T>() else {
        return structural(entity, serializer);
    };

    let result = {
        let _suspended = suspend::<T>();
        codec.serialize(entity)
    };

    match result {
        Ok(value) => value.serialize(serializer),
        Err(e) => Err(<S::Error as serde::ser::Error>::custom(record_failure(e))),
    }
}

pub fn deserialize_entity<'de, T, D, F>(deserializer: D, structural: F) -> Result<T, D::Error>
where
    T: 'static,
    D: Deserializer<'de>,
    F: FnOnce(D) -> Result<T, D::Error>,
{
    let Some(codec) = active_codec::<T>() else {
        return structural(deserializer);
    };

    let value = Value::deserialize(deserializer)?;
    let _suspended = suspend::<T>();
    codec
        .deserialize(&value)
        .map_err(|e| <D::Error as serde::de::Error>::custom(record_failure(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_scope_means_structural() {
        assert!(active_codec::<String>().is_none());
        let guard = suspend::<String>();
        drop(guard);
        assert!(active_codec::<String>().is_none());
    }

    #[test]
    fn test_scopes_nest_and_pop() {
        let mut codecs = HashMap::new();
        let codec: InstalledCodec = Arc::new(Codec::<String>::new(
            |s| Ok(Value::String(s.to_uppercase())),
            |_| Ok(String::new()),
        ));
        codecs.insert(TypeId::of::<String>(), (EntityType::of::<String>(), codec));
        let table = Arc::new(CodecTable::new(codecs));

        let outer = enter(Arc::clone(&table));
        assert!(active_codec::<String>().is_some());
        {
            let _suspended = suspend::<String>();
            assert!(active_codec::<String>().is_none());
        }
        assert!(active_codec::<String>().is_some());

        let inner = enter(Arc::new(CodecTable::new(HashMap::new())));
        assert!(active_codec::<String>().is_none());
        assert!(inner.finish().is_none());

        record_failure(CodecError::malformed("String", "first"));
        record_failure(CodecError::malformed("String", "second"));
        match outer.finish() {
            Some(CodecError::MalformedPayload { reason, .. }) => assert_eq!(reason, "first"),
            other => panic!("unexpected failure: {other:?}"),
        }
        assert!(active_codec::<String>().is_none());
    }
}
