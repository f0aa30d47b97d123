use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// 可註冊自訂 codec 的實體型別。身分只由 `TypeId` 決定，名稱僅供日誌與錯誤訊息使用。
#[derive(Debug, Clone, Copy)]
pub struct EntityType {
    id: TypeId,
    name: &'static str,
}

impl EntityType {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 去掉模組路徑後的短名稱，例如 `Customer`
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntityType {}

impl Hash for EntityType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// 框架在內容協商時傳入的型別描述。Provider 會忽略它，只為了相容呼叫協定而存在。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDescriptor(EntityType);

impl TypeDescriptor {
    pub fn of<T: 'static>() -> Self {
        Self(EntityType::of::<T>())
    }

    pub fn entity_type(&self) -> EntityType {
        self.0
    }
}

impl From<EntityType> for TypeDescriptor {
    fn from(entity: EntityType) -> Self {
        Self(entity)
    }
}
