pub mod dispatch;
pub mod engine;
pub mod entity;
pub mod mapper;
pub mod provider;
pub mod registry;

pub use crate::domain::model::{Customer, CustomerAccount};
pub use crate::domain::ports::BankDirectory;
pub use crate::utils::error::Result;
pub use dispatch::{deserialize_entity, serialize_entity};
pub use engine::{EngineSettings, JsonEngine};
pub use entity::{EntityType, TypeDescriptor};
pub use mapper::JsonMapper;
pub use provider::{ContextResolver, MapperProvider};
pub use registry::{Codec, CodecRegistry, Deserializer, EntityCodec, Serializer};
