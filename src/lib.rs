pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, Command};

pub use crate::adapters::InMemoryDirectory;
pub use crate::app::codecs::{bank_provider, bank_registry, AccountCodec, CustomerCodec};
pub use crate::config::CodecConfig;
pub use crate::core::{
    BankDirectory, Codec, CodecRegistry, ContextResolver, EngineSettings, EntityCodec, EntityType,
    JsonEngine, JsonMapper, MapperProvider, TypeDescriptor,
};
pub use crate::domain::model::{Customer, CustomerAccount};
pub use crate::utils::error::{CodecError, Result};
