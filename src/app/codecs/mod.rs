pub mod account;
pub mod customer;
mod fields;

use crate::core::{
    BankDirectory, CodecRegistry, Customer, CustomerAccount, EngineSettings, MapperProvider, Result,
};
use std::sync::Arc;

pub use account::AccountCodec;
pub use customer::CustomerCodec;

/// 銀行實體的 codec 組合：`Customer` 與 `CustomerAccount`
pub fn bank_registry(directory: Arc<dyn BankDirectory>) -> CodecRegistry {
    let mut registry = CodecRegistry::new();
    registry
        .register_codec::<Customer, _>(CustomerCodec)
        .register_codec::<CustomerAccount, _>(AccountCodec::new(directory));
    registry
}

pub fn bank_provider(
    directory: Arc<dyn BankDirectory>,
    settings: EngineSettings,
) -> Result<MapperProvider> {
    MapperProvider::new(bank_registry(directory), settings)
}
