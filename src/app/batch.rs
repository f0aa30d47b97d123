use crate::core::{Customer, CustomerAccount, JsonMapper, Result};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum EntityKind {
    Customer,
    Account,
}

#[derive(Debug)]
pub struct DecodeOutcome {
    pub path: PathBuf,
    pub result: Result<Value>,
}

/// 依實體種類解碼一份線上 JSON，再以同一個 mapper 重新編碼成標準格式
pub fn decode_document(mapper: &JsonMapper, kind: EntityKind, bytes: &[u8]) -> Result<Value> {
    match kind {
        EntityKind::Customer => {
            let customer: Customer = mapper.from_slice(bytes)?;
            tracing::info!(
                "Decoded customer {} ({}, {} account(s))",
                customer.customer_id,
                customer.full_name(),
                customer.accounts.len()
            );
            mapper.to_value(&customer)
        }
        EntityKind::Account => {
            let account: CustomerAccount = mapper.from_slice(bytes)?;
            tracing::info!(
                "Decoded account {} owned by customer {}",
                account.account_id,
                account.customer_id
            );
            mapper.to_value(&account)
        }
    }
}

/// 每個檔案一個 tokio task，共用同一個 mapper；結果依輸入順序回傳
pub async fn decode_files(
    mapper: Arc<JsonMapper>,
    kind: EntityKind,
    paths: Vec<PathBuf>,
) -> Vec<DecodeOutcome> {
    let handles: Vec<_> = paths
        .into_iter()
        .map(|path| {
            let mapper = Arc::clone(&mapper);
            let task_path = path.clone();
            let handle = tokio::spawn(async move {
                let bytes = tokio::fs::read(&task_path).await?;
                decode_document(&mapper, kind, &bytes)
            });
            (path, handle)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (path, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(join_error) => Err(std::io::Error::from(join_error).into()),
        };
        if let Err(e) = &result {
            tracing::warn!("⚠️ {}: {}", path.display(), e);
        }
        outcomes.push(DecodeOutcome { path, result });
    }

    outcomes
}
