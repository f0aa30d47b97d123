//! `CustomerAccount` 的線上格式：擁有者以參照 `{"customerId": N}` 表示，
//! 反序列化時透過 `BankDirectory` 解析。只帶 `accountId` 的酬載視為既有帳戶的參照。

use super::fields::{Fields, DATE_FORMAT};
use crate::core::{BankDirectory, CustomerAccount, EntityCodec, Result};
use crate::utils::error::CodecError;
use serde_json::{json, Value};
use std::sync::Arc;

const ENTITY: &str = "CustomerAccount";

#[derive(Clone)]
pub struct AccountCodec {
    directory: Arc<dyn BankDirectory>,
}

impl AccountCodec {
    pub fn new(directory: Arc<dyn BankDirectory>) -> Self {
        Self { directory }
    }

    fn resolve_existing(&self, account_id: i64) -> Result<CustomerAccount> {
        tracing::debug!("Resolving account reference {}", account_id);
        self.directory.find_account(account_id).ok_or_else(|| {
            CodecError::malformed(
                ENTITY,
                format!("unresolvable account reference {}", account_id),
            )
        })
    }

    fn resolve_owner(&self, fields: &Fields<'_>) -> Result<i64> {
        let customer_id = fields.object("customer")?.i64("customerId")?;
        match self.directory.find_customer(customer_id) {
            Some(customer) => Ok(customer.customer_id),
            None => Err(CodecError::malformed(
                ENTITY,
                format!("unresolvable customer reference {}", customer_id),
            )),
        }
    }
}

impl EntityCodec<CustomerAccount> for AccountCodec {
    fn serialize(&self, account: &CustomerAccount) -> Result<Value> {
        Ok(json!({
            "accountId": account.account_id,
            "customer": { "customerId": account.customer_id },
            "accountName": account.account_name,
            "accountType": account.account_type,
            "balance": account.balance,
            "openedOn": account.opened_on.format(DATE_FORMAT).to_string(),
        }))
    }

    fn deserialize(&self, value: &Value) -> Result<CustomerAccount> {
        let fields = Fields::of(ENTITY, value)?;
        let account_id = fields.i64("accountId")?;

        if fields.has_only(&["accountId"]) {
            return self.resolve_existing(account_id);
        }

        Ok(CustomerAccount {
            account_id,
            customer_id: self.resolve_owner(&fields)?,
            account_name: fields.string("accountName")?,
            account_type: fields.string("accountType")?,
            balance: fields.f64("balance")?,
            opened_on: fields.date("openedOn")?,
        })
    }
}

impl std::fmt::Debug for AccountCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountCodec").finish_non_exhaustive()
    }
}
