//! `Customer` 的線上格式。
//!
//! ```json
//! {
//!   "customerId": 1,
//!   "firstName": "Ada",
//!   "lastName": "Lovelace",
//!   "country": "UK",
//!   "accounts": [
//!     { "accountId": 10, "accountName": "Daily", "accountType": "checking",
//!       "balance": 125.5, "openedOn": "2021-03-01" }
//!   ]
//! }
//! ```
//!
//! 帳戶內不再重複 `customerId`，反序列化時由外層客戶補回。所有欄位都能完整往返。

use super::fields::{Fields, DATE_FORMAT};
use crate::core::{Customer, CustomerAccount, EntityCodec, Result};
use crate::utils::error::CodecError;
use serde_json::{json, Value};

const ENTITY: &str = "Customer";

#[derive(Debug, Clone, Copy, Default)]
pub struct CustomerCodec;

impl CustomerCodec {
    fn nested_account(account: &CustomerAccount) -> Value {
        json!({
            "accountId": account.account_id,
            "accountName": account.account_name,
            "accountType": account.account_type,
            "balance": account.balance,
            "openedOn": account.opened_on.format(DATE_FORMAT).to_string(),
        })
    }

    fn parse_nested_account(customer_id: i64, value: &Value) -> Result<CustomerAccount> {
        let fields = Fields::of(ENTITY, value)?;
        let account_id = fields.i64("accountId")?;

        // 帳戶若自帶擁有者，必須與外層客戶一致
        if let Some(owner) = fields.optional("customerId") {
            if owner.as_i64() != Some(customer_id) {
                return Err(CodecError::malformed(
                    ENTITY,
                    format!(
                        "account {} is owned by customer {}, not {}",
                        account_id, owner, customer_id
                    ),
                ));
            }
        }

        Ok(CustomerAccount {
            account_id,
            customer_id,
            account_name: fields.string("accountName")?,
            account_type: fields.string("accountType")?,
            balance: fields.f64("balance")?,
            opened_on: fields.date("openedOn")?,
        })
    }
}

impl EntityCodec<Customer> for CustomerCodec {
    fn serialize(&self, customer: &Customer) -> Result<Value> {
        let accounts: Vec<Value> = customer.accounts.iter().map(Self::nested_account).collect();

        Ok(json!({
            "customerId": customer.customer_id,
            "firstName": customer.first_name,
            "lastName": customer.last_name,
            "country": customer.country,
            "accounts": accounts,
        }))
    }

    fn deserialize(&self, value: &Value) -> Result<Customer> {
        let fields = Fields::of(ENTITY, value)?;
        let customer_id = fields.i64("customerId")?;

        let accounts = match fields.optional("accounts") {
            Some(_) => fields
                .array("accounts")?
                .iter()
                .map(|account| Self::parse_nested_account(customer_id, account))
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(Customer {
            customer_id,
            first_name: fields.string("firstName")?,
            last_name: fields.string("lastName")?,
            country: fields.string("country")?,
            accounts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ada() -> Customer {
        Customer {
            customer_id: 1,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            country: "UK".to_string(),
            accounts: vec![CustomerAccount {
                account_id: 10,
                customer_id: 1,
                account_name: "Daily".to_string(),
                account_type: "checking".to_string(),
                balance: 125.5,
                opened_on: NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
            }],
        }
    }

    #[test]
    fn test_serialize_flattens_account_owner() {
        let value = CustomerCodec.serialize(&ada()).unwrap();
        assert_eq!(
            value,
            json!({
                "customerId": 1,
                "firstName": "Ada",
                "lastName": "Lovelace",
                "country": "UK",
                "accounts": [{
                    "accountId": 10,
                    "accountName": "Daily",
                    "accountType": "checking",
                    "balance": 125.5,
                    "openedOn": "2021-03-01"
                }]
            })
        );
    }

    #[test]
    fn test_round_trip_preserves_all_fields() {
        let customer = ada();
        let value = CustomerCodec.serialize(&customer).unwrap();
        assert_eq!(CustomerCodec.deserialize(&value).unwrap(), customer);
    }

    #[test]
    fn test_missing_accounts_means_none() {
        let value = json!({
            "customerId": 2,
            "firstName": "Alan",
            "lastName": "Turing",
            "country": "UK"
        });
        let customer = CustomerCodec.deserialize(&value).unwrap();
        assert!(customer.accounts.is_empty());
    }

    #[test]
    fn test_missing_required_field() {
        let value = json!({"customerId": 2, "firstName": "Alan", "country": "UK"});
        let err = CustomerCodec.deserialize(&value).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed Customer payload: missing field `lastName`"
        );
    }

    #[test]
    fn test_conflicting_account_owner() {
        let mut value = CustomerCodec.serialize(&ada()).unwrap();
        value["accounts"][0]["customerId"] = json!(99);
        let err = CustomerCodec.deserialize(&value).unwrap_err();
        assert!(err.to_string().contains("owned by customer 99"));

        value["accounts"][0]["customerId"] = json!(1);
        assert_eq!(CustomerCodec.deserialize(&value).unwrap(), ada());
    }
}
