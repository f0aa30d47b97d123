use crate::domain::model::{Customer, CustomerAccount};
use crate::domain::ports::BankDirectory;
use crate::utils::error::{CodecError, Result};
use crate::utils::validation::validate_non_empty_string;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// 固定資料檔的結構（使用預設結構映射，欄位為 snake_case）
#[derive(Debug, Deserialize)]
struct Fixtures {
    #[serde(default)]
    customers: Vec<Customer>,
}

/// 以記憶體 map 實作的查詢服務，供 CLI 與測試使用
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    customers: HashMap<i64, Customer>,
    accounts: HashMap<i64, CustomerAccount>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_customer(mut self, customer: Customer) -> Result<Self> {
        self.insert(customer)?;
        Ok(self)
    }

    /// 加入客戶與其帳戶。重複的 id 或擁有者不一致的帳戶會被拒絕，目錄保持不變。
    pub fn insert(&mut self, customer: Customer) -> Result<()> {
        if self.customers.contains_key(&customer.customer_id) {
            return Err(CodecError::InvalidConfigValueError {
                field: "customers.customer_id".to_string(),
                value: customer.customer_id.to_string(),
                reason: "Duplicate customer id".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for account in &customer.accounts {
            if account.customer_id != customer.customer_id {
                return Err(CodecError::InvalidConfigValueError {
                    field: "customers.accounts.customer_id".to_string(),
                    value: account.customer_id.to_string(),
                    reason: format!(
                        "Account {} is listed under customer {}",
                        account.account_id, customer.customer_id
                    ),
                });
            }
            if self.accounts.contains_key(&account.account_id) || !seen.insert(account.account_id)
            {
                return Err(CodecError::InvalidConfigValueError {
                    field: "customers.accounts.account_id".to_string(),
                    value: account.account_id.to_string(),
                    reason: "Duplicate account id".to_string(),
                });
            }
        }

        for account in &customer.accounts {
            self.accounts.insert(account.account_id, account.clone());
        }
        self.customers.insert(customer.customer_id, customer);
        Ok(())
    }

    pub fn from_fixture_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let directory = Self::from_fixture_str(&content)?;
        tracing::info!(
            "📁 Loaded {} customer(s) and {} account(s) from {}",
            directory.customers.len(),
            directory.accounts.len(),
            path.as_ref().display()
        );
        Ok(directory)
    }

    pub fn from_fixture_str(content: &str) -> Result<Self> {
        let fixtures: Fixtures = serde_json::from_str(content)?;
        let mut directory = Self::new();
        for customer in fixtures.customers {
            validate_non_empty_string("customers.first_name", &customer.first_name)?;
            validate_non_empty_string("customers.last_name", &customer.last_name)?;
            directory.insert(customer)?;
        }
        Ok(directory)
    }

    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }
}

impl BankDirectory for InMemoryDirectory {
    fn find_customer(&self, customer_id: i64) -> Option<Customer> {
        self.customers.get(&customer_id).cloned()
    }

    fn find_account(&self, account_id: i64) -> Option<CustomerAccount> {
        self.accounts.get(&account_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FIXTURES: &str = r#"
{
  "customers": [
    {
      "customer_id": 1,
      "first_name": "Ada",
      "last_name": "Lovelace",
      "country": "UK",
      "accounts": [
        {
          "account_id": 10,
          "customer_id": 1,
          "account_name": "Daily",
          "account_type": "checking",
          "balance": 125.5,
          "opened_on": "2021-03-01"
        }
      ]
    },
    {
      "customer_id": 2,
      "first_name": "Alan",
      "last_name": "Turing",
      "country": "UK"
    }
  ]
}
"#;

    #[test]
    fn test_load_fixtures() {
        let directory = InMemoryDirectory::from_fixture_str(FIXTURES).unwrap();
        assert_eq!(directory.customer_count(), 2);
        assert_eq!(directory.find_customer(1).unwrap().full_name(), "Ada Lovelace");
        assert_eq!(directory.find_account(10).unwrap().customer_id, 1);
        assert!(directory.find_customer(2).unwrap().accounts.is_empty());
        assert!(directory.find_account(11).is_none());
    }

    #[test]
    fn test_load_fixture_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(FIXTURES.as_bytes()).unwrap();

        let directory = InMemoryDirectory::from_fixture_file(temp_file.path()).unwrap();
        assert_eq!(directory.customer_count(), 2);
    }

    #[test]
    fn test_blank_names_are_rejected() {
        let content = r#"{"customers": [
            {"customer_id": 3, "first_name": " ", "last_name": "X", "country": "NL"}
        ]}"#;
        let err = InMemoryDirectory::from_fixture_str(content).unwrap_err();
        assert!(matches!(err, CodecError::InvalidConfigValueError { .. }));
    }

    fn customer_with_account(customer_id: i64, owner_id: i64, account_id: i64) -> Customer {
        Customer {
            customer_id,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            country: "UK".to_string(),
            accounts: vec![CustomerAccount {
                account_id,
                customer_id: owner_id,
                account_name: "Daily".to_string(),
                account_type: "checking".to_string(),
                balance: 0.0,
                opened_on: chrono::NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
            }],
        }
    }

    #[test]
    fn test_account_owner_must_match_customer() {
        let mut directory = InMemoryDirectory::new();
        let err = directory.insert(customer_with_account(1, 2, 10)).unwrap_err();
        assert!(matches!(err, CodecError::InvalidConfigValueError { ref field, .. }
            if field == "customers.accounts.customer_id"));
        assert_eq!(directory.customer_count(), 0);
        assert!(directory.find_account(10).is_none());
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut directory = InMemoryDirectory::new();
        directory.insert(customer_with_account(1, 1, 10)).unwrap();

        let err = directory.insert(customer_with_account(2, 2, 10)).unwrap_err();
        assert!(matches!(err, CodecError::InvalidConfigValueError { ref field, .. }
            if field == "customers.accounts.account_id"));
        assert!(directory.find_customer(2).is_none());

        let mut twice = customer_with_account(3, 3, 30);
        twice.accounts.push(twice.accounts[0].clone());
        assert!(directory.insert(twice).is_err());

        let err = directory.insert(customer_with_account(1, 1, 11)).unwrap_err();
        assert!(matches!(err, CodecError::InvalidConfigValueError { ref field, .. }
            if field == "customers.customer_id"));
        assert_eq!(directory.find_account(10).unwrap().customer_id, 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = InMemoryDirectory::from_fixture_file("/nonexistent/bank.json").unwrap_err();
        assert!(matches!(err, CodecError::IoError(_)));
    }
}
