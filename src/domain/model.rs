use crate::core::dispatch::{deserialize_entity, serialize_entity};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub customer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub accounts: Vec<CustomerAccount>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerAccount {
    pub account_id: i64,
    pub customer_id: i64,
    pub account_name: String,
    pub account_type: String,
    pub balance: f64,
    pub opened_on: NaiveDate,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// 結構版面（snake_case 欄位），用於固定資料檔與沒有 mapper 的場合
#[derive(Serialize, Deserialize)]
#[serde(remote = "Customer")]
struct CustomerLayout {
    customer_id: i64,
    first_name: String,
    last_name: String,
    country: String,
    #[serde(default)]
    accounts: Vec<CustomerAccount>,
}

#[derive(Serialize, Deserialize)]
#[serde(remote = "CustomerAccount")]
struct CustomerAccountLayout {
    account_id: i64,
    customer_id: i64,
    account_name: String,
    account_type: String,
    balance: f64,
    opened_on: NaiveDate,
}

impl Serialize for Customer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_entity(self, serializer, CustomerLayout::serialize)
    }
}

impl<'de> Deserialize<'de> for Customer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_entity(deserializer, CustomerLayout::deserialize)
    }
}

impl Serialize for CustomerAccount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_entity(self, serializer, CustomerAccountLayout::serialize)
    }
}

impl<'de> Deserialize<'de> for CustomerAccount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_entity(deserializer, CustomerAccountLayout::deserialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structural_layout_without_mapper() {
        let account = CustomerAccount {
            account_id: 5,
            customer_id: 2,
            account_name: "Daily".to_string(),
            account_type: "checking".to_string(),
            balance: 10.0,
            opened_on: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        };
        let customer = Customer {
            customer_id: 2,
            first_name: "Alan".to_string(),
            last_name: "Turing".to_string(),
            country: "UK".to_string(),
            accounts: vec![account],
        };

        let value = serde_json::to_value(&customer).unwrap();
        assert_eq!(value["first_name"], json!("Alan"));
        assert_eq!(value["accounts"][0]["customer_id"], json!(2));
        assert_eq!(value["accounts"][0]["opened_on"], json!("2024-02-01"));
        assert_eq!(serde_json::from_value::<Customer>(value).unwrap(), customer);
    }
}
