use crate::domain::model::{Customer, CustomerAccount};

/// 反序列化時解析參照所用的查詢服務
pub trait BankDirectory: Send + Sync {
    fn find_customer(&self, customer_id: i64) -> Option<Customer>;
    fn find_account(&self, account_id: i64) -> Option<CustomerAccount>;
}
