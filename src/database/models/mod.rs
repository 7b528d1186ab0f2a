use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub mod category;
pub mod transaction;
pub mod user;

pub use category::{Category, NewCategory};
pub use transaction::{CategoryRef, NewTransaction, TransactionRecord};
pub use user::{AdminUser, User};

/// Direction of money movement. Shared by categories (what kind of
/// transactions a category applies to) and transactions themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "flow_type", rename_all = "lowercase")]
pub enum FlowType {
    Income,
    Expense,
}

impl FlowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowType::Income => "income",
            FlowType::Expense => "expense",
        }
    }
}

impl FromStr for FlowType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(FlowType::Income),
            "expense" => Ok(FlowType::Expense),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for FlowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_type_round_trips_through_strings() {
        assert_eq!("income".parse::<FlowType>(), Ok(FlowType::Income));
        assert_eq!("expense".parse::<FlowType>(), Ok(FlowType::Expense));
        assert!("transfer".parse::<FlowType>().is_err());
        assert_eq!(FlowType::Income.to_string(), "income");
    }

    #[test]
    fn flow_type_serializes_lowercase() {
        assert_eq!(serde_json::to_value(FlowType::Expense).unwrap(), "expense");
    }
}
