use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::database::models::{FlowType, TransactionRecord};

/// Month-level rollup of a user's transactions. Computed in memory over the
/// already-fetched list; the store is never consulted twice.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyStats {
    pub month: String,
    pub balance: Decimal,
    pub income_month: Decimal,
    pub expense_month: Decimal,
    pub remaining_month: Decimal,
    pub expense_by_category: Vec<CategorySlice>,
    pub daily_expense: Vec<DailyPoint>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategorySlice {
    pub name: String,
    pub value: Decimal,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyPoint {
    pub label: String,
    pub value: Decimal,
}

/// Bucket label for expenses whose category was deleted out from under them.
pub const UNCATEGORIZED_LABEL: &str = "Lainnya";
const UNCATEGORIZED_COLOR: &str = "#94a3b8";

/// A calendar month, the granularity the dashboard works at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn current() -> Self {
        Self::from_date(Utc::now().date_naive())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse `YYYY-MM`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (year, month) = raw.split_once('-')?;
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

pub fn summarize(transactions: &[TransactionRecord], month: MonthKey) -> MonthlyStats {
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    let mut income_month = Decimal::ZERO;
    let mut expense_month = Decimal::ZERO;

    for transaction in transactions {
        let in_month = month.contains(transaction.transaction_date);
        match transaction.kind {
            FlowType::Income => {
                total_income += transaction.amount;
                if in_month {
                    income_month += transaction.amount;
                }
            }
            FlowType::Expense => {
                total_expense += transaction.amount;
                if in_month {
                    expense_month += transaction.amount;
                }
            }
        }
    }

    MonthlyStats {
        month: month.to_string(),
        balance: total_income - total_expense,
        income_month,
        expense_month,
        remaining_month: income_month - expense_month,
        expense_by_category: expense_by_category(transactions, month),
        daily_expense: daily_expense(transactions, month),
    }
}

/// Month's expenses grouped by category name, largest first. Orphaned rows
/// fall into the uncategorized bucket.
fn expense_by_category(transactions: &[TransactionRecord], month: MonthKey) -> Vec<CategorySlice> {
    let mut buckets: HashMap<String, CategorySlice> = HashMap::new();

    for transaction in transactions
        .iter()
        .filter(|t| t.kind == FlowType::Expense && month.contains(t.transaction_date))
    {
        let (name, color) = match &transaction.category {
            Some(category) => (category.name.clone(), category.color.clone()),
            None => (
                UNCATEGORIZED_LABEL.to_string(),
                UNCATEGORIZED_COLOR.to_string(),
            ),
        };
        buckets
            .entry(name.clone())
            .or_insert(CategorySlice {
                name,
                value: Decimal::ZERO,
                color,
            })
            .value += transaction.amount;
    }

    let mut slices: Vec<CategorySlice> = buckets.into_values().collect();
    slices.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    slices
}

/// Month's expenses summed per day, in day order, with two-digit labels.
fn daily_expense(transactions: &[TransactionRecord], month: MonthKey) -> Vec<DailyPoint> {
    let mut days: BTreeMap<u32, Decimal> = BTreeMap::new();

    for transaction in transactions
        .iter()
        .filter(|t| t.kind == FlowType::Expense && month.contains(t.transaction_date))
    {
        *days
            .entry(transaction.transaction_date.day())
            .or_insert(Decimal::ZERO) += transaction.amount;
    }

    days.into_iter()
        .map(|(day, value)| DailyPoint {
            label: format!("{:02}", day),
            value,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::CategoryRef;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    fn record(
        kind: FlowType,
        amount: i64,
        date: &str,
        category: Option<(&str, &str)>,
    ) -> TransactionRecord {
        let category = category.map(|(name, color)| CategoryRef {
            id: Uuid::new_v4(),
            name: name.to_string(),
            color: color.to_string(),
            icon: "Sparkles".to_string(),
            kind,
        });
        TransactionRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind,
            amount: Decimal::from(amount),
            category_id: category.as_ref().map(|c| c.id),
            description: String::new(),
            transaction_date: date.parse().unwrap(),
            created_at: DateTime::<Utc>::from_timestamp(0, 0).unwrap(),
            category,
        }
    }

    #[test]
    fn month_key_parses_and_formats() {
        let key = MonthKey::parse("2024-01").unwrap();
        assert_eq!(key.to_string(), "2024-01");
        assert!(key.contains(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));
        assert!(!key.contains(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));

        assert!(MonthKey::parse("2024-13").is_none());
        assert!(MonthKey::parse("nonsense").is_none());
        assert!(MonthKey::parse("2024").is_none());
    }

    #[test]
    fn balance_spans_all_time_while_month_fields_do_not() {
        let transactions = vec![
            record(FlowType::Income, 5000, "2024-01-02", None),
            record(FlowType::Expense, 1500, "2024-01-05", None),
            record(FlowType::Income, 900, "2023-12-28", None),
            record(FlowType::Expense, 400, "2023-12-30", None),
        ];
        let stats = summarize(&transactions, MonthKey::parse("2024-01").unwrap());

        assert_eq!(stats.balance, Decimal::from(5000 + 900 - 1500 - 400));
        assert_eq!(stats.income_month, Decimal::from(5000));
        assert_eq!(stats.expense_month, Decimal::from(1500));
        assert_eq!(stats.remaining_month, Decimal::from(3500));
    }

    #[test]
    fn expenses_group_by_category_largest_first() {
        let transactions = vec![
            record(FlowType::Expense, 100, "2024-01-03", Some(("Ngopi", "#facc15"))),
            record(FlowType::Expense, 250, "2024-01-04", Some(("Belanja", "#fb7185"))),
            record(FlowType::Expense, 50, "2024-01-10", Some(("Ngopi", "#facc15"))),
            record(FlowType::Expense, 75, "2024-01-11", None),
            // Outside the month; must not count.
            record(FlowType::Expense, 999, "2024-02-01", Some(("Ngopi", "#facc15"))),
        ];
        let stats = summarize(&transactions, MonthKey::parse("2024-01").unwrap());

        assert_eq!(
            stats.expense_by_category,
            vec![
                CategorySlice {
                    name: "Belanja".to_string(),
                    value: Decimal::from(250),
                    color: "#fb7185".to_string(),
                },
                CategorySlice {
                    name: "Ngopi".to_string(),
                    value: Decimal::from(150),
                    color: "#facc15".to_string(),
                },
                CategorySlice {
                    name: UNCATEGORIZED_LABEL.to_string(),
                    value: Decimal::from(75),
                    color: "#94a3b8".to_string(),
                },
            ]
        );
    }

    #[test]
    fn daily_series_sums_per_day_in_order() {
        let transactions = vec![
            record(FlowType::Expense, 20, "2024-01-09", None),
            record(FlowType::Expense, 10, "2024-01-03", None),
            record(FlowType::Expense, 30, "2024-01-03", None),
            record(FlowType::Income, 500, "2024-01-03", None),
        ];
        let stats = summarize(&transactions, MonthKey::parse("2024-01").unwrap());

        assert_eq!(
            stats.daily_expense,
            vec![
                DailyPoint {
                    label: "03".to_string(),
                    value: Decimal::from(40),
                },
                DailyPoint {
                    label: "09".to_string(),
                    value: Decimal::from(20),
                },
            ]
        );
    }
}
