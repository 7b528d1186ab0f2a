use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::models::{AdminUser, FlowType, User};
use crate::database::StoreError;

/// Cross-user read access for the admin gateway. Implementations hold the
/// elevated credential; nothing else in the crate may touch it.
#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn list_users(&self, page: i64, per_page: i64) -> Result<UserPage, StoreError>;

    async fn list_transactions(
        &self,
        query: &AdminTransactionQuery,
    ) -> Result<TransactionPage, StoreError>;
}

#[derive(Debug, Clone, Serialize)]
pub struct UserPage {
    pub users: Vec<AdminUser>,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionPage {
    pub transactions: Vec<AdminTransaction>,
    pub count: i64,
}

/// Filters accepted by the cross-user transaction listing. `limit`/`offset`
/// arrive pre-clamped by the handler.
#[derive(Debug, Clone)]
pub struct AdminTransactionQuery {
    pub user_id: Option<Uuid>,
    pub kind: Option<FlowType>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: i64,
    pub offset: i64,
}

/// A transaction row as exposed to administrators, joined with the owning
/// category's name and type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminTransaction {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: FlowType,
    pub amount: Decimal,
    pub description: String,
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub category: Option<CategorySummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FlowType,
}

pub struct PgAdminStore {
    pool: PgPool,
}

impl PgAdminStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_ADMIN_ROW: &str = "SELECT t.id, t.user_id, t.type, t.amount, t.description, \
     t.transaction_date, t.created_at, c.name AS cat_name, c.type AS cat_type \
     FROM transactions t LEFT JOIN categories c ON c.id = t.category_id";

const COUNT_ADMIN_ROWS: &str = "SELECT COUNT(*) FROM transactions t";

/// Appends the filter conditions shared by the row query and its exact-count
/// twin. Starts from `1=1` so each condition can append uniformly.
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &AdminTransactionQuery) {
    builder.push(" WHERE 1=1");
    if let Some(user_id) = query.user_id {
        builder.push(" AND t.user_id = ");
        builder.push_bind(user_id);
    }
    if let Some(kind) = query.kind {
        builder.push(" AND t.type = ");
        builder.push_bind(kind);
    }
    if let Some(from) = query.from {
        builder.push(" AND t.transaction_date >= ");
        builder.push_bind(from);
    }
    if let Some(to) = query.to {
        builder.push(" AND t.transaction_date <= ");
        builder.push_bind(to);
    }
}

#[derive(FromRow)]
struct AdminTransactionRow {
    id: Uuid,
    user_id: Uuid,
    #[sqlx(rename = "type")]
    kind: FlowType,
    amount: Decimal,
    description: String,
    transaction_date: NaiveDate,
    created_at: DateTime<Utc>,
    cat_name: Option<String>,
    cat_type: Option<FlowType>,
}

impl AdminTransactionRow {
    fn into_transaction(self) -> AdminTransaction {
        let category = match (self.cat_name, self.cat_type) {
            (Some(name), Some(kind)) => Some(CategorySummary { name, kind }),
            _ => None,
        };

        AdminTransaction {
            id: self.id,
            user_id: self.user_id,
            kind: self.kind,
            amount: self.amount,
            description: self.description,
            transaction_date: self.transaction_date,
            created_at: self.created_at,
            category,
        }
    }
}

#[async_trait]
impl AdminStore for PgAdminStore {
    async fn list_users(&self, page: i64, per_page: i64) -> Result<UserPage, StoreError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, created_at, last_sign_in_at, email_confirmed_at \
             FROM users ORDER BY created_at DESC, id LIMIT $1 OFFSET $2",
        )
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(&self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(UserPage {
            users: users.into_iter().map(AdminUser::from).collect(),
            total,
        })
    }

    async fn list_transactions(
        &self,
        query: &AdminTransactionQuery,
    ) -> Result<TransactionPage, StoreError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_ADMIN_ROW);
        push_filters(&mut builder, query);
        builder.push(" ORDER BY t.transaction_date DESC LIMIT ");
        builder.push_bind(query.limit);
        builder.push(" OFFSET ");
        builder.push_bind(query.offset);

        let rows: Vec<AdminTransactionRow> =
            builder.build_query_as().fetch_all(&self.pool).await?;

        let mut count_builder: QueryBuilder<Postgres> = QueryBuilder::new(COUNT_ADMIN_ROWS);
        push_filters(&mut count_builder, query);
        let (count,): (i64,) = count_builder
            .build_query_as()
            .fetch_one(&self.pool)
            .await?;

        Ok(TransactionPage {
            transactions: rows
                .into_iter()
                .map(AdminTransactionRow::into_transaction)
                .collect(),
            count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_query() -> AdminTransactionQuery {
        AdminTransactionQuery {
            user_id: Some(Uuid::new_v4()),
            kind: Some(FlowType::Expense),
            from: Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            to: Some(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()),
            limit: 50,
            offset: 0,
        }
    }

    #[test]
    fn filters_compose_with_sequential_placeholders() {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("");
        push_filters(&mut builder, &full_query());
        assert_eq!(
            builder.sql(),
            " WHERE 1=1 AND t.user_id = $1 AND t.type = $2 \
             AND t.transaction_date >= $3 AND t.transaction_date <= $4"
        );
    }

    #[test]
    fn absent_filters_add_no_conditions() {
        let query = AdminTransactionQuery {
            user_id: None,
            kind: None,
            from: None,
            to: None,
            limit: 50,
            offset: 0,
        };
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("");
        push_filters(&mut builder, &query);
        assert_eq!(builder.sql(), " WHERE 1=1");
    }

    #[test]
    fn partial_filters_keep_placeholder_order() {
        let query = AdminTransactionQuery {
            from: None,
            to: None,
            ..full_query()
        };
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("");
        push_filters(&mut builder, &query);
        assert_eq!(builder.sql(), " WHERE 1=1 AND t.user_id = $1 AND t.type = $2");
    }
}
