use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::models::{CategoryRef, FlowType, NewTransaction, TransactionRecord};
use crate::database::StoreError;

/// Optional filters for a user's transaction listing. All of them narrow the
/// ownership-scoped result; none can widen it.
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    pub kind: Option<FlowType>,
    pub category_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub search: Option<String>,
}

/// Reads and writes a user's transactions. As with categories, the user id is
/// threaded through every call and lands in the WHERE clause of every query.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn list(
        &self,
        user_id: Uuid,
        query: &TransactionQuery,
    ) -> Result<Vec<TransactionRecord>, StoreError>;

    async fn create(
        &self,
        user_id: Uuid,
        new: NewTransaction,
    ) -> Result<TransactionRecord, StoreError>;

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        new: NewTransaction,
    ) -> Result<TransactionRecord, StoreError>;

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), StoreError>;
}

pub struct PgTransactionStore {
    pool: PgPool,
}

impl PgTransactionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_record(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<TransactionRecord, StoreError> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "{SELECT_RECORD} WHERE t.id = $1 AND t.user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TransactionRow::into_record).ok_or(StoreError::NotFound)
    }
}

const SELECT_RECORD: &str = "SELECT t.id, t.user_id, t.type, t.amount, t.category_id, \
     t.description, t.transaction_date, t.created_at, \
     c.id AS cat_id, c.name AS cat_name, c.color AS cat_color, \
     c.icon AS cat_icon, c.type AS cat_type \
     FROM transactions t LEFT JOIN categories c ON c.id = t.category_id";

/// Flat join row; folded into `TransactionRecord` after fetch.
#[derive(FromRow)]
struct TransactionRow {
    id: Uuid,
    user_id: Uuid,
    #[sqlx(rename = "type")]
    kind: FlowType,
    amount: Decimal,
    category_id: Option<Uuid>,
    description: String,
    transaction_date: NaiveDate,
    created_at: DateTime<Utc>,
    cat_id: Option<Uuid>,
    cat_name: Option<String>,
    cat_color: Option<String>,
    cat_icon: Option<String>,
    cat_type: Option<FlowType>,
}

impl TransactionRow {
    fn into_record(self) -> TransactionRecord {
        let category = match (self.cat_id, self.cat_name, self.cat_color, self.cat_icon, self.cat_type)
        {
            (Some(id), Some(name), Some(color), Some(icon), Some(kind)) => Some(CategoryRef {
                id,
                name,
                color,
                icon,
                kind,
            }),
            _ => None,
        };

        TransactionRecord {
            id: self.id,
            user_id: self.user_id,
            kind: self.kind,
            amount: self.amount,
            category_id: self.category_id,
            description: self.description,
            transaction_date: self.transaction_date,
            created_at: self.created_at,
            category,
        }
    }
}

#[async_trait]
impl TransactionStore for PgTransactionStore {
    async fn list(
        &self,
        user_id: Uuid,
        query: &TransactionQuery,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_RECORD);
        builder.push(" WHERE t.user_id = ");
        builder.push_bind(user_id);

        if let Some(kind) = query.kind {
            builder.push(" AND t.type = ");
            builder.push_bind(kind);
        }
        if let Some(category_id) = query.category_id {
            builder.push(" AND t.category_id = ");
            builder.push_bind(category_id);
        }
        if let Some(from) = query.from {
            builder.push(" AND t.transaction_date >= ");
            builder.push_bind(from);
        }
        if let Some(to) = query.to {
            builder.push(" AND t.transaction_date <= ");
            builder.push_bind(to);
        }
        if let Some(search) = &query.search {
            let pattern = format!("%{}%", search);
            builder.push(" AND (t.description ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR c.name ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }

        builder.push(" ORDER BY t.transaction_date DESC, t.created_at DESC");

        let rows: Vec<TransactionRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(TransactionRow::into_record).collect())
    }

    async fn create(
        &self,
        user_id: Uuid,
        new: NewTransaction,
    ) -> Result<TransactionRecord, StoreError> {
        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO transactions (user_id, type, amount, category_id, description, transaction_date) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(user_id)
        .bind(new.kind)
        .bind(new.amount)
        .bind(new.category_id)
        .bind(&new.description)
        .bind(new.transaction_date)
        .fetch_one(&self.pool)
        .await?;

        self.fetch_record(user_id, id).await
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        new: NewTransaction,
    ) -> Result<TransactionRecord, StoreError> {
        let result = sqlx::query(
            "UPDATE transactions SET type = $1, amount = $2, category_id = $3, \
             description = $4, transaction_date = $5 WHERE id = $6 AND user_id = $7",
        )
        .bind(new.kind)
        .bind(new.amount)
        .bind(new.category_id)
        .bind(&new.description)
        .bind(new.transaction_date)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        self.fetch_record(user_id, id).await
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
