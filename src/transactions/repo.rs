use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Which ledger table an operation targets. Expense and Income rows share a
/// shape but live in separate tables and never reference each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Expense,
    Income,
}

impl TransactionKind {
    pub const fn table(self) -> &'static str {
        match self {
            Self::Expense => "expenses",
            Self::Income => "incomes",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub amount: Decimal,
    pub date: Date,
    pub category: String,
    pub description: String,
    pub created_at: OffsetDateTime,
}

/// Field set for PATCH; absent fields keep their stored values.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionChanges {
    pub amount: Option<Decimal>,
    pub date: Option<Date>,
    pub category: Option<String>,
    pub description: Option<String>,
}

const COLUMNS: &str = "id, user_id, amount, date, category, description, created_at";

pub async fn create(
    db: &PgPool,
    kind: TransactionKind,
    user_id: Uuid,
    amount: Decimal,
    date: Date,
    category: &str,
    description: &str,
) -> Result<Transaction, sqlx::Error> {
    let sql = format!(
        "INSERT INTO {} (user_id, amount, date, category, description)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {COLUMNS}",
        kind.table()
    );
    sqlx::query_as::<_, Transaction>(&sql)
        .bind(user_id)
        .bind(amount)
        .bind(date)
        .bind(category)
        .bind(description)
        .fetch_one(db)
        .await
}

pub async fn list(
    db: &PgPool,
    kind: TransactionKind,
    user_id: Uuid,
) -> Result<Vec<Transaction>, sqlx::Error> {
    let sql = format!(
        "SELECT {COLUMNS} FROM {} WHERE user_id = $1 ORDER BY date DESC, created_at DESC",
        kind.table()
    );
    sqlx::query_as::<_, Transaction>(&sql)
        .bind(user_id)
        .fetch_all(db)
        .await
}

/// `None` when the row is absent or owned by a different user; the two
/// cases are deliberately indistinguishable.
pub async fn find(
    db: &PgPool,
    kind: TransactionKind,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<Transaction>, sqlx::Error> {
    let sql = format!(
        "SELECT {COLUMNS} FROM {} WHERE id = $1 AND user_id = $2",
        kind.table()
    );
    sqlx::query_as::<_, Transaction>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
}

/// Single-statement partial update; the ownership check is part of the
/// WHERE clause, never a separate read.
pub async fn update(
    db: &PgPool,
    kind: TransactionKind,
    user_id: Uuid,
    id: Uuid,
    changes: &TransactionChanges,
) -> Result<Option<Transaction>, sqlx::Error> {
    let sql = format!(
        "UPDATE {} SET
            amount = COALESCE($3, amount),
            date = COALESCE($4, date),
            category = COALESCE($5, category),
            description = COALESCE($6, description)
         WHERE id = $1 AND user_id = $2
         RETURNING {COLUMNS}",
        kind.table()
    );
    sqlx::query_as::<_, Transaction>(&sql)
        .bind(id)
        .bind(user_id)
        .bind(changes.amount)
        .bind(changes.date)
        .bind(changes.category.as_deref())
        .bind(changes.description.as_deref())
        .fetch_optional(db)
        .await
}

/// True when a row was removed.
pub async fn delete(
    db: &PgPool,
    kind: TransactionKind,
    user_id: Uuid,
    id: Uuid,
) -> Result<bool, sqlx::Error> {
    let sql = format!("DELETE FROM {} WHERE id = $1 AND user_id = $2", kind.table());
    let result = sqlx::query(&sql).bind(id).bind(user_id).execute(db).await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use time::macros::date;

    #[test]
    fn kinds_map_to_their_tables() {
        assert_eq!(TransactionKind::Expense.table(), "expenses");
        assert_eq!(TransactionKind::Income.table(), "incomes");
    }

    #[test]
    fn transaction_serializes_without_owner() {
        let tx = Transaction {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            amount: dec!(50.00),
            date: date!(2024 - 03 - 05),
            category: "food".into(),
            description: "groceries".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&tx).unwrap();
        assert!(!json.contains("user_id"));
        assert!(json.contains("\"amount\":\"50.00\""));
        assert!(json.contains("\"date\":\"2024-03-05\""));
    }

    #[test]
    fn changes_deserialize_with_absent_fields() {
        let changes: TransactionChanges =
            serde_json::from_str(r#"{"category":"transport"}"#).unwrap();
        assert_eq!(changes.category.as_deref(), Some("transport"));
        assert!(changes.amount.is_none());
        assert!(changes.date.is_none());
        assert!(changes.description.is_none());
    }
}
