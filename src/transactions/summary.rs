//! Monthly income/expense aggregation.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use time::{Date, Month, OffsetDateTime};
use uuid::Uuid;

use super::repo::TransactionKind;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct MonthlySummary {
    pub month: u8,
    pub year: i32,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
}

/// Half-open `[start, end)` date window covering one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub month: u8,
    pub year: i32,
    pub start: Date,
    pub end: Date,
}

/// Resolves the requested month/year against `today` (used for defaults)
/// and computes the window bounds.
pub fn month_window(
    month: Option<u8>,
    year: Option<i32>,
    today: Date,
) -> Result<MonthWindow, AppError> {
    let month = month.unwrap_or_else(|| u8::from(today.month()));
    let year = year.unwrap_or_else(|| today.year());

    let first = Month::try_from(month)
        .map_err(|_| AppError::validation("month", "must be between 1 and 12"))?;
    let start = Date::from_calendar_date(year, first, 1)
        .map_err(|_| AppError::validation("year", "out of range"))?;

    let (next_year, next_month) = match first {
        Month::December => (year + 1, Month::January),
        m => (year, m.next()),
    };
    let end = Date::from_calendar_date(next_year, next_month, 1)
        .map_err(|_| AppError::validation("year", "out of range"))?;

    Ok(MonthWindow {
        month,
        year,
        start,
        end,
    })
}

/// Server-local calendar date; falls back to UTC when the local offset
/// cannot be determined.
fn today_local() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

async fn sum_in_window(
    db: &PgPool,
    kind: TransactionKind,
    user_id: Uuid,
    window: &MonthWindow,
) -> Result<Decimal, sqlx::Error> {
    let sql = format!(
        "SELECT COALESCE(SUM(amount), 0)
         FROM {}
         WHERE user_id = $1 AND date >= $2 AND date < $3",
        kind.table()
    );
    sqlx::query_scalar::<_, Decimal>(&sql)
        .bind(user_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_one(db)
        .await
}

/// Sums the user's income and expenses for the month. A month with no
/// records yields zero totals, not an error.
pub async fn monthly_summary(
    db: &PgPool,
    user_id: Uuid,
    month: Option<u8>,
    year: Option<i32>,
) -> AppResult<MonthlySummary> {
    let window = month_window(month, year, today_local())?;

    let total_income = sum_in_window(db, TransactionKind::Income, user_id, &window).await?;
    let total_expenses = sum_in_window(db, TransactionKind::Expense, user_id, &window).await?;

    Ok(MonthlySummary {
        month: window.month,
        year: window.year,
        balance: total_income - total_expenses,
        total_income,
        total_expenses,
    })
}
