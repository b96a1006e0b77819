use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{self, SummaryQuery, TransactionPayload},
    repo::{self, Transaction, TransactionChanges, TransactionKind},
    summary::{self, MonthlySummary},
};
use crate::{
    auth::extractors::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/monthly_summary", get(expense_monthly_summary))
        .route(
            "/expenses/:id",
            get(get_expense)
                .put(put_expense)
                .patch(patch_expense)
                .delete(delete_expense),
        )
}

pub fn income_routes() -> Router<AppState> {
    Router::new()
        .route("/incomes", get(list_incomes).post(create_income))
        .route(
            "/incomes/:id",
            get(get_income)
                .put(put_income)
                .patch(patch_income)
                .delete(delete_income),
        )
}

// --- kind-agnostic handler bodies ---

async fn create_tx(
    state: &AppState,
    kind: TransactionKind,
    user_id: Uuid,
    payload: TransactionPayload,
) -> AppResult<(StatusCode, Json<Transaction>)> {
    dto::validate_payload(&payload)?;
    let tx = repo::create(
        &state.db,
        kind,
        user_id,
        payload.amount,
        payload.date,
        payload.category.trim(),
        &payload.description,
    )
    .await?;
    info!(id = %tx.id, "transaction created");
    Ok((StatusCode::CREATED, Json(tx)))
}

async fn list_tx(
    state: &AppState,
    kind: TransactionKind,
    user_id: Uuid,
) -> AppResult<Json<Vec<Transaction>>> {
    let rows = repo::list(&state.db, kind, user_id).await?;
    Ok(Json(rows))
}

async fn get_tx(
    state: &AppState,
    kind: TransactionKind,
    user_id: Uuid,
    id: Uuid,
) -> AppResult<Json<Transaction>> {
    let tx = repo::find(&state.db, kind, user_id, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(tx))
}

/// PUT replaces every mutable field.
async fn put_tx(
    state: &AppState,
    kind: TransactionKind,
    user_id: Uuid,
    id: Uuid,
    payload: TransactionPayload,
) -> AppResult<Json<Transaction>> {
    dto::validate_payload(&payload)?;
    let changes = TransactionChanges {
        amount: Some(payload.amount),
        date: Some(payload.date),
        category: Some(payload.category.trim().to_string()),
        description: Some(payload.description),
    };
    let tx = repo::update(&state.db, kind, user_id, id, &changes)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(tx))
}

/// PATCH keeps stored values for absent fields.
async fn patch_tx(
    state: &AppState,
    kind: TransactionKind,
    user_id: Uuid,
    id: Uuid,
    changes: TransactionChanges,
) -> AppResult<Json<Transaction>> {
    dto::validate_changes(&changes)?;
    let tx = repo::update(&state.db, kind, user_id, id, &changes)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(tx))
}

async fn delete_tx(
    state: &AppState,
    kind: TransactionKind,
    user_id: Uuid,
    id: Uuid,
) -> AppResult<StatusCode> {
    if !repo::delete(&state.db, kind, user_id, id).await? {
        return Err(AppError::NotFound);
    }
    info!(%id, "transaction deleted");
    Ok(StatusCode::NO_CONTENT)
}

// --- expense routes ---

#[instrument(skip(state, payload))]
pub async fn create_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<TransactionPayload>,
) -> AppResult<(StatusCode, Json<Transaction>)> {
    create_tx(&state, TransactionKind::Expense, user_id, payload).await
}

#[instrument(skip(state))]
pub async fn list_expenses(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<Transaction>>> {
    list_tx(&state, TransactionKind::Expense, user_id).await
}

#[instrument(skip(state))]
pub async fn get_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Transaction>> {
    get_tx(&state, TransactionKind::Expense, user_id, id).await
}

#[instrument(skip(state, payload))]
pub async fn put_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionPayload>,
) -> AppResult<Json<Transaction>> {
    put_tx(&state, TransactionKind::Expense, user_id, id, payload).await
}

#[instrument(skip(state, changes))]
pub async fn patch_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(changes): Json<TransactionChanges>,
) -> AppResult<Json<Transaction>> {
    patch_tx(&state, TransactionKind::Expense, user_id, id, changes).await
}

#[instrument(skip(state))]
pub async fn delete_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    delete_tx(&state, TransactionKind::Expense, user_id, id).await
}

/// Aggregates both ledgers even though it lives under /expenses.
#[instrument(skip(state))]
pub async fn expense_monthly_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<SummaryQuery>,
) -> AppResult<Json<MonthlySummary>> {
    let s = summary::monthly_summary(&state.db, user_id, q.month, q.year).await?;
    Ok(Json(s))
}

// --- income routes ---

#[instrument(skip(state, payload))]
pub async fn create_income(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<TransactionPayload>,
) -> AppResult<(StatusCode, Json<Transaction>)> {
    create_tx(&state, TransactionKind::Income, user_id, payload).await
}

#[instrument(skip(state))]
pub async fn list_incomes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<Transaction>>> {
    list_tx(&state, TransactionKind::Income, user_id).await
}

#[instrument(skip(state))]
pub async fn get_income(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Transaction>> {
    get_tx(&state, TransactionKind::Income, user_id, id).await
}

#[instrument(skip(state, payload))]
pub async fn put_income(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionPayload>,
) -> AppResult<Json<Transaction>> {
    put_tx(&state, TransactionKind::Income, user_id, id, payload).await
}

#[instrument(skip(state, changes))]
pub async fn patch_income(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(changes): Json<TransactionChanges>,
) -> AppResult<Json<Transaction>> {
    patch_tx(&state, TransactionKind::Income, user_id, id, changes).await
}

#[instrument(skip(state))]
pub async fn delete_income(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    delete_tx(&state, TransactionKind::Income, user_id, id).await
}
