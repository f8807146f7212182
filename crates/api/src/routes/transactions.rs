//! Transaction management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    routes::{error_response, incomplete_date_range, missing_field},
};
use derrick_core::transaction::AmountField;
use derrick_db::entities::transactions;
use derrick_db::repositories::transaction::{
    CompanyDirection, CreateTransactionInput, TransactionFilter, TransactionRepository,
    UpdateTransactionInput,
};
use derrick_shared::AppError;

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions))
        .route("/transactions", post(create_transaction))
        .route("/transactions/{transaction_id}", get(get_transaction))
        .route("/transactions/{transaction_id}", put(update_transaction))
        .route("/transactions/{transaction_id}", delete(delete_transaction))
        .route(
            "/properties/{property_id}/transactions/total",
            get(total_for_property),
        )
}

/// Request body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Gross amount before deductions.
    pub gross_amount: Option<Decimal>,
    /// Net amount after deductions.
    pub net_amount: Option<Decimal>,
    /// Amount paid in taxes.
    pub taxes_paid_amount: Option<Decimal>,
    /// Transaction date.
    pub date: Option<NaiveDate>,
    /// Property the transaction is against.
    pub property_id: Option<Uuid>,
    /// Paying company.
    pub company_from_id: Option<Uuid>,
    /// Receiving company.
    pub company_to_id: Option<Uuid>,
    /// Type of merchandise involved.
    pub merchandise_type: Option<String>,
    /// Quantity of merchandise transacted.
    pub amount_of_merch_transacted: Option<Decimal>,
    /// Barrels of oil involved.
    pub barrels_of_oil: Option<Decimal>,
    /// Service provided.
    pub service: Option<String>,
}

/// Request body for updating a transaction.
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    /// Gross amount.
    pub gross_amount: Option<Decimal>,
    /// Net amount.
    pub net_amount: Option<Decimal>,
    /// Taxes paid.
    pub taxes_paid_amount: Option<Decimal>,
    /// Transaction date.
    pub date: Option<NaiveDate>,
    /// Property reference.
    pub property_id: Option<Uuid>,
    /// Paying company reference.
    pub company_from_id: Option<Uuid>,
    /// Receiving company reference.
    pub company_to_id: Option<Uuid>,
    /// Merchandise type.
    pub merchandise_type: Option<String>,
    /// Merchandise quantity.
    pub amount_of_merch_transacted: Option<Decimal>,
    /// Barrels of oil.
    pub barrels_of_oil: Option<Decimal>,
    /// Service provided.
    pub service: Option<String>,
}

/// Query parameters for listing transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Filter by property.
    pub property_id: Option<Uuid>,
    /// Filter by company.
    pub company_id: Option<Uuid>,
    /// Side the company filter applies to: from, to, or both.
    pub direction: Option<String>,
    /// Start of the date range (inclusive).
    pub start_date: Option<NaiveDate>,
    /// End of the date range (inclusive).
    pub end_date: Option<NaiveDate>,
    /// Filter by merchandise type.
    pub merchandise_type: Option<String>,
    /// Lower bound of the amount range (inclusive).
    pub min_amount: Option<Decimal>,
    /// Upper bound of the amount range (inclusive).
    pub max_amount: Option<Decimal>,
    /// Amount field the range applies to.
    pub amount_field: Option<String>,
}

/// Query parameters for the per-property amount aggregate.
#[derive(Debug, Deserialize)]
pub struct TotalAmountQuery {
    /// Amount field to sum.
    pub amount_field: Option<String>,
}

fn transaction_json(transaction: &transactions::Model) -> Value {
    json!({
        "id": transaction.id,
        "gross_amount": transaction.gross_amount.to_string(),
        "net_amount": transaction.net_amount.map(|a| a.to_string()),
        "taxes_paid_amount": transaction.taxes_paid_amount.map(|a| a.to_string()),
        "date": transaction.date.to_string(),
        "property_id": transaction.property_id,
        "company_from_id": transaction.company_from_id,
        "company_to_id": transaction.company_to_id,
        "merchandise_type": transaction.merchandise_type,
        "amount_of_merch_transacted": transaction.amount_of_merch_transacted.map(|a| a.to_string()),
        "barrels_of_oil": transaction.barrels_of_oil.map(|a| a.to_string()),
        "service": transaction.service,
        "created_at": transaction.created_at.to_rfc3339(),
        "updated_at": transaction.updated_at.to_rfc3339()
    })
}

/// GET `/transactions` - List transactions matching the filters.
async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<ListTransactionsQuery>,
) -> Response {
    if query.start_date.is_some() != query.end_date.is_some() {
        return incomplete_date_range();
    }

    let direction = match query.direction.as_deref() {
        Some(s) => match CompanyDirection::parse(s) {
            Some(direction) => direction,
            None => return invalid_direction(),
        },
        None => CompanyDirection::Both,
    };

    let amount_field = match query.amount_field.as_deref() {
        Some(s) => match AmountField::parse(s) {
            Some(field) => field,
            None => return invalid_amount_field(),
        },
        None => AmountField::Gross,
    };

    let repo = TransactionRepository::new((*state.db).clone());
    let filter = TransactionFilter {
        property_id: query.property_id,
        company_id: query.company_id,
        direction,
        date_from: query.start_date,
        date_to: query.end_date,
        merchandise_type: query.merchandise_type,
        min_amount: query.min_amount,
        max_amount: query.max_amount,
        amount_field,
    };

    match repo.list_transactions(filter).await {
        Ok(transactions) => {
            let transactions: Vec<Value> = transactions.iter().map(transaction_json).collect();
            (
                StatusCode::OK,
                Json(json!({ "transactions": transactions })),
            )
                .into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// GET `/transactions/{transaction_id}` - Get transaction detail.
async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> Response {
    let repo = TransactionRepository::new((*state.db).clone());

    match repo.find_transaction_by_id(transaction_id).await {
        Ok(Some(transaction)) => {
            (StatusCode::OK, Json(transaction_json(&transaction))).into_response()
        }
        Ok(None) => error_response(AppError::NotFound("Transaction not found".to_string())),
        Err(e) => error_response(e.into()),
    }
}

/// POST `/transactions` - Create a transaction.
async fn create_transaction(
    State(state): State<AppState>,
    Json(payload): Json<CreateTransactionRequest>,
) -> Response {
    let Some(gross_amount) = payload.gross_amount else {
        return missing_field("gross_amount");
    };
    let Some(date) = payload.date else {
        return missing_field("date");
    };
    let Some(property_id) = payload.property_id else {
        return missing_field("property_id");
    };
    let Some(company_from_id) = payload.company_from_id else {
        return missing_field("company_from_id");
    };
    let Some(company_to_id) = payload.company_to_id else {
        return missing_field("company_to_id");
    };

    let repo = TransactionRepository::new((*state.db).clone());
    let input = CreateTransactionInput {
        gross_amount,
        net_amount: payload.net_amount,
        taxes_paid_amount: payload.taxes_paid_amount,
        date,
        property_id,
        company_from_id,
        company_to_id,
        merchandise_type: payload.merchandise_type,
        amount_of_merch_transacted: payload.amount_of_merch_transacted,
        barrels_of_oil: payload.barrels_of_oil,
        service: payload.service,
    };

    match repo.create_transaction(input).await {
        Ok(transaction) => {
            info!(
                transaction_id = %transaction.id,
                property_id = %transaction.property_id,
                "Transaction created"
            );
            (StatusCode::CREATED, Json(transaction_json(&transaction))).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// PUT `/transactions/{transaction_id}` - Update a transaction.
async fn update_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> Response {
    let repo = TransactionRepository::new((*state.db).clone());
    let input = UpdateTransactionInput {
        gross_amount: payload.gross_amount,
        net_amount: payload.net_amount.map(Some),
        taxes_paid_amount: payload.taxes_paid_amount.map(Some),
        date: payload.date,
        property_id: payload.property_id,
        company_from_id: payload.company_from_id,
        company_to_id: payload.company_to_id,
        merchandise_type: payload.merchandise_type.map(Some),
        amount_of_merch_transacted: payload.amount_of_merch_transacted.map(Some),
        barrels_of_oil: payload.barrels_of_oil.map(Some),
        service: payload.service.map(Some),
    };

    match repo.update_transaction(transaction_id, input).await {
        Ok(transaction) => {
            info!(transaction_id = %transaction.id, "Transaction updated");
            (StatusCode::OK, Json(transaction_json(&transaction))).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// DELETE `/transactions/{transaction_id}` - Delete a transaction.
///
/// Entry membership rows cascade with the transaction.
async fn delete_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> Response {
    let repo = TransactionRepository::new((*state.db).clone());

    match repo.delete_transaction(transaction_id).await {
        Ok(()) => {
            info!(transaction_id = %transaction_id, "Transaction deleted");
            (
                StatusCode::OK,
                Json(json!({ "message": "Transaction deleted successfully" })),
            )
                .into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// GET `/properties/{property_id}/transactions/total` - Sum an amount field
/// across a property's transactions.
async fn total_for_property(
    State(state): State<AppState>,
    Path(property_id): Path<Uuid>,
    Query(query): Query<TotalAmountQuery>,
) -> Response {
    let amount_field = match query.amount_field.as_deref() {
        Some(s) => match AmountField::parse(s) {
            Some(field) => field,
            None => return invalid_amount_field(),
        },
        None => AmountField::Gross,
    };

    let repo = TransactionRepository::new((*state.db).clone());

    match repo.total_for_property(property_id, amount_field).await {
        Ok(total) => (
            StatusCode::OK,
            Json(json!({
                "property_id": property_id,
                "amount_field": amount_field.as_str(),
                "total": total.to_string()
            })),
        )
            .into_response(),
        Err(e) => error_response(e.into()),
    }
}

// Helper functions

fn invalid_amount_field() -> Response {
    error_response(AppError::Validation(format!(
        "Amount type must be one of: {}",
        AmountField::VALID_NAMES.join(", ")
    )))
}

fn invalid_direction() -> Response {
    error_response(AppError::Validation(
        "Direction must be one of: from, to, both".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_field_names_listed_in_error() {
        let message = format!(
            "Amount type must be one of: {}",
            AmountField::VALID_NAMES.join(", ")
        );
        assert_eq!(
            message,
            "Amount type must be one of: gross_amount, net_amount, taxes_paid_amount"
        );
    }
}
