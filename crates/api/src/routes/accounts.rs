//! Account management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    routes::{error_response, missing_field},
};
use derrick_db::entities::{accounts, sea_orm_active_enums::AccountStatus};
use derrick_db::repositories::account::{
    AccountFilter, AccountRepository, BalanceFilter, CreateAccountInput, UpdateAccountInput,
};
use derrick_shared::AppError;

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts", post(create_account))
        .route("/accounts/total-balance", get(total_balance))
        .route("/accounts/{account_id}", get(get_account))
        .route("/accounts/{account_id}", put(update_account))
        .route("/accounts/{account_id}", delete(delete_account))
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Account name.
    pub name: Option<String>,
    /// Account classification (e.g. checking, savings).
    pub account_type: Option<String>,
    /// Account number at the institution.
    pub account_number: Option<String>,
    /// Lifecycle status: active or inactive.
    pub status: Option<String>,
    /// Balance; may be negative.
    pub balance: Option<Decimal>,
    /// Institution name.
    pub bank_name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
}

/// Request body for updating an account.
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    /// Account name.
    pub name: Option<String>,
    /// Account classification.
    pub account_type: Option<String>,
    /// Account number.
    pub account_number: Option<String>,
    /// Lifecycle status: active or inactive.
    pub status: Option<String>,
    /// Balance.
    pub balance: Option<Decimal>,
    /// Institution name.
    pub bank_name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
}

/// Query parameters for listing accounts.
#[derive(Debug, Deserialize)]
pub struct ListAccountsQuery {
    /// Filter by account classification.
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    /// Filter by institution name.
    pub bank: Option<String>,
    /// Filter by lifecycle status.
    pub status: Option<String>,
}

/// Query parameters for the balance aggregate.
#[derive(Debug, Deserialize)]
pub struct TotalBalanceQuery {
    /// Restrict to one account classification.
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    /// Restrict to one institution.
    pub bank: Option<String>,
}

fn account_json(account: &accounts::Model) -> Value {
    json!({
        "id": account.id,
        "name": account.name,
        "account_type": account.account_type,
        "account_number": account.account_number,
        "status": account_status_to_string(account.status),
        "balance": account.balance.to_string(),
        "bank_name": account.bank_name,
        "description": account.description,
        "created_at": account.created_at.to_rfc3339(),
        "updated_at": account.updated_at.to_rfc3339()
    })
}

/// GET `/accounts` - List accounts with optional type/bank/status filters.
async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<ListAccountsQuery>,
) -> Response {
    let status = match query.status.as_deref() {
        Some(s) => match string_to_account_status(s) {
            Some(status) => Some(status),
            None => return invalid_status(),
        },
        None => None,
    };

    let repo = AccountRepository::new((*state.db).clone());
    let filter = AccountFilter {
        account_type: query.account_type,
        bank_name: query.bank,
        status,
    };

    match repo.list_accounts(filter).await {
        Ok(accounts) => {
            let accounts: Vec<Value> = accounts.iter().map(account_json).collect();
            (StatusCode::OK, Json(json!({ "accounts": accounts }))).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// GET `/accounts/{account_id}` - Get account detail.
async fn get_account(State(state): State<AppState>, Path(account_id): Path<Uuid>) -> Response {
    let repo = AccountRepository::new((*state.db).clone());

    match repo.find_account_by_id(account_id).await {
        Ok(Some(account)) => (StatusCode::OK, Json(account_json(&account))).into_response(),
        Ok(None) => error_response(AppError::NotFound("Account not found".to_string())),
        Err(e) => error_response(e.into()),
    }
}

/// POST `/accounts` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<CreateAccountRequest>,
) -> Response {
    let Some(name) = payload.name else {
        return missing_field("name");
    };
    let Some(account_type) = payload.account_type else {
        return missing_field("account_type");
    };
    let Some(account_number) = payload.account_number else {
        return missing_field("account_number");
    };
    let Some(status) = payload.status else {
        return missing_field("status");
    };
    let Some(balance) = payload.balance else {
        return missing_field("balance");
    };

    let Some(status) = string_to_account_status(&status) else {
        return invalid_status();
    };

    let repo = AccountRepository::new((*state.db).clone());
    let input = CreateAccountInput {
        name,
        account_type,
        account_number,
        status,
        balance,
        bank_name: payload.bank_name,
        description: payload.description,
    };

    match repo.create_account(input).await {
        Ok(account) => {
            info!(account_id = %account.id, name = %account.name, "Account created");
            (StatusCode::CREATED, Json(account_json(&account))).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// PUT `/accounts/{account_id}` - Update an account.
async fn update_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<UpdateAccountRequest>,
) -> Response {
    let status = match payload.status.as_deref() {
        Some(s) => match string_to_account_status(s) {
            Some(status) => Some(status),
            None => return invalid_status(),
        },
        None => None,
    };

    let repo = AccountRepository::new((*state.db).clone());
    let input = UpdateAccountInput {
        name: payload.name,
        account_type: payload.account_type,
        account_number: payload.account_number,
        status,
        balance: payload.balance,
        bank_name: payload.bank_name.map(Some),
        description: payload.description.map(Some),
    };

    match repo.update_account(account_id, input).await {
        Ok(account) => {
            info!(account_id = %account.id, "Account updated");
            (StatusCode::OK, Json(account_json(&account))).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// DELETE `/accounts/{account_id}` - Delete an account.
async fn delete_account(State(state): State<AppState>, Path(account_id): Path<Uuid>) -> Response {
    let repo = AccountRepository::new((*state.db).clone());

    match repo.delete_account(account_id).await {
        Ok(()) => {
            info!(account_id = %account_id, "Account deleted");
            (
                StatusCode::OK,
                Json(json!({ "message": "Account deleted successfully" })),
            )
                .into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// GET `/accounts/total-balance` - Sum balances, optionally filtered.
async fn total_balance(
    State(state): State<AppState>,
    Query(query): Query<TotalBalanceQuery>,
) -> Response {
    let repo = AccountRepository::new((*state.db).clone());
    let filter = BalanceFilter {
        account_type: query.account_type.clone(),
        bank_name: query.bank.clone(),
    };

    match repo.total_balance(filter).await {
        Ok(total) => (
            StatusCode::OK,
            Json(json!({
                "account_type": query.account_type,
                "bank_name": query.bank,
                "total_balance": total.to_string()
            })),
        )
            .into_response(),
        Err(e) => error_response(e.into()),
    }
}

// Helper functions

fn invalid_status() -> Response {
    error_response(AppError::Validation(
        "Status must be either 'active' or 'inactive'".to_string(),
    ))
}

fn account_status_to_string(status: AccountStatus) -> &'static str {
    match status {
        AccountStatus::Active => "active",
        AccountStatus::Inactive => "inactive",
    }
}

fn string_to_account_status(s: &str) -> Option<AccountStatus> {
    match s.to_lowercase().as_str() {
        "active" => Some(AccountStatus::Active),
        "inactive" => Some(AccountStatus::Inactive),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing_round_trips() {
        for status in [AccountStatus::Active, AccountStatus::Inactive] {
            let s = account_status_to_string(status);
            assert_eq!(string_to_account_status(s), Some(status));
        }
    }

    #[test]
    fn test_status_parsing_is_case_insensitive() {
        assert_eq!(
            string_to_account_status("ACTIVE"),
            Some(AccountStatus::Active)
        );
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert_eq!(string_to_account_status("frozen"), None);
    }
}
