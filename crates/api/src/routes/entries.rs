//! Entry (ledger grouping) routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    routes::{error_response, incomplete_date_range, missing_field},
};
use derrick_db::entities::sea_orm_active_enums::{EntryStatus, EntryType};
use derrick_db::repositories::entry::{
    CreateEntryInput, EntryFilter, EntryRepository, EntryWithTransactionIds,
    EntryWithTransactions, UpdateEntryInput,
};
use derrick_shared::AppError;

/// Creates the entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/entries", get(list_entries))
        .route("/entries", post(create_entry))
        .route("/entries/{entry_id}", get(get_entry))
        .route("/entries/{entry_id}", put(update_entry))
        .route("/entries/{entry_id}", delete(delete_entry))
        .route(
            "/entries/{entry_id}/transactions/{transaction_id}",
            post(add_transaction),
        )
        .route(
            "/entries/{entry_id}/transactions/{transaction_id}",
            delete(remove_transaction),
        )
}

/// Request body for creating an entry.
#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    /// Entry title.
    pub title: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Transactions grouped by this entry.
    pub transaction_ids: Option<Vec<Uuid>>,
    /// Date of the entry.
    pub entry_date: Option<NaiveDate>,
    /// Reporting period kind: monthly, quarterly, annual, or custom.
    pub entry_type: Option<String>,
    /// Review status: draft, submitted, approved, or rejected.
    pub status: Option<String>,
    /// Whether the entry has been posted (default: false).
    pub posted: Option<bool>,
}

/// Request body for updating an entry.
#[derive(Debug, Deserialize)]
pub struct UpdateEntryRequest {
    /// Entry title.
    pub title: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Replacement transaction set.
    pub transaction_ids: Option<Vec<Uuid>>,
    /// Date of the entry.
    pub entry_date: Option<NaiveDate>,
    /// Reporting period kind.
    pub entry_type: Option<String>,
    /// Review status.
    pub status: Option<String>,
    /// Whether the entry has been posted.
    pub posted: Option<bool>,
}

/// Query parameters for listing entries.
#[derive(Debug, Deserialize)]
pub struct ListEntriesQuery {
    /// Filter by reporting period kind.
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    /// Filter by review status.
    pub status: Option<String>,
    /// Start of the entry-date range (inclusive).
    pub start_date: Option<NaiveDate>,
    /// End of the entry-date range (inclusive).
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive substring match on the title.
    pub title: Option<String>,
}

/// Query parameters for fetching one entry.
#[derive(Debug, Deserialize)]
pub struct GetEntryQuery {
    /// Embed the grouped transactions in the response.
    #[serde(default)]
    pub include_transactions: bool,
}

fn entry_json(entry: &EntryWithTransactionIds) -> Value {
    json!({
        "id": entry.entry.id,
        "title": entry.entry.title,
        "description": entry.entry.description,
        "transaction_ids": entry.transaction_ids,
        "entry_date": entry.entry.entry_date.to_string(),
        "entry_type": entry_type_to_string(entry.entry.entry_type),
        "status": entry_status_to_string(entry.entry.status),
        "posted": entry.entry.posted,
        "created_at": entry.entry.created_at.to_rfc3339(),
        "updated_at": entry.entry.updated_at.to_rfc3339()
    })
}

fn entry_with_transactions_json(entry: &EntryWithTransactions) -> Value {
    json!({
        "id": entry.entry.id,
        "title": entry.entry.title,
        "description": entry.entry.description,
        "entry_date": entry.entry.entry_date.to_string(),
        "entry_type": entry_type_to_string(entry.entry.entry_type),
        "status": entry_status_to_string(entry.entry.status),
        "posted": entry.entry.posted,
        "transactions": entry
            .transactions
            .iter()
            .map(|t| json!({
                "id": t.id,
                "gross_amount": t.gross_amount.to_string(),
                "date": t.date.to_string(),
                "property_id": t.property_id,
                "company_from_id": t.company_from_id,
                "company_to_id": t.company_to_id
            }))
            .collect::<Vec<Value>>(),
        "created_at": entry.entry.created_at.to_rfc3339(),
        "updated_at": entry.entry.updated_at.to_rfc3339()
    })
}

/// GET `/entries` - List entries matching the filters.
async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<ListEntriesQuery>,
) -> Response {
    if query.start_date.is_some() != query.end_date.is_some() {
        return incomplete_date_range();
    }

    let entry_type = match query.entry_type.as_deref() {
        Some(s) => match string_to_entry_type(s) {
            Some(entry_type) => Some(entry_type),
            None => return invalid_entry_type(),
        },
        None => None,
    };

    let status = match query.status.as_deref() {
        Some(s) => match string_to_entry_status(s) {
            Some(status) => Some(status),
            None => return invalid_status(),
        },
        None => None,
    };

    let repo = EntryRepository::new((*state.db).clone());
    let filter = EntryFilter {
        entry_type,
        status,
        date_from: query.start_date,
        date_to: query.end_date,
        title_contains: query.title,
    };

    match repo.list_entries(filter).await {
        Ok(entries) => {
            let entries: Vec<Value> = entries.iter().map(entry_json).collect();
            (StatusCode::OK, Json(json!({ "entries": entries }))).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// GET `/entries/{entry_id}` - Get entry detail, optionally with its
/// transactions embedded.
async fn get_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<Uuid>,
    Query(query): Query<GetEntryQuery>,
) -> Response {
    let repo = EntryRepository::new((*state.db).clone());

    if query.include_transactions {
        return match repo.find_entry_with_transactions(entry_id).await {
            Ok(Some(entry)) => {
                (StatusCode::OK, Json(entry_with_transactions_json(&entry))).into_response()
            }
            Ok(None) => error_response(AppError::NotFound("Entry not found".to_string())),
            Err(e) => error_response(e.into()),
        };
    }

    match repo.find_entry_by_id(entry_id).await {
        Ok(Some(entry)) => (StatusCode::OK, Json(entry_json(&entry))).into_response(),
        Ok(None) => error_response(AppError::NotFound("Entry not found".to_string())),
        Err(e) => error_response(e.into()),
    }
}

/// POST `/entries` - Create an entry.
async fn create_entry(
    State(state): State<AppState>,
    Json(payload): Json<CreateEntryRequest>,
) -> Response {
    let Some(title) = payload.title else {
        return missing_field("title");
    };
    let Some(transaction_ids) = payload.transaction_ids else {
        return missing_field("transaction_ids");
    };
    let Some(entry_date) = payload.entry_date else {
        return missing_field("entry_date");
    };
    let Some(entry_type) = payload.entry_type else {
        return missing_field("entry_type");
    };
    let Some(status) = payload.status else {
        return missing_field("status");
    };

    let Some(entry_type) = string_to_entry_type(&entry_type) else {
        return invalid_entry_type();
    };
    let Some(status) = string_to_entry_status(&status) else {
        return invalid_status();
    };

    let repo = EntryRepository::new((*state.db).clone());
    let input = CreateEntryInput {
        title,
        description: payload.description,
        transaction_ids,
        entry_date,
        entry_type,
        status,
        posted: payload.posted.unwrap_or(false),
    };

    match repo.create_entry(input).await {
        Ok(entry) => {
            info!(entry_id = %entry.entry.id, title = %entry.entry.title, "Entry created");
            (StatusCode::CREATED, Json(entry_json(&entry))).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// PUT `/entries/{entry_id}` - Update an entry; a supplied transaction list
/// replaces the set.
async fn update_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<Uuid>,
    Json(payload): Json<UpdateEntryRequest>,
) -> Response {
    let entry_type = match payload.entry_type.as_deref() {
        Some(s) => match string_to_entry_type(s) {
            Some(entry_type) => Some(entry_type),
            None => return invalid_entry_type(),
        },
        None => None,
    };

    let status = match payload.status.as_deref() {
        Some(s) => match string_to_entry_status(s) {
            Some(status) => Some(status),
            None => return invalid_status(),
        },
        None => None,
    };

    let repo = EntryRepository::new((*state.db).clone());
    let input = UpdateEntryInput {
        title: payload.title,
        description: payload.description.map(Some),
        transaction_ids: payload.transaction_ids,
        entry_date: payload.entry_date,
        entry_type,
        status,
        posted: payload.posted,
    };

    match repo.update_entry(entry_id, input).await {
        Ok(entry) => {
            info!(entry_id = %entry.entry.id, "Entry updated");
            (StatusCode::OK, Json(entry_json(&entry))).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// DELETE `/entries/{entry_id}` - Delete an entry.
async fn delete_entry(State(state): State<AppState>, Path(entry_id): Path<Uuid>) -> Response {
    let repo = EntryRepository::new((*state.db).clone());

    match repo.delete_entry(entry_id).await {
        Ok(()) => {
            info!(entry_id = %entry_id, "Entry deleted");
            (
                StatusCode::OK,
                Json(json!({ "message": "Entry deleted successfully" })),
            )
                .into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// POST `/entries/{entry_id}/transactions/{transaction_id}` - Add a
/// transaction to the entry's set.
///
/// Adding a transaction that is already grouped is a no-op.
async fn add_transaction(
    State(state): State<AppState>,
    Path((entry_id, transaction_id)): Path<(Uuid, Uuid)>,
) -> Response {
    let repo = EntryRepository::new((*state.db).clone());

    match repo.add_transaction(entry_id, transaction_id).await {
        Ok(modified) => {
            info!(
                entry_id = %entry_id,
                transaction_id = %transaction_id,
                modified,
                "Transaction added to entry"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "message": "Transaction added to entry successfully",
                    "modified": modified
                })),
            )
                .into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// DELETE `/entries/{entry_id}/transactions/{transaction_id}` - Remove a
/// transaction from the entry's set.
///
/// Removing an absent transaction is a no-op.
async fn remove_transaction(
    State(state): State<AppState>,
    Path((entry_id, transaction_id)): Path<(Uuid, Uuid)>,
) -> Response {
    let repo = EntryRepository::new((*state.db).clone());

    match repo.remove_transaction(entry_id, transaction_id).await {
        Ok(modified) => {
            info!(
                entry_id = %entry_id,
                transaction_id = %transaction_id,
                modified,
                "Transaction removed from entry"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "message": "Transaction removed from entry successfully",
                    "modified": modified
                })),
            )
                .into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

// Helper functions

fn invalid_entry_type() -> Response {
    error_response(AppError::Validation(
        "Invalid entry_type. Must be one of: monthly, quarterly, annual, custom".to_string(),
    ))
}

fn invalid_status() -> Response {
    error_response(AppError::Validation(
        "Invalid status. Must be one of: draft, submitted, approved, rejected".to_string(),
    ))
}

fn entry_type_to_string(entry_type: EntryType) -> &'static str {
    match entry_type {
        EntryType::Monthly => "monthly",
        EntryType::Quarterly => "quarterly",
        EntryType::Annual => "annual",
        EntryType::Custom => "custom",
    }
}

fn string_to_entry_type(s: &str) -> Option<EntryType> {
    match s.to_lowercase().as_str() {
        "monthly" => Some(EntryType::Monthly),
        "quarterly" => Some(EntryType::Quarterly),
        "annual" => Some(EntryType::Annual),
        "custom" => Some(EntryType::Custom),
        _ => None,
    }
}

fn entry_status_to_string(status: EntryStatus) -> &'static str {
    match status {
        EntryStatus::Draft => "draft",
        EntryStatus::Submitted => "submitted",
        EntryStatus::Approved => "approved",
        EntryStatus::Rejected => "rejected",
    }
}

fn string_to_entry_status(s: &str) -> Option<EntryStatus> {
    match s.to_lowercase().as_str() {
        "draft" => Some(EntryStatus::Draft),
        "submitted" => Some(EntryStatus::Submitted),
        "approved" => Some(EntryStatus::Approved),
        "rejected" => Some(EntryStatus::Rejected),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_parsing_round_trips() {
        for entry_type in [
            EntryType::Monthly,
            EntryType::Quarterly,
            EntryType::Annual,
            EntryType::Custom,
        ] {
            let s = entry_type_to_string(entry_type);
            assert_eq!(string_to_entry_type(s), Some(entry_type));
        }
    }

    #[test]
    fn test_entry_status_parsing_round_trips() {
        for status in [
            EntryStatus::Draft,
            EntryStatus::Submitted,
            EntryStatus::Approved,
            EntryStatus::Rejected,
        ] {
            let s = entry_status_to_string(status);
            assert_eq!(string_to_entry_status(s), Some(status));
        }
    }

    #[test]
    fn test_bogus_status_rejected() {
        assert_eq!(string_to_entry_status("bogus"), None);
        assert_eq!(string_to_entry_type("biweekly"), None);
    }
}
