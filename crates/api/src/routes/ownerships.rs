//! Company ownership routes.

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
use derrick_db::entities::{company_ownerships, sea_orm_active_enums::InterestType};
use derrick_db::repositories::ownership::{
    CreateOwnershipInput, OwnershipFilter, OwnershipRepository, UpdateOwnershipInput,
};
use derrick_shared::AppError;

/// Creates the ownership routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ownerships", get(list_ownerships))
        .route("/ownerships", post(create_ownership))
        .route("/ownerships/{ownership_id}", get(get_ownership))
        .route("/ownerships/{ownership_id}", put(update_ownership))
        .route("/ownerships/{ownership_id}", delete(delete_ownership))
        .route(
            "/properties/{property_id}/ownerships/total-percentage",
            get(total_percentage_for_property),
        )
}

/// Request body for creating an ownership record.
#[derive(Debug, Deserialize)]
pub struct CreateOwnershipRequest {
    /// The property being held.
    pub property_id: Option<Uuid>,
    /// The company holding the interest.
    pub company_id: Option<Uuid>,
    /// Percentage held, in [0, 100].
    pub percentage: Option<Decimal>,
    /// Interest type: working or royalty.
    pub interest_type: Option<String>,
    /// Type of well.
    pub well_type: Option<String>,
    /// Whether this is the present-day holding (default: true).
    pub is_current_owner: Option<bool>,
    /// Date the ownership began.
    pub date_from: Option<NaiveDate>,
    /// Date the ownership ended; forbidden for current holdings.
    pub date_to: Option<NaiveDate>,
}

/// Request body for updating an ownership record.
#[derive(Debug, Deserialize)]
pub struct UpdateOwnershipRequest {
    /// Property reference.
    pub property_id: Option<Uuid>,
    /// Company reference.
    pub company_id: Option<Uuid>,
    /// Percentage held.
    pub percentage: Option<Decimal>,
    /// Interest type: working or royalty.
    pub interest_type: Option<String>,
    /// Type of well.
    pub well_type: Option<String>,
    /// Whether this is the present-day holding.
    pub is_current_owner: Option<bool>,
    /// Date the ownership began.
    pub date_from: Option<NaiveDate>,
    /// Date the ownership ended. Supply `null` explicitly to clear it when
    /// flipping a record back to current.
    #[serde(default, deserialize_with = "deserialize_explicit_null")]
    pub date_to: Option<Option<NaiveDate>>,
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`); pair with `#[serde(default)]`.
fn deserialize_explicit_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

/// Query parameters for listing ownership records.
#[derive(Debug, Deserialize)]
pub struct ListOwnershipsQuery {
    /// Filter by property.
    pub property_id: Option<Uuid>,
    /// Filter by company.
    pub company_id: Option<Uuid>,
    /// Filter by interest type.
    pub interest_type: Option<String>,
    /// Filter by well type.
    pub well_type: Option<String>,
    /// Lower bound of the percentage range (inclusive).
    pub min_percentage: Option<Decimal>,
    /// Upper bound of the percentage range (inclusive).
    pub max_percentage: Option<Decimal>,
    /// Filter by current/historical state.
    pub current: Option<bool>,
    /// Start of the overlap window (inclusive).
    pub start_date: Option<NaiveDate>,
    /// End of the overlap window (inclusive).
    pub end_date: Option<NaiveDate>,
}

fn ownership_json(ownership: &company_ownerships::Model) -> Value {
    json!({
        "id": ownership.id,
        "property_id": ownership.property_id,
        "company_id": ownership.company_id,
        "percentage": ownership.percentage.to_string(),
        "interest_type": interest_type_to_string(ownership.interest_type),
        "well_type": ownership.well_type,
        "is_current_owner": ownership.is_current_owner,
        "date_from": ownership.date_from.to_string(),
        "date_to": ownership.date_to.map(|d| d.to_string()),
        "created_at": ownership.created_at.to_rfc3339(),
        "updated_at": ownership.updated_at.to_rfc3339()
    })
}

/// GET `/ownerships` - List ownership records matching the filters.
///
/// With `start_date` and `end_date` set, selects the records whose window
/// overlaps the range: current ownerships that began on or before the end,
/// union historical ownerships overlapping the interval.
async fn list_ownerships(
    State(state): State<AppState>,
    Query(query): Query<ListOwnershipsQuery>,
) -> Response {
    if query.start_date.is_some() != query.end_date.is_some() {
        return incomplete_date_range();
    }

    let repo = OwnershipRepository::new((*state.db).clone());

    if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
        return match repo.list_in_date_range(start, end).await {
            Ok(ownerships) => {
                let ownerships: Vec<Value> = ownerships.iter().map(ownership_json).collect();
                (StatusCode::OK, Json(json!({ "ownerships": ownerships }))).into_response()
            }
            Err(e) => error_response(e.into()),
        };
    }

    let interest_type = match query.interest_type.as_deref() {
        Some(s) => match string_to_interest_type(s) {
            Some(interest_type) => Some(interest_type),
            None => return invalid_interest_type(),
        },
        None => None,
    };

    let filter = OwnershipFilter {
        property_id: query.property_id,
        company_id: query.company_id,
        interest_type,
        well_type: query.well_type,
        min_percentage: query.min_percentage,
        max_percentage: query.max_percentage,
        is_current_owner: query.current,
    };

    match repo.list_ownerships(filter).await {
        Ok(ownerships) => {
            let ownerships: Vec<Value> = ownerships.iter().map(ownership_json).collect();
            (StatusCode::OK, Json(json!({ "ownerships": ownerships }))).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// GET `/ownerships/{ownership_id}` - Get ownership detail.
async fn get_ownership(State(state): State<AppState>, Path(ownership_id): Path<Uuid>) -> Response {
    let repo = OwnershipRepository::new((*state.db).clone());

    match repo.find_ownership_by_id(ownership_id).await {
        Ok(Some(ownership)) => (StatusCode::OK, Json(ownership_json(&ownership))).into_response(),
        Ok(None) => error_response(AppError::NotFound(
            "Ownership record not found".to_string(),
        )),
        Err(e) => error_response(e.into()),
    }
}

/// POST `/ownerships` - Create an ownership record.
async fn create_ownership(
    State(state): State<AppState>,
    Json(payload): Json<CreateOwnershipRequest>,
) -> Response {
    let Some(property_id) = payload.property_id else {
        return missing_field("property_id");
    };
    let Some(company_id) = payload.company_id else {
        return missing_field("company_id");
    };
    let Some(percentage) = payload.percentage else {
        return missing_field("percentage");
    };
    let Some(interest_type) = payload.interest_type else {
        return missing_field("interest_type");
    };
    let Some(date_from) = payload.date_from else {
        return missing_field("date_from");
    };

    let Some(interest_type) = string_to_interest_type(&interest_type) else {
        return invalid_interest_type();
    };

    let repo = OwnershipRepository::new((*state.db).clone());
    let input = CreateOwnershipInput {
        property_id,
        company_id,
        percentage,
        interest_type,
        well_type: payload.well_type,
        is_current_owner: payload.is_current_owner.unwrap_or(true),
        date_from,
        date_to: payload.date_to,
    };

    match repo.create_ownership(input).await {
        Ok(ownership) => {
            info!(
                ownership_id = %ownership.id,
                property_id = %ownership.property_id,
                company_id = %ownership.company_id,
                "Ownership record created"
            );
            (StatusCode::CREATED, Json(ownership_json(&ownership))).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// PUT `/ownerships/{ownership_id}` - Update an ownership record.
///
/// The merged record is re-validated, so a partial update cannot leave the
/// temporal window inconsistent.
async fn update_ownership(
    State(state): State<AppState>,
    Path(ownership_id): Path<Uuid>,
    Json(payload): Json<UpdateOwnershipRequest>,
) -> Response {
    let interest_type = match payload.interest_type.as_deref() {
        Some(s) => match string_to_interest_type(s) {
            Some(interest_type) => Some(interest_type),
            None => return invalid_interest_type(),
        },
        None => None,
    };

    let repo = OwnershipRepository::new((*state.db).clone());
    let input = UpdateOwnershipInput {
        property_id: payload.property_id,
        company_id: payload.company_id,
        percentage: payload.percentage,
        interest_type,
        well_type: payload.well_type.map(Some),
        is_current_owner: payload.is_current_owner,
        date_from: payload.date_from,
        date_to: payload.date_to,
    };

    match repo.update_ownership(ownership_id, input).await {
        Ok(ownership) => {
            info!(ownership_id = %ownership.id, "Ownership record updated");
            (StatusCode::OK, Json(ownership_json(&ownership))).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// DELETE `/ownerships/{ownership_id}` - Delete an ownership record.
async fn delete_ownership(
    State(state): State<AppState>,
    Path(ownership_id): Path<Uuid>,
) -> Response {
    let repo = OwnershipRepository::new((*state.db).clone());

    match repo.delete_ownership(ownership_id).await {
        Ok(()) => {
            info!(ownership_id = %ownership_id, "Ownership record deleted");
            (
                StatusCode::OK,
                Json(json!({ "message": "Ownership record deleted successfully" })),
            )
                .into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// GET `/properties/{property_id}/ownerships/total-percentage` - Sum
/// ownership percentages for a property.
async fn total_percentage_for_property(
    State(state): State<AppState>,
    Path(property_id): Path<Uuid>,
) -> Response {
    let repo = OwnershipRepository::new((*state.db).clone());

    match repo.total_percentage_for_property(property_id).await {
        Ok(total) => (
            StatusCode::OK,
            Json(json!({
                "property_id": property_id,
                "total_percentage": total.to_string()
            })),
        )
            .into_response(),
        Err(e) => error_response(e.into()),
    }
}

// Helper functions

fn invalid_interest_type() -> Response {
    error_response(AppError::Validation(
        "Interest type must be either 'working' or 'royalty'".to_string(),
    ))
}

fn interest_type_to_string(interest_type: InterestType) -> &'static str {
    match interest_type {
        InterestType::Working => "working",
        InterestType::Royalty => "royalty",
    }
}

fn string_to_interest_type(s: &str) -> Option<InterestType> {
    match s.to_lowercase().as_str() {
        "working" => Some(InterestType::Working),
        "royalty" => Some(InterestType::Royalty),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interest_type_parsing_round_trips() {
        for interest_type in [InterestType::Working, InterestType::Royalty] {
            let s = interest_type_to_string(interest_type);
            assert_eq!(string_to_interest_type(s), Some(interest_type));
        }
    }

    #[test]
    fn test_unknown_interest_type_rejected() {
        assert_eq!(string_to_interest_type("overriding"), None);
    }

    #[test]
    fn test_date_to_distinguishes_absent_from_null() {
        let absent: UpdateOwnershipRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.date_to, None);

        let cleared: UpdateOwnershipRequest = serde_json::from_str(r#"{"date_to": null}"#).unwrap();
        assert_eq!(cleared.date_to, Some(None));

        let set: UpdateOwnershipRequest =
            serde_json::from_str(r#"{"date_to": "2024-06-01"}"#).unwrap();
        assert_eq!(
            set.date_to,
            Some(Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()))
        );
    }
}
