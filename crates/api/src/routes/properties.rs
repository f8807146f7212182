//! Property management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    routes::{error_response, missing_field},
};
use derrick_db::entities::properties;
use derrick_db::repositories::property::{
    AddressInput, CreatePropertyInput, PropertyFilter, PropertyRepository, UpdatePropertyInput,
};

/// Creates the property routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/properties", get(list_properties))
        .route("/properties", post(create_property))
        .route("/properties/{property_id}", get(get_property))
        .route("/properties/{property_id}", put(update_property))
        .route("/properties/{property_id}", delete(delete_property))
        .route("/properties/{property_id}/address", put(update_address))
}

/// Structured address payload.
///
/// Missing components deserialize to blanks and are rejected by validation
/// with a message naming the component.
#[derive(Debug, Deserialize)]
pub struct AddressPayload {
    /// Street address.
    #[serde(default)]
    pub street: String,
    /// City.
    #[serde(default)]
    pub city: String,
    /// State.
    #[serde(default)]
    pub state: String,
    /// ZIP code.
    #[serde(default)]
    pub zip: String,
}

impl From<AddressPayload> for AddressInput {
    fn from(payload: AddressPayload) -> Self {
        Self {
            street: payload.street,
            city: payload.city,
            state: payload.state,
            zip: payload.zip,
        }
    }
}

/// Request body for creating a property.
#[derive(Debug, Deserialize)]
pub struct CreatePropertyRequest {
    /// Property name.
    pub name: Option<String>,
    /// Property address.
    pub address: Option<AddressPayload>,
}

/// Request body for updating a property.
#[derive(Debug, Deserialize)]
pub struct UpdatePropertyRequest {
    /// Property name.
    pub name: Option<String>,
    /// Property address (replaced as a whole).
    pub address: Option<AddressPayload>,
}

/// Query parameters for listing properties.
#[derive(Debug, Deserialize)]
pub struct ListPropertiesQuery {
    /// Case-insensitive substring match on the name.
    pub name: Option<String>,
    /// Case-insensitive exact match on the state.
    pub state: Option<String>,
}

fn property_json(property: &properties::Model) -> Value {
    json!({
        "id": property.id,
        "name": property.name,
        "address": {
            "street": property.address_street,
            "city": property.address_city,
            "state": property.address_state,
            "zip": property.address_zip
        },
        "created_at": property.created_at.to_rfc3339(),
        "updated_at": property.updated_at.to_rfc3339()
    })
}

/// GET `/properties` - List properties, optionally filtered.
async fn list_properties(
    State(state): State<AppState>,
    Query(query): Query<ListPropertiesQuery>,
) -> Response {
    let repo = PropertyRepository::new((*state.db).clone());

    let filter = PropertyFilter {
        name_contains: query.name,
        state: query.state,
    };

    match repo.list_properties(filter).await {
        Ok(properties) => {
            let properties: Vec<Value> = properties.iter().map(property_json).collect();
            (StatusCode::OK, Json(json!({ "properties": properties }))).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// GET `/properties/{property_id}` - Get property detail.
async fn get_property(State(state): State<AppState>, Path(property_id): Path<Uuid>) -> Response {
    let repo = PropertyRepository::new((*state.db).clone());

    match repo.find_property_by_id(property_id).await {
        Ok(Some(property)) => (StatusCode::OK, Json(property_json(&property))).into_response(),
        Ok(None) => error_response(derrick_shared::AppError::NotFound(
            "Property not found".to_string(),
        )),
        Err(e) => error_response(e.into()),
    }
}

/// POST `/properties` - Create a property.
async fn create_property(
    State(state): State<AppState>,
    Json(payload): Json<CreatePropertyRequest>,
) -> Response {
    let Some(name) = payload.name else {
        return missing_field("name");
    };
    let Some(address) = payload.address else {
        return missing_field("address");
    };

    let repo = PropertyRepository::new((*state.db).clone());
    let input = CreatePropertyInput {
        name,
        address: address.into(),
    };

    match repo.create_property(input).await {
        Ok(property) => {
            info!(property_id = %property.id, name = %property.name, "Property created");
            (StatusCode::CREATED, Json(property_json(&property))).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// PUT `/properties/{property_id}` - Update a property.
async fn update_property(
    State(state): State<AppState>,
    Path(property_id): Path<Uuid>,
    Json(payload): Json<UpdatePropertyRequest>,
) -> Response {
    let repo = PropertyRepository::new((*state.db).clone());
    let input = UpdatePropertyInput {
        name: payload.name,
        address: payload.address.map(Into::into),
    };

    match repo.update_property(property_id, input).await {
        Ok(property) => {
            info!(property_id = %property.id, "Property updated");
            (StatusCode::OK, Json(property_json(&property))).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// PUT `/properties/{property_id}/address` - Replace a property's address.
async fn update_address(
    State(state): State<AppState>,
    Path(property_id): Path<Uuid>,
    Json(payload): Json<AddressPayload>,
) -> Response {
    let repo = PropertyRepository::new((*state.db).clone());

    match repo.update_address(property_id, payload.into()).await {
        Ok(property) => {
            info!(property_id = %property.id, "Property address updated");
            (StatusCode::OK, Json(property_json(&property))).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// DELETE `/properties/{property_id}` - Delete a property.
///
/// Restricted while ownership records or transactions still reference it.
async fn delete_property(
    State(state): State<AppState>,
    Path(property_id): Path<Uuid>,
) -> Response {
    let repo = PropertyRepository::new((*state.db).clone());

    match repo.delete_property(property_id).await {
        Ok(()) => {
            info!(property_id = %property_id, "Property deleted");
            (
                StatusCode::OK,
                Json(json!({ "message": "Property deleted successfully" })),
            )
                .into_response()
        }
        Err(e) => error_response(e.into()),
    }
}
