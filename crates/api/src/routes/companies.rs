//! Company management routes.

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
use derrick_db::entities::companies;
use derrick_db::repositories::company::{
    CompanyFilter, CompanyRepository, CreateCompanyInput, UpdateCompanyInput,
};

/// Creates the company routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies", get(list_companies))
        .route("/companies", post(create_company))
        .route("/companies/{company_id}", get(get_company))
        .route("/companies/{company_id}", put(update_company))
        .route("/companies/{company_id}", delete(delete_company))
}

/// Request body for creating a company.
#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    /// Company name.
    pub name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Free-form contact information.
    pub contact_info: Option<Value>,
}

/// Request body for updating a company.
#[derive(Debug, Deserialize)]
pub struct UpdateCompanyRequest {
    /// Company name.
    pub name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Free-form contact information.
    pub contact_info: Option<Value>,
}

/// Query parameters for listing companies.
#[derive(Debug, Deserialize)]
pub struct ListCompaniesQuery {
    /// Case-insensitive substring match on the name.
    pub name: Option<String>,
}

fn company_json(company: &companies::Model) -> Value {
    json!({
        "id": company.id,
        "name": company.name,
        "description": company.description,
        "contact_info": company.contact_info,
        "created_at": company.created_at.to_rfc3339(),
        "updated_at": company.updated_at.to_rfc3339()
    })
}

/// GET `/companies` - List companies, optionally filtered by name.
async fn list_companies(
    State(state): State<AppState>,
    Query(query): Query<ListCompaniesQuery>,
) -> Response {
    let repo = CompanyRepository::new((*state.db).clone());

    let filter = CompanyFilter {
        name_contains: query.name,
    };

    match repo.list_companies(filter).await {
        Ok(companies) => {
            let companies: Vec<Value> = companies.iter().map(company_json).collect();
            (StatusCode::OK, Json(json!({ "companies": companies }))).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// GET `/companies/{company_id}` - Get company detail.
async fn get_company(State(state): State<AppState>, Path(company_id): Path<Uuid>) -> Response {
    let repo = CompanyRepository::new((*state.db).clone());

    match repo.find_company_by_id(company_id).await {
        Ok(Some(company)) => (StatusCode::OK, Json(company_json(&company))).into_response(),
        Ok(None) => error_response(derrick_shared::AppError::NotFound(
            "Company not found".to_string(),
        )),
        Err(e) => error_response(e.into()),
    }
}

/// POST `/companies` - Create a company.
async fn create_company(
    State(state): State<AppState>,
    Json(payload): Json<CreateCompanyRequest>,
) -> Response {
    let Some(name) = payload.name else {
        return missing_field("name");
    };

    let repo = CompanyRepository::new((*state.db).clone());
    let input = CreateCompanyInput {
        name,
        description: payload.description,
        contact_info: payload.contact_info,
    };

    match repo.create_company(input).await {
        Ok(company) => {
            info!(company_id = %company.id, name = %company.name, "Company created");
            (StatusCode::CREATED, Json(company_json(&company))).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// PUT `/companies/{company_id}` - Update a company.
async fn update_company(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Json(payload): Json<UpdateCompanyRequest>,
) -> Response {
    let repo = CompanyRepository::new((*state.db).clone());
    let input = UpdateCompanyInput {
        name: payload.name,
        description: payload.description.map(Some),
        contact_info: payload.contact_info.map(Some),
    };

    match repo.update_company(company_id, input).await {
        Ok(company) => {
            info!(company_id = %company.id, "Company updated");
            (StatusCode::OK, Json(company_json(&company))).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// DELETE `/companies/{company_id}` - Delete a company.
///
/// Restricted while ownership records or transactions still reference it.
async fn delete_company(State(state): State<AppState>, Path(company_id): Path<Uuid>) -> Response {
    let repo = CompanyRepository::new((*state.db).clone());

    match repo.delete_company(company_id).await {
        Ok(()) => {
            info!(company_id = %company_id, "Company deleted");
            (
                StatusCode::OK,
                Json(json!({ "message": "Company deleted successfully" })),
            )
                .into_response()
        }
        Err(e) => error_response(e.into()),
    }
}
