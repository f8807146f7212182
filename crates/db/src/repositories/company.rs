//! Company repository for operating/paying/receiving company records.

use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use derrick_core::validate::{EmptyFieldError, require_non_empty};

use super::property::substring_pattern;
use crate::entities::{companies, company_ownerships, transactions};

/// Error types for company operations.
#[derive(Debug, thiserror::Error)]
pub enum CompanyError {
    /// A required field was missing or empty.
    #[error(transparent)]
    MissingField(#[from] EmptyFieldError),

    /// Company not found.
    #[error("Company not found: {0}")]
    CompanyNotFound(Uuid),

    /// Company is still referenced by ownership records.
    #[error("Cannot delete company: {0} ownership records reference it")]
    HasOwnerships(u64),

    /// Company is still referenced by transactions.
    #[error("Cannot delete company: {0} transactions reference it")]
    HasTransactions(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CompanyError> for derrick_shared::AppError {
    fn from(err: CompanyError) -> Self {
        match err {
            CompanyError::MissingField(e) => Self::Validation(e.to_string()),
            CompanyError::CompanyNotFound(_) => Self::NotFound(err.to_string()),
            CompanyError::HasOwnerships(_) | CompanyError::HasTransactions(_) => {
                Self::Conflict(err.to_string())
            }
            CompanyError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a company.
#[derive(Debug, Clone)]
pub struct CreateCompanyInput {
    /// Company name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Free-form contact information.
    pub contact_info: Option<serde_json::Value>,
}

/// Input for updating a company.
#[derive(Debug, Clone, Default)]
pub struct UpdateCompanyInput {
    /// Company name.
    pub name: Option<String>,
    /// Free-form description.
    pub description: Option<Option<String>>,
    /// Free-form contact information.
    pub contact_info: Option<Option<serde_json::Value>>,
}

/// Filter options for listing companies.
#[derive(Debug, Clone, Default)]
pub struct CompanyFilter {
    /// Case-insensitive substring match on the name.
    pub name_contains: Option<String>,
}

/// Company repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    db: DatabaseConnection,
}

impl CompanyRepository {
    /// Creates a new company repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new company.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank.
    pub async fn create_company(
        &self,
        input: CreateCompanyInput,
    ) -> Result<companies::Model, CompanyError> {
        require_non_empty("name", &input.name)?;

        let now = chrono::Utc::now().into();
        let company = companies::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            description: Set(input.description),
            contact_info: Set(input.contact_info),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let company = company.insert(&self.db).await?;
        Ok(company)
    }

    /// Finds a company by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_company_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<companies::Model>, CompanyError> {
        let company = companies::Entity::find_by_id(id).one(&self.db).await?;
        Ok(company)
    }

    /// Lists companies, optionally filtered by a name substring.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_companies(
        &self,
        filter: CompanyFilter,
    ) -> Result<Vec<companies::Model>, CompanyError> {
        let mut query = companies::Entity::find().order_by_asc(companies::Column::Name);

        if let Some(term) = filter.name_contains {
            query =
                query.filter(Expr::col(companies::Column::Name).ilike(substring_pattern(&term)));
        }

        let companies = query.all(&self.db).await?;
        Ok(companies)
    }

    /// Updates a company with validation of the supplied fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the company does not exist or the supplied name
    /// is blank.
    pub async fn update_company(
        &self,
        id: Uuid,
        input: UpdateCompanyInput,
    ) -> Result<companies::Model, CompanyError> {
        let company = companies::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CompanyError::CompanyNotFound(id))?;

        if let Some(name) = &input.name {
            require_non_empty("name", name)?;
        }

        let now = chrono::Utc::now().into();
        let mut active: companies::ActiveModel = company.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(contact_info) = input.contact_info {
            active.contact_info = Set(contact_info);
        }
        active.updated_at = Set(now);

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Deletes a company.
    ///
    /// Deletion is restricted while ownership records or transactions (in
    /// either direction) still reference the company.
    ///
    /// # Errors
    ///
    /// Returns an error if the company does not exist or is still
    /// referenced.
    pub async fn delete_company(&self, id: Uuid) -> Result<(), CompanyError> {
        let company = companies::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CompanyError::CompanyNotFound(id))?;

        let ownership_count = company_ownerships::Entity::find()
            .filter(company_ownerships::Column::CompanyId.eq(id))
            .count(&self.db)
            .await?;
        if ownership_count > 0 {
            return Err(CompanyError::HasOwnerships(ownership_count));
        }

        let transaction_count = transactions::Entity::find()
            .filter(
                Condition::any()
                    .add(transactions::Column::CompanyFromId.eq(id))
                    .add(transactions::Column::CompanyToId.eq(id)),
            )
            .count(&self.db)
            .await?;
        if transaction_count > 0 {
            return Err(CompanyError::HasTransactions(transaction_count));
        }

        companies::Entity::delete_by_id(company.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Checks that a company exists, for cross-entity reference validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn exists(&self, id: Uuid) -> Result<bool, CompanyError> {
        let count = companies::Entity::find()
            .filter(companies::Column::Id.eq(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }
}
