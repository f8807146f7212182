//! Property repository for leased-property database operations.

use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use derrick_core::validate::{EmptyFieldError, require_non_empty};

use crate::entities::{company_ownerships, properties, transactions};

/// Error types for property operations.
#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    /// A required field was missing or empty.
    #[error(transparent)]
    MissingField(#[from] EmptyFieldError),

    /// Property not found.
    #[error("Property not found: {0}")]
    PropertyNotFound(Uuid),

    /// Property is still referenced by ownership records.
    #[error("Cannot delete property: {0} ownership records reference it")]
    HasOwnerships(u64),

    /// Property is still referenced by transactions.
    #[error("Cannot delete property: {0} transactions reference it")]
    HasTransactions(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PropertyError> for derrick_shared::AppError {
    fn from(err: PropertyError) -> Self {
        match err {
            PropertyError::MissingField(e) => Self::Validation(e.to_string()),
            PropertyError::PropertyNotFound(_) => Self::NotFound(err.to_string()),
            PropertyError::HasOwnerships(_) | PropertyError::HasTransactions(_) => {
                Self::Conflict(err.to_string())
            }
            PropertyError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Structured address of a property.
#[derive(Debug, Clone)]
pub struct AddressInput {
    /// Street address.
    pub street: String,
    /// City.
    pub city: String,
    /// State.
    pub state: String,
    /// ZIP code.
    pub zip: String,
}

/// Input for creating a property.
#[derive(Debug, Clone)]
pub struct CreatePropertyInput {
    /// Property name.
    pub name: String,
    /// Property address.
    pub address: AddressInput,
}

/// Input for updating a property.
#[derive(Debug, Clone, Default)]
pub struct UpdatePropertyInput {
    /// Property name.
    pub name: Option<String>,
    /// Property address (replaced as a whole).
    pub address: Option<AddressInput>,
}

/// Filter options for listing properties.
#[derive(Debug, Clone, Default)]
pub struct PropertyFilter {
    /// Case-insensitive substring match on the name.
    pub name_contains: Option<String>,
    /// Case-insensitive exact match on the state.
    pub state: Option<String>,
}

/// Property repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct PropertyRepository {
    db: DatabaseConnection,
}

impl PropertyRepository {
    /// Creates a new property repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new property with validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or any address component is blank.
    pub async fn create_property(
        &self,
        input: CreatePropertyInput,
    ) -> Result<properties::Model, PropertyError> {
        require_non_empty("name", &input.name)?;
        validate_address(&input.address)?;

        let now = chrono::Utc::now().into();
        let property = properties::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            address_street: Set(input.address.street),
            address_city: Set(input.address.city),
            address_state: Set(input.address.state),
            address_zip: Set(input.address.zip),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let property = property.insert(&self.db).await?;
        Ok(property)
    }

    /// Finds a property by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_property_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<properties::Model>, PropertyError> {
        let property = properties::Entity::find_by_id(id).one(&self.db).await?;
        Ok(property)
    }

    /// Lists properties, optionally filtered by name or state.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_properties(
        &self,
        filter: PropertyFilter,
    ) -> Result<Vec<properties::Model>, PropertyError> {
        let mut query = properties::Entity::find().order_by_asc(properties::Column::Name);

        if let Some(term) = filter.name_contains {
            query = query.filter(
                Expr::col(properties::Column::Name).ilike(substring_pattern(&term)),
            );
        }

        if let Some(state) = filter.state {
            // ILIKE without wildcards is a case-insensitive equality match
            query = query
                .filter(Expr::col(properties::Column::AddressState).ilike(escape_like(&state)));
        }

        let properties = query.all(&self.db).await?;
        Ok(properties)
    }

    /// Updates a property with validation of the supplied fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the property does not exist or a supplied field
    /// is blank.
    pub async fn update_property(
        &self,
        id: Uuid,
        input: UpdatePropertyInput,
    ) -> Result<properties::Model, PropertyError> {
        let property = properties::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PropertyError::PropertyNotFound(id))?;

        if let Some(name) = &input.name {
            require_non_empty("name", name)?;
        }
        if let Some(address) = &input.address {
            validate_address(address)?;
        }

        let now = chrono::Utc::now().into();
        let mut active: properties::ActiveModel = property.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(address) = input.address {
            active.address_street = Set(address.street);
            active.address_city = Set(address.city);
            active.address_state = Set(address.state);
            active.address_zip = Set(address.zip);
        }
        active.updated_at = Set(now);

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Replaces the address of a property.
    ///
    /// # Errors
    ///
    /// Returns an error if the property does not exist or any address
    /// component is blank.
    pub async fn update_address(
        &self,
        id: Uuid,
        address: AddressInput,
    ) -> Result<properties::Model, PropertyError> {
        self.update_property(
            id,
            UpdatePropertyInput {
                name: None,
                address: Some(address),
            },
        )
        .await
    }

    /// Deletes a property.
    ///
    /// Deletion is restricted while ownership records or transactions still
    /// reference the property.
    ///
    /// # Errors
    ///
    /// Returns an error if the property does not exist or is still
    /// referenced.
    pub async fn delete_property(&self, id: Uuid) -> Result<(), PropertyError> {
        let property = properties::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PropertyError::PropertyNotFound(id))?;

        let ownership_count = company_ownerships::Entity::find()
            .filter(company_ownerships::Column::PropertyId.eq(id))
            .count(&self.db)
            .await?;
        if ownership_count > 0 {
            return Err(PropertyError::HasOwnerships(ownership_count));
        }

        let transaction_count = transactions::Entity::find()
            .filter(transactions::Column::PropertyId.eq(id))
            .count(&self.db)
            .await?;
        if transaction_count > 0 {
            return Err(PropertyError::HasTransactions(transaction_count));
        }

        properties::Entity::delete_by_id(property.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Checks that a property exists, for cross-entity reference validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn exists(&self, id: Uuid) -> Result<bool, PropertyError> {
        let count = properties::Entity::find()
            .filter(properties::Column::Id.eq(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }
}

fn validate_address(address: &AddressInput) -> Result<(), EmptyFieldError> {
    require_non_empty("address.street", &address.street)?;
    require_non_empty("address.city", &address.city)?;
    require_non_empty("address.state", &address.state)?;
    require_non_empty("address.zip", &address.zip)?;
    Ok(())
}

// ============================================================================
// Pure helpers for LIKE pattern construction
// ============================================================================

/// Escapes LIKE wildcards in a user-supplied search term.
#[must_use]
pub fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Builds a case-insensitive substring pattern from a search term.
#[must_use]
pub fn substring_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> AddressInput {
        AddressInput {
            street: "4 Main St".to_string(),
            city: "Anytown".to_string(),
            state: "CA".to_string(),
            zip: "12345".to_string(),
        }
    }

    #[test]
    fn test_valid_address_accepted() {
        assert!(validate_address(&address()).is_ok());
    }

    #[test]
    fn test_blank_address_component_rejected() {
        let mut addr = address();
        addr.city = "  ".to_string();
        let err = validate_address(&addr).unwrap_err();
        assert_eq!(err, EmptyFieldError("address.city"));
    }

    #[test]
    fn test_substring_pattern_wraps_term() {
        assert_eq!(substring_pattern("Lot"), "%Lot%");
    }

    #[test]
    fn test_like_wildcards_escaped() {
        assert_eq!(escape_like("50%_a"), "50\\%\\_a");
        assert_eq!(substring_pattern("a%b"), "%a\\%b%");
    }

    mod props {
        use proptest::prelude::*;

        use super::super::substring_pattern;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            /// *For any* search term, the pattern is wrapped in wildcards and
            /// every wildcard inside it is escaped.
            #[test]
            fn prop_substring_pattern_escapes_user_wildcards(term in ".*") {
                let pattern = substring_pattern(&term);
                prop_assert!(pattern.starts_with('%'));
                prop_assert!(pattern.ends_with('%'));

                let inner = &pattern[1..pattern.len() - 1];
                let mut chars = inner.chars();
                while let Some(c) = chars.next() {
                    if c == '\\' {
                        chars.next();
                    } else {
                        prop_assert!(c != '%' && c != '_');
                    }
                }
            }
        }
    }
}
