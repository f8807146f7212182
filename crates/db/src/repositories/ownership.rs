//! Company ownership repository.
//!
//! Holds the percentage and temporal-window invariants for ownership
//! records. Updates are validated against the merged record, not the patch
//! alone, so a partial update can never leave the
//! `is_current_owner`/`date_to` pairing inconsistent.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use derrick_core::ownership::{
    OwnershipValidationError, OwnershipWindow, total_percentage, validate_percentage,
};

use crate::entities::{
    companies, company_ownerships, properties, sea_orm_active_enums::InterestType,
};

/// Error types for ownership operations.
#[derive(Debug, thiserror::Error)]
pub enum OwnershipError {
    /// Referenced property does not exist.
    #[error("Property with ID '{0}' does not exist")]
    PropertyDoesNotExist(Uuid),

    /// Referenced company does not exist.
    #[error("Company with ID '{0}' does not exist")]
    CompanyDoesNotExist(Uuid),

    /// Percentage or temporal-window invariant violated.
    #[error(transparent)]
    Validation(#[from] OwnershipValidationError),

    /// Ownership record not found.
    #[error("Ownership record not found: {0}")]
    OwnershipNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<OwnershipError> for derrick_shared::AppError {
    fn from(err: OwnershipError) -> Self {
        match err {
            OwnershipError::PropertyDoesNotExist(_)
            | OwnershipError::CompanyDoesNotExist(_)
            | OwnershipError::Validation(_) => Self::Validation(err.to_string()),
            OwnershipError::OwnershipNotFound(_) => Self::NotFound(err.to_string()),
            OwnershipError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating an ownership record.
#[derive(Debug, Clone)]
pub struct CreateOwnershipInput {
    /// The property being held.
    pub property_id: Uuid,
    /// The company holding the interest.
    pub company_id: Uuid,
    /// Percentage held, in [0, 100].
    pub percentage: Decimal,
    /// Working or royalty interest.
    pub interest_type: InterestType,
    /// Type of well.
    pub well_type: Option<String>,
    /// Whether this is the present-day holding.
    pub is_current_owner: bool,
    /// Date the ownership began.
    pub date_from: NaiveDate,
    /// Date the ownership ended; must be absent for current holdings.
    pub date_to: Option<NaiveDate>,
}

/// Input for updating an ownership record.
#[derive(Debug, Clone, Default)]
pub struct UpdateOwnershipInput {
    /// Property reference.
    pub property_id: Option<Uuid>,
    /// Company reference.
    pub company_id: Option<Uuid>,
    /// Percentage held.
    pub percentage: Option<Decimal>,
    /// Working or royalty interest.
    pub interest_type: Option<InterestType>,
    /// Type of well.
    pub well_type: Option<Option<String>>,
    /// Whether this is the present-day holding.
    pub is_current_owner: Option<bool>,
    /// Date the ownership began.
    pub date_from: Option<NaiveDate>,
    /// Date the ownership ended; pass `Some(None)` to clear.
    pub date_to: Option<Option<NaiveDate>>,
}

/// Filter options for listing ownership records.
#[derive(Debug, Clone, Default)]
pub struct OwnershipFilter {
    /// Filter by property.
    pub property_id: Option<Uuid>,
    /// Filter by company.
    pub company_id: Option<Uuid>,
    /// Filter by interest type.
    pub interest_type: Option<InterestType>,
    /// Filter by well type.
    pub well_type: Option<String>,
    /// Lower bound of the percentage range (inclusive).
    pub min_percentage: Option<Decimal>,
    /// Upper bound of the percentage range (inclusive).
    pub max_percentage: Option<Decimal>,
    /// Filter by current/historical state.
    pub is_current_owner: Option<bool>,
}

/// Ownership repository for CRUD operations, temporal queries, and the
/// percentage aggregate.
#[derive(Debug, Clone)]
pub struct OwnershipRepository {
    db: DatabaseConnection,
}

impl OwnershipRepository {
    /// Creates a new ownership repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an ownership record with full validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the referenced property or company does not
    /// exist, the percentage is out of range, or the temporal window is
    /// inconsistent.
    pub async fn create_ownership(
        &self,
        input: CreateOwnershipInput,
    ) -> Result<company_ownerships::Model, OwnershipError> {
        self.ensure_property_exists(input.property_id).await?;
        self.ensure_company_exists(input.company_id).await?;

        validate_percentage(input.percentage)?;
        let window =
            OwnershipWindow::from_parts(input.is_current_owner, input.date_from, input.date_to)?;

        let now = chrono::Utc::now().into();
        let ownership = company_ownerships::ActiveModel {
            id: Set(Uuid::new_v4()),
            property_id: Set(input.property_id),
            company_id: Set(input.company_id),
            percentage: Set(input.percentage),
            interest_type: Set(input.interest_type),
            well_type: Set(input.well_type),
            is_current_owner: Set(window.is_current()),
            date_from: Set(window.date_from()),
            date_to: Set(window.date_to()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let ownership = ownership.insert(&self.db).await?;
        Ok(ownership)
    }

    /// Finds an ownership record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_ownership_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<company_ownerships::Model>, OwnershipError> {
        let ownership = company_ownerships::Entity::find_by_id(id)
            .one(&self.db)
            .await?;
        Ok(ownership)
    }

    /// Lists ownership records matching the filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_ownerships(
        &self,
        filter: OwnershipFilter,
    ) -> Result<Vec<company_ownerships::Model>, OwnershipError> {
        let mut query = company_ownerships::Entity::find()
            .order_by_asc(company_ownerships::Column::DateFrom);

        if let Some(property_id) = filter.property_id {
            query = query.filter(company_ownerships::Column::PropertyId.eq(property_id));
        }
        if let Some(company_id) = filter.company_id {
            query = query.filter(company_ownerships::Column::CompanyId.eq(company_id));
        }
        if let Some(interest_type) = filter.interest_type {
            query = query.filter(company_ownerships::Column::InterestType.eq(interest_type));
        }
        if let Some(well_type) = filter.well_type {
            query = query.filter(company_ownerships::Column::WellType.eq(well_type));
        }
        if let Some(min_percentage) = filter.min_percentage {
            query = query.filter(company_ownerships::Column::Percentage.gte(min_percentage));
        }
        if let Some(max_percentage) = filter.max_percentage {
            query = query.filter(company_ownerships::Column::Percentage.lte(max_percentage));
        }
        if let Some(is_current_owner) = filter.is_current_owner {
            query = query.filter(company_ownerships::Column::IsCurrentOwner.eq(is_current_owner));
        }

        let ownerships = query.all(&self.db).await?;
        Ok(ownerships)
    }

    /// Lists present-day holdings.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_current(&self) -> Result<Vec<company_ownerships::Model>, OwnershipError> {
        self.list_ownerships(OwnershipFilter {
            is_current_owner: Some(true),
            ..OwnershipFilter::default()
        })
        .await
    }

    /// Lists closed historical holdings.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_historical(
        &self,
    ) -> Result<Vec<company_ownerships::Model>, OwnershipError> {
        self.list_ownerships(OwnershipFilter {
            is_current_owner: Some(false),
            ..OwnershipFilter::default()
        })
        .await
    }

    /// Lists ownerships whose window overlaps the inclusive `[start, end]`
    /// range.
    ///
    /// Selects current ownerships that began on or before `end`, union
    /// historical ownerships with `date_from <= end` and `date_to >= start`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_in_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<company_ownerships::Model>, OwnershipError> {
        let overlap = Condition::any()
            .add(
                Condition::all()
                    .add(company_ownerships::Column::IsCurrentOwner.eq(true))
                    .add(company_ownerships::Column::DateFrom.lte(end)),
            )
            .add(
                Condition::all()
                    .add(company_ownerships::Column::IsCurrentOwner.eq(false))
                    .add(company_ownerships::Column::DateFrom.lte(end))
                    .add(company_ownerships::Column::DateTo.gte(start)),
            );

        let ownerships = company_ownerships::Entity::find()
            .filter(overlap)
            .order_by_asc(company_ownerships::Column::DateFrom)
            .all(&self.db)
            .await?;
        Ok(ownerships)
    }

    /// Updates an ownership record, validating the merged result.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not exist, a supplied reference
    /// does not resolve, or the merged record violates the percentage or
    /// temporal-window invariants.
    pub async fn update_ownership(
        &self,
        id: Uuid,
        input: UpdateOwnershipInput,
    ) -> Result<company_ownerships::Model, OwnershipError> {
        let ownership = company_ownerships::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(OwnershipError::OwnershipNotFound(id))?;

        if let Some(property_id) = input.property_id {
            self.ensure_property_exists(property_id).await?;
        }
        if let Some(company_id) = input.company_id {
            self.ensure_company_exists(company_id).await?;
        }
        if let Some(percentage) = input.percentage {
            validate_percentage(percentage)?;
        }

        // Cross-field window invariants hold on the merged record
        let window = merge_window(
            (
                ownership.is_current_owner,
                ownership.date_from,
                ownership.date_to,
            ),
            (input.is_current_owner, input.date_from, input.date_to),
        )?;

        let now = chrono::Utc::now().into();
        let mut active: company_ownerships::ActiveModel = ownership.into();

        if let Some(property_id) = input.property_id {
            active.property_id = Set(property_id);
        }
        if let Some(company_id) = input.company_id {
            active.company_id = Set(company_id);
        }
        if let Some(percentage) = input.percentage {
            active.percentage = Set(percentage);
        }
        if let Some(interest_type) = input.interest_type {
            active.interest_type = Set(interest_type);
        }
        if let Some(well_type) = input.well_type {
            active.well_type = Set(well_type);
        }
        active.is_current_owner = Set(window.is_current());
        active.date_from = Set(window.date_from());
        active.date_to = Set(window.date_to());
        active.updated_at = Set(now);

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Deletes an ownership record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not exist.
    pub async fn delete_ownership(&self, id: Uuid) -> Result<(), OwnershipError> {
        let ownership = company_ownerships::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(OwnershipError::OwnershipNotFound(id))?;

        company_ownerships::Entity::delete_by_id(ownership.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Sums ownership percentages across a property's records.
    ///
    /// Purely informational: expected to equal 100 when every interest is
    /// accounted for, but nothing enforces that.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn total_percentage_for_property(
        &self,
        property_id: Uuid,
    ) -> Result<Decimal, OwnershipError> {
        let ownerships = company_ownerships::Entity::find()
            .filter(company_ownerships::Column::PropertyId.eq(property_id))
            .all(&self.db)
            .await?;

        Ok(total_percentage(ownerships.iter().map(|o| o.percentage)))
    }

    async fn ensure_property_exists(&self, id: Uuid) -> Result<(), OwnershipError> {
        let count = properties::Entity::find()
            .filter(properties::Column::Id.eq(id))
            .count(&self.db)
            .await?;
        if count == 0 {
            return Err(OwnershipError::PropertyDoesNotExist(id));
        }
        Ok(())
    }

    async fn ensure_company_exists(&self, id: Uuid) -> Result<(), OwnershipError> {
        let count = companies::Entity::find()
            .filter(companies::Column::Id.eq(id))
            .count(&self.db)
            .await?;
        if count == 0 {
            return Err(OwnershipError::CompanyDoesNotExist(id));
        }
        Ok(())
    }
}

// ============================================================================
// Pure merge helper for partial window updates
// ============================================================================

/// Merges stored window fields with a partial update and validates the
/// result.
///
/// `patch` carries `(is_current_owner, date_from, date_to)`; `date_to` is
/// doubly optional so a caller can distinguish "leave as stored" from
/// "clear".
///
/// # Errors
///
/// Returns the validation error for the merged window.
pub fn merge_window(
    stored: (bool, NaiveDate, Option<NaiveDate>),
    patch: (Option<bool>, Option<NaiveDate>, Option<Option<NaiveDate>>),
) -> Result<OwnershipWindow, OwnershipValidationError> {
    let (stored_current, stored_from, stored_to) = stored;
    let (patch_current, patch_from, patch_to) = patch;

    let is_current_owner = patch_current.unwrap_or(stored_current);
    let date_from = patch_from.unwrap_or(stored_from);
    let date_to = patch_to.unwrap_or(stored_to);

    OwnershipWindow::from_parts(is_current_owner, date_from, date_to)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_merge_keeps_stored_fields_when_patch_empty() {
        let window = merge_window((true, date(2020, 1, 1), None), (None, None, None)).unwrap();
        assert_eq!(
            window,
            OwnershipWindow::Current {
                date_from: date(2020, 1, 1)
            }
        );
    }

    #[test]
    fn test_merge_rejects_flip_to_current_without_clearing_end_date() {
        let stored = (false, date(2019, 1, 1), Some(date(2020, 1, 1)));
        let result = merge_window(stored, (Some(true), None, None));
        assert_eq!(result, Err(OwnershipValidationError::EndDateForbidden));
    }

    #[test]
    fn test_merge_accepts_flip_to_current_with_cleared_end_date() {
        let stored = (false, date(2019, 1, 1), Some(date(2020, 1, 1)));
        let window = merge_window(stored, (Some(true), None, Some(None))).unwrap();
        assert!(window.is_current());
    }

    #[test]
    fn test_merge_rejects_flip_to_historical_without_end_date() {
        let stored = (true, date(2019, 1, 1), None);
        let result = merge_window(stored, (Some(false), None, None));
        assert_eq!(result, Err(OwnershipValidationError::EndDateRequired));
    }

    #[test]
    fn test_merge_validates_new_start_against_stored_end() {
        let stored = (false, date(2019, 1, 1), Some(date(2020, 1, 1)));
        let result = merge_window(stored, (None, Some(date(2021, 1, 1)), None));
        assert_eq!(
            result,
            Err(OwnershipValidationError::EndNotAfterStart {
                date_from: date(2021, 1, 1),
                date_to: date(2020, 1, 1),
            })
        );
    }

    #[test]
    fn test_errors_map_to_expected_status_codes() {
        use derrick_shared::AppError;

        let err: AppError = OwnershipError::PropertyDoesNotExist(Uuid::new_v4()).into();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("does not exist"));

        let err: AppError =
            OwnershipError::Validation(OwnershipValidationError::EndDateRequired).into();
        assert_eq!(err.status_code(), 400);

        let err: AppError = OwnershipError::OwnershipNotFound(Uuid::new_v4()).into();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_merge_accepts_consistent_historical_patch() {
        let stored = (true, date(2019, 1, 1), None);
        let window = merge_window(stored, (Some(false), None, Some(Some(date(2022, 6, 1))))).unwrap();
        assert_eq!(window.date_to(), Some(date(2022, 6, 1)));
    }
}
