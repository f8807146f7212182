//! Account repository for bank/book account database operations.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use derrick_core::validate::{EmptyFieldError, require_non_empty};

use crate::entities::{accounts, sea_orm_active_enums::AccountStatus};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// A required field was missing or empty.
    #[error(transparent)]
    MissingField(#[from] EmptyFieldError),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AccountError> for derrick_shared::AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::MissingField(e) => Self::Validation(e.to_string()),
            AccountError::AccountNotFound(_) => Self::NotFound(err.to_string()),
            AccountError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account name.
    pub name: String,
    /// Account classification (e.g. checking, savings).
    pub account_type: String,
    /// Account number at the institution.
    pub account_number: String,
    /// Lifecycle status.
    pub status: AccountStatus,
    /// Balance; may be negative.
    pub balance: Decimal,
    /// Institution name.
    pub bank_name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
}

/// Input for updating an account.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// Account name.
    pub name: Option<String>,
    /// Account classification.
    pub account_type: Option<String>,
    /// Account number.
    pub account_number: Option<String>,
    /// Lifecycle status.
    pub status: Option<AccountStatus>,
    /// Balance.
    pub balance: Option<Decimal>,
    /// Institution name.
    pub bank_name: Option<Option<String>>,
    /// Free-form description.
    pub description: Option<Option<String>>,
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Filter by account classification.
    pub account_type: Option<String>,
    /// Filter by institution name.
    pub bank_name: Option<String>,
    /// Filter by lifecycle status.
    pub status: Option<AccountStatus>,
}

/// Filter options for the balance aggregate.
#[derive(Debug, Clone, Default)]
pub struct BalanceFilter {
    /// Restrict to one account classification.
    pub account_type: Option<String>,
    /// Restrict to one institution.
    pub bank_name: Option<String>,
}

/// Account repository for CRUD operations and balance aggregates.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new account with validation.
    ///
    /// # Errors
    ///
    /// Returns an error if a required text field is blank.
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        require_non_empty("name", &input.name)?;
        require_non_empty("account_type", &input.account_type)?;
        require_non_empty("account_number", &input.account_number)?;

        let now = chrono::Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            account_type: Set(input.account_type),
            account_number: Set(input.account_number),
            status: Set(input.status),
            balance: Set(input.balance),
            bank_name: Set(input.bank_name),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let account = account.insert(&self.db).await?;
        Ok(account)
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_account_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<accounts::Model>, AccountError> {
        let account = accounts::Entity::find_by_id(id).one(&self.db).await?;
        Ok(account)
    }

    /// Lists accounts with optional type/bank/status filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        filter: AccountFilter,
    ) -> Result<Vec<accounts::Model>, AccountError> {
        let mut query = accounts::Entity::find().order_by_asc(accounts::Column::Name);

        if let Some(account_type) = filter.account_type {
            query = query.filter(accounts::Column::AccountType.eq(account_type));
        }
        if let Some(bank_name) = filter.bank_name {
            query = query.filter(accounts::Column::BankName.eq(bank_name));
        }
        if let Some(status) = filter.status {
            query = query.filter(accounts::Column::Status.eq(status));
        }

        let accounts = query.all(&self.db).await?;
        Ok(accounts)
    }

    /// Updates an account with validation of the supplied fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist or a supplied text
    /// field is blank.
    pub async fn update_account(
        &self,
        id: Uuid,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let account = accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::AccountNotFound(id))?;

        if let Some(name) = &input.name {
            require_non_empty("name", name)?;
        }
        if let Some(account_type) = &input.account_type {
            require_non_empty("account_type", account_type)?;
        }
        if let Some(account_number) = &input.account_number {
            require_non_empty("account_number", account_number)?;
        }

        let now = chrono::Utc::now().into();
        let mut active: accounts::ActiveModel = account.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(account_type) = input.account_type {
            active.account_type = Set(account_type);
        }
        if let Some(account_number) = input.account_number {
            active.account_number = Set(account_number);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(balance) = input.balance {
            active.balance = Set(balance);
        }
        if let Some(bank_name) = input.bank_name {
            active.bank_name = Set(bank_name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        active.updated_at = Set(now);

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Deletes an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist.
    pub async fn delete_account(&self, id: Uuid) -> Result<(), AccountError> {
        let account = accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::AccountNotFound(id))?;

        accounts::Entity::delete_by_id(account.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Sums balances across accounts matching the filter.
    ///
    /// Purely informational; an empty match sums to zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn total_balance(&self, filter: BalanceFilter) -> Result<Decimal, AccountError> {
        let mut query = accounts::Entity::find();

        if let Some(account_type) = filter.account_type {
            query = query.filter(accounts::Column::AccountType.eq(account_type));
        }
        if let Some(bank_name) = filter.bank_name {
            query = query.filter(accounts::Column::BankName.eq(bank_name));
        }

        let accounts = query.all(&self.db).await?;
        Ok(sum_balances(accounts.iter().map(|a| a.balance)))
    }
}

// ============================================================================
// Pure aggregation helpers
// ============================================================================

/// Sums account balances.
#[must_use]
pub fn sum_balances(balances: impl IntoIterator<Item = Decimal>) -> Decimal {
    balances.into_iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sum_balances_handles_negatives() {
        let total = sum_balances([dec!(1500.00), dec!(-250.75), dec!(0)]);
        assert_eq!(total, dec!(1249.25));
    }

    #[test]
    fn test_sum_of_no_accounts_is_zero() {
        assert_eq!(sum_balances(std::iter::empty::<Decimal>()), Decimal::ZERO);
    }
}
