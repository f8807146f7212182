//! Transaction repository for inter-company payment records.
//!
//! Every write validates its foreign references with a lookup before the
//! insert. The check races with concurrent deletes; the schema's foreign
//! keys turn a lost race into a database error instead of a dangling
//! reference.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use derrick_core::transaction::{AmountField, total_amount};

use crate::entities::{companies, properties, transactions};

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Referenced property does not exist.
    #[error("Property with ID '{0}' does not exist")]
    PropertyDoesNotExist(Uuid),

    /// Referenced paying company does not exist.
    #[error("Company with ID '{0}' (paying company) does not exist")]
    PayingCompanyDoesNotExist(Uuid),

    /// Referenced receiving company does not exist.
    #[error("Company with ID '{0}' (receiving company) does not exist")]
    ReceivingCompanyDoesNotExist(Uuid),

    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<TransactionError> for derrick_shared::AppError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::PropertyDoesNotExist(_)
            | TransactionError::PayingCompanyDoesNotExist(_)
            | TransactionError::ReceivingCompanyDoesNotExist(_) => {
                Self::Validation(err.to_string())
            }
            TransactionError::TransactionNotFound(_) => Self::NotFound(err.to_string()),
            TransactionError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Which side of a transaction a company filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompanyDirection {
    /// The company is paying.
    From,
    /// The company is receiving payment.
    To,
    /// Either side.
    #[default]
    Both,
}

impl CompanyDirection {
    /// Parses a wire name (`from`, `to`, `both`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "from" => Some(Self::From),
            "to" => Some(Self::To),
            "both" => Some(Self::Both),
            _ => None,
        }
    }
}

/// Input for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Gross amount before deductions.
    pub gross_amount: Decimal,
    /// Net amount after deductions.
    pub net_amount: Option<Decimal>,
    /// Amount paid in taxes.
    pub taxes_paid_amount: Option<Decimal>,
    /// Transaction date.
    pub date: NaiveDate,
    /// Property the transaction is against.
    pub property_id: Uuid,
    /// Paying company.
    pub company_from_id: Uuid,
    /// Receiving company.
    pub company_to_id: Uuid,
    /// Type of merchandise involved.
    pub merchandise_type: Option<String>,
    /// Quantity of merchandise transacted.
    pub amount_of_merch_transacted: Option<Decimal>,
    /// Barrels of oil involved.
    pub barrels_of_oil: Option<Decimal>,
    /// Service provided.
    pub service: Option<String>,
}

/// Input for updating a transaction.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    /// Gross amount.
    pub gross_amount: Option<Decimal>,
    /// Net amount.
    pub net_amount: Option<Option<Decimal>>,
    /// Taxes paid.
    pub taxes_paid_amount: Option<Option<Decimal>>,
    /// Transaction date.
    pub date: Option<NaiveDate>,
    /// Property reference.
    pub property_id: Option<Uuid>,
    /// Paying company reference.
    pub company_from_id: Option<Uuid>,
    /// Receiving company reference.
    pub company_to_id: Option<Uuid>,
    /// Merchandise type.
    pub merchandise_type: Option<Option<String>>,
    /// Merchandise quantity.
    pub amount_of_merch_transacted: Option<Option<Decimal>>,
    /// Barrels of oil.
    pub barrels_of_oil: Option<Option<Decimal>>,
    /// Service provided.
    pub service: Option<Option<String>>,
}

/// Filter options for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by property.
    pub property_id: Option<Uuid>,
    /// Filter by company on the selected side(s).
    pub company_id: Option<Uuid>,
    /// Side the company filter applies to.
    pub direction: CompanyDirection,
    /// Start of the date range (inclusive).
    pub date_from: Option<NaiveDate>,
    /// End of the date range (inclusive).
    pub date_to: Option<NaiveDate>,
    /// Filter by merchandise type.
    pub merchandise_type: Option<String>,
    /// Lower bound of the amount range (inclusive).
    pub min_amount: Option<Decimal>,
    /// Upper bound of the amount range (inclusive).
    pub max_amount: Option<Decimal>,
    /// Amount field the range applies to.
    pub amount_field: AmountField,
}

/// Transaction repository for CRUD operations and amount aggregates.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new transaction with reference validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the referenced property or either company does
    /// not exist.
    pub async fn create_transaction(
        &self,
        input: CreateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        self.ensure_property_exists(input.property_id).await?;
        self.ensure_company_exists(input.company_from_id, CompanyDirection::From)
            .await?;
        self.ensure_company_exists(input.company_to_id, CompanyDirection::To)
            .await?;

        let now = chrono::Utc::now().into();
        let transaction = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            gross_amount: Set(input.gross_amount),
            net_amount: Set(input.net_amount),
            taxes_paid_amount: Set(input.taxes_paid_amount),
            date: Set(input.date),
            property_id: Set(input.property_id),
            company_from_id: Set(input.company_from_id),
            company_to_id: Set(input.company_to_id),
            merchandise_type: Set(input.merchandise_type),
            amount_of_merch_transacted: Set(input.amount_of_merch_transacted),
            barrels_of_oil: Set(input.barrels_of_oil),
            service: Set(input.service),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let transaction = transaction.insert(&self.db).await?;
        Ok(transaction)
    }

    /// Finds a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_transaction_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<transactions::Model>, TransactionError> {
        let transaction = transactions::Entity::find_by_id(id).one(&self.db).await?;
        Ok(transaction)
    }

    /// Lists transactions matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_transactions(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<transactions::Model>, TransactionError> {
        let mut query =
            transactions::Entity::find().order_by_desc(transactions::Column::Date);

        if let Some(property_id) = filter.property_id {
            query = query.filter(transactions::Column::PropertyId.eq(property_id));
        }

        if let Some(company_id) = filter.company_id {
            let condition = match filter.direction {
                CompanyDirection::From => {
                    Condition::all().add(transactions::Column::CompanyFromId.eq(company_id))
                }
                CompanyDirection::To => {
                    Condition::all().add(transactions::Column::CompanyToId.eq(company_id))
                }
                CompanyDirection::Both => Condition::any()
                    .add(transactions::Column::CompanyFromId.eq(company_id))
                    .add(transactions::Column::CompanyToId.eq(company_id)),
            };
            query = query.filter(condition);
        }

        if let Some(date_from) = filter.date_from {
            query = query.filter(transactions::Column::Date.gte(date_from));
        }
        if let Some(date_to) = filter.date_to {
            query = query.filter(transactions::Column::Date.lte(date_to));
        }

        if let Some(merchandise_type) = filter.merchandise_type {
            query = query.filter(transactions::Column::MerchandiseType.eq(merchandise_type));
        }

        let amount_column = amount_column(filter.amount_field);
        if let Some(min_amount) = filter.min_amount {
            query = query.filter(amount_column.gte(min_amount));
        }
        if let Some(max_amount) = filter.max_amount {
            query = query.filter(amount_column.lte(max_amount));
        }

        let transactions = query.all(&self.db).await?;
        Ok(transactions)
    }

    /// Updates a transaction, re-validating any supplied references.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction does not exist or a supplied
    /// reference does not resolve.
    pub async fn update_transaction(
        &self,
        id: Uuid,
        input: UpdateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        let transaction = transactions::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(TransactionError::TransactionNotFound(id))?;

        if let Some(property_id) = input.property_id {
            self.ensure_property_exists(property_id).await?;
        }
        if let Some(company_from_id) = input.company_from_id {
            self.ensure_company_exists(company_from_id, CompanyDirection::From)
                .await?;
        }
        if let Some(company_to_id) = input.company_to_id {
            self.ensure_company_exists(company_to_id, CompanyDirection::To)
                .await?;
        }

        let now = chrono::Utc::now().into();
        let mut active: transactions::ActiveModel = transaction.into();

        if let Some(gross_amount) = input.gross_amount {
            active.gross_amount = Set(gross_amount);
        }
        if let Some(net_amount) = input.net_amount {
            active.net_amount = Set(net_amount);
        }
        if let Some(taxes_paid_amount) = input.taxes_paid_amount {
            active.taxes_paid_amount = Set(taxes_paid_amount);
        }
        if let Some(date) = input.date {
            active.date = Set(date);
        }
        if let Some(property_id) = input.property_id {
            active.property_id = Set(property_id);
        }
        if let Some(company_from_id) = input.company_from_id {
            active.company_from_id = Set(company_from_id);
        }
        if let Some(company_to_id) = input.company_to_id {
            active.company_to_id = Set(company_to_id);
        }
        if let Some(merchandise_type) = input.merchandise_type {
            active.merchandise_type = Set(merchandise_type);
        }
        if let Some(amount_of_merch_transacted) = input.amount_of_merch_transacted {
            active.amount_of_merch_transacted = Set(amount_of_merch_transacted);
        }
        if let Some(barrels_of_oil) = input.barrels_of_oil {
            active.barrels_of_oil = Set(barrels_of_oil);
        }
        if let Some(service) = input.service {
            active.service = Set(service);
        }
        active.updated_at = Set(now);

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Deletes a transaction.
    ///
    /// Entry membership rows cascade with the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction does not exist.
    pub async fn delete_transaction(&self, id: Uuid) -> Result<(), TransactionError> {
        let transaction = transactions::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(TransactionError::TransactionNotFound(id))?;

        transactions::Entity::delete_by_id(transaction.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Sums an amount field across a property's transactions.
    ///
    /// Optional amounts that were never recorded contribute zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn total_for_property(
        &self,
        property_id: Uuid,
        field: AmountField,
    ) -> Result<Decimal, TransactionError> {
        let transactions = transactions::Entity::find()
            .filter(transactions::Column::PropertyId.eq(property_id))
            .all(&self.db)
            .await?;

        Ok(total_amount(
            transactions.iter().map(|t| amount_of(t, field)),
        ))
    }

    async fn ensure_property_exists(&self, id: Uuid) -> Result<(), TransactionError> {
        let count = properties::Entity::find()
            .filter(properties::Column::Id.eq(id))
            .count(&self.db)
            .await?;
        if count == 0 {
            return Err(TransactionError::PropertyDoesNotExist(id));
        }
        Ok(())
    }

    async fn ensure_company_exists(
        &self,
        id: Uuid,
        direction: CompanyDirection,
    ) -> Result<(), TransactionError> {
        let count = companies::Entity::find()
            .filter(companies::Column::Id.eq(id))
            .count(&self.db)
            .await?;
        if count == 0 {
            return Err(match direction {
                CompanyDirection::To => TransactionError::ReceivingCompanyDoesNotExist(id),
                _ => TransactionError::PayingCompanyDoesNotExist(id),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Pure field-selection helpers
// ============================================================================

/// Maps an amount field to its column.
#[must_use]
pub const fn amount_column(field: AmountField) -> transactions::Column {
    match field {
        AmountField::Gross => transactions::Column::GrossAmount,
        AmountField::Net => transactions::Column::NetAmount,
        AmountField::TaxesPaid => transactions::Column::TaxesPaidAmount,
    }
}

/// Reads the selected amount field off a transaction row.
#[must_use]
pub const fn amount_of(transaction: &transactions::Model, field: AmountField) -> Option<Decimal> {
    match field {
        AmountField::Gross => Some(transaction.gross_amount),
        AmountField::Net => transaction.net_amount,
        AmountField::TaxesPaid => transaction.taxes_paid_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn transaction(
        gross: Decimal,
        net: Option<Decimal>,
        taxes: Option<Decimal>,
    ) -> transactions::Model {
        let now = chrono::Utc::now().into();
        transactions::Model {
            id: Uuid::new_v4(),
            gross_amount: gross,
            net_amount: net,
            taxes_paid_amount: taxes,
            date: chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            property_id: Uuid::new_v4(),
            company_from_id: Uuid::new_v4(),
            company_to_id: Uuid::new_v4(),
            merchandise_type: None,
            amount_of_merch_transacted: None,
            barrels_of_oil: None,
            service: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_amount_of_selects_requested_field() {
        let t = transaction(dec!(100), Some(dec!(80)), None);
        assert_eq!(amount_of(&t, AmountField::Gross), Some(dec!(100)));
        assert_eq!(amount_of(&t, AmountField::Net), Some(dec!(80)));
        assert_eq!(amount_of(&t, AmountField::TaxesPaid), None);
    }

    #[test]
    fn test_totals_sum_selected_field_only() {
        let rows = vec![
            transaction(dec!(100), Some(dec!(80)), Some(dec!(5))),
            transaction(dec!(50), None, Some(dec!(2.50))),
        ];

        let gross = total_amount(rows.iter().map(|t| amount_of(t, AmountField::Gross)));
        let net = total_amount(rows.iter().map(|t| amount_of(t, AmountField::Net)));
        let taxes = total_amount(rows.iter().map(|t| amount_of(t, AmountField::TaxesPaid)));

        assert_eq!(gross, dec!(150));
        assert_eq!(net, dec!(80));
        assert_eq!(taxes, dec!(7.50));
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!(CompanyDirection::parse("from"), Some(CompanyDirection::From));
        assert_eq!(CompanyDirection::parse("to"), Some(CompanyDirection::To));
        assert_eq!(CompanyDirection::parse("both"), Some(CompanyDirection::Both));
        assert_eq!(CompanyDirection::parse("sideways"), None);
    }
}
