//! Entry repository for ledger groupings of transactions.
//!
//! The transaction list of an entry is a set backed by the
//! `entry_transactions` join table: the composite primary key makes
//! duplicate adds no-ops and removals idempotent.

use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use derrick_core::entry::normalize_transaction_ids;
use derrick_core::validate::{EmptyFieldError, require_non_empty};

use super::property::substring_pattern;
use crate::entities::{
    entries, entry_transactions,
    sea_orm_active_enums::{EntryStatus, EntryType},
    transactions,
};

/// Error types for entry operations.
#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    /// A required field was missing or empty.
    #[error(transparent)]
    MissingField(#[from] EmptyFieldError),

    /// Referenced transaction does not exist.
    #[error("Transaction with ID '{0}' does not exist")]
    TransactionDoesNotExist(Uuid),

    /// Entry not found.
    #[error("Entry not found: {0}")]
    EntryNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<EntryError> for derrick_shared::AppError {
    fn from(err: EntryError) -> Self {
        match err {
            EntryError::MissingField(e) => Self::Validation(e.to_string()),
            EntryError::TransactionDoesNotExist(_) => Self::Validation(err.to_string()),
            EntryError::EntryNotFound(_) => Self::NotFound(err.to_string()),
            EntryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating an entry.
#[derive(Debug, Clone)]
pub struct CreateEntryInput {
    /// Entry title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Transactions grouped by this entry; duplicates are collapsed.
    pub transaction_ids: Vec<Uuid>,
    /// Date of the entry.
    pub entry_date: NaiveDate,
    /// Reporting period kind.
    pub entry_type: EntryType,
    /// Review status.
    pub status: EntryStatus,
    /// Whether the entry has been posted.
    pub posted: bool,
}

/// Input for updating an entry.
#[derive(Debug, Clone, Default)]
pub struct UpdateEntryInput {
    /// Entry title.
    pub title: Option<String>,
    /// Free-form description.
    pub description: Option<Option<String>>,
    /// Replacement transaction set; duplicates are collapsed.
    pub transaction_ids: Option<Vec<Uuid>>,
    /// Date of the entry.
    pub entry_date: Option<NaiveDate>,
    /// Reporting period kind.
    pub entry_type: Option<EntryType>,
    /// Review status.
    pub status: Option<EntryStatus>,
    /// Whether the entry has been posted.
    pub posted: Option<bool>,
}

/// Filter options for listing entries.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Filter by reporting period kind.
    pub entry_type: Option<EntryType>,
    /// Filter by review status.
    pub status: Option<EntryStatus>,
    /// Start of the entry-date range (inclusive).
    pub date_from: Option<NaiveDate>,
    /// End of the entry-date range (inclusive).
    pub date_to: Option<NaiveDate>,
    /// Case-insensitive substring match on the title.
    pub title_contains: Option<String>,
}

/// An entry together with the ids of its grouped transactions.
#[derive(Debug, Clone)]
pub struct EntryWithTransactionIds {
    /// The entry record.
    pub entry: entries::Model,
    /// Ids of the grouped transactions.
    pub transaction_ids: Vec<Uuid>,
}

/// An entry together with its fully loaded transactions.
#[derive(Debug, Clone)]
pub struct EntryWithTransactions {
    /// The entry record.
    pub entry: entries::Model,
    /// The grouped transactions.
    pub transactions: Vec<transactions::Model>,
}

/// Entry repository for CRUD operations and set maintenance.
#[derive(Debug, Clone)]
pub struct EntryRepository {
    db: DatabaseConnection,
}

impl EntryRepository {
    /// Creates a new entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an entry and its transaction memberships.
    ///
    /// The entry row and its membership rows are separate storage calls; a
    /// failure between them is not rolled back.
    ///
    /// # Errors
    ///
    /// Returns an error if the title is blank or any referenced transaction
    /// does not exist.
    pub async fn create_entry(
        &self,
        input: CreateEntryInput,
    ) -> Result<EntryWithTransactionIds, EntryError> {
        require_non_empty("title", &input.title)?;

        let transaction_ids = normalize_transaction_ids(input.transaction_ids);
        self.ensure_transactions_exist(&transaction_ids).await?;

        let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();
        let entry = entries::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(input.title),
            description: Set(input.description),
            entry_date: Set(input.entry_date),
            entry_type: Set(input.entry_type),
            status: Set(input.status),
            posted: Set(input.posted),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let entry = entry.insert(&self.db).await?;

        self.insert_memberships(entry.id, &transaction_ids, now)
            .await?;

        Ok(EntryWithTransactionIds {
            entry,
            transaction_ids,
        })
    }

    /// Finds an entry and its transaction ids by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_entry_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<EntryWithTransactionIds>, EntryError> {
        let Some(entry) = entries::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let transaction_ids = self.transaction_ids_of(id).await?;
        Ok(Some(EntryWithTransactionIds {
            entry,
            transaction_ids,
        }))
    }

    /// Finds an entry with its transactions fully loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_entry_with_transactions(
        &self,
        id: Uuid,
    ) -> Result<Option<EntryWithTransactions>, EntryError> {
        let Some(entry) = entries::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let transaction_ids = self.transaction_ids_of(id).await?;
        let transactions = if transaction_ids.is_empty() {
            Vec::new()
        } else {
            transactions::Entity::find()
                .filter(transactions::Column::Id.is_in(transaction_ids))
                .all(&self.db)
                .await?
        };

        Ok(Some(EntryWithTransactions {
            entry,
            transactions,
        }))
    }

    /// Lists entries matching the filter, newest first, with their
    /// transaction ids.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_entries(
        &self,
        filter: EntryFilter,
    ) -> Result<Vec<EntryWithTransactionIds>, EntryError> {
        let mut query = entries::Entity::find().order_by_desc(entries::Column::EntryDate);

        if let Some(entry_type) = filter.entry_type {
            query = query.filter(entries::Column::EntryType.eq(entry_type));
        }
        if let Some(status) = filter.status {
            query = query.filter(entries::Column::Status.eq(status));
        }
        if let Some(date_from) = filter.date_from {
            query = query.filter(entries::Column::EntryDate.gte(date_from));
        }
        if let Some(date_to) = filter.date_to {
            query = query.filter(entries::Column::EntryDate.lte(date_to));
        }
        if let Some(term) = filter.title_contains {
            query = query.filter(Expr::col(entries::Column::Title).ilike(substring_pattern(&term)));
        }

        let entries = query.all(&self.db).await?;

        let memberships = if entries.is_empty() {
            Vec::new()
        } else {
            entry_transactions::Entity::find()
                .filter(
                    entry_transactions::Column::EntryId
                        .is_in(entries.iter().map(|e| e.id).collect::<Vec<_>>()),
                )
                .order_by_asc(entry_transactions::Column::CreatedAt)
                .all(&self.db)
                .await?
        };
        let mut grouped = group_transaction_ids(memberships);

        Ok(entries
            .into_iter()
            .map(|entry| {
                let transaction_ids = grouped.remove(&entry.id).unwrap_or_default();
                EntryWithTransactionIds {
                    entry,
                    transaction_ids,
                }
            })
            .collect())
    }

    /// Updates an entry; a supplied transaction list replaces the set.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry does not exist, the supplied title is
    /// blank, or a supplied transaction id does not resolve.
    pub async fn update_entry(
        &self,
        id: Uuid,
        input: UpdateEntryInput,
    ) -> Result<EntryWithTransactionIds, EntryError> {
        let entry = entries::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(EntryError::EntryNotFound(id))?;

        if let Some(title) = &input.title {
            require_non_empty("title", title)?;
        }

        let replacement_ids = match input.transaction_ids {
            Some(ids) => {
                let ids = normalize_transaction_ids(ids);
                self.ensure_transactions_exist(&ids).await?;
                Some(ids)
            }
            None => None,
        };

        let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();
        let mut active: entries::ActiveModel = entry.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(entry_date) = input.entry_date {
            active.entry_date = Set(entry_date);
        }
        if let Some(entry_type) = input.entry_type {
            active.entry_type = Set(entry_type);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(posted) = input.posted {
            active.posted = Set(posted);
        }
        active.updated_at = Set(now);

        let updated = active.update(&self.db).await?;

        let transaction_ids = match replacement_ids {
            Some(ids) => {
                entry_transactions::Entity::delete_many()
                    .filter(entry_transactions::Column::EntryId.eq(id))
                    .exec(&self.db)
                    .await?;
                self.insert_memberships(id, &ids, now).await?;
                ids
            }
            None => self.transaction_ids_of(id).await?,
        };

        Ok(EntryWithTransactionIds {
            entry: updated,
            transaction_ids,
        })
    }

    /// Deletes an entry; membership rows cascade with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry does not exist.
    pub async fn delete_entry(&self, id: Uuid) -> Result<(), EntryError> {
        let entry = entries::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(EntryError::EntryNotFound(id))?;

        entries::Entity::delete_by_id(entry.id).exec(&self.db).await?;
        Ok(())
    }

    /// Adds a transaction to an entry's set.
    ///
    /// Returns whether the set changed; adding a transaction that is
    /// already grouped is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry or the transaction does not exist.
    pub async fn add_transaction(
        &self,
        entry_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<bool, EntryError> {
        self.ensure_entry_exists(entry_id).await?;
        self.ensure_transactions_exist(&[transaction_id]).await?;

        let membership = entry_transactions::ActiveModel {
            entry_id: Set(entry_id),
            transaction_id: Set(transaction_id),
            created_at: Set(chrono::Utc::now().into()),
        };

        let inserted = entry_transactions::Entity::insert(membership)
            .on_conflict(
                OnConflict::columns([
                    entry_transactions::Column::EntryId,
                    entry_transactions::Column::TransactionId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(inserted > 0)
    }

    /// Removes a transaction from an entry's set.
    ///
    /// Returns whether the set changed; removing an absent transaction is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry does not exist.
    pub async fn remove_transaction(
        &self,
        entry_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<bool, EntryError> {
        self.ensure_entry_exists(entry_id).await?;

        let result = entry_transactions::Entity::delete_many()
            .filter(entry_transactions::Column::EntryId.eq(entry_id))
            .filter(entry_transactions::Column::TransactionId.eq(transaction_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn transaction_ids_of(&self, entry_id: Uuid) -> Result<Vec<Uuid>, EntryError> {
        let memberships = entry_transactions::Entity::find()
            .filter(entry_transactions::Column::EntryId.eq(entry_id))
            .order_by_asc(entry_transactions::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(memberships.into_iter().map(|m| m.transaction_id).collect())
    }

    async fn insert_memberships(
        &self,
        entry_id: Uuid,
        transaction_ids: &[Uuid],
        now: chrono::DateTime<chrono::FixedOffset>,
    ) -> Result<(), EntryError> {
        if transaction_ids.is_empty() {
            return Ok(());
        }

        let memberships = transaction_ids.iter().map(|tx_id| {
            entry_transactions::ActiveModel {
                entry_id: Set(entry_id),
                transaction_id: Set(*tx_id),
                created_at: Set(now),
            }
        });

        entry_transactions::Entity::insert_many(memberships)
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    async fn ensure_entry_exists(&self, id: Uuid) -> Result<(), EntryError> {
        let count = entries::Entity::find()
            .filter(entries::Column::Id.eq(id))
            .count(&self.db)
            .await?;
        if count == 0 {
            return Err(EntryError::EntryNotFound(id));
        }
        Ok(())
    }

    async fn ensure_transactions_exist(&self, ids: &[Uuid]) -> Result<(), EntryError> {
        if ids.is_empty() {
            return Ok(());
        }

        let existing: Vec<Uuid> = transactions::Entity::find()
            .filter(transactions::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();

        if let Some(missing) = first_missing(ids, &existing) {
            return Err(EntryError::TransactionDoesNotExist(missing));
        }
        Ok(())
    }
}

// ============================================================================
// Pure set helpers
// ============================================================================

/// Groups membership rows by entry, preserving row order.
#[must_use]
pub fn group_transaction_ids(
    memberships: Vec<entry_transactions::Model>,
) -> HashMap<Uuid, Vec<Uuid>> {
    let mut grouped: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for membership in memberships {
        grouped
            .entry(membership.entry_id)
            .or_default()
            .push(membership.transaction_id);
    }
    grouped
}

/// Finds the first requested id that is not present in the resolved set.
#[must_use]
pub fn first_missing(requested: &[Uuid], resolved: &[Uuid]) -> Option<Uuid> {
    let resolved: std::collections::HashSet<&Uuid> = resolved.iter().collect();
    requested.iter().find(|id| !resolved.contains(id)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn membership(entry_id: Uuid, transaction_id: Uuid) -> entry_transactions::Model {
        entry_transactions::Model {
            entry_id,
            transaction_id,
            created_at: chrono::Utc::now().into(),
        }
    }

    #[test]
    fn test_group_transaction_ids_by_entry() {
        let e1 = Uuid::new_v4();
        let e2 = Uuid::new_v4();
        let (t1, t2, t3) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let grouped = group_transaction_ids(vec![
            membership(e1, t1),
            membership(e2, t3),
            membership(e1, t2),
        ]);

        assert_eq!(grouped[&e1], vec![t1, t2]);
        assert_eq!(grouped[&e2], vec![t3]);
    }

    #[test]
    fn test_first_missing_finds_unresolved_reference() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(first_missing(&[a, b, c], &[a, c]), Some(b));
        assert_eq!(first_missing(&[a, b], &[b, a]), None);
        assert_eq!(first_missing(&[], &[]), None);
    }
}
