//! `SeaORM` Entity for the entries table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{EntryStatus, EntryType};

/// A ledger grouping of transactions for a reporting period.
///
/// The grouped transactions live in the `entry_transactions` join table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "entries")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Entry title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Date of the entry.
    pub entry_date: Date,
    /// Reporting period kind.
    pub entry_type: EntryType,
    /// Review status.
    pub status: EntryStatus,
    /// Whether the entry has been posted.
    pub posted: bool,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Transaction memberships of this entry.
    #[sea_orm(has_many = "super::entry_transactions::Entity")]
    EntryTransactions,
}

impl Related<super::entry_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EntryTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
