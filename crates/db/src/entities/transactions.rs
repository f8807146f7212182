//! `SeaORM` Entity for the transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A payment between two companies against a property.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Gross amount before deductions.
    pub gross_amount: Decimal,
    /// Net amount after deductions.
    pub net_amount: Option<Decimal>,
    /// Amount paid in taxes.
    pub taxes_paid_amount: Option<Decimal>,
    /// Transaction date.
    pub date: Date,
    /// Property the transaction is against.
    pub property_id: Uuid,
    /// Paying company.
    pub company_from_id: Uuid,
    /// Receiving company.
    pub company_to_id: Uuid,
    /// Type of merchandise involved (e.g. crude, condensate).
    pub merchandise_type: Option<String>,
    /// Quantity of merchandise transacted.
    pub amount_of_merch_transacted: Option<Decimal>,
    /// Barrels of oil involved.
    pub barrels_of_oil: Option<Decimal>,
    /// Service provided, for service transactions.
    pub service: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The property this transaction is against.
    #[sea_orm(
        belongs_to = "super::properties::Entity",
        from = "Column::PropertyId",
        to = "super::properties::Column::Id"
    )]
    Properties,
    /// The paying company.
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyFromId",
        to = "super::companies::Column::Id"
    )]
    CompanyFrom,
    /// The receiving company.
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyToId",
        to = "super::companies::Column::Id"
    )]
    CompanyTo,
    /// Entry memberships of this transaction.
    #[sea_orm(has_many = "super::entry_transactions::Entity")]
    EntryTransactions,
}

impl Related<super::properties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Properties.def()
    }
}

impl Related<super::entry_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EntryTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
