//! `SeaORM` Entity for the properties table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A leased property (well site, lot, tract).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Property name.
    pub name: String,
    /// Street address.
    pub address_street: String,
    /// City.
    pub address_city: String,
    /// State.
    pub address_state: String,
    /// ZIP code.
    pub address_zip: String,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Ownership records referencing this property.
    #[sea_orm(has_many = "super::company_ownerships::Entity")]
    CompanyOwnerships,
    /// Transactions referencing this property.
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::company_ownerships::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompanyOwnerships.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
