//! `SeaORM` Entity for the company_ownerships table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::InterestType;

/// A company's interest in a property over a time window.
///
/// `date_to` is null exactly when `is_current_owner` is true; the pairing is
/// validated in `derrick_core::ownership` before any write and backstopped by
/// a check constraint in the schema.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "company_ownerships")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The property being held.
    pub property_id: Uuid,
    /// The company holding the interest.
    pub company_id: Uuid,
    /// Percentage held, in [0, 100].
    pub percentage: Decimal,
    /// Working or royalty interest.
    pub interest_type: InterestType,
    /// Type of well (e.g. vertical, horizontal, directional).
    pub well_type: Option<String>,
    /// Whether this is the present-day holding.
    pub is_current_owner: bool,
    /// Date the ownership began.
    pub date_from: Date,
    /// Date the ownership ended; null for current holdings.
    pub date_to: Option<Date>,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The held property.
    #[sea_orm(
        belongs_to = "super::properties::Entity",
        from = "Column::PropertyId",
        to = "super::properties::Column::Id"
    )]
    Properties,
    /// The holding company.
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Companies,
}

impl Related<super::properties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Properties.def()
    }
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
