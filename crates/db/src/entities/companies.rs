//! `SeaORM` Entity for the companies table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An operating, paying, or receiving company.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Company name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Free-form contact information.
    pub contact_info: Option<Json>,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Ownership records referencing this company.
    #[sea_orm(has_many = "super::company_ownerships::Entity")]
    CompanyOwnerships,
}

impl Related<super::company_ownerships::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompanyOwnerships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
