//! `SeaORM` active enums mapped to Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of interest a company holds in a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "interest_type")]
#[serde(rename_all = "lowercase")]
pub enum InterestType {
    /// Bears operating costs.
    #[sea_orm(string_value = "working")]
    Working,
    /// Revenue share without operating cost burden.
    #[sea_orm(string_value = "royalty")]
    Royalty,
}

/// Account lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_status")]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Account is in use.
    #[sea_orm(string_value = "active")]
    Active,
    /// Account is retired.
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

/// Reporting period an entry covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_type")]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Monthly reporting period.
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// Quarterly reporting period.
    #[sea_orm(string_value = "quarterly")]
    Quarterly,
    /// Annual reporting period.
    #[sea_orm(string_value = "annual")]
    Annual,
    /// Ad-hoc period.
    #[sea_orm(string_value = "custom")]
    Custom,
}

/// Entry review status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_status")]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Being drafted.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Submitted for review.
    #[sea_orm(string_value = "submitted")]
    Submitted,
    /// Approved.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Rejected.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}
