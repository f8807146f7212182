//! `SeaORM` entity definitions for every collection.

pub mod accounts;
pub mod companies;
pub mod company_ownerships;
pub mod entries;
pub mod entry_transactions;
pub mod properties;
pub mod sea_orm_active_enums;
pub mod transactions;
