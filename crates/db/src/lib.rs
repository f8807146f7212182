//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! The connection handle is constructed once at startup and injected into
//! each repository; nothing in this crate holds global state.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    AccountRepository, CompanyRepository, EntryRepository, OwnershipRepository,
    PropertyRepository, TransactionRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;
    tracing::debug!("Database connection established");
    Ok(db)
}
