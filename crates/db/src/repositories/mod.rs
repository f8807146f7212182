//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. One repository per collection; each takes the connection
//! at construction and performs single, non-transactional storage
//! operations.

pub mod account;
pub mod company;
pub mod entry;
pub mod ownership;
pub mod property;
pub mod transaction;

pub use account::{
    AccountError, AccountFilter, AccountRepository, BalanceFilter, CreateAccountInput,
    UpdateAccountInput,
};
pub use company::{
    CompanyError, CompanyFilter, CompanyRepository, CreateCompanyInput, UpdateCompanyInput,
};
pub use entry::{
    CreateEntryInput, EntryError, EntryFilter, EntryRepository, EntryWithTransactionIds,
    EntryWithTransactions, UpdateEntryInput,
};
pub use ownership::{
    CreateOwnershipInput, OwnershipError, OwnershipFilter, OwnershipRepository,
    UpdateOwnershipInput,
};
pub use property::{
    AddressInput, CreatePropertyInput, PropertyError, PropertyFilter, PropertyRepository,
    UpdatePropertyInput,
};
pub use transaction::{
    CompanyDirection, CreateTransactionInput, TransactionError, TransactionFilter,
    TransactionRepository, UpdateTransactionInput,
};
