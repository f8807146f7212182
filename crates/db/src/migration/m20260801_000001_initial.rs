//! Initial database migration.
//!
//! Creates the enums, tables, foreign keys, check constraints, and indexes
//! for the ownership/accounting schema. Foreign keys default to RESTRICT so
//! a property or company that is still referenced cannot be deleted; entry
//! membership rows cascade with their entry or transaction.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: REFERENCED ENTITIES
        // ============================================================
        db.execute_unprepared(PROPERTIES_SQL).await?;
        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 3: TRANSACTIONS & OWNERSHIP
        // ============================================================
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(COMPANY_OWNERSHIPS_SQL).await?;

        // ============================================================
        // PART 4: ENTRIES & MEMBERSHIP
        // ============================================================
        db.execute_unprepared(ENTRIES_SQL).await?;
        db.execute_unprepared(ENTRY_TRANSACTIONS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Interest held in a property
CREATE TYPE interest_type AS ENUM ('working', 'royalty');

-- Account lifecycle
CREATE TYPE account_status AS ENUM ('active', 'inactive');

-- Entry reporting period
CREATE TYPE entry_type AS ENUM ('monthly', 'quarterly', 'annual', 'custom');

-- Entry review status
CREATE TYPE entry_status AS ENUM ('draft', 'submitted', 'approved', 'rejected');
";

const PROPERTIES_SQL: &str = r"
CREATE TABLE properties (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    address_street VARCHAR(255) NOT NULL,
    address_city VARCHAR(255) NOT NULL,
    address_state VARCHAR(64) NOT NULL,
    address_zip VARCHAR(16) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_properties_state ON properties(address_state);
";

const COMPANIES_SQL: &str = r"
CREATE TABLE companies (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    description TEXT,
    contact_info JSONB,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    account_type VARCHAR(64) NOT NULL,
    account_number VARCHAR(64) NOT NULL,
    status account_status NOT NULL,
    balance NUMERIC(19, 4) NOT NULL,
    bank_name VARCHAR(255),
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_accounts_type ON accounts(account_type);
CREATE INDEX idx_accounts_bank ON accounts(bank_name);
CREATE INDEX idx_accounts_status ON accounts(status);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    gross_amount NUMERIC(19, 4) NOT NULL,
    net_amount NUMERIC(19, 4),
    taxes_paid_amount NUMERIC(19, 4),
    date DATE NOT NULL,
    property_id UUID NOT NULL REFERENCES properties(id) ON DELETE RESTRICT,
    company_from_id UUID NOT NULL REFERENCES companies(id) ON DELETE RESTRICT,
    company_to_id UUID NOT NULL REFERENCES companies(id) ON DELETE RESTRICT,
    merchandise_type VARCHAR(128),
    amount_of_merch_transacted NUMERIC(19, 4),
    barrels_of_oil NUMERIC(19, 4),
    service VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_transactions_property ON transactions(property_id);
CREATE INDEX idx_transactions_company_from ON transactions(company_from_id);
CREATE INDEX idx_transactions_company_to ON transactions(company_to_id);
CREATE INDEX idx_transactions_date ON transactions(date);
CREATE INDEX idx_transactions_merchandise_type ON transactions(merchandise_type);
";

const COMPANY_OWNERSHIPS_SQL: &str = r"
CREATE TABLE company_ownerships (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    property_id UUID NOT NULL REFERENCES properties(id) ON DELETE RESTRICT,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE RESTRICT,
    percentage NUMERIC(7, 4) NOT NULL,
    interest_type interest_type NOT NULL,
    well_type VARCHAR(64),
    is_current_owner BOOLEAN NOT NULL,
    date_from DATE NOT NULL,
    date_to DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    -- Backstops for invariants validated in code
    CONSTRAINT chk_ownership_percentage CHECK (percentage >= 0 AND percentage <= 100),
    CONSTRAINT chk_ownership_window CHECK (
        (is_current_owner AND date_to IS NULL)
        OR (NOT is_current_owner AND date_to IS NOT NULL AND date_to > date_from)
    )
);

CREATE INDEX idx_company_ownerships_property ON company_ownerships(property_id);
CREATE INDEX idx_company_ownerships_company ON company_ownerships(company_id);
CREATE INDEX idx_company_ownerships_current ON company_ownerships(is_current_owner);
";

const ENTRIES_SQL: &str = r"
CREATE TABLE entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    title VARCHAR(255) NOT NULL,
    description TEXT,
    entry_date DATE NOT NULL,
    entry_type entry_type NOT NULL,
    status entry_status NOT NULL,
    posted BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_entries_type ON entries(entry_type);
CREATE INDEX idx_entries_status ON entries(status);
CREATE INDEX idx_entries_date ON entries(entry_date);
";

const ENTRY_TRANSACTIONS_SQL: &str = r"
CREATE TABLE entry_transactions (
    entry_id UUID NOT NULL REFERENCES entries(id) ON DELETE CASCADE,
    transaction_id UUID NOT NULL REFERENCES transactions(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (entry_id, transaction_id)
);

CREATE INDEX idx_entry_transactions_transaction ON entry_transactions(transaction_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS entry_transactions;
DROP TABLE IF EXISTS entries;
DROP TABLE IF EXISTS company_ownerships;
DROP TABLE IF EXISTS transactions;
DROP TABLE IF EXISTS accounts;
DROP TABLE IF EXISTS companies;
DROP TABLE IF EXISTS properties;
DROP TYPE IF EXISTS entry_status;
DROP TYPE IF EXISTS entry_type;
DROP TYPE IF EXISTS account_status;
DROP TYPE IF EXISTS interest_type;
";
