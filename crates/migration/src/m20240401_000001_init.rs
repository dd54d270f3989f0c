//! Initial schema.
//!
//! - `currency`: currency registry keyed by code
//! - `account`: money holders, one currency each
//! - `category`: operation categories
//! - `operation`: ledger entries; transfer legs share a `transaction_no`

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Currency {
    Table,
    Code,
    Description,
}

#[derive(Iden)]
enum Account {
    Table,
    Id,
    Name,
    CurrencyCode,
}

#[derive(Iden)]
enum Category {
    Table,
    Id,
    Type,
    Name,
    Description,
}

#[derive(Iden)]
enum Operation {
    Table,
    EntryNo,
    DateTime,
    Type,
    Amount,
    SourceId,
    CurrencyCode,
    CategoryId,
    TransactionNo,
    Description,
}

/// Sign and pairing rules every stored operation satisfies. The amount is
/// decimal text, compared numerically.
const OPERATION_RULES: &str = "(\"type\" = 'Transfer' AND transaction_no <> 0) \
     OR (\"type\" = 'Income' AND CAST(amount AS REAL) >= 0) \
     OR (\"type\" = 'Expense' AND CAST(amount AS REAL) <= 0)";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Currency::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Currency::Code)
                            .string_len(10)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Currency::Description).string_len(30))
                    .check(Expr::cust("code <> ''"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Account::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Account::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Account::Name).string_len(30).not_null())
                    .col(
                        ColumnDef::new(Account::CurrencyCode)
                            .string_len(10)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-account-currency_code")
                            .from(Account::Table, Account::CurrencyCode)
                            .to(Currency::Table, Currency::Code),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Category::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Category::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Category::Type).string_len(10).not_null())
                    .col(ColumnDef::new(Category::Name).string_len(30).not_null())
                    .col(ColumnDef::new(Category::Description).string_len(250))
                    .to_owned(),
            )
            .await?;

        // SQLite only honours AUTOINCREMENT on INTEGER keys, which are 64-bit.
        manager
            .create_table(
                Table::create()
                    .table(Operation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Operation::EntryNo)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Operation::DateTime).date_time().not_null())
                    .col(ColumnDef::new(Operation::Type).string_len(10).not_null())
                    .col(ColumnDef::new(Operation::Amount).string().not_null())
                    .col(ColumnDef::new(Operation::SourceId).integer().not_null())
                    .col(
                        ColumnDef::new(Operation::CurrencyCode)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Operation::CategoryId).integer().not_null())
                    .col(
                        ColumnDef::new(Operation::TransactionNo)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Operation::Description)
                            .string_len(250)
                            .not_null()
                            .default(""),
                    )
                    .check(Expr::cust(OPERATION_RULES))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-operation-source_id")
                            .from(Operation::Table, Operation::SourceId)
                            .to(Account::Table, Account::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-operation-currency_code")
                            .from(Operation::Table, Operation::CurrencyCode)
                            .to(Currency::Table, Currency::Code),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-operation-category_id")
                            .from(Operation::Table, Operation::CategoryId)
                            .to(Category::Table, Category::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-operation-date_time")
                    .table(Operation::Table)
                    .col(Operation::DateTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-operation-transaction_no")
                    .table(Operation::Table)
                    .col(Operation::TransactionNo)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Operation::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Category::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Account::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Currency::Table).to_owned())
            .await?;
        Ok(())
    }
}
