//! Operation primitives.
//!
//! An `Operation` is one ledger entry. Income and expenses are single rows;
//! a transfer is two rows (an outflow and an inflow leg) linked by a shared
//! `transaction_no`.

use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, ResultEngine,
    currencies::normalize_code,
    util::{limit_text, normalize_optional_text},
};

const MAX_DESCRIPTION_LEN: usize = 250;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Income,
    Expense,
    Transfer,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
            Self::Transfer => "Transfer",
        }
    }
}

impl TryFrom<&str> for OperationKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Income" => Ok(Self::Income),
            "Expense" => Ok(Self::Expense),
            "Transfer" => Ok(Self::Transfer),
            other => Err(EngineError::ConstraintViolation(format!(
                "invalid operation type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub entry_no: i64,
    pub date_time: NaiveDateTime,
    pub kind: OperationKind,
    pub amount: Decimal,
    pub source_id: i32,
    pub currency_code: String,
    pub category_id: i32,
    pub transaction_no: i64,
    pub description: String,
}

impl Operation {
    /// Bring the record to stored precision: minutes for the timestamp,
    /// canonical scale for the amount.
    pub(crate) fn normalize(&mut self) {
        self.date_time = truncate_to_minute(self.date_time);
        self.amount = self.amount.normalize();
        self.currency_code = normalize_code(&self.currency_code);
        if self.kind != OperationKind::Transfer {
            self.transaction_no = 0;
        }
        self.description = normalize_optional_text(Some(std::mem::take(&mut self.description)))
            .unwrap_or_default();
    }

    /// Sign and pairing invariants of a persisted operation.
    pub(crate) fn validate(&self) -> ResultEngine<()> {
        match self.kind {
            OperationKind::Income if self.amount.is_sign_negative() && !self.amount.is_zero() => {
                return Err(EngineError::ConstraintViolation(format!(
                    "income operation with negative amount {}",
                    self.amount
                )));
            }
            OperationKind::Expense if self.amount.is_sign_positive() && !self.amount.is_zero() => {
                return Err(EngineError::ConstraintViolation(format!(
                    "expense operation with positive amount {}",
                    self.amount
                )));
            }
            OperationKind::Transfer if self.transaction_no == 0 => {
                return Err(EngineError::ConstraintViolation(
                    "transfer operation without transaction number".to_string(),
                ));
            }
            _ => {}
        }
        limit_text(&self.description, "operation description", MAX_DESCRIPTION_LEN)
    }

    /// `true` for the outflow side of a transfer.
    pub fn is_outflow(&self) -> bool {
        self.amount < Decimal::ZERO
    }
}

pub(crate) fn truncate_to_minute(value: NaiveDateTime) -> NaiveDateTime {
    value
        .with_second(0)
        .and_then(|v| v.with_nanosecond(0))
        .unwrap_or(value)
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "operation")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub entry_no: i64,
    pub date_time: DateTime,
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub amount: String,
    pub source_id: i32,
    pub currency_code: String,
    pub category_id: i32,
    pub transaction_no: i64,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::SourceId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Account,
    #[sea_orm(
        belongs_to = "super::currencies::Entity",
        from = "Column::CurrencyCode",
        to = "super::currencies::Column::Code",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Currency,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Category,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::currencies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Currency.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Insert model: the entry number is left to the store.
pub(crate) fn new_active(operation: &Operation) -> ActiveModel {
    let mut active = ActiveModel::from(operation);
    active.entry_no = ActiveValue::NotSet;
    active
}

impl From<&Operation> for ActiveModel {
    fn from(operation: &Operation) -> Self {
        Self {
            entry_no: ActiveValue::Unchanged(operation.entry_no),
            date_time: ActiveValue::Set(operation.date_time),
            kind: ActiveValue::Set(operation.kind.as_str().to_string()),
            amount: ActiveValue::Set(operation.amount.normalize().to_string()),
            source_id: ActiveValue::Set(operation.source_id),
            currency_code: ActiveValue::Set(operation.currency_code.clone()),
            category_id: ActiveValue::Set(operation.category_id),
            transaction_no: ActiveValue::Set(operation.transaction_no),
            description: ActiveValue::Set(operation.description.clone()),
        }
    }
}

impl TryFrom<Model> for Operation {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let amount = Decimal::from_str(&model.amount).map_err(|_| {
            EngineError::ConstraintViolation(format!(
                "operation {} has invalid amount '{}'",
                model.entry_no, model.amount
            ))
        })?;
        Ok(Self {
            entry_no: model.entry_no,
            date_time: model.date_time,
            kind: OperationKind::try_from(model.kind.as_str())?,
            amount,
            source_id: model.source_id,
            currency_code: model.currency_code,
            category_id: model.category_id,
            transaction_no: model.transaction_no,
            description: model.description,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn operation(kind: OperationKind, amount: i64) -> Operation {
        Operation {
            entry_no: 0,
            date_time: NaiveDate::from_ymd_opt(2024, 4, 7)
                .and_then(|d| d.and_hms_opt(0, 36, 42))
                .unwrap(),
            kind,
            amount: Decimal::new(amount, 2),
            source_id: 1,
            currency_code: "gel".to_string(),
            category_id: 1,
            transaction_no: 0,
            description: String::new(),
        }
    }

    #[test]
    fn negative_income_is_rejected() {
        let op = operation(OperationKind::Income, -100);
        assert!(matches!(
            op.validate(),
            Err(EngineError::ConstraintViolation(_))
        ));
    }

    #[test]
    fn positive_expense_is_rejected() {
        let op = operation(OperationKind::Expense, 100);
        assert!(op.validate().is_err());
    }

    #[test]
    fn zero_amount_fits_both_signs() {
        assert!(operation(OperationKind::Income, 0).validate().is_ok());
        assert!(operation(OperationKind::Expense, 0).validate().is_ok());
    }

    #[test]
    fn unpaired_transfer_is_rejected() {
        let mut op = operation(OperationKind::Transfer, -100);
        assert!(op.validate().is_err());
        op.transaction_no = 3;
        assert!(op.validate().is_ok());
    }

    #[test]
    fn normalize_drops_seconds_and_scale() {
        let mut op = operation(OperationKind::Expense, -1000);
        op.normalize();
        assert_eq!(op.date_time.second(), 0);
        assert_eq!(op.amount.to_string(), "-10");
        assert_eq!(op.currency_code, "GEL");
    }

    #[test]
    fn kind_round_trips_through_storage_text() {
        for kind in [
            OperationKind::Income,
            OperationKind::Expense,
            OperationKind::Transfer,
        ] {
            assert_eq!(OperationKind::try_from(kind.as_str()).unwrap(), kind);
        }
        assert!(OperationKind::try_from("Refund").is_err());
    }
}
