//! Accounts hold money in one currency. Ids are assigned by the store.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, currencies::normalize_code, util::require_text};

const MAX_NAME_LEN: usize = 30;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i32,
    pub name: String,
    pub currency_code: String,
}

impl Account {
    pub(crate) fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.currency_code = normalize_code(&self.currency_code);
    }

    pub(crate) fn validate(&self) -> ResultEngine<()> {
        require_text(&self.name, "account name", MAX_NAME_LEN)?;
        if self.currency_code.is_empty() {
            return Err(EngineError::ConstraintViolation(format!(
                "account '{}' has no currency",
                self.name
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "account")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub currency_code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::currencies::Entity",
        from = "Column::CurrencyCode",
        to = "super::currencies::Column::Code",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Currency,
    #[sea_orm(has_many = "super::operations::Entity")]
    Operations,
}

impl Related<super::currencies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Currency.def()
    }
}

impl Related<super::operations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Operations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Insert model: the id is left to the store.
pub(crate) fn new_active(account: &Account) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::NotSet,
        name: ActiveValue::Set(account.name.clone()),
        currency_code: ActiveValue::Set(account.currency_code.clone()),
    }
}

impl From<&Account> for ActiveModel {
    fn from(account: &Account) -> Self {
        Self {
            id: ActiveValue::Unchanged(account.id),
            name: ActiveValue::Set(account.name.clone()),
            currency_code: ActiveValue::Set(account.currency_code.clone()),
        }
    }
}

impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            currency_code: model.currency_code,
        }
    }
}
