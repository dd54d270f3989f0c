//! Currency registry.
//!
//! Codes are the natural key. They are trimmed and upper-cased before every
//! lookup and write, so `"usd"` and `"USD"` address the same row.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, util::normalize_optional_text};

const MAX_CODE_LEN: usize = 10;
const MAX_DESCRIPTION_LEN: usize = 30;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub description: Option<String>,
}

impl Currency {
    pub fn new(code: &str, description: Option<&str>) -> Self {
        let mut currency = Self {
            code: code.to_string(),
            description: description.map(ToString::to_string),
        };
        currency.normalize();
        currency
    }

    /// Canonical form used for lookups and storage.
    pub(crate) fn normalize(&mut self) {
        self.code = normalize_code(&self.code);
        self.description = normalize_optional_text(self.description.take());
    }

    pub(crate) fn validate(&self) -> ResultEngine<()> {
        if self.code.is_empty() {
            return Err(EngineError::ConstraintViolation(
                "currency code must not be empty".to_string(),
            ));
        }
        if self.code.chars().count() > MAX_CODE_LEN {
            return Err(EngineError::ConstraintViolation(format!(
                "currency code '{}' longer than {MAX_CODE_LEN} characters",
                self.code
            )));
        }
        if let Some(description) = &self.description
            && description.chars().count() > MAX_DESCRIPTION_LEN
        {
            return Err(EngineError::ConstraintViolation(format!(
                "description of currency '{}' longer than {MAX_DESCRIPTION_LEN} characters",
                self.code
            )));
        }
        Ok(())
    }
}

pub(crate) fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "currency")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::accounts::Entity")]
    Accounts,
    #[sea_orm(has_many = "super::operations::Entity")]
    Operations,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::operations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Operations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Currency> for ActiveModel {
    fn from(currency: &Currency) -> Self {
        Self {
            code: ActiveValue::Set(currency.code.clone()),
            description: ActiveValue::Set(currency.description.clone()),
        }
    }
}

impl From<Model> for Currency {
    fn from(model: Model) -> Self {
        Self {
            code: model.code,
            description: model.description,
        }
    }
}
