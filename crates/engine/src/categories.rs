//! Category registry. A category belongs to exactly one operation kind.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, OperationKind, ResultEngine,
    util::{limit_text, normalize_optional_text, require_text},
};

const MAX_NAME_LEN: usize = 30;
const MAX_DESCRIPTION_LEN: usize = 250;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub kind: OperationKind,
    pub name: String,
    pub description: Option<String>,
}

impl Category {
    pub(crate) fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.description = normalize_optional_text(self.description.take());
    }

    pub(crate) fn validate(&self) -> ResultEngine<()> {
        require_text(&self.name, "category name", MAX_NAME_LEN)?;
        if let Some(description) = &self.description {
            limit_text(description, "category description", MAX_DESCRIPTION_LEN)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::operations::Entity")]
    Operations,
}

impl Related<super::operations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Operations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub(crate) fn new_active(category: &Category) -> ActiveModel {
    let mut active = ActiveModel::from(category);
    active.id = ActiveValue::NotSet;
    active
}

impl From<&Category> for ActiveModel {
    fn from(category: &Category) -> Self {
        Self {
            id: ActiveValue::Unchanged(category.id),
            kind: ActiveValue::Set(category.kind.as_str().to_string()),
            name: ActiveValue::Set(category.name.clone()),
            description: ActiveValue::Set(category.description.clone()),
        }
    }
}

impl TryFrom<Model> for Category {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            kind: OperationKind::try_from(model.kind.as_str())?,
            name: model.name,
            description: model.description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        let mut category = Category {
            id: 0,
            kind: OperationKind::Expense,
            name: "   ".to_string(),
            description: Some("  ".to_string()),
        };
        category.normalize();
        assert_eq!(category.description, None);
        assert!(matches!(
            category.validate(),
            Err(EngineError::ConstraintViolation(_))
        ));
    }
}
