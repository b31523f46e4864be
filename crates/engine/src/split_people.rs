//! Per-person rows of a split, ordered by `position`.

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, SplitPerson};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "split_people")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub split_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub position: i32,
    pub name: String,
    pub amount_minor: i64,
    pub settled: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::splits::Entity",
        from = "Column::SplitId",
        to = "super::splits::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Splits,
}

impl Related<super::splits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Splits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SplitPerson {
    fn from(value: Model) -> Self {
        Self {
            name: value.name,
            amount_minor: value.amount_minor,
            settled: value.settled,
        }
    }
}

/// Build the row for the person at `position` of split `split_id`.
pub(crate) fn active_model(
    split_id: Uuid,
    position: usize,
    person: &SplitPerson,
) -> ResultEngine<ActiveModel> {
    let position = i32::try_from(position)
        .map_err(|_| EngineError::InvalidInput("too many people".to_string()))?;
    Ok(ActiveModel {
        split_id: ActiveValue::Set(split_id.to_string()),
        position: ActiveValue::Set(position),
        name: ActiveValue::Set(person.name.clone()),
        amount_minor: ActiveValue::Set(person.amount_minor),
        settled: ActiveValue::Set(person.settled),
    })
}
