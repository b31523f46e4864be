//! Shared-expense splits.
//!
//! A `Split` records who owes a share of a bill. It never holds money: the
//! only state that changes after creation is the per-person `settled` flag
//! and the aggregate flag derived from it.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine, split_people, util::parse_uuid};

/// One participant of a split.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPerson {
    pub name: String,
    pub amount_minor: i64,
    pub settled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub id: Uuid,
    pub owner_id: String,
    pub amount_minor: i64,
    pub category: String,
    pub people: Vec<SplitPerson>,
    /// `true` iff every person is settled.
    pub settled: bool,
    pub created_at: DateTime<Utc>,
}

impl Split {
    /// Builds an even split of `amount_minor` between `names`.
    ///
    /// Each share is rounded half-up to the paisa; the rounding remainder is
    /// kept visible through [`Split::remainder_minor`].
    pub fn even(
        owner_id: &str,
        amount_minor: i64,
        names: Vec<String>,
        category: String,
    ) -> ResultEngine<Self> {
        if names.is_empty() {
            return Err(EngineError::InvalidInput(
                "a split needs at least one person".to_string(),
            ));
        }
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        let share = MoneyCents::new(amount_minor).split_even(names.len())?;
        let people = names
            .into_iter()
            .map(|name| SplitPerson {
                name,
                amount_minor: share.cents(),
                settled: false,
            })
            .collect();

        Ok(Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.to_string(),
            amount_minor,
            category,
            people,
            settled: false,
            created_at: Utc::now(),
        })
    }

    pub fn num_people(&self) -> usize {
        self.people.len()
    }

    /// Sum of all assigned shares.
    pub fn assigned_minor(&self) -> i64 {
        self.people
            .iter()
            .fold(MoneyCents::ZERO, |acc, p| acc + MoneyCents::new(p.amount_minor))
            .cents()
    }

    /// Total minus assigned shares: the rounding artifact of an even split.
    pub fn remainder_minor(&self) -> i64 {
        (MoneyCents::new(self.amount_minor) - MoneyCents::new(self.assigned_minor())).cents()
    }

    /// Marks one person as settled. Returns `true` if the state changed.
    pub fn settle_person(&mut self, index: usize) -> ResultEngine<bool> {
        let len = self.people.len();
        let person = self.people.get_mut(index).ok_or_else(|| {
            EngineError::InvalidInput(format!(
                "person index {index} out of range (split has {len} people)"
            ))
        })?;
        let changed = !person.settled;
        person.settled = true;
        self.refresh_settled();
        Ok(changed)
    }

    /// Marks every person as settled.
    pub fn settle_all(&mut self) {
        for person in &mut self.people {
            person.settled = true;
        }
        self.refresh_settled();
    }

    fn refresh_settled(&mut self) {
        self.settled = self.people.iter().all(|p| p.settled);
    }

    pub(crate) fn from_models(
        model: Model,
        people: Vec<split_people::Model>,
    ) -> ResultEngine<Self> {
        let mut people = people;
        people.sort_by_key(|p| p.position);
        let people: Vec<SplitPerson> = people.into_iter().map(SplitPerson::from).collect();
        if usize::try_from(model.num_people).ok() != Some(people.len()) {
            return Err(EngineError::InvalidInput(format!(
                "split {} has {} people stored, expected {}",
                model.id,
                people.len(),
                model.num_people
            )));
        }

        Ok(Self {
            id: parse_uuid(&model.id, "split")?,
            owner_id: model.owner_id,
            amount_minor: model.amount_minor,
            category: model.category,
            people,
            settled: model.settled,
            created_at: model.created_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "splits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub amount_minor: i64,
    pub num_people: i32,
    pub category: String,
    pub settled: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::split_people::Entity")]
    People,
}

impl Related<super::split_people::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::People.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<&Split> for ActiveModel {
    type Error = EngineError;

    fn try_from(value: &Split) -> Result<Self, Self::Error> {
        let num_people = i32::try_from(value.people.len())
            .map_err(|_| EngineError::InvalidInput("too many people".to_string()))?;
        Ok(Self {
            id: ActiveValue::Set(value.id.to_string()),
            owner_id: ActiveValue::Set(value.owner_id.clone()),
            amount_minor: ActiveValue::Set(value.amount_minor),
            num_people: ActiveValue::Set(num_people),
            category: ActiveValue::Set(value.category.clone()),
            settled: ActiveValue::Set(value.settled),
            created_at: ActiveValue::Set(value.created_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn even_split_reports_rounding_remainder() {
        let split = Split::even("alice", 10_000, names(&["A", "B", "C"]), "Dinner".into()).unwrap();
        assert!(split.people.iter().all(|p| p.amount_minor == 3_333));
        assert_eq!(split.assigned_minor(), 9_999);
        assert_eq!(split.remainder_minor(), 1);
        assert!(split.people.iter().all(|p| !p.settled));
        assert!(!split.settled);
    }

    #[test]
    fn even_split_without_remainder() {
        let split = Split::even("alice", 9_000, names(&["X", "Y", "Z"]), "Taxi".into()).unwrap();
        assert!(split.people.iter().all(|p| p.amount_minor == 3_000));
        assert_eq!(split.remainder_minor(), 0);
    }

    #[test]
    fn settle_person_keeps_aggregate_false_until_everyone_paid() {
        let mut split =
            Split::even("alice", 9_000, names(&["X", "Y", "Z"]), "Taxi".into()).unwrap();

        assert!(split.settle_person(1).unwrap());
        assert!(split.people[1].settled);
        assert!(!split.settled);

        split.settle_person(0).unwrap();
        split.settle_person(2).unwrap();
        assert!(split.settled);
    }

    #[test]
    fn settle_person_is_idempotent() {
        let mut once = Split::even("alice", 9_000, names(&["X", "Y"]), "Taxi".into()).unwrap();
        once.settle_person(0).unwrap();
        let mut twice = once.clone();
        assert!(!twice.settle_person(0).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn settle_person_rejects_out_of_range_index() {
        let mut split = Split::even("alice", 9_000, names(&["X"]), "Taxi".into()).unwrap();
        assert!(matches!(
            split.settle_person(1),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(!split.settled);
    }

    #[test]
    fn settle_all_sets_aggregate() {
        let mut split =
            Split::even("alice", 9_000, names(&["X", "Y", "Z"]), "Taxi".into()).unwrap();
        split.settle_all();
        assert!(split.people.iter().all(|p| p.settled));
        assert!(split.settled);
    }

    #[test]
    fn even_requires_people() {
        assert!(Split::even("alice", 9_000, Vec::new(), "Taxi".into()).is_err());
    }
}
