use sea_orm::{QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Expense, ExpenseFilter, ExpenseSummary, ResultEngine, expenses,
};

use super::{Engine, normalize_optional_text, normalize_required_text};

impl Engine {
    pub async fn create_expense(
        &self,
        owner_id: &str,
        amount_minor: i64,
        category: &str,
        note: Option<&str>,
    ) -> ResultEngine<Expense> {
        let category = normalize_required_text(category, "category")?;
        let expense = Expense::new(
            owner_id,
            amount_minor,
            category,
            normalize_optional_text(note),
        )?;
        expenses::ActiveModel::from(&expense)
            .insert(&self.database)
            .await?;
        Ok(expense)
    }

    /// Expenses of `owner_id` matching `filter`, newest first.
    pub async fn list_expenses(
        &self,
        owner_id: &str,
        filter: &ExpenseFilter,
    ) -> ResultEngine<Vec<Expense>> {
        if let (Some(from), Some(to)) = (filter.from, filter.to)
            && from > to
        {
            return Err(EngineError::InvalidInput(
                "`from` must not be after `to`".to_string(),
            ));
        }

        let mut query = expenses::Entity::find()
            .filter(expenses::Column::OwnerId.eq(owner_id))
            .order_by_desc(expenses::Column::CreatedAt);
        if let Some(from) = filter.from {
            query = query.filter(expenses::Column::CreatedAt.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(expenses::Column::CreatedAt.lte(to));
        }

        let mut out = Vec::new();
        for model in query.all(&self.database).await? {
            let expense = Expense::try_from(model)?;
            if filter.matches(&expense) {
                out.push(expense);
            }
        }
        Ok(out)
    }

    pub async fn delete_expense(&self, owner_id: &str, expense_id: Uuid) -> ResultEngine<()> {
        let deleted = expenses::Entity::delete_many()
            .filter(expenses::Column::Id.eq(expense_id.to_string()))
            .filter(expenses::Column::OwnerId.eq(owner_id))
            .exec(&self.database)
            .await?;
        if deleted.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("expense not exists".to_string()));
        }
        Ok(())
    }

    /// Totals per month and per category over the filtered expenses.
    pub async fn expense_summary(
        &self,
        owner_id: &str,
        filter: &ExpenseFilter,
    ) -> ResultEngine<ExpenseSummary> {
        let expenses = self.list_expenses(owner_id, filter).await?;
        ExpenseSummary::from_expenses(&expenses)
    }
}
