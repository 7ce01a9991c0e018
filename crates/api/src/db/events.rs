//! Database operations for events and travel expenses.

use rust_decimal::Decimal;
use sqlx::PgPool;

use tradepost_core::{EventId, ExpenseId};

use super::RepositoryError;
use crate::models::event::{
    CreateEventInput, CreateTravelExpenseInput, Event, EventProductSummary, TravelExpense,
    UpdateEventInput, UpdateTravelExpenseInput,
};

const EVENT_COLUMNS: &str = "event_id, name, description, country, start_date, end_date, \
     initial_budget, end_budget, created_at, updated_at";

const EXPENSE_COLUMNS: &str =
    "expense_id, event_id, name, description, amount, expense_date, created_at, updated_at";

/// Repository for event database operations.
pub struct EventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepository<'a> {
    /// Create a new event repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` for a non-positive budget or an
    /// end date not after the start date.
    pub async fn create(&self, input: &CreateEventInput) -> Result<Event, RepositoryError> {
        if input.initial_budget <= Decimal::ZERO {
            return Err(RepositoryError::Invalid(
                "initial_budget must be positive".to_owned(),
            ));
        }
        if input.end_date <= input.start_date {
            return Err(RepositoryError::Invalid(
                "end_date must be after start_date".to_owned(),
            ));
        }

        let sql = format!(
            "INSERT INTO events (name, description, country, start_date, end_date, initial_budget)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {EVENT_COLUMNS}"
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(&input.name)
            .bind(input.description.as_deref())
            .bind(&input.country)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.initial_budget)
            .fetch_one(self.pool)
            .await?;
        Ok(event)
    }

    /// List events, most recent start date first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Event>, RepositoryError> {
        let sql =
            format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY start_date DESC, event_id DESC");
        let rows = sqlx::query_as::<_, Event>(&sql).fetch_all(self.pool).await?;
        Ok(rows)
    }

    /// Get an event by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: EventId) -> Result<Option<Event>, RepositoryError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE event_id = $1");
        let row = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Update an event. The dates that result from applying the patch must
    /// still be in order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the event doesn't exist,
    /// `RepositoryError::Invalid` for out-of-order dates or a non-positive
    /// budget.
    pub async fn update(
        &self,
        id: EventId,
        input: &UpdateEventInput,
    ) -> Result<Event, RepositoryError> {
        if input
            .initial_budget
            .is_some_and(|budget| budget <= Decimal::ZERO)
        {
            return Err(RepositoryError::Invalid(
                "initial_budget must be positive".to_owned(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE event_id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let start_date = input.start_date.unwrap_or(current.start_date);
        let end_date = input.end_date.unwrap_or(current.end_date);
        if end_date <= start_date {
            return Err(RepositoryError::Invalid(
                "end_date must be after start_date".to_owned(),
            ));
        }

        let sql = format!(
            "UPDATE events
             SET name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 country = COALESCE($4, country),
                 start_date = $5,
                 end_date = $6,
                 initial_budget = COALESCE($7, initial_budget)
             WHERE event_id = $1
             RETURNING {EVENT_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.description.as_deref())
            .bind(input.country.as_deref())
            .bind(start_date)
            .bind(end_date)
            .bind(input.initial_budget)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete an event; its travel expenses cascade.
    ///
    /// # Returns
    ///
    /// Returns `true` if the event was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: EventId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM events WHERE event_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Products sold during the event's date window, with unit and revenue
    /// sums.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the event doesn't exist.
    pub async fn products_sold(
        &self,
        id: EventId,
    ) -> Result<Vec<EventProductSummary>, RepositoryError> {
        let event = self.get(id).await?.ok_or(RepositoryError::NotFound)?;

        let rows = sqlx::query_as::<_, EventProductSummary>(
            "SELECT p.product_id, p.sku, p.name,
                    COUNT(*)::bigint AS units_sold,
                    COALESCE(SUM(s.sale_price), 0) AS total_revenue
             FROM sales s
             JOIN products p ON p.product_id = s.product_id
             WHERE s.sale_date::date >= $1 AND s.sale_date::date <= $2
             GROUP BY p.product_id, p.sku, p.name
             ORDER BY total_revenue DESC",
        )
        .bind(event.start_date)
        .bind(event.end_date)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Compute and store the event's end budget: initial budget plus sales
    /// in the window, minus travel expenses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the event doesn't exist.
    pub async fn calculate_end_budget(&self, id: EventId) -> Result<Event, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE event_id = $1 FOR UPDATE");
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let sales_total: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(sale_price), 0) FROM sales
             WHERE sale_date::date >= $1 AND sale_date::date <= $2",
        )
        .bind(event.start_date)
        .bind(event.end_date)
        .fetch_one(&mut *tx)
        .await?;

        let expense_total: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM travel_expenses WHERE event_id = $1",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        let end_budget = event.initial_budget + sales_total - expense_total;

        let sql = format!(
            "UPDATE events SET end_budget = $2 WHERE event_id = $1 RETURNING {EVENT_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .bind(end_budget)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }
}

/// Repository for travel expense database operations.
pub struct TravelExpenseRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TravelExpenseRepository<'a> {
    /// Create a new travel expense repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a travel expense against an event.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` when the event does not exist or
    /// the amount is not positive.
    pub async fn create(
        &self,
        input: &CreateTravelExpenseInput,
    ) -> Result<TravelExpense, RepositoryError> {
        if input.amount <= Decimal::ZERO {
            return Err(RepositoryError::Invalid(
                "amount must be positive".to_owned(),
            ));
        }

        let sql = format!(
            "INSERT INTO travel_expenses (event_id, name, description, amount, expense_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {EXPENSE_COLUMNS}"
        );
        sqlx::query_as::<_, TravelExpense>(&sql)
            .bind(input.event_id)
            .bind(&input.name)
            .bind(input.description.as_deref())
            .bind(input.amount)
            .bind(input.expense_date)
            .fetch_one(self.pool)
            .await
            .map_err(|e| RepositoryError::from_foreign_key(e, "event does not exist"))
    }

    /// List the expenses for an event, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_event(
        &self,
        event_id: EventId,
    ) -> Result<Vec<TravelExpense>, RepositoryError> {
        let sql = format!(
            "SELECT {EXPENSE_COLUMNS} FROM travel_expenses
             WHERE event_id = $1
             ORDER BY expense_date, expense_id"
        );
        let rows = sqlx::query_as::<_, TravelExpense>(&sql)
            .bind(event_id)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Update a travel expense.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the expense doesn't exist,
    /// `RepositoryError::Invalid` for a non-positive amount.
    pub async fn update(
        &self,
        id: ExpenseId,
        input: &UpdateTravelExpenseInput,
    ) -> Result<TravelExpense, RepositoryError> {
        if input.amount.is_some_and(|amount| amount <= Decimal::ZERO) {
            return Err(RepositoryError::Invalid(
                "amount must be positive".to_owned(),
            ));
        }

        let sql = format!(
            "UPDATE travel_expenses
             SET name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 amount = COALESCE($4, amount),
                 expense_date = COALESCE($5, expense_date)
             WHERE expense_id = $1
             RETURNING {EXPENSE_COLUMNS}"
        );
        sqlx::query_as::<_, TravelExpense>(&sql)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.description.as_deref())
            .bind(input.amount)
            .bind(input.expense_date)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a travel expense.
    ///
    /// # Returns
    ///
    /// Returns `true` if the expense was deleted, `false` if it didn't
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ExpenseId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM travel_expenses WHERE expense_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
