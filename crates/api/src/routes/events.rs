//! Event and travel expense route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
};

use tradepost_core::{EventId, ExpenseId};

use crate::db::{EventRepository, TravelExpenseRepository};
use crate::error::ApiError;
use crate::models::event::{
    CreateEventInput, CreateTravelExpenseInput, Event, EventProductSummary, TravelExpense,
    UpdateEventInput, UpdateTravelExpenseInput,
};
use crate::state::AppState;

/// Build the events router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/{id}",
            get(get_event).patch(update_event).delete(delete_event),
        )
        .route("/events/{id}/products", get(event_products))
        .route("/events/{id}/travel-expenses", get(event_travel_expenses))
        .route(
            "/events/{id}/calculate-end-budget",
            patch(calculate_end_budget),
        )
        .route("/travel-expenses", axum::routing::post(create_expense))
        .route(
            "/travel-expenses/{id}",
            patch(update_expense).delete(delete_expense),
        )
}

/// Create an event.
pub async fn create_event(
    State(state): State<AppState>,
    Json(input): Json<CreateEventInput>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_owned()));
    }

    let event = EventRepository::new(state.pool()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// List events, most recent first.
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    let events = EventRepository::new(state.pool()).list().await?;
    Ok(Json(events))
}

/// Get an event by ID.
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<EventId>,
) -> Result<Json<Event>, ApiError> {
    let event = EventRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("event {id} not found")))?;
    Ok(Json(event))
}

/// Update an event.
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<EventId>,
    Json(input): Json<UpdateEventInput>,
) -> Result<Json<Event>, ApiError> {
    let event = EventRepository::new(state.pool()).update(id, &input).await?;
    Ok(Json(event))
}

/// Delete an event and its travel expenses.
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<EventId>,
) -> Result<StatusCode, ApiError> {
    let deleted = EventRepository::new(state.pool()).delete(id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("event {id} not found")))
    }
}

/// Products sold during the event window.
pub async fn event_products(
    State(state): State<AppState>,
    Path(id): Path<EventId>,
) -> Result<Json<Vec<EventProductSummary>>, ApiError> {
    let products = EventRepository::new(state.pool()).products_sold(id).await?;
    Ok(Json(products))
}

/// Travel expenses for an event.
pub async fn event_travel_expenses(
    State(state): State<AppState>,
    Path(id): Path<EventId>,
) -> Result<Json<Vec<TravelExpense>>, ApiError> {
    if EventRepository::new(state.pool()).get(id).await?.is_none() {
        return Err(ApiError::NotFound(format!("event {id} not found")));
    }
    let expenses = TravelExpenseRepository::new(state.pool())
        .list_for_event(id)
        .await?;
    Ok(Json(expenses))
}

/// Compute and store the event's end budget.
pub async fn calculate_end_budget(
    State(state): State<AppState>,
    Path(id): Path<EventId>,
) -> Result<Json<Event>, ApiError> {
    let event = EventRepository::new(state.pool())
        .calculate_end_budget(id)
        .await?;
    Ok(Json(event))
}

/// Record a travel expense.
pub async fn create_expense(
    State(state): State<AppState>,
    Json(input): Json<CreateTravelExpenseInput>,
) -> Result<(StatusCode, Json<TravelExpense>), ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_owned()));
    }

    let expense = TravelExpenseRepository::new(state.pool())
        .create(&input)
        .await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

/// Update a travel expense.
pub async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<ExpenseId>,
    Json(input): Json<UpdateTravelExpenseInput>,
) -> Result<Json<TravelExpense>, ApiError> {
    let expense = TravelExpenseRepository::new(state.pool())
        .update(id, &input)
        .await?;
    Ok(Json(expense))
}

/// Delete a travel expense.
pub async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<ExpenseId>,
) -> Result<StatusCode, ApiError> {
    let deleted = TravelExpenseRepository::new(state.pool()).delete(id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("travel expense {id} not found")))
    }
}
