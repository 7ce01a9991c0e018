//! Route handlers, one module per resource.

pub mod categories;
pub mod events;
pub mod financials;
pub mod instances;
pub mod inventory;
pub mod orders;
pub mod price_points;
pub mod products;
pub mod sales;
pub mod suppliers;

use axum::Router;

use crate::state::AppState;

/// Assemble all resource routers.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(categories::router())
        .merge(products::router())
        .merge(inventory::router())
        .merge(instances::router())
        .merge(price_points::router())
        .merge(sales::router())
        .merge(suppliers::router())
        .merge(orders::router())
        .merge(events::router())
        .merge(financials::router())
}
