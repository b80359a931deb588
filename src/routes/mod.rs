//! Route tables.

pub mod common;

use crate::auth::require_api_key;
use crate::handlers::{delivery, farmers, proof, sales};
use crate::state::AppState;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

/// Integration routes under `/spic_to_erp`, all behind the API key guard.
///
/// Static segments (`deliverydocuments`, `invoices`) are declared alongside
/// the parametric ones; the router prefers the static match.
pub fn erp_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/customers/:coop_id/farmers",
            post(farmers::create_customer).get(farmers::list_customers),
        )
        .route("/customers/:coop_id/farmers/:farmer_id", get(farmers::get_farmer))
        .route(
            "/customers/:coop_id/salesorders",
            post(sales::create_sales_order).get(sales::list_sales_orders),
        )
        .route(
            "/customers/:coop_id/salesorders/deliverydocuments",
            post(delivery::create_delivery_documents).get(delivery::list_delivery_documents),
        )
        .route(
            "/customers/:coop_id/salesorders/:order_id",
            get(sales::get_sales_order),
        )
        .route(
            "/customers/:coop_id/salesorders/:order_id/deliverydocuments",
            get(delivery::get_delivery_notes),
        )
        .route(
            "/customers/:coop_id/deliverydocuments/invoices",
            get(proof::list_proven_documents),
        )
        .route(
            "/customers/:coop_id/deliverydocuments/:delivery_note_id/proof",
            post(proof::create_proof),
        )
        .route(
            "/customers/:coop_id/deliverydocuments/:delivery_note_id/invoices",
            get(proof::get_invoices),
        )
        .route(
            "/vendors/:coop_id/farmers",
            post(farmers::create_vendor).get(farmers::list_vendors),
        )
        .route("/vendors/:coop_id/farmers/:farmer_id", get(farmers::get_farmer))
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .with_state(state)
}
