//! HTTP route handlers for the inventory API.
//!
//! Each sub-module covers one resource:
//!
//! - `categories`: product categories
//! - `discounts`: product discounts
//! - `employees`: user groups and employees
//! - `financial`: financial quarters
//! - `health`: greeting, health, readiness, metrics and version endpoints
//! - `products`: products and stand-alone barcode validation

pub mod categories;
pub mod discounts;
pub mod employees;
pub mod financial;
pub mod health;
pub mod products;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

/// Builds the API router without transport layers (tracing, CORS, body limit).
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/metrics", get(health::metrics))
        .route("/metrics/prometheus", get(health::metrics_prometheus))
        .route("/version", get(health::version))
        .route("/category/add_category", post(categories::add_category))
        .route("/category/get_categories", get(categories::get_categories))
        .route("/category/get_category_by_id/{category_id}", get(categories::get_category_by_id))
        .route("/category/get_category_by_code/{category_code}", get(categories::get_category_by_code))
        .route("/category/update_category/{category_id}", put(categories::update_category))
        .route("/financial/add_quarter", post(financial::add_quarter))
        .route("/financial/get_quarters", get(financial::get_quarters))
        .route("/financial/get_quarter_id/{quarter_id}", get(financial::get_quarter_by_id))
        .route("/products/add_products", post(products::add_product))
        .route("/products/get_products", get(products::get_products))
        .route("/products/get_product_by_id/{product_id}", get(products::get_product_by_id))
        .route("/products/get_product_by_code/{product_code}", get(products::get_product_by_code))
        .route("/products/validate_barcode", post(products::validate_barcode))
        .route("/discounts/add_discount", post(discounts::add_discount))
        .route("/discounts/get_discounts/{product_id}", get(discounts::get_discounts))
        .route("/employees/add_user_group", post(employees::add_user_group))
        .route("/employees/get_user_groups", get(employees::get_user_groups))
        .route("/employees/add_employee", post(employees::add_employee))
        .route("/employees/get_employees", get(employees::get_employees))
        .route("/employees/get_employee/{employee_id}", get(employees::get_employee))
        .with_state(state)
}
