//! # Invenapp Backend Library
//!
//! Inventory management backend: products, categories, financial quarters,
//! discounts and employees stored in SQLite and served over a JSON API.
//!
//! ## Architecture
//!
//! - **Axum**: HTTP server and routing
//! - **SQLx**: asynchronous SQLite access
//! - **Tokio**: async runtime
//! - **Serde**: JSON (de)serialization
//!
//! ## Core Components
//!
//! - [`barcode`]: barcode normalization, format rules and check-digit validation
//! - [`config`]: layered configuration loading
//! - [`db`]: schema initialization
//! - [`error`]: centralized error handling and HTTP error responses
//! - [`metrics`]: record and barcode counters
//! - [`routes`]: HTTP API endpoint handlers
//! - [`state`]: shared application state
//! - [`types`]: request and response bodies
//!
//! Every product barcode passes through [`barcode::validate`] before it is stored;
//! a rejected barcode becomes a `422` response and nothing is written.

pub mod barcode;
pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
