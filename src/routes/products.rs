use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::{
    barcode::{self, Symbology},
    error::{validation, AppError, AppResult, OptionExt},
    routes::{categories::fetch_category, financial::fetch_quarter},
    state::AppState,
    types::{BarcodeCheckRequest, BarcodeCheckResponse, ProductRequest, ProductResponse},
};

/// Column width of `products.barcode`; variable-length symbologies are capped here.
const MAX_BARCODE_CHARS: usize = 50;

const SELECT_PRODUCT: &str = r#"SELECT id, product_code, product_name, barcode, barcode_type, description,
        category_id, selling_price, stock_count, reorder_level, financial_quarter_id,
        date_added, date_modified
    FROM products"#;

fn product_from_row(r: &SqliteRow) -> ProductResponse {
    ProductResponse {
        id: r.get::<i64, _>("id"),
        product_code: r.get::<String, _>("product_code"),
        product_name: r.get::<String, _>("product_name"),
        barcode: r.get::<String, _>("barcode"),
        barcode_type: r.get::<String, _>("barcode_type"),
        description: r.get::<String, _>("description"),
        category_id: r.get::<i64, _>("category_id"),
        selling_price: r.get::<f64, _>("selling_price"),
        stock_count: r.get::<i64, _>("stock_count"),
        reorder_level: r.get::<i64, _>("reorder_level"),
        financial_quarter_id: r.get::<i64, _>("financial_quarter_id"),
        date_added: r.get::<String, _>("date_added"),
        date_modified: r.get::<Option<String>, _>("date_modified"),
    }
}

pub(crate) async fn fetch_product(db: &SqlitePool, id: i64) -> AppResult<Option<ProductResponse>> {
    let row = sqlx::query(&format!("{} WHERE id = ?1", SELECT_PRODUCT))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row.as_ref().map(product_from_row))
}

/// Runs the barcode validator on an untyped request field and records the outcome.
///
/// `max_chars` is the storage cap; a barcode that validates but exceeds it is
/// counted as a length rejection rather than as accepted.
fn check_barcode(
    state: &AppState,
    barcode_type: Option<&str>,
    barcode: Option<&serde_json::Value>,
    max_chars: Option<usize>,
) -> AppResult<(Symbology, String)> {
    let outcome = barcode::validate_tagged(barcode_type, barcode.and_then(|v| v.as_str()));
    if let (Ok((_, value)), Some(max)) = (&outcome, max_chars) {
        if value.chars().count() > max {
            state.metrics.inc_barcodes_rejected_length();
            return Err(AppError::ValidationError {
                field: "barcode".into(),
                message: format!("barcode must be at most {} characters", max),
            });
        }
    }
    state.metrics.record_barcode(&outcome);
    outcome.map_err(|e| {
        tracing::debug!("Rejected barcode: {}", e);
        AppError::from(e)
    })
}

pub async fn add_product(
    State(state): State<AppState>,
    Json(req): Json<ProductRequest>,
) -> AppResult<impl IntoResponse> {
    let (symbology, barcode) = check_barcode(
        &state,
        req.barcode_type.as_deref(),
        req.barcode.as_ref(),
        Some(MAX_BARCODE_CHARS),
    )?;

    let product_code = validation::required_text(&req.product_code, "product_code", 5)?;
    let product_name = validation::required_text(&req.product_name, "product_name", 150)?;
    let description = validation::required_text(&req.description, "description", 2000)?;
    validation::non_negative_amount(req.selling_price, "selling_price")?;
    validation::non_negative(req.stock_count, "stock_count")?;
    validation::non_negative(req.reorder_level, "reorder_level")?;
    if req.reorder_level > req.stock_count {
        return Err(AppError::ValidationError {
            field: "reorder_level".into(),
            message: format!(
                "reorder_level ({}) must not exceed stock_count ({})",
                req.reorder_level, req.stock_count
            ),
        });
    }

    if fetch_category(&state.db, req.category_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Category with ID {} not found.", req.category_id)));
    }
    if fetch_quarter(&state.db, req.financial_quarter_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Financial quarter with id {} not found.",
            req.financial_quarter_id
        )));
    }

    let duplicate = sqlx::query("SELECT product_code, barcode FROM products WHERE product_code = ?1 OR barcode = ?2")
        .bind(&product_code)
        .bind(&barcode)
        .fetch_optional(&state.db)
        .await?;
    if let Some(row) = duplicate {
        let message = if row.get::<String, _>("product_code") == product_code {
            format!("A product with code {} already exists.", product_code)
        } else {
            format!("A product with barcode {} already exists.", barcode)
        };
        return Err(AppError::Conflict(message));
    }

    let id = sqlx::query(
        r#"INSERT INTO products (product_code, product_name, barcode, barcode_type, description,
                category_id, selling_price, stock_count, reorder_level, financial_quarter_id)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"#,
    )
    .bind(&product_code)
    .bind(&product_name)
    .bind(&barcode)
    .bind(symbology.as_str())
    .bind(&description)
    .bind(req.category_id)
    .bind(req.selling_price)
    .bind(req.stock_count)
    .bind(req.reorder_level)
    .bind(req.financial_quarter_id)
    .execute(&state.db)
    .await?
    .last_insert_rowid();

    let item = fetch_product(&state.db, id).await?.ok_or_not_found("Product")?;
    state.metrics.inc_products_created();
    tracing::info!("Created product {} with {} barcode {}", item.product_code, symbology, item.barcode);
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_products(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rows = sqlx::query(&format!("{} ORDER BY id DESC", SELECT_PRODUCT))
        .fetch_all(&state.db)
        .await?;
    let items: Vec<ProductResponse> = rows.iter().map(product_from_row).collect();
    Ok(Json(items))
}

pub async fn get_product_by_id(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let item = fetch_product(&state.db, product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found.", product_id)))?;
    Ok(Json(item))
}

pub async fn get_product_by_code(
    State(state): State<AppState>,
    Path(product_code): Path<String>,
) -> AppResult<impl IntoResponse> {
    let row = sqlx::query(&format!("{} WHERE product_code = ?1", SELECT_PRODUCT))
        .bind(&product_code)
        .fetch_optional(&state.db)
        .await?;
    let item = row
        .as_ref()
        .map(product_from_row)
        .ok_or_else(|| AppError::NotFound(format!("Product with code {} not found.", product_code)))?;
    Ok(Json(item))
}

/// Validates a barcode without touching the store.
pub async fn validate_barcode(
    State(state): State<AppState>,
    Json(req): Json<BarcodeCheckRequest>,
) -> AppResult<impl IntoResponse> {
    let (symbology, barcode) = check_barcode(&state, req.barcode_type.as_deref(), req.barcode.as_ref(), None)?;
    Ok(Json(BarcodeCheckResponse {
        valid: true,
        barcode,
        barcode_type: symbology,
        has_check_digit: symbology.has_checksum(),
    }))
}
