use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sqlx::{sqlite::SqliteRow, Row};

use crate::{
    error::{validation, AppError, AppResult, OptionExt},
    routes::products::fetch_product,
    state::AppState,
    types::{DiscountRequest, DiscountResponse, DiscountType},
};

const SELECT_DISCOUNT: &str = r#"SELECT id, product_id, discount_type, discount_value, start_date, end_date,
        is_active, description, created_at, updated_at
    FROM product_discounts"#;

fn discount_from_row(r: &SqliteRow) -> DiscountResponse {
    DiscountResponse {
        id: r.get::<i64, _>("id"),
        product_id: r.get::<i64, _>("product_id"),
        discount_type: r.get::<String, _>("discount_type"),
        discount_value: r.get::<f64, _>("discount_value"),
        start_date: r.get::<String, _>("start_date"),
        end_date: r.get::<Option<String>, _>("end_date"),
        is_active: r.get::<bool, _>("is_active"),
        description: r.get::<Option<String>, _>("description"),
        created_at: r.get::<String, _>("created_at"),
        updated_at: r.get::<Option<String>, _>("updated_at"),
    }
}

fn check_value(discount_type: DiscountType, value: f64) -> AppResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AppError::ValidationError {
            field: "discount_value".into(),
            message: format!("discount_value must be greater than 0, got {}", value),
        });
    }
    if discount_type == DiscountType::Percentage && value > 100.0 {
        return Err(AppError::ValidationError {
            field: "discount_value".into(),
            message: format!("percentage discount must not exceed 100, got {}", value),
        });
    }
    Ok(())
}

pub async fn add_discount(
    State(state): State<AppState>,
    Json(req): Json<DiscountRequest>,
) -> AppResult<impl IntoResponse> {
    check_value(req.discount_type, req.discount_value)?;
    if let Some(end) = req.end_date {
        if end < req.start_date {
            return Err(AppError::ValidationError {
                field: "end_date".into(),
                message: "end_date must not be before start_date".into(),
            });
        }
    }
    let description = validation::optional_text(req.description.as_deref(), "description", 2000)?;

    if fetch_product(&state.db, req.product_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Product with ID {} not found.", req.product_id)));
    }

    let id = sqlx::query(
        r#"INSERT INTO product_discounts (product_id, discount_type, discount_value, start_date, end_date,
                is_active, description)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
    )
    .bind(req.product_id)
    .bind(req.discount_type.as_str())
    .bind(req.discount_value)
    .bind(req.start_date.to_string())
    .bind(req.end_date.map(|d| d.to_string()))
    .bind(req.is_active)
    .bind(&description)
    .execute(&state.db)
    .await?
    .last_insert_rowid();

    let row = sqlx::query(&format!("{} WHERE id = ?1", SELECT_DISCOUNT))
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    let item = row.as_ref().map(discount_from_row).ok_or_not_found("Discount")?;
    state.metrics.inc_discounts_created();
    tracing::info!("Created {} discount {} for product {}", item.discount_type, item.id, item.product_id);
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_discounts(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    if fetch_product(&state.db, product_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)));
    }
    let rows = sqlx::query(&format!("{} WHERE product_id = ?1 ORDER BY start_date DESC, id DESC", SELECT_DISCOUNT))
        .bind(product_id)
        .fetch_all(&state.db)
        .await?;
    let items: Vec<DiscountResponse> = rows.iter().map(discount_from_row).collect();
    Ok(Json(items))
}
