use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::{
    error::{validation, AppError, AppResult, OptionExt},
    state::AppState,
    types::{CategoryRequest, CategoryResponse},
};

const SELECT_CATEGORY: &str =
    "SELECT id, code, category, description, date_created, date_updated FROM product_category";

fn category_from_row(r: &SqliteRow) -> CategoryResponse {
    CategoryResponse {
        id: r.get::<i64, _>("id"),
        code: r.get::<String, _>("code"),
        category: r.get::<String, _>("category"),
        description: r.get::<Option<String>, _>("description"),
        date_created: r.get::<String, _>("date_created"),
        date_updated: r.get::<Option<String>, _>("date_updated"),
    }
}

pub(crate) async fn fetch_category(db: &SqlitePool, id: i64) -> AppResult<Option<CategoryResponse>> {
    let row = sqlx::query(&format!("{} WHERE id = ?1", SELECT_CATEGORY))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row.as_ref().map(category_from_row))
}

struct CategoryFields {
    code: String,
    category: String,
    description: Option<String>,
}

fn check_fields(req: &CategoryRequest) -> AppResult<CategoryFields> {
    Ok(CategoryFields {
        code: validation::required_text(&req.code, "code", 5)?,
        category: validation::required_text(&req.category, "category", 50)?,
        description: validation::optional_text(req.description.as_deref(), "description", 2000)?,
    })
}

pub async fn add_category(
    State(state): State<AppState>,
    Json(req): Json<CategoryRequest>,
) -> AppResult<impl IntoResponse> {
    let fields = check_fields(&req)?;

    let existing = sqlx::query("SELECT id FROM product_category WHERE code = ?1")
        .bind(&fields.code)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(format!("A category with code {} already exists.", fields.code)));
    }

    let id = sqlx::query("INSERT INTO product_category (code, category, description) VALUES (?1, ?2, ?3)")
        .bind(&fields.code)
        .bind(&fields.category)
        .bind(&fields.description)
        .execute(&state.db)
        .await?
        .last_insert_rowid();

    let item = fetch_category(&state.db, id).await?.ok_or_not_found("Category")?;
    state.metrics.inc_categories_created();
    tracing::info!("Created category {} ({})", item.code, item.id);
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rows = sqlx::query(&format!("{} ORDER BY id DESC", SELECT_CATEGORY))
        .fetch_all(&state.db)
        .await?;
    let items: Vec<CategoryResponse> = rows.iter().map(category_from_row).collect();
    Ok(Json(items))
}

pub async fn get_category_by_id(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let item = fetch_category(&state.db, category_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category with ID {} not found.", category_id)))?;
    Ok(Json(item))
}

pub async fn get_category_by_code(
    State(state): State<AppState>,
    Path(category_code): Path<String>,
) -> AppResult<impl IntoResponse> {
    let row = sqlx::query(&format!("{} WHERE code = ?1", SELECT_CATEGORY))
        .bind(&category_code)
        .fetch_optional(&state.db)
        .await?;
    let item = row
        .as_ref()
        .map(category_from_row)
        .ok_or_else(|| AppError::NotFound(format!("Category with code {} not found.", category_code)))?;
    Ok(Json(item))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
    Json(req): Json<CategoryRequest>,
) -> AppResult<impl IntoResponse> {
    let fields = check_fields(&req)?;

    let result = sqlx::query(
        r#"UPDATE product_category
           SET code = ?1, category = ?2, description = ?3,
               date_updated = strftime('%Y-%m-%dT%H:%M:%SZ','now')
           WHERE id = ?4"#,
    )
    .bind(&fields.code)
    .bind(&fields.category)
    .bind(&fields.description)
    .bind(category_id)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Category with id {} not found.", category_id)));
    }

    let item = fetch_category(&state.db, category_id).await?.ok_or_not_found("Category")?;
    Ok(Json(item))
}
