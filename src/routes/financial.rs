use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::SecondsFormat;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::{
    error::{validation, AppError, AppResult, OptionExt},
    state::AppState,
    types::{QuarterRequest, QuarterResponse},
};

const SELECT_QUARTER: &str =
    "SELECT id, year, start_date, end_date, description, date_created FROM financial_quarters";

fn quarter_from_row(r: &SqliteRow) -> QuarterResponse {
    QuarterResponse {
        id: r.get::<i64, _>("id"),
        year: r.get::<i64, _>("year"),
        start_date: r.get::<String, _>("start_date"),
        end_date: r.get::<String, _>("end_date"),
        description: r.get::<Option<String>, _>("description"),
        date_created: r.get::<String, _>("date_created"),
    }
}

pub(crate) async fn fetch_quarter(db: &SqlitePool, id: i64) -> AppResult<Option<QuarterResponse>> {
    let row = sqlx::query(&format!("{} WHERE id = ?1", SELECT_QUARTER))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row.as_ref().map(quarter_from_row))
}

pub async fn add_quarter(
    State(state): State<AppState>,
    Json(req): Json<QuarterRequest>,
) -> AppResult<impl IntoResponse> {
    if req.end_date < req.start_date {
        return Err(AppError::ValidationError {
            field: "end_date".into(),
            message: "end_date must not be before start_date".into(),
        });
    }
    let description = validation::optional_text(req.description.as_deref(), "description", 2000)?;

    let id = sqlx::query(
        "INSERT INTO financial_quarters (year, start_date, end_date, description) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(req.year)
    .bind(req.start_date.to_rfc3339_opts(SecondsFormat::Secs, true))
    .bind(req.end_date.to_rfc3339_opts(SecondsFormat::Secs, true))
    .bind(&description)
    .execute(&state.db)
    .await?
    .last_insert_rowid();

    let item = fetch_quarter(&state.db, id).await?.ok_or_not_found("Financial quarter")?;
    state.metrics.inc_quarters_created();
    tracing::info!("Created financial quarter {} for {}", item.id, item.year);
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_quarters(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rows = sqlx::query(&format!("{} ORDER BY id DESC", SELECT_QUARTER))
        .fetch_all(&state.db)
        .await?;
    let items: Vec<QuarterResponse> = rows.iter().map(quarter_from_row).collect();
    Ok(Json(items))
}

pub async fn get_quarter_by_id(
    State(state): State<AppState>,
    Path(quarter_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let item = fetch_quarter(&state.db, quarter_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Financial quarter with id {} not found.", quarter_id)))?;
    Ok(Json(item))
}
