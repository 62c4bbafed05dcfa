use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sqlx::{sqlite::SqliteRow, Row};

use crate::{
    error::{validation, AppError, AppResult, OptionExt},
    state::AppState,
    types::{EmployeeRequest, EmployeeResponse, UserGroupRequest, UserGroupResponse},
};

const SELECT_GROUP: &str = r#"SELECT id, "group", description, date_created FROM user_groups"#;

const SELECT_EMPLOYEE: &str = r#"SELECT id, employee_id, first_name, last_name, personal_email, company_email,
        user_group_id, status, date_created
    FROM employees"#;

fn group_from_row(r: &SqliteRow) -> UserGroupResponse {
    UserGroupResponse {
        id: r.get::<i64, _>("id"),
        group: r.get::<String, _>("group"),
        description: r.get::<Option<String>, _>("description"),
        date_created: r.get::<String, _>("date_created"),
    }
}

fn employee_from_row(r: &SqliteRow) -> EmployeeResponse {
    EmployeeResponse {
        id: r.get::<i64, _>("id"),
        employee_id: r.get::<String, _>("employee_id"),
        first_name: r.get::<String, _>("first_name"),
        last_name: r.get::<String, _>("last_name"),
        personal_email: r.get::<Option<String>, _>("personal_email"),
        company_email: r.get::<String, _>("company_email"),
        user_group_id: r.get::<i64, _>("user_group_id"),
        status: r.get::<String, _>("status"),
        date_created: r.get::<String, _>("date_created"),
    }
}

// ---------------------- user groups ----------------------

pub async fn add_user_group(
    State(state): State<AppState>,
    Json(req): Json<UserGroupRequest>,
) -> AppResult<impl IntoResponse> {
    let group = validation::required_text(&req.group, "group", 10)?;
    let description = validation::optional_text(req.description.as_deref(), "description", 150)?;

    let existing = sqlx::query(r#"SELECT id FROM user_groups WHERE "group" = ?1"#)
        .bind(&group)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(format!("A user group named {} already exists.", group)));
    }

    let id = sqlx::query(r#"INSERT INTO user_groups ("group", description) VALUES (?1, ?2)"#)
        .bind(&group)
        .bind(&description)
        .execute(&state.db)
        .await?
        .last_insert_rowid();

    let row = sqlx::query(&format!("{} WHERE id = ?1", SELECT_GROUP))
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    let item = row.as_ref().map(group_from_row).ok_or_not_found("User group")?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_user_groups(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rows = sqlx::query(&format!("{} ORDER BY id DESC", SELECT_GROUP))
        .fetch_all(&state.db)
        .await?;
    let items: Vec<UserGroupResponse> = rows.iter().map(group_from_row).collect();
    Ok(Json(items))
}

// ---------------------- employees ----------------------

pub async fn add_employee(
    State(state): State<AppState>,
    Json(req): Json<EmployeeRequest>,
) -> AppResult<impl IntoResponse> {
    let employee_id = validation::required_text(&req.employee_id, "employee_id", 9)?;
    let first_name = validation::required_text(&req.first_name, "first_name", 100)?;
    let last_name = validation::required_text(&req.last_name, "last_name", 100)?;
    let company_email = validation::email(&req.company_email, "company_email", 50)?;
    let personal_email = match validation::optional_text(req.personal_email.as_deref(), "personal_email", 50)? {
        Some(v) => Some(validation::email(&v, "personal_email", 50)?),
        None => None,
    };
    let status = validation::required_text(&req.status, "status", 1)?;

    let group = sqlx::query("SELECT id FROM user_groups WHERE id = ?1")
        .bind(req.user_group_id)
        .fetch_optional(&state.db)
        .await?;
    if group.is_none() {
        return Err(AppError::NotFound(format!("User group with id {} not found.", req.user_group_id)));
    }

    let existing = sqlx::query("SELECT id FROM employees WHERE employee_id = ?1")
        .bind(&employee_id)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(format!("An employee with id {} already exists.", employee_id)));
    }

    let id = sqlx::query(
        r#"INSERT INTO employees (employee_id, first_name, last_name, personal_email, company_email,
                user_group_id, status)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
    )
    .bind(&employee_id)
    .bind(&first_name)
    .bind(&last_name)
    .bind(&personal_email)
    .bind(&company_email)
    .bind(req.user_group_id)
    .bind(&status)
    .execute(&state.db)
    .await?
    .last_insert_rowid();

    let row = sqlx::query(&format!("{} WHERE id = ?1", SELECT_EMPLOYEE))
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    let item = row.as_ref().map(employee_from_row).ok_or_not_found("Employee")?;
    state.metrics.inc_employees_created();
    tracing::info!("Created employee {}", item.employee_id);
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_employees(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rows = sqlx::query(&format!("{} ORDER BY id DESC", SELECT_EMPLOYEE))
        .fetch_all(&state.db)
        .await?;
    let items: Vec<EmployeeResponse> = rows.iter().map(employee_from_row).collect();
    Ok(Json(items))
}

pub async fn get_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let row = sqlx::query(&format!("{} WHERE employee_id = ?1", SELECT_EMPLOYEE))
        .bind(&employee_id)
        .fetch_optional(&state.db)
        .await?;
    let item = row
        .as_ref()
        .map(employee_from_row)
        .ok_or_else(|| AppError::NotFound(format!("Employee with id {} not found.", employee_id)))?;
    Ok(Json(item))
}
