use crate::{
    error::AppError,
    export::{write_csv, EXPORT_FILE_NAME},
    password::{hash_password, verify_password},
    session::{end_session, start_session, CurrentUser},
    AppState,
};
use analytics::{group_by_company, prepare_create, prepare_edit};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use core_types::{
    ChartSeries, Comment, CommentForm, CreateRecordForm, Credentials, EditRecordForm,
    FinancialRecord, RecordWithComments,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

// ==============================================================================
// Authentication
// ==============================================================================

/// # POST /api/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let credentials = credentials.validate()?;
    let hash = hash_password(&credentials.password);
    state.db_repo.create_user(&credentials.username, &hash).await?;
    tracing::info!(username = %credentials.username, "User registered.");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "username": credentials.username })),
    ))
}

/// # POST /api/login
/// Sets the session cookie on success.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let user = state.db_repo.find_user(credentials.username.trim()).await?;
    let user = match user {
        Some(user) if verify_password(&credentials.password, &user.password_hash) => user,
        _ => {
            tracing::warn!(username = %credentials.username, "Failed login attempt.");
            return Err(AppError::Unauthorized);
        }
    };

    let jar = start_session(&state, jar, &user.username).await?;
    Ok((jar, Json(json!({ "username": user.username }))))
}

/// # POST /api/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), AppError> {
    let jar = end_session(&state, jar).await?;
    Ok((jar, StatusCode::NO_CONTENT))
}

// ==============================================================================
// Financial records
// ==============================================================================

fn attach_comments(
    records: Vec<FinancialRecord>,
    comments: Vec<Comment>,
) -> Vec<RecordWithComments> {
    let mut by_record: HashMap<i64, Vec<Comment>> = HashMap::new();
    for comment in comments {
        by_record.entry(comment.financial_id).or_default().push(comment);
    }
    records
        .into_iter()
        .map(|record| RecordWithComments {
            comments: by_record.remove(&record.id).unwrap_or_default(),
            record,
        })
        .collect()
}

/// # GET /api/records
/// Every record of the user, each with its comments.
pub async fn list_records(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<RecordWithComments>>, AppError> {
    let records = state.db_repo.list_records(&user).await?;
    let comments = state.db_repo.list_comments(&user).await?;
    Ok(Json(attach_comments(records, comments)))
}

/// # POST /api/records
/// The main input form. Figures are scaled by the submitted `unit`.
pub async fn create_record(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<CreateRecordForm>,
) -> Result<(StatusCode, Json<FinancialRecord>), AppError> {
    let draft = prepare_create(&form)?;
    let record = state.db_repo.insert_record(&user, &draft).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// # GET /api/records/:id
pub async fn get_record(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<RecordWithComments>, AppError> {
    let record = state.db_repo.get_record(id, &user).await?;
    let comments = state.db_repo.list_comments_for_record(id, &user).await?;
    Ok(Json(RecordWithComments { record, comments }))
}

/// # PUT /api/records/:id
/// The edit form. Figures are stored as submitted, without unit scaling.
pub async fn update_record(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Form(form): Form<EditRecordForm>,
) -> Result<Json<FinancialRecord>, AppError> {
    let draft = prepare_edit(&form)?;
    let record = state.db_repo.update_record(id, &user, &draft).await?;
    Ok(Json(record))
}

/// # GET /api/industries
pub async fn list_industries(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.db_repo.list_industries(&user).await?))
}

/// # GET /api/chart
/// Sales, ROE and productivity per year, one series per company.
pub async fn chart(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ChartSeries>>, AppError> {
    let rows = state.db_repo.chart_rows(&user).await?;
    Ok(Json(group_by_company(rows)))
}

/// # GET /api/export
/// Downloads all of the user's records as a CSV attachment.
pub async fn export(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let rows = state.db_repo.export_rows(&user).await?;
    let body = write_csv(&rows)?;
    tracing::info!(user = %user, rows = rows.len(), "Exported records.");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        body,
    ))
}

// ==============================================================================
// Comments
// ==============================================================================

fn non_blank(form: CommentForm) -> Result<String, AppError> {
    if form.content.trim().is_empty() {
        return Err(AppError::BadRequest("comment must not be empty".to_string()));
    }
    Ok(form.content)
}

/// # POST /api/records/:id/comments
pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(form): Json<CommentForm>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let content = non_blank(form)?;
    let comment = state.db_repo.add_comment(id, &user, &content).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// # PUT /api/comments/:id
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(form): Json<CommentForm>,
) -> Result<Json<Comment>, AppError> {
    let content = non_blank(form)?;
    Ok(Json(state.db_repo.update_comment(id, &user, &content).await?))
}

/// # DELETE /api/comments/:id
/// Responds with the id of the record the comment belonged to.
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let financial_id = state.db_repo.delete_comment(id, &user).await?;
    Ok(Json(json!({ "financial_id": financial_id })))
}
