use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::SqliteConnection;

use crate::domain::entities::{Request, RequestStatus};
use crate::infrastructure::database::queries::requests::*;
use crate::shared::{AppError, AppResult};

/// Raw `requests` row; statuses and the payload decode at this boundary.
#[derive(sqlx::FromRow)]
struct RequestRow {
    id: i64,
    user_id: i64,
    request_type: String,
    workflow_key: Option<String>,
    title: String,
    body: String,
    payload_json: Option<String>,
    status: String,
    decided_by: Option<i64>,
    decided_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RequestRow> for Request {
    type Error = AppError;

    fn try_from(row: RequestRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<RequestStatus>()
            .map_err(AppError::Internal)?;
        // Tolerant decode: anything that is not a JSON object counts as no
        // payload for the purposes of condition evaluation.
        let payload = row
            .payload_json
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Value>(raw).ok())
            .filter(Value::is_object);
        Ok(Request {
            id: row.id,
            user_id: row.user_id,
            request_type: row.request_type,
            workflow_key: row.workflow_key,
            title: row.title,
            body: row.body,
            payload,
            status,
            decided_by: row.decided_by,
            decided_at: row.decided_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub async fn create_request(
    conn: &mut SqliteConnection,
    user_id: i64,
    request_type: &str,
    workflow_key: Option<&str>,
    title: &str,
    body: &str,
    payload_json: Option<&str>,
) -> AppResult<i64> {
    let now = Utc::now();
    let result = sqlx::query(REQUEST_INSERT)
        .bind(user_id)
        .bind(request_type)
        .bind(workflow_key)
        .bind(title)
        .bind(body)
        .bind(payload_json)
        .bind(RequestStatus::Pending.to_string())
        .bind(now)
        .bind(now)
        .execute(conn)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn get_request(conn: &mut SqliteConnection, request_id: i64) -> AppResult<Option<Request>> {
    let row = sqlx::query_as::<_, RequestRow>(REQUEST_FIND_BY_ID)
        .bind(request_id)
        .fetch_optional(conn)
        .await?;
    row.map(Request::try_from).transpose()
}

pub async fn get_request_owner(conn: &mut SqliteConnection, request_id: i64) -> AppResult<Option<i64>> {
    let owner = sqlx::query_scalar::<_, i64>(REQUEST_OWNER)
        .bind(request_id)
        .fetch_optional(conn)
        .await?;
    Ok(owner)
}

pub async fn list_all_requests(conn: &mut SqliteConnection) -> AppResult<Vec<Request>> {
    let rows = sqlx::query_as::<_, RequestRow>(REQUESTS_LIST_ALL)
        .fetch_all(conn)
        .await?;
    rows.into_iter().map(Request::try_from).collect()
}

pub async fn list_requests_for_user(conn: &mut SqliteConnection, user_id: i64) -> AppResult<Vec<Request>> {
    let rows = sqlx::query_as::<_, RequestRow>(REQUESTS_LIST_FOR_USER)
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    rows.into_iter().map(Request::try_from).collect()
}

/// Status transition. Terminal decisions (`approved` / `rejected`) with a
/// known decider record decided_by/decided_at atomically with the status;
/// every other transition leaves the decision columns untouched.
pub async fn update_request_status(
    conn: &mut SqliteConnection,
    request_id: i64,
    status: RequestStatus,
    decided_by: Option<i64>,
) -> AppResult<()> {
    let now = Utc::now();
    match (status, decided_by) {
        (RequestStatus::Approved | RequestStatus::Rejected, Some(decider)) => {
            sqlx::query(REQUEST_SET_DECIDED)
                .bind(status.to_string())
                .bind(decider)
                .bind(now)
                .bind(now)
                .bind(request_id)
                .execute(conn)
                .await?;
        }
        _ => {
            sqlx::query(REQUEST_SET_STATUS)
                .bind(status.to_string())
                .bind(now)
                .bind(request_id)
                .execute(conn)
                .await?;
        }
    }
    Ok(())
}

pub async fn reset_request_for_resubmit(
    conn: &mut SqliteConnection,
    request_id: i64,
    title: &str,
    body: &str,
    payload_json: Option<&str>,
) -> AppResult<()> {
    sqlx::query(REQUEST_RESET_FOR_RESUBMIT)
        .bind(title)
        .bind(body)
        .bind(payload_json)
        .bind(Utc::now())
        .bind(request_id)
        .execute(conn)
        .await?;
    Ok(())
}
