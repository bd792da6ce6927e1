use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use chrono::NaiveDate;
use serde_json::Value;
use uuid::Uuid;

use crate::database::models::barang::{BarangBekas, BarangChanges, BarangDraft};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// 404 body shared by update and delete. Deliberately does not distinguish
/// "does not exist" from "owned by someone else".
const NOT_FOUND_MSG: &str = "Record not found or unauthorized";

const REQUIRED_FIELDS_MSG: &str = "All fields are required";

/// GET /manajemen-barang-bekas - list the caller's records
pub async fn barang_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<BarangBekas>>, ApiError> {
    let records = state.barang.find_by_owner(&user.id).await?;
    Ok(Json(records))
}

/// POST /manajemen-barang-bekas - create a record owned by the caller
pub async fn barang_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<BarangBekas>), ApiError> {
    let fields = required_fields(&json_body(payload)?)?;

    let record = state
        .barang
        .create(BarangDraft {
            name: fields.name,
            description: fields.description,
            quantity: fields.quantity,
            date_added: fields.date_added,
            owner_id: user.id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /manajemen-barang-bekas/:id - update one of the caller's records
pub async fn barang_put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BarangBekas>, ApiError> {
    // Field validation short-circuits before the store is touched
    let fields = required_fields(&json_body(payload)?)?;
    let id = parse_record_id(&id)?;

    let updated = state
        .barang
        .find_one_and_update(
            id,
            &user.id,
            BarangChanges {
                name: fields.name,
                description: fields.description,
                quantity: fields.quantity,
                date_added: fields.date_added,
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND_MSG))?;

    Ok(Json(updated))
}

/// DELETE /manajemen-barang-bekas/:id - delete one of the caller's records
pub async fn barang_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_record_id(&id)?;

    state
        .barang
        .find_one_and_delete(id, &user.id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND_MSG))?;

    Ok(StatusCode::NO_CONTENT)
}

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::invalid_json(rejection.body_text())),
    }
}

/// An id that is not a UUID cannot match any record; report it exactly like
/// a missing one.
fn parse_record_id(id: &str) -> Result<Uuid, ApiError> {
    id.parse::<Uuid>()
        .map_err(|_| ApiError::not_found(NOT_FOUND_MSG))
}

struct RequiredFields {
    name: String,
    description: String,
    quantity: i32,
    date_added: NaiveDate,
}

/// Explicit presence checks for the four required fields, in stable order:
/// name, description, quantity, dateAdded. Any miss yields the same 400.
fn required_fields(payload: &Value) -> Result<RequiredFields, ApiError> {
    let name = non_empty_string(payload.get("name"));
    let description = non_empty_string(payload.get("description"));
    let quantity = positive_count(payload.get("quantity"));
    let date_added = calendar_date(payload.get("dateAdded"));

    match (name, description, quantity, date_added) {
        (Some(name), Some(description), Some(quantity), Some(date_added)) => Ok(RequiredFields {
            name,
            description,
            quantity,
            date_added,
        }),
        _ => Err(ApiError::validation(REQUIRED_FIELDS_MSG)),
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    let s = value?.as_str()?;
    if s.trim().is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn positive_count(value: Option<&Value>) -> Option<i32> {
    let n = value?.as_i64()?;
    if n > 0 {
        i32::try_from(n).ok()
    } else {
        None
    }
}

fn calendar_date(value: Option<&Value>) -> Option<NaiveDate> {
    value?.as_str()?.parse::<NaiveDate>().ok()
}
