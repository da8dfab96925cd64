use crate::{
    db::{HrStore, StoreError},
    error::{AppError, AppResult},
    model::{
        MessageResponse,
        attendance::{AttendanceChanges, AttendanceFields, AttendanceRecord, AttendanceResponse},
    },
    utils::ids::parse_object_id,
};
use actix_web::{HttpResponse, web};
use mongodb::bson;
use serde::Deserialize;
use tracing::{debug, info, instrument};
use utoipa::IntoParams;

const INVALID_EMPLOYEE_ID: &str = "Invalid employee ID";
const INVALID_ATTENDANCE_ID: &str = "Invalid attendance ID";
const EMPLOYEE_NOT_FOUND: &str = "Employee not found";
const RECORD_NOT_FOUND: &str = "Attendance record not found";
const ALREADY_MARKED: &str = "Attendance already marked for this date";
const ALREADY_EXISTS: &str = "Attendance already exists for this employee on this date";

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceFilter {
    /// Exact `YYYY-MM-DD` match; empty means no filter
    pub date: Option<String>,
}

fn to_responses(records: Vec<AttendanceRecord>) -> Vec<AttendanceResponse> {
    records.into_iter().map(AttendanceResponse::from).collect()
}

/// Mark Attendance
#[utoipa::path(
    post,
    path = "/attendance/",
    request_body = AttendanceFields,
    responses(
        (status = 200, description = "Attendance marked", body = AttendanceResponse),
        (status = 400, description = "Invalid employee id or attendance already marked", body = Object, example = json!({
            "detail": "Attendance already marked for this date"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "detail": "Employee not found"
        }))
    ),
    tag = "Attendance"
)]
#[instrument(skip(store, payload), fields(employee = %payload.employee_id, date = %payload.date))]
pub async fn mark_attendance(
    store: web::Data<dyn HrStore>,
    payload: web::Json<AttendanceFields>,
) -> AppResult<HttpResponse> {
    let AttendanceFields {
        employee_id,
        date,
        status,
    } = payload.into_inner();

    let employee = parse_object_id(&employee_id, INVALID_EMPLOYEE_ID)?;

    if store.find_employee(&employee).await?.is_none() {
        return Err(AppError::not_found(EMPLOYEE_NOT_FOUND));
    }

    if store
        .find_attendance_for_day(&employee, &date, None)
        .await?
        .is_some()
    {
        debug!("Attendance already marked");
        return Err(AppError::conflict(ALREADY_MARKED));
    }

    let record = AttendanceRecord::new(employee, date, status);
    // The unique index settles a concurrent mark for the same day.
    store
        .insert_attendance(&record)
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => AppError::conflict(ALREADY_MARKED),
            other => other.into(),
        })?;

    info!(id = %record.id, "Attendance marked");
    Ok(HttpResponse::Ok().json(AttendanceResponse::from(record)))
}

/// List Attendance
#[utoipa::path(
    get,
    path = "/attendance/",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Attendance records, optionally for one date", body = [AttendanceResponse])
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    store: web::Data<dyn HrStore>,
    query: web::Query<AttendanceFilter>,
) -> AppResult<HttpResponse> {
    let date = query.date.as_deref().filter(|d| !d.is_empty());
    let records = store.list_attendance(date).await?;

    debug!(count = records.len(), date = ?date, "Fetched attendance");
    Ok(HttpResponse::Ok().json(to_responses(records)))
}

/// Attendance of one employee
///
/// Unknown employees yield an empty list.
#[utoipa::path(
    get,
    path = "/attendance/{employee_id}",
    params(
        ("employee_id", Path, description = "System id of the employee")
    ),
    responses(
        (status = 200, description = "Attendance records of the employee", body = [AttendanceResponse]),
        (status = 400, description = "Invalid employee id", body = Object, example = json!({
            "detail": "Invalid employee ID"
        }))
    ),
    tag = "Attendance"
)]
pub async fn employee_attendance(
    store: web::Data<dyn HrStore>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let employee = parse_object_id(&path, INVALID_EMPLOYEE_ID)?;
    let records = store.list_attendance_for_employee(&employee).await?;

    debug!(%employee, count = records.len(), "Fetched employee attendance");
    Ok(HttpResponse::Ok().json(to_responses(records)))
}

/// Update Attendance
#[utoipa::path(
    put,
    path = "/attendance/{attendance_id}",
    params(
        ("attendance_id", Path, description = "Attendance record id")
    ),
    request_body = AttendanceFields,
    responses(
        (status = 200, description = "Updated record", body = AttendanceResponse),
        (status = 400, description = "Invalid ids or date already taken", body = Object, example = json!({
            "detail": "Attendance already exists for this employee on this date"
        })),
        (status = 404, description = "Record or employee not found", body = Object, example = json!({
            "detail": "Attendance record not found"
        }))
    ),
    tag = "Attendance"
)]
#[instrument(skip(store, payload))]
pub async fn update_attendance(
    store: web::Data<dyn HrStore>,
    path: web::Path<String>,
    payload: web::Json<AttendanceFields>,
) -> AppResult<HttpResponse> {
    let id = parse_object_id(&path, INVALID_ATTENDANCE_ID)?;
    let AttendanceFields {
        employee_id,
        date,
        status,
    } = payload.into_inner();
    let employee = parse_object_id(&employee_id, INVALID_EMPLOYEE_ID)?;

    if store.find_attendance(&id).await?.is_none() {
        return Err(AppError::not_found(RECORD_NOT_FOUND));
    }

    if store.find_employee(&employee).await?.is_none() {
        return Err(AppError::not_found(EMPLOYEE_NOT_FOUND));
    }

    if store
        .find_attendance_for_day(&employee, &date, Some(&id))
        .await?
        .is_some()
    {
        return Err(AppError::conflict(ALREADY_EXISTS));
    }

    let changes = AttendanceChanges {
        employee,
        date,
        status,
        updated_at: bson::DateTime::now(),
    };
    let updated = store
        .update_attendance(&id, &changes)
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => AppError::conflict(ALREADY_EXISTS),
            other => other.into(),
        })?
        // deleted between the lookup and the write
        .ok_or_else(|| AppError::not_found(RECORD_NOT_FOUND))?;

    info!(%id, "Attendance updated");
    Ok(HttpResponse::Ok().json(AttendanceResponse::from(updated)))
}

/// Delete Attendance
#[utoipa::path(
    delete,
    path = "/attendance/{attendance_id}",
    params(
        ("attendance_id", Path, description = "Attendance record id")
    ),
    responses(
        (status = 200, description = "Record deleted", body = MessageResponse, example = json!({
            "message": "Attendance deleted successfully"
        })),
        (status = 400, description = "Invalid attendance id", body = Object, example = json!({
            "detail": "Invalid attendance ID"
        })),
        (status = 404, description = "Record not found", body = Object, example = json!({
            "detail": "Attendance record not found"
        }))
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    store: web::Data<dyn HrStore>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_object_id(&path, INVALID_ATTENDANCE_ID)?;

    if !store.delete_attendance(&id).await? {
        return Err(AppError::not_found(RECORD_NOT_FOUND));
    }

    info!(%id, "Attendance deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Attendance deleted successfully")))
}
