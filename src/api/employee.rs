use crate::{
    config::Policy,
    db::{HrStore, StoreError},
    error::{AppError, AppResult},
    model::{
        MessageResponse,
        employee::{EmployeeFields, EmployeeRecord, EmployeeResponse},
    },
    utils::{email::normalize_email, ids::parse_object_id},
};
use actix_web::{HttpResponse, web};
use tracing::{debug, info, instrument};

const INVALID_EMAIL: &str = "Invalid email address";
const EMAIL_TAKEN: &str = "Email already exists";
const CODE_TAKEN: &str = "Employee ID already exists";
const INVALID_ID: &str = "Invalid ID";
const NOT_FOUND: &str = "Employee not found";

/// Swaps the submitted email for its normalized form, so uniqueness is
/// decided on what gets stored.
fn normalize_fields(fields: &mut EmployeeFields) -> AppResult<()> {
    fields.email = normalize_email(&fields.email).ok_or_else(|| AppError::invalid(INVALID_EMAIL))?;
    Ok(())
}

/// A unique index on employees may still reject a write that passed the checks above.
fn duplicate_as_taken(err: StoreError) -> AppError {
    match err {
        StoreError::Duplicate(_) => AppError::conflict("Employee email or ID already exists"),
        other => other.into(),
    }
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/employees/",
    request_body = EmployeeFields,
    responses(
        (status = 200, description = "Employee created", body = EmployeeResponse),
        (status = 400, description = "Invalid email, or email / employee ID already taken", body = Object, example = json!({
            "detail": "Email already exists"
        })),
        (status = 422, description = "Malformed body")
    ),
    tag = "Employee"
)]
#[instrument(skip(store, payload), fields(employee_id = %payload.employee_code))]
pub async fn create_employee(
    store: web::Data<dyn HrStore>,
    payload: web::Json<EmployeeFields>,
) -> AppResult<HttpResponse> {
    let mut fields = payload.into_inner();

    normalize_fields(&mut fields)?;

    if store.find_employee_by_email(&fields.email).await?.is_some() {
        debug!(email = %fields.email, "Email already taken");
        return Err(AppError::conflict(EMAIL_TAKEN));
    }

    if store.find_employee_by_code(&fields.employee_code).await?.is_some() {
        debug!("Employee ID already taken");
        return Err(AppError::conflict(CODE_TAKEN));
    }

    let record = EmployeeRecord::new(fields);
    store
        .insert_employee(&record)
        .await
        .map_err(duplicate_as_taken)?;

    info!(id = %record.id, "Employee created");
    Ok(HttpResponse::Ok().json(EmployeeResponse::from(record)))
}

/// List Employees
#[utoipa::path(
    get,
    path = "/employees/",
    responses(
        (status = 200, description = "All employees", body = [EmployeeResponse])
    ),
    tag = "Employee"
)]
pub async fn list_employees(store: web::Data<dyn HrStore>) -> AppResult<HttpResponse> {
    let employees: Vec<EmployeeResponse> = store
        .list_employees()
        .await?
        .into_iter()
        .map(EmployeeResponse::from)
        .collect();

    debug!(count = employees.len(), "Fetched employees");
    Ok(HttpResponse::Ok().json(employees))
}

/// Update Employee
///
/// Replaces every mutable field. Email uniqueness is only re-checked when
/// `RECHECK_EMAIL_ON_UPDATE` is on.
#[utoipa::path(
    put,
    path = "/employees/{id}",
    params(
        ("id", Path, description = "System id of the employee")
    ),
    request_body = EmployeeFields,
    responses(
        (status = 200, description = "Employee updated", body = MessageResponse, example = json!({
            "message": "Employee updated successfully"
        })),
        (status = 400, description = "Invalid id or email, or employee ID already taken", body = Object, example = json!({
            "detail": "Employee ID already exists"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "detail": "Employee not found"
        }))
    ),
    tag = "Employee"
)]
#[instrument(skip(store, policy, payload))]
pub async fn update_employee(
    store: web::Data<dyn HrStore>,
    policy: web::Data<Policy>,
    path: web::Path<String>,
    payload: web::Json<EmployeeFields>,
) -> AppResult<HttpResponse> {
    let mut fields = payload.into_inner();
    normalize_fields(&mut fields)?;

    let id = parse_object_id(&path, INVALID_ID)?;

    let code_holder = store.find_employee_by_code(&fields.employee_code).await?;
    if code_holder.is_some_and(|holder| holder.id != id) {
        return Err(AppError::conflict(CODE_TAKEN));
    }

    if policy.recheck_email_on_update {
        let email_holder = store.find_employee_by_email(&fields.email).await?;
        if email_holder.is_some_and(|holder| holder.id != id) {
            return Err(AppError::conflict(EMAIL_TAKEN));
        }
    }

    let matched = store
        .update_employee(&id, &fields)
        .await
        .map_err(duplicate_as_taken)?;
    if !matched {
        return Err(AppError::not_found(NOT_FOUND));
    }

    info!(%id, "Employee updated");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Employee updated successfully")))
}

/// Delete Employee
///
/// Attendance of the employee is kept unless `CASCADE_ATTENDANCE_ON_DELETE` is on.
#[utoipa::path(
    delete,
    path = "/employees/{id}",
    params(
        ("id", Path, description = "System id of the employee")
    ),
    responses(
        (status = 200, description = "Employee deleted", body = MessageResponse, example = json!({
            "message": "Employee deleted successfully"
        })),
        (status = 400, description = "Invalid id", body = Object, example = json!({
            "detail": "Invalid ID"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "detail": "Employee not found"
        }))
    ),
    tag = "Employee"
)]
#[instrument(skip(store, policy))]
pub async fn delete_employee(
    store: web::Data<dyn HrStore>,
    policy: web::Data<Policy>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_object_id(&path, INVALID_ID)?;

    if !store.delete_employee(&id).await? {
        return Err(AppError::not_found(NOT_FOUND));
    }

    if policy.cascade_attendance_on_delete {
        let removed = store.delete_attendance_for_employee(&id).await?;
        info!(%id, removed, "Removed attendance of deleted employee");
    }

    info!(%id, "Employee deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Employee deleted successfully")))
}
