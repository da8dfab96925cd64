#![allow(dead_code, unused_macros)]

use hrms::db::{HrStore, MemoryStore};
use serde_json::{Value, json};
use std::sync::Arc;

pub fn memory_store() -> Arc<dyn HrStore> {
    Arc::new(MemoryStore::new())
}

pub fn employee_body(code: &str, email: &str) -> Value {
    json!({
        "employee_id": code,
        "name": "A",
        "email": email,
        "department": "Eng",
        "role": "Dev",
        "salary": 50000
    })
}

pub fn attendance_body(employee: &str, date: &str, status: &str) -> Value {
    json!({
        "employee_id": employee,
        "date": date,
        "status": status
    })
}

/// A valid ObjectId that no record uses
pub const UNKNOWN_ID: &str = "0123456789abcdef01234567";

/// Creates an employee through the API and evaluates to its system id.
macro_rules! create_employee {
    ($app:expr, $code:expr, $email:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/employees/")
            .set_json(crate::common::employee_body($code, $email))
            .to_request();
        let body: serde_json::Value = actix_web::test::call_and_read_body_json($app, req).await;
        body["id"].as_str().expect("employee id").to_string()
    }};
}

/// Marks attendance through the API and evaluates to the record id.
macro_rules! mark_attendance {
    ($app:expr, $employee:expr, $date:expr, $status:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/attendance/")
            .set_json(crate::common::attendance_body($employee, $date, $status))
            .to_request();
        let body: serde_json::Value = actix_web::test::call_and_read_body_json($app, req).await;
        body["id"].as_str().expect("attendance id").to_string()
    }};
}
