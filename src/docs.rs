use crate::model::MessageResponse;
use crate::model::attendance::{AttendanceFields, AttendanceResponse};
use crate::model::employee::{EmployeeFields, EmployeeResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS Lite API",
        version = "1.0.0",
        description = r#"
## HRMS Lite

Record keeping for **employees** and their daily **attendance**.

### Key Features
- **Employee Management**
  - Create, list, update and delete employees
  - Email and employee ID are unique across employees
- **Attendance Management**
  - Mark attendance once per employee and date
  - List by date or by employee, update and delete records

### Response Format
- JSON bodies, identifiers rendered as 24 character hex strings
- Errors carry a `detail` string

---
Built with **Rust**, **Actix Web**, **MongoDB** and **Utoipa**.
"#,
    ),
    paths(
        crate::routes::index,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::mark_attendance,
        crate::api::attendance::list_attendance,
        crate::api::attendance::employee_attendance,
        crate::api::attendance::update_attendance,
        crate::api::attendance::delete_attendance
    ),
    components(
        schemas(
            EmployeeFields,
            EmployeeResponse,
            AttendanceFields,
            AttendanceResponse,
            MessageResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
    )
)]
pub struct ApiDoc;
