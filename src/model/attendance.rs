use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// System id of the employee, stored under `employee_id`
    #[serde(rename = "employee_id")]
    pub employee: ObjectId,
    /// `YYYY-MM-DD`, kept as given
    pub date: String,
    pub status: String,
    pub created_at: bson::DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<bson::DateTime>,
}

impl AttendanceRecord {
    pub fn new(employee: ObjectId, date: String, status: String) -> Self {
        Self {
            id: ObjectId::new(),
            employee,
            date,
            status,
            created_at: bson::DateTime::now(),
            updated_at: None,
        }
    }
}

/// New values for an existing attendance record.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceChanges {
    pub employee: ObjectId,
    pub date: String,
    pub status: String,
    pub updated_at: bson::DateTime,
}

/// Body of both the create and the update request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AttendanceFields {
    /// System id of the employee
    #[schema(example = "65a1f0c2e4b0a1b2c3d4e5f6")]
    pub employee_id: String,
    #[schema(example = "2024-01-01")]
    pub date: String,
    #[schema(example = "Present")]
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AttendanceResponse {
    #[schema(example = "65a1f1d3e4b0a1b2c3d4e5f7")]
    pub id: String,
    #[schema(example = "65a1f0c2e4b0a1b2c3d4e5f6")]
    pub employee_id: String,
    #[schema(example = "2024-01-01")]
    pub date: String,
    #[schema(example = "Present")]
    pub status: String,
}

impl From<AttendanceRecord> for AttendanceResponse {
    fn from(record: AttendanceRecord) -> Self {
        Self {
            id: record.id.to_hex(),
            employee_id: record.employee.to_hex(),
            date: record.date,
            status: record.status,
        }
    }
}
