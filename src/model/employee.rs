use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Employee document as stored in the `employees` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Human assigned code, stored under `employee_id`
    #[serde(rename = "employee_id")]
    pub employee_code: String,
    pub name: String,
    pub email: String,
    pub department: String,
    pub role: String,
    pub salary: f64,
    pub created_at: bson::DateTime,
}

/// The fields a client may set; `id` and `created_at` are server owned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "employee_id": "E1",
    "name": "Ada Lovelace",
    "email": "ada@company.com",
    "department": "Engineering",
    "role": "Developer",
    "salary": 50000.0
}))]
pub struct EmployeeFields {
    #[serde(rename = "employee_id")]
    #[schema(example = "E1")]
    pub employee_code: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@company.com", format = "email")]
    pub email: String,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = "Developer")]
    pub role: String,
    #[schema(example = 50000.0)]
    pub salary: f64,
}

impl EmployeeRecord {
    pub fn new(fields: EmployeeFields) -> Self {
        Self {
            id: ObjectId::new(),
            employee_code: fields.employee_code,
            name: fields.name,
            email: fields.email,
            department: fields.department,
            role: fields.role,
            salary: fields.salary,
            created_at: bson::DateTime::now(),
        }
    }

    /// Replaces every mutable field, keeping `id` and `created_at`.
    pub fn apply(&mut self, fields: &EmployeeFields) {
        self.employee_code = fields.employee_code.clone();
        self.name = fields.name.clone();
        self.email = fields.email.clone();
        self.department = fields.department.clone();
        self.role = fields.role.clone();
        self.salary = fields.salary;
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmployeeResponse {
    #[schema(example = "65a1f0c2e4b0a1b2c3d4e5f6")]
    pub id: String,
    #[schema(example = "E1")]
    pub employee_id: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@company.com")]
    pub email: String,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = "Developer")]
    pub role: String,
    #[schema(example = 50000.0)]
    pub salary: f64,
    #[schema(example = "2024-01-01T09:30:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl From<EmployeeRecord> for EmployeeResponse {
    fn from(record: EmployeeRecord) -> Self {
        Self {
            id: record.id.to_hex(),
            employee_id: record.employee_code,
            name: record.name,
            email: record.email,
            department: record.department,
            role: record.role,
            salary: record.salary,
            created_at: DateTime::<Utc>::from_timestamp_millis(
                record.created_at.timestamp_millis(),
            )
            .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> EmployeeFields {
        EmployeeFields {
            employee_code: "E1".into(),
            name: "A".into(),
            email: "a@x.com".into(),
            department: "Eng".into(),
            role: "Dev".into(),
            salary: 50000.0,
        }
    }

    #[test]
    fn request_body_uses_wire_name_for_code() {
        let body = serde_json::json!({
            "employee_id": "E1",
            "name": "A",
            "email": "a@x.com",
            "department": "Eng",
            "role": "Dev",
            "salary": 50000
        });
        let parsed: EmployeeFields = serde_json::from_value(body).unwrap();
        assert_eq!(parsed, fields());
    }

    #[test]
    fn apply_keeps_server_owned_fields() {
        let mut record = EmployeeRecord::new(fields());
        let (id, created_at) = (record.id, record.created_at);

        let mut changed = fields();
        changed.employee_code = "E2".into();
        changed.salary = 1.5;
        record.apply(&changed);

        assert_eq!(record.id, id);
        assert_eq!(record.created_at, created_at);
        assert_eq!(record.employee_code, "E2");
        assert_eq!(record.salary, 1.5);
    }

    #[test]
    fn response_renders_id_as_hex() {
        let record = EmployeeRecord::new(fields());
        let hex = record.id.to_hex();
        let millis = record.created_at.timestamp_millis();

        let response = EmployeeResponse::from(record);
        assert_eq!(response.id, hex);
        assert_eq!(response.employee_id, "E1");
        assert_eq!(response.created_at.timestamp_millis(), millis);
    }

    #[test]
    fn created_at_is_written_as_utc() {
        let mut record = EmployeeRecord::new(fields());
        record.created_at = bson::DateTime::from_millis(1_704_101_400_250);

        let body = serde_json::to_value(EmployeeResponse::from(record)).unwrap();
        assert_eq!(body["created_at"], "2024-01-01T09:30:00.250Z");
    }
}
