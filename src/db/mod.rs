//! Storage seam. Handlers only see [`HrStore`]; the process runs on
//! [`MongoStore`], tests run on [`MemoryStore`].

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::model::attendance::{AttendanceChanges, AttendanceRecord};
use crate::model::employee::{EmployeeFields, EmployeeRecord};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Logical database holding both collections
pub const DATABASE_NAME: &str = "hrms";
pub const EMPLOYEES: &str = "employees";
pub const ATTENDANCE: &str = "attendance";

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique index rejected the write
    #[error("{0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait HrStore: Send + Sync {
    /// Creates the unique indexes. Safe to call on every start.
    async fn ensure_indexes(&self) -> StoreResult<()>;

    // Employees
    async fn insert_employee(&self, record: &EmployeeRecord) -> StoreResult<()>;
    async fn list_employees(&self) -> StoreResult<Vec<EmployeeRecord>>;
    async fn find_employee(&self, id: &ObjectId) -> StoreResult<Option<EmployeeRecord>>;
    async fn find_employee_by_email(&self, email: &str) -> StoreResult<Option<EmployeeRecord>>;
    async fn find_employee_by_code(&self, code: &str) -> StoreResult<Option<EmployeeRecord>>;
    /// `false` when no employee has `id`
    async fn update_employee(&self, id: &ObjectId, fields: &EmployeeFields) -> StoreResult<bool>;
    /// `false` when no employee has `id`
    async fn delete_employee(&self, id: &ObjectId) -> StoreResult<bool>;

    // Attendance
    async fn insert_attendance(&self, record: &AttendanceRecord) -> StoreResult<()>;
    async fn list_attendance(&self, date: Option<&str>) -> StoreResult<Vec<AttendanceRecord>>;
    async fn list_attendance_for_employee(
        &self,
        employee: &ObjectId,
    ) -> StoreResult<Vec<AttendanceRecord>>;
    async fn find_attendance(&self, id: &ObjectId) -> StoreResult<Option<AttendanceRecord>>;
    /// Record of `employee` on `date`, ignoring the record `exclude` if given
    async fn find_attendance_for_day(
        &self,
        employee: &ObjectId,
        date: &str,
        exclude: Option<&ObjectId>,
    ) -> StoreResult<Option<AttendanceRecord>>;
    /// Returns the record after the update, `None` when `id` is unknown
    async fn update_attendance(
        &self,
        id: &ObjectId,
        changes: &AttendanceChanges,
    ) -> StoreResult<Option<AttendanceRecord>>;
    async fn delete_attendance(&self, id: &ObjectId) -> StoreResult<bool>;
    /// Returns the number of removed records
    async fn delete_attendance_for_employee(&self, employee: &ObjectId) -> StoreResult<u64>;
}

/// Connects to MongoDB and makes sure the indexes exist before traffic is accepted.
pub async fn init_db(config: &Config) -> StoreResult<MongoStore> {
    let store = MongoStore::connect(
        &config.mongo_uri,
        config.mongo_tls,
        config.policy.employee_unique_indexes,
    )
    .await?;

    store.ensure_indexes().await?;
    info!("Indexes ensured");

    Ok(store)
}
