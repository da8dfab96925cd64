use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Client, Collection, IndexModel,
    bson::{Document, doc, oid::ObjectId},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{ClientOptions, IndexOptions, ReturnDocument, Tls, TlsOptions},
};
use tracing::{debug, info};

use super::{ATTENDANCE, DATABASE_NAME, EMPLOYEES, HrStore, StoreError, StoreResult};
use crate::model::attendance::{AttendanceChanges, AttendanceRecord};
use crate::model::employee::{EmployeeFields, EmployeeRecord};

const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoStore {
    employees: Collection<EmployeeRecord>,
    attendance: Collection<AttendanceRecord>,
    employee_unique_indexes: bool,
}

impl MongoStore {
    /// Opens the client and pings the server so bad hosts or credentials
    /// fail here instead of on the first request.
    pub async fn connect(uri: &str, tls: bool, employee_unique_indexes: bool) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        if tls {
            options.tls = Some(Tls::Enabled(TlsOptions::default()));
        }
        options.app_name = Some("hrms".to_string());

        let client = Client::with_options(options)?;
        let database = client.database(DATABASE_NAME);
        database.run_command(doc! { "ping": 1 }).await?;
        info!(database = DATABASE_NAME, tls, "Connected to MongoDB");

        Ok(Self {
            employees: database.collection(EMPLOYEES),
            attendance: database.collection(ATTENDANCE),
            employee_unique_indexes,
        })
    }
}

fn unique_index(keys: Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

fn is_duplicate_key(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}

impl From<MongoError> for StoreError {
    fn from(err: MongoError) -> Self {
        if is_duplicate_key(&err) {
            StoreError::Duplicate("Duplicate key".to_string())
        } else {
            StoreError::Database(err.to_string())
        }
    }
}

#[async_trait]
impl HrStore for MongoStore {
    async fn ensure_indexes(&self) -> StoreResult<()> {
        self.attendance
            .create_index(unique_index(doc! { "employee_id": 1, "date": 1 }))
            .await?;

        if self.employee_unique_indexes {
            self.employees
                .create_index(unique_index(doc! { "email": 1 }))
                .await?;
            self.employees
                .create_index(unique_index(doc! { "employee_id": 1 }))
                .await?;
        }
        Ok(())
    }

    async fn insert_employee(&self, record: &EmployeeRecord) -> StoreResult<()> {
        self.employees.insert_one(record).await?;
        debug!(id = %record.id, "Inserted employee");
        Ok(())
    }

    async fn list_employees(&self) -> StoreResult<Vec<EmployeeRecord>> {
        let cursor = self.employees.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_employee(&self, id: &ObjectId) -> StoreResult<Option<EmployeeRecord>> {
        Ok(self.employees.find_one(doc! { "_id": *id }).await?)
    }

    async fn find_employee_by_email(&self, email: &str) -> StoreResult<Option<EmployeeRecord>> {
        Ok(self.employees.find_one(doc! { "email": email }).await?)
    }

    async fn find_employee_by_code(&self, code: &str) -> StoreResult<Option<EmployeeRecord>> {
        Ok(self.employees.find_one(doc! { "employee_id": code }).await?)
    }

    async fn update_employee(&self, id: &ObjectId, fields: &EmployeeFields) -> StoreResult<bool> {
        let update = doc! {
            "$set": {
                "employee_id": fields.employee_code.as_str(),
                "name": fields.name.as_str(),
                "email": fields.email.as_str(),
                "department": fields.department.as_str(),
                "role": fields.role.as_str(),
                "salary": fields.salary,
            }
        };
        let result = self.employees.update_one(doc! { "_id": *id }, update).await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_employee(&self, id: &ObjectId) -> StoreResult<bool> {
        let result = self.employees.delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn insert_attendance(&self, record: &AttendanceRecord) -> StoreResult<()> {
        self.attendance.insert_one(record).await?;
        debug!(id = %record.id, employee = %record.employee, date = %record.date, "Inserted attendance");
        Ok(())
    }

    async fn list_attendance(&self, date: Option<&str>) -> StoreResult<Vec<AttendanceRecord>> {
        let filter = match date {
            Some(date) => doc! { "date": date },
            None => doc! {},
        };
        let cursor = self.attendance.find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn list_attendance_for_employee(
        &self,
        employee: &ObjectId,
    ) -> StoreResult<Vec<AttendanceRecord>> {
        let cursor = self.attendance.find(doc! { "employee_id": *employee }).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_attendance(&self, id: &ObjectId) -> StoreResult<Option<AttendanceRecord>> {
        Ok(self.attendance.find_one(doc! { "_id": *id }).await?)
    }

    async fn find_attendance_for_day(
        &self,
        employee: &ObjectId,
        date: &str,
        exclude: Option<&ObjectId>,
    ) -> StoreResult<Option<AttendanceRecord>> {
        let mut filter = doc! { "employee_id": *employee, "date": date };
        if let Some(exclude) = exclude {
            filter.insert("_id", doc! { "$ne": *exclude });
        }
        Ok(self.attendance.find_one(filter).await?)
    }

    async fn update_attendance(
        &self,
        id: &ObjectId,
        changes: &AttendanceChanges,
    ) -> StoreResult<Option<AttendanceRecord>> {
        let update = doc! {
            "$set": {
                "employee_id": changes.employee,
                "date": changes.date.as_str(),
                "status": changes.status.as_str(),
                "updated_at": changes.updated_at,
            }
        };
        Ok(self
            .attendance
            .find_one_and_update(doc! { "_id": *id }, update)
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn delete_attendance(&self, id: &ObjectId) -> StoreResult<bool> {
        let result = self.attendance.delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_attendance_for_employee(&self, employee: &ObjectId) -> StoreResult<u64> {
        let result = self
            .attendance
            .delete_many(doc! { "employee_id": *employee })
            .await?;
        Ok(result.deleted_count)
    }
}
