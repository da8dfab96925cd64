//! In-process store with the same unique constraints as the MongoDB indexes.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{HrStore, StoreError, StoreResult};
use crate::model::attendance::{AttendanceChanges, AttendanceRecord};
use crate::model::employee::{EmployeeFields, EmployeeRecord};

#[derive(Default)]
struct Collections {
    employees: Vec<EmployeeRecord>,
    attendance: Vec<AttendanceRecord>,
}

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
    employee_unique_indexes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also enforces uniqueness of employee email and code on writes.
    pub fn with_employee_unique_indexes() -> Self {
        Self {
            employee_unique_indexes: true,
            ..Self::default()
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Collections>> {
        self.collections
            .read()
            .map_err(|_| StoreError::Database("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Collections>> {
        self.collections
            .write()
            .map_err(|_| StoreError::Database("memory store lock poisoned".to_string()))
    }

    fn check_employee_keys(
        &self,
        employees: &[EmployeeRecord],
        skip: Option<&ObjectId>,
        email: &str,
        code: &str,
    ) -> StoreResult<()> {
        if !self.employee_unique_indexes {
            return Ok(());
        }
        let clash = employees
            .iter()
            .filter(|e| Some(&e.id) != skip)
            .any(|e| e.email == email || e.employee_code == code);
        if clash {
            return Err(StoreError::Duplicate("Duplicate key".to_string()));
        }
        Ok(())
    }
}

fn check_attendance_key(
    attendance: &[AttendanceRecord],
    skip: Option<&ObjectId>,
    employee: &ObjectId,
    date: &str,
) -> StoreResult<()> {
    let clash = attendance
        .iter()
        .filter(|a| Some(&a.id) != skip)
        .any(|a| &a.employee == employee && a.date == date);
    if clash {
        return Err(StoreError::Duplicate("Duplicate key".to_string()));
    }
    Ok(())
}

#[async_trait]
impl HrStore for MemoryStore {
    async fn ensure_indexes(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert_employee(&self, record: &EmployeeRecord) -> StoreResult<()> {
        let mut guard = self.write()?;
        self.check_employee_keys(&guard.employees, None, &record.email, &record.employee_code)?;
        guard.employees.push(record.clone());
        Ok(())
    }

    async fn list_employees(&self) -> StoreResult<Vec<EmployeeRecord>> {
        Ok(self.read()?.employees.clone())
    }

    async fn find_employee(&self, id: &ObjectId) -> StoreResult<Option<EmployeeRecord>> {
        Ok(self.read()?.employees.iter().find(|e| &e.id == id).cloned())
    }

    async fn find_employee_by_email(&self, email: &str) -> StoreResult<Option<EmployeeRecord>> {
        Ok(self
            .read()?
            .employees
            .iter()
            .find(|e| e.email == email)
            .cloned())
    }

    async fn find_employee_by_code(&self, code: &str) -> StoreResult<Option<EmployeeRecord>> {
        Ok(self
            .read()?
            .employees
            .iter()
            .find(|e| e.employee_code == code)
            .cloned())
    }

    async fn update_employee(&self, id: &ObjectId, fields: &EmployeeFields) -> StoreResult<bool> {
        let mut guard = self.write()?;
        // an unmatched id is not a key clash, as with update_one
        let Some(pos) = guard.employees.iter().position(|e| &e.id == id) else {
            return Ok(false);
        };
        self.check_employee_keys(&guard.employees, Some(id), &fields.email, &fields.employee_code)?;
        guard.employees[pos].apply(fields);
        Ok(true)
    }

    async fn delete_employee(&self, id: &ObjectId) -> StoreResult<bool> {
        let mut guard = self.write()?;
        let before = guard.employees.len();
        guard.employees.retain(|e| &e.id != id);
        Ok(guard.employees.len() < before)
    }

    async fn insert_attendance(&self, record: &AttendanceRecord) -> StoreResult<()> {
        let mut guard = self.write()?;
        check_attendance_key(&guard.attendance, None, &record.employee, &record.date)?;
        guard.attendance.push(record.clone());
        Ok(())
    }

    async fn list_attendance(&self, date: Option<&str>) -> StoreResult<Vec<AttendanceRecord>> {
        Ok(self
            .read()?
            .attendance
            .iter()
            .filter(|a| date.is_none_or(|d| a.date == d))
            .cloned()
            .collect())
    }

    async fn list_attendance_for_employee(
        &self,
        employee: &ObjectId,
    ) -> StoreResult<Vec<AttendanceRecord>> {
        Ok(self
            .read()?
            .attendance
            .iter()
            .filter(|a| &a.employee == employee)
            .cloned()
            .collect())
    }

    async fn find_attendance(&self, id: &ObjectId) -> StoreResult<Option<AttendanceRecord>> {
        Ok(self.read()?.attendance.iter().find(|a| &a.id == id).cloned())
    }

    async fn find_attendance_for_day(
        &self,
        employee: &ObjectId,
        date: &str,
        exclude: Option<&ObjectId>,
    ) -> StoreResult<Option<AttendanceRecord>> {
        Ok(self
            .read()?
            .attendance
            .iter()
            .filter(|a| Some(&a.id) != exclude)
            .find(|a| &a.employee == employee && a.date == date)
            .cloned())
    }

    async fn update_attendance(
        &self,
        id: &ObjectId,
        changes: &AttendanceChanges,
    ) -> StoreResult<Option<AttendanceRecord>> {
        let mut guard = self.write()?;
        check_attendance_key(&guard.attendance, Some(id), &changes.employee, &changes.date)?;
        let Some(record) = guard.attendance.iter_mut().find(|a| &a.id == id) else {
            return Ok(None);
        };
        record.employee = changes.employee;
        record.date = changes.date.clone();
        record.status = changes.status.clone();
        record.updated_at = Some(changes.updated_at);
        Ok(Some(record.clone()))
    }

    async fn delete_attendance(&self, id: &ObjectId) -> StoreResult<bool> {
        let mut guard = self.write()?;
        let before = guard.attendance.len();
        guard.attendance.retain(|a| &a.id != id);
        Ok(guard.attendance.len() < before)
    }

    async fn delete_attendance_for_employee(&self, employee: &ObjectId) -> StoreResult<u64> {
        let mut guard = self.write()?;
        let before = guard.attendance.len();
        guard.attendance.retain(|a| &a.employee != employee);
        Ok((before - guard.attendance.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;

    fn employee(code: &str, email: &str) -> EmployeeRecord {
        EmployeeRecord::new(EmployeeFields {
            employee_code: code.into(),
            name: "A".into(),
            email: email.into(),
            department: "Eng".into(),
            role: "Dev".into(),
            salary: 1.0,
        })
    }

    #[actix_web::test]
    async fn attendance_pair_is_unique() {
        let store = MemoryStore::new();
        let emp = ObjectId::new();

        store
            .insert_attendance(&AttendanceRecord::new(emp, "2024-01-01".into(), "Present".into()))
            .await
            .unwrap();
        let second = store
            .insert_attendance(&AttendanceRecord::new(emp, "2024-01-01".into(), "Absent".into()))
            .await;
        assert!(matches!(second, Err(StoreError::Duplicate(_))));

        store
            .insert_attendance(&AttendanceRecord::new(emp, "2024-01-02".into(), "Absent".into()))
            .await
            .unwrap();
        assert_eq!(store.list_attendance(None).await.unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn update_may_keep_its_own_pair() {
        let store = MemoryStore::new();
        let emp = ObjectId::new();
        let record = AttendanceRecord::new(emp, "2024-01-01".into(), "Present".into());
        store.insert_attendance(&record).await.unwrap();

        let changes = AttendanceChanges {
            employee: emp,
            date: "2024-01-01".into(),
            status: "Absent".into(),
            updated_at: bson::DateTime::now(),
        };
        let updated = store.update_attendance(&record.id, &changes).await.unwrap().unwrap();
        assert_eq!(updated.status, "Absent");
        assert_eq!(updated.updated_at, Some(changes.updated_at));
        assert_eq!(updated.created_at, record.created_at);
    }

    #[actix_web::test]
    async fn employee_keys_only_enforced_when_indexed() {
        let plain = MemoryStore::new();
        plain.insert_employee(&employee("E1", "a@x.com")).await.unwrap();
        plain.insert_employee(&employee("E1", "a@x.com")).await.unwrap();
        assert_eq!(plain.list_employees().await.unwrap().len(), 2);

        let indexed = MemoryStore::with_employee_unique_indexes();
        indexed.insert_employee(&employee("E1", "a@x.com")).await.unwrap();
        let dup_email = indexed.insert_employee(&employee("E2", "a@x.com")).await;
        let dup_code = indexed.insert_employee(&employee("E1", "b@x.com")).await;
        assert!(matches!(dup_email, Err(StoreError::Duplicate(_))));
        assert!(matches!(dup_code, Err(StoreError::Duplicate(_))));
    }

    #[actix_web::test]
    async fn unknown_id_is_checked_before_keys() {
        let store = MemoryStore::with_employee_unique_indexes();
        let taken = employee("E1", "a@x.com");
        store.insert_employee(&taken).await.unwrap();

        let fields = EmployeeFields {
            employee_code: "E2".into(),
            name: "B".into(),
            email: "a@x.com".into(),
            department: "Eng".into(),
            role: "Dev".into(),
            salary: 1.0,
        };
        assert!(!store.update_employee(&ObjectId::new(), &fields).await.unwrap());

        let other = employee("E2", "b@x.com");
        store.insert_employee(&other).await.unwrap();
        let clash = store.update_employee(&other.id, &fields).await;
        assert!(matches!(clash, Err(StoreError::Duplicate(_))));
    }

    #[actix_web::test]
    async fn cascade_removes_only_that_employee() {
        let store = MemoryStore::new();
        let (a, b) = (ObjectId::new(), ObjectId::new());
        for (emp, date) in [(a, "2024-01-01"), (a, "2024-01-02"), (b, "2024-01-01")] {
            store
                .insert_attendance(&AttendanceRecord::new(emp, date.into(), "Present".into()))
                .await
                .unwrap();
        }

        assert_eq!(store.delete_attendance_for_employee(&a).await.unwrap(), 2);
        let left = store.list_attendance(None).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].employee, b);
    }
}
