use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use shared::{Employee, EmployeeChanges, NewEmployee};
use tokio::sync::RwLock;

use super::{EmployeeStore, StoreError, StoreResult};

#[derive(Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, Employee>,
}

impl Table {
    fn employee_id_taken(&self, employee_id: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|e| e.employee_id == employee_id && Some(e.id) != except)
    }
}

/// In-process store with the same contract as the Postgres table
#[derive(Clone, Default)]
pub struct MemoryEmployeeStore {
    table: Arc<RwLock<Table>>,
}

impl MemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains(employee: &Employee, needle: &str) -> bool {
    [
        &employee.name,
        &employee.employee_id,
        &employee.email,
        &employee.phone,
        &employee.department,
        &employee.role,
    ]
    .iter()
    .any(|field| field.contains(needle))
}

#[async_trait]
impl EmployeeStore for MemoryEmployeeStore {
    async fn insert(&self, employee: &NewEmployee) -> StoreResult<i64> {
        let mut table = self.table.write().await;
        if table.employee_id_taken(&employee.employee_id, None) {
            return Err(StoreError::DuplicateEmployeeId(employee.employee_id.clone()));
        }

        table.last_id += 1;
        let id = table.last_id;
        table.rows.insert(id, employee.clone().into_employee(id));
        Ok(id)
    }

    async fn update_by_id(&self, id: i64, changes: &EmployeeChanges) -> StoreResult<u64> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&id) {
            return Ok(0);
        }
        if let Some(ref employee_id) = changes.employee_id {
            if table.employee_id_taken(employee_id, Some(id)) {
                return Err(StoreError::DuplicateEmployeeId(employee_id.clone()));
            }
        }

        match table.rows.get_mut(&id) {
            Some(row) => {
                changes.apply_to(row);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<u64> {
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&id).map_or(0, |_| 1))
    }

    async fn list_all(&self) -> StoreResult<Vec<Employee>> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn search(&self, needle: &str) -> StoreResult<Vec<Employee>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|e| contains(e, needle))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::Department;

    fn employee(name: &str, employee_id: &str, department: Department, role: &str) -> NewEmployee {
        NewEmployee {
            name: name.into(),
            employee_id: employee_id.into(),
            email: format!("{}@corp.com", employee_id.to_lowercase()),
            phone: "1234567890".into(),
            department,
            role: role.into(),
            joining_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn insert_then_list_round_trips_every_field() {
        let store = MemoryEmployeeStore::new();
        let new = employee("Ann Lee", "E1", Department::Hr, "Clerk");
        let id = store.insert(&new).await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all, vec![new.into_employee(id)]);
    }

    #[tokio::test]
    async fn ids_are_assigned_in_order() {
        let store = MemoryEmployeeStore::new();
        let a = store.insert(&employee("Ann Lee", "E1", Department::Hr, "Clerk")).await.unwrap();
        let b = store.insert(&employee("Bob Ray", "E2", Department::Marketing, "Writer")).await.unwrap();
        assert!(b > a);

        let ids: Vec<i64> = store.list_all().await.unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[tokio::test]
    async fn duplicate_employee_id_is_rejected() {
        let store = MemoryEmployeeStore::new();
        store.insert(&employee("Ann Lee", "E1", Department::Hr, "Clerk")).await.unwrap();
        let err = store
            .insert(&employee("Ann Other", "E1", Department::Hr, "Clerk"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmployeeId(ref id) if id == "E1"));
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryEmployeeStore::new();
        let id = store.insert(&employee("Ann Lee", "E1", Department::Hr, "Clerk")).await.unwrap();

        assert_eq!(store.delete_by_id(id).await.unwrap(), 1);
        assert_eq!(store.delete_by_id(id).await.unwrap(), 0);
        assert_eq!(store.delete_by_id(9_999).await.unwrap(), 0);
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_reports_affected_rows() {
        let store = MemoryEmployeeStore::new();
        let id = store.insert(&employee("Ann Lee", "E1", Department::Hr, "Clerk")).await.unwrap();
        let changes = EmployeeChanges {
            role: Some("Manager".into()),
            ..Default::default()
        };

        assert_eq!(store.update_by_id(id, &changes).await.unwrap(), 1);
        assert_eq!(store.update_by_id(id + 100, &changes).await.unwrap(), 0);
        assert_eq!(store.list_all().await.unwrap()[0].role, "Manager");
    }

    #[tokio::test]
    async fn update_may_keep_its_own_employee_id_but_not_take_another() {
        let store = MemoryEmployeeStore::new();
        let a = store.insert(&employee("Ann Lee", "E1", Department::Hr, "Clerk")).await.unwrap();
        store.insert(&employee("Bob Ray", "E2", Department::Hr, "Clerk")).await.unwrap();

        let keep = EmployeeChanges {
            employee_id: Some("E1".into()),
            ..Default::default()
        };
        assert_eq!(store.update_by_id(a, &keep).await.unwrap(), 1);

        let steal = EmployeeChanges {
            employee_id: Some("E2".into()),
            ..Default::default()
        };
        assert!(matches!(
            store.update_by_id(a, &steal).await,
            Err(StoreError::DuplicateEmployeeId(_))
        ));
    }

    #[tokio::test]
    async fn search_matches_any_of_six_fields() {
        let store = MemoryEmployeeStore::new();
        store.insert(&employee("Ann Lee", "E1", Department::Engineering, "Developer")).await.unwrap();
        store.insert(&employee("Bob Ray", "E2", Department::Hr, "Engineering Liaison")).await.unwrap();
        store.insert(&employee("Cy Dunn", "E3", Department::Marketing, "Writer")).await.unwrap();

        let hits = store.search("Engineering").await.unwrap();
        let names: Vec<&str> = hits.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Ann Lee", "Bob Ray"]);
        assert!(hits
            .iter()
            .all(|e| e.department.contains("Engineering") || e.role.contains("Engineering")));

        assert_eq!(store.search("e3@corp").await.unwrap().len(), 1);
        assert_eq!(store.search("567").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn search_is_case_sensitive_and_literal() {
        let store = MemoryEmployeeStore::new();
        store.insert(&employee("Ann Lee", "E1", Department::Hr, "Clerk")).await.unwrap();

        assert!(store.search("ann lee").await.unwrap().is_empty());
        assert!(store.search("%").await.unwrap().is_empty());
        assert_eq!(store.search("Ann").await.unwrap().len(), 1);
    }
}
