use std::future::Future;
use std::time::Instant;

use async_trait::async_trait;
use shared::{Employee, EmployeeChanges, NewEmployee};
use sqlx::PgPool;

use super::{EmployeeStore, StoreError, StoreResult};
use crate::metrics;

/// Employees backed by the `employees` table
#[derive(Clone)]
pub struct PgEmployeeStore {
    pool: PgPool,
}

impl PgEmployeeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Wrap `needle` for a LIKE containment match.
///
/// `\`, `%` and `_` are escaped with a backslash, which is Postgres' default
/// LIKE escape character, so the needle only ever matches literally.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

async fn timed<T, F>(query: &'static str, statement: F) -> Result<T, sqlx::Error>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    let started = Instant::now();
    let result = statement.await;
    metrics::observe_db_query(query, started.elapsed().as_secs_f64());
    if let Err(ref err) = result {
        metrics::observe_db_error(query);
        tracing::debug!(query, error = %err, "statement failed");
    }
    result
}

fn write_error(err: sqlx::Error, employee_id: Option<&str>) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            return StoreError::DuplicateEmployeeId(employee_id.unwrap_or_default().to_string());
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl EmployeeStore for PgEmployeeStore {
    async fn insert(&self, employee: &NewEmployee) -> StoreResult<i64> {
        timed(
            "insert_employee",
            sqlx::query_scalar::<_, i64>(
                "INSERT INTO employees (name, employee_id, email, phone, department, role, joining_date)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 RETURNING id",
            )
            .bind(&employee.name)
            .bind(&employee.employee_id)
            .bind(&employee.email)
            .bind(&employee.phone)
            .bind(employee.department.as_str())
            .bind(&employee.role)
            .bind(employee.joining_date)
            .fetch_one(&self.pool),
        )
        .await
        .map_err(|err| write_error(err, Some(employee.employee_id.as_str())))
    }

    async fn update_by_id(&self, id: i64, changes: &EmployeeChanges) -> StoreResult<u64> {
        let result = timed(
            "update_employee",
            sqlx::query(
                "UPDATE employees SET
                     name = COALESCE($1, name),
                     employee_id = COALESCE($2, employee_id),
                     email = COALESCE($3, email),
                     phone = COALESCE($4, phone),
                     department = COALESCE($5, department),
                     role = COALESCE($6, role),
                     joining_date = COALESCE($7, joining_date)
                 WHERE id = $8",
            )
            .bind(changes.name.as_deref())
            .bind(changes.employee_id.as_deref())
            .bind(changes.email.as_deref())
            .bind(changes.phone.as_deref())
            .bind(changes.department.map(|d| d.as_str()))
            .bind(changes.role.as_deref())
            .bind(changes.joining_date)
            .bind(id)
            .execute(&self.pool),
        )
        .await
        .map_err(|err| write_error(err, changes.employee_id.as_deref()))?;

        Ok(result.rows_affected())
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<u64> {
        let result = timed(
            "delete_employee",
            sqlx::query("DELETE FROM employees WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected())
    }

    async fn list_all(&self) -> StoreResult<Vec<Employee>> {
        let rows = timed(
            "list_employees",
            sqlx::query_as::<_, Employee>(
                "SELECT id, name, employee_id, email, phone, department, role, joining_date
                 FROM employees
                 ORDER BY id",
            )
            .fetch_all(&self.pool),
        )
        .await?;

        Ok(rows)
    }

    async fn search(&self, needle: &str) -> StoreResult<Vec<Employee>> {
        let pattern = like_pattern(needle);
        let rows = timed(
            "search_employees",
            sqlx::query_as::<_, Employee>(
                "SELECT id, name, employee_id, email, phone, department, role, joining_date
                 FROM employees
                 WHERE name LIKE $1
                    OR employee_id LIKE $1
                    OR email LIKE $1
                    OR phone LIKE $1
                    OR department LIKE $1
                    OR role LIKE $1
                 ORDER BY id",
            )
            .bind(&pattern)
            .fetch_all(&self.pool),
        )
        .await?;

        Ok(rows)
    }

    async fn ping(&self) -> StoreResult<()> {
        timed(
            "ping",
            sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&self.pool),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::Department;
    use sqlx::postgres::PgPoolOptions;
    use std::time::Duration;

    /// Store over `DATABASE_URL` with migrations applied, or `None` when unset
    async fn live_store() -> Option<PgEmployeeStore> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping Postgres test");
            return None;
        };
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("connect to DATABASE_URL");
        sqlx::migrate!("../migrations").run(&pool).await.expect("migrations");
        Some(PgEmployeeStore::new(pool))
    }

    fn unique_employee_id() -> String {
        let mut id = uuid::Uuid::new_v4().simple().to_string();
        id.truncate(10);
        id
    }

    fn new_employee(employee_id: &str) -> NewEmployee {
        NewEmployee {
            name: "Ann Lee".into(),
            employee_id: employee_id.into(),
            email: "ann@x.com".into(),
            phone: "1234567890".into(),
            department: Department::Hr,
            role: "Clerk".into(),
            joining_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        }
    }

    async fn fetch(store: &PgEmployeeStore, id: i64) -> Employee {
        sqlx::query_as::<_, Employee>(
            "SELECT id, name, employee_id, email, phone, department, role, joining_date
             FROM employees WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&store.pool)
        .await
        .unwrap()
    }

    #[test]
    fn test_like_pattern_wraps_needle() {
        assert_eq!(like_pattern("Engineering"), "%Engineering%");
        assert_eq!(like_pattern(""), "%%");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern(r"C:\dir"), r"%C:\\dir%");
    }

    #[tokio::test]
    async fn test_unreachable_database_is_a_database_error() {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_millis(250))
            .connect_lazy("postgres://postgres@127.0.0.1:1/employees")
            .expect("lazy pool");
        let store = PgEmployeeStore::new(pool);

        assert!(matches!(store.ping().await, Err(StoreError::Database(_))));
        assert!(matches!(store.delete_by_id(1).await, Err(StoreError::Database(_))));
    }

    #[tokio::test]
    async fn test_unique_violation_is_duplicate_employee_id() {
        let Some(store) = live_store().await else { return };
        let employee_id = unique_employee_id();
        let id = store.insert(&new_employee(&employee_id)).await.unwrap();

        let err = store.insert(&new_employee(&employee_id)).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmployeeId(ref dup) if *dup == employee_id));

        let other_id = unique_employee_id();
        let other = store.insert(&new_employee(&other_id)).await.unwrap();
        let steal = EmployeeChanges {
            employee_id: Some(employee_id.clone()),
            ..Default::default()
        };
        assert!(matches!(
            store.update_by_id(other, &steal).await,
            Err(StoreError::DuplicateEmployeeId(_))
        ));

        store.delete_by_id(id).await.unwrap();
        store.delete_by_id(other).await.unwrap();
    }

    #[tokio::test]
    async fn test_partial_update_keeps_absent_columns() {
        let Some(store) = live_store().await else { return };
        let employee_id = unique_employee_id();
        let id = store.insert(&new_employee(&employee_id)).await.unwrap();

        let changes = EmployeeChanges {
            role: Some("Manager".into()),
            department: Some(Department::Engineering),
            ..Default::default()
        };
        assert_eq!(store.update_by_id(id, &changes).await.unwrap(), 1);
        assert_eq!(store.update_by_id(-1, &changes).await.unwrap(), 0);

        let row = fetch(&store, id).await;
        assert_eq!(row.role, "Manager");
        assert_eq!(row.department, "Engineering");
        assert_eq!(row.name, "Ann Lee");
        assert_eq!(row.employee_id, employee_id);
        assert_eq!(row.phone, "1234567890");
        assert_eq!(row.joining_date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());

        assert_eq!(store.delete_by_id(id).await.unwrap(), 1);
    }
}
