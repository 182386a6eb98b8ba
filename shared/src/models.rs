use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

// ═══════════════════════════════════════════════════════════════════════════
// EMPLOYEE RECORDS
// ═══════════════════════════════════════════════════════════════════════════

/// An employee as stored in the directory.
///
/// Text columns are kept as plain strings: rows written before a rule existed
/// are returned as-is and never re-validated on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub employee_id: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub role: String,
    pub joining_date: NaiveDate,
}

/// Department an employee belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "HR")]
    Hr,
    Engineering,
    Marketing,
}

impl Department {
    pub const ALL: [Department; 3] = [Department::Hr, Department::Engineering, Department::Marketing];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Hr => "HR",
            Department::Engineering => "Engineering",
            Department::Marketing => "Marketing",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a department name is not one of [`Department::ALL`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDepartment(pub String);

impl fmt::Display for UnknownDepartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown department '{}'", self.0)
    }
}

impl std::error::Error for UnknownDepartment {}

impl FromStr for Department {
    type Err = UnknownDepartment;

    /// Case-insensitive; the parsed value always carries the canonical spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Department::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDepartment(s.to_string()))
    }
}

/// Fields of an employee record that can carry a validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmployeeField {
    Name,
    EmployeeId,
    JoiningDate,
    Role,
    Email,
    Phone,
    Department,
}

impl EmployeeField {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeField::Name => "name",
            EmployeeField::EmployeeId => "employeeId",
            EmployeeField::JoiningDate => "joiningDate",
            EmployeeField::Role => "role",
            EmployeeField::Email => "email",
            EmployeeField::Phone => "phone",
            EmployeeField::Department => "department",
        }
    }
}

impl fmt::Display for EmployeeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// REQUEST TYPES
// ═══════════════════════════════════════════════════════════════════════════

/// Candidate record as submitted by a client.
///
/// Every field is optional on the wire so that a missing field is reported
/// by validation rather than rejected by the JSON decoder. Unknown fields
/// (such as `id` echoed back by an edit form) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    pub name: Option<String>,
    pub employee_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub role: Option<String>,
    pub joining_date: Option<String>,
}

/// Update body for PUT /employees/:id. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeePatch(pub EmployeeInput);

/// A fully validated employee ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub name: String,
    pub employee_id: String,
    pub email: String,
    pub phone: String,
    pub department: Department,
    pub role: String,
    pub joining_date: NaiveDate,
}

impl NewEmployee {
    pub fn into_employee(self, id: i64) -> Employee {
        Employee {
            id,
            name: self.name,
            employee_id: self.employee_id,
            email: self.email,
            phone: self.phone,
            department: self.department.to_string(),
            role: self.role,
            joining_date: self.joining_date,
        }
    }
}

/// Validated column changes for an update; `None` leaves the column alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeChanges {
    pub name: Option<String>,
    pub employee_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<Department>,
    pub role: Option<String>,
    pub joining_date: Option<NaiveDate>,
}

impl EmployeeChanges {
    pub fn is_empty(&self) -> bool {
        *self == EmployeeChanges::default()
    }

    pub fn apply_to(&self, employee: &mut Employee) {
        if let Some(ref name) = self.name {
            employee.name = name.clone();
        }
        if let Some(ref employee_id) = self.employee_id {
            employee.employee_id = employee_id.clone();
        }
        if let Some(ref email) = self.email {
            employee.email = email.clone();
        }
        if let Some(ref phone) = self.phone {
            employee.phone = phone.clone();
        }
        if let Some(department) = self.department {
            employee.department = department.to_string();
        }
        if let Some(ref role) = self.role {
            employee.role = role.clone();
        }
        if let Some(joining_date) = self.joining_date {
            employee.joining_date = joining_date;
        }
    }
}

/// Query params for GET /employees
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeSearchParams {
    pub query: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════
// RESPONSE TYPES
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub affected_rows: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub message: String,
    pub result: UpdateResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<Employee>,
}
