//! Validation implementations for employee request bodies
//!
//! Create requests must carry every field. Update requests are checked
//! field-by-field with the same rules, skipping fields that are absent.

use chrono::NaiveDate;
use shared::models::{EmployeeChanges, EmployeeField, EmployeeInput, EmployeePatch, NewEmployee};

use super::extractors::{FieldErrors, Validatable, ValidationBuilder};
use super::sanitizers::trim_in_place;
use super::validators::{
    validate_department, validate_email, validate_employee_id, validate_joining_date,
    validate_name, validate_phone, validate_required, validate_role, DEPARTMENT_REQUIRED,
    EMAIL_REQUIRED, EMPLOYEE_ID_REQUIRED, JOINING_DATE_REQUIRED, NAME_REQUIRED, PHONE_REQUIRED,
    ROLE_REQUIRED,
};

fn sanitize_input(input: &mut EmployeeInput) {
    trim_in_place(&mut input.name);
    trim_in_place(&mut input.employee_id);
    trim_in_place(&mut input.email);
    trim_in_place(&mut input.phone);
    trim_in_place(&mut input.department);
    trim_in_place(&mut input.role);
    trim_in_place(&mut input.joining_date);
}

/// Required field: a missing or blank value reports `missing`
fn required<T>(
    builder: &mut ValidationBuilder,
    field: EmployeeField,
    value: &Option<String>,
    missing: &str,
    rule: impl FnOnce(&str) -> Result<T, String>,
) -> Option<T> {
    builder.check(field, || validate_required(value.as_deref(), missing).and_then(rule))
}

/// Optional field: only checked when present, then held to the same rules
fn present<T>(
    builder: &mut ValidationBuilder,
    field: EmployeeField,
    value: &Option<String>,
    missing: &str,
    rule: impl FnOnce(&str) -> Result<T, String>,
) -> Option<T> {
    value
        .as_deref()
        .and_then(|raw| builder.check(field, || validate_required(Some(raw), missing).and_then(rule)))
}

// ─────────────────────────────────────────────────────────────────────────────
// EmployeeInput validation (create)
// ─────────────────────────────────────────────────────────────────────────────

impl Validatable for EmployeeInput {
    type Valid = NewEmployee;

    fn sanitize(&mut self) {
        sanitize_input(self);
    }

    fn validate_on(&self, today: NaiveDate) -> Result<NewEmployee, FieldErrors> {
        let mut v = ValidationBuilder::new();

        let name = required(&mut v, EmployeeField::Name, &self.name, NAME_REQUIRED, validate_name);
        let employee_id = required(
            &mut v,
            EmployeeField::EmployeeId,
            &self.employee_id,
            EMPLOYEE_ID_REQUIRED,
            validate_employee_id,
        );
        let joining_date = required(
            &mut v,
            EmployeeField::JoiningDate,
            &self.joining_date,
            JOINING_DATE_REQUIRED,
            |raw| validate_joining_date(raw, today),
        );
        let role = required(&mut v, EmployeeField::Role, &self.role, ROLE_REQUIRED, validate_role);
        let email = required(&mut v, EmployeeField::Email, &self.email, EMAIL_REQUIRED, validate_email);
        let phone = required(&mut v, EmployeeField::Phone, &self.phone, PHONE_REQUIRED, validate_phone);
        let department = required(
            &mut v,
            EmployeeField::Department,
            &self.department,
            DEPARTMENT_REQUIRED,
            validate_department,
        );

        match (name, employee_id, joining_date, role, email, phone, department) {
            (
                Some(name),
                Some(employee_id),
                Some(joining_date),
                Some(role),
                Some(email),
                Some(phone),
                Some(department),
            ) => Ok(NewEmployee {
                name,
                employee_id,
                email,
                phone,
                department,
                role,
                joining_date,
            }),
            _ => Err(v.into_errors()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EmployeePatch validation (update)
// ─────────────────────────────────────────────────────────────────────────────

impl Validatable for EmployeePatch {
    type Valid = EmployeeChanges;

    fn sanitize(&mut self) {
        sanitize_input(&mut self.0);
    }

    fn validate_on(&self, today: NaiveDate) -> Result<EmployeeChanges, FieldErrors> {
        let input = &self.0;
        let mut v = ValidationBuilder::new();

        let changes = EmployeeChanges {
            name: present(&mut v, EmployeeField::Name, &input.name, NAME_REQUIRED, validate_name),
            employee_id: present(
                &mut v,
                EmployeeField::EmployeeId,
                &input.employee_id,
                EMPLOYEE_ID_REQUIRED,
                validate_employee_id,
            ),
            email: present(&mut v, EmployeeField::Email, &input.email, EMAIL_REQUIRED, validate_email),
            phone: present(&mut v, EmployeeField::Phone, &input.phone, PHONE_REQUIRED, validate_phone),
            department: present(
                &mut v,
                EmployeeField::Department,
                &input.department,
                DEPARTMENT_REQUIRED,
                validate_department,
            ),
            role: present(&mut v, EmployeeField::Role, &input.role, ROLE_REQUIRED, validate_role),
            joining_date: present(
                &mut v,
                EmployeeField::JoiningDate,
                &input.joining_date,
                JOINING_DATE_REQUIRED,
                |raw| validate_joining_date(raw, today),
            ),
        };

        v.build()?;
        Ok(changes)
    }
}
