//! Field validators for employee records
//!
//! Each rule takes the raw (already trimmed) field text and either returns the
//! value to store or the client-facing error message.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use shared::Department;

lazy_static! {
    /// 3-50 ASCII letters or whitespace
    static ref NAME_REGEX: Regex = Regex::new(r"^[A-Za-z\s]{3,50}$").unwrap();

    /// 1-10 ASCII alphanumerics
    static ref EMPLOYEE_ID_REGEX: Regex = Regex::new(r"^[A-Za-z0-9]{1,10}$").unwrap();

    /// local@domain.tld with no whitespace and a single '@'
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();

    /// `\d` would accept non-ASCII digits
    static ref PHONE_REGEX: Regex = Regex::new(r"^[0-9]{10}$").unwrap();
}

pub const NAME_REQUIRED: &str = "Name is required";
pub const NAME_INVALID: &str = "Name must be 3-50 characters long and should not contain numbers";
pub const EMPLOYEE_ID_REQUIRED: &str = "Employee ID is required";
pub const EMPLOYEE_ID_INVALID: &str = "Invalid Employee ID (1-10 alphanumeric characters)";
pub const JOINING_DATE_REQUIRED: &str = "Joining date is required";
pub const JOINING_DATE_INVALID: &str = "Invalid joining date (expected YYYY-MM-DD)";
pub const JOINING_DATE_FUTURE: &str = "Joining date cannot be in the future";
pub const ROLE_REQUIRED: &str = "Role is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Invalid email format";
pub const PHONE_REQUIRED: &str = "Phone number is required";
pub const PHONE_INVALID: &str = "Phone number must be exactly 10 digits";
pub const PHONE_ALL_ZEROS: &str = "Phone number cannot be all zeros";
pub const DEPARTMENT_REQUIRED: &str = "Department is required";
pub const DEPARTMENT_INVALID: &str = "Department must be one of HR, Engineering, Marketing";

/// Validate that a value is present and not empty
pub fn validate_required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(message.to_string()),
    }
}

pub fn validate_name(name: &str) -> Result<String, String> {
    if !NAME_REGEX.is_match(name) {
        return Err(NAME_INVALID.to_string());
    }
    Ok(name.to_string())
}

pub fn validate_employee_id(employee_id: &str) -> Result<String, String> {
    if !EMPLOYEE_ID_REGEX.is_match(employee_id) {
        return Err(EMPLOYEE_ID_INVALID.to_string());
    }
    Ok(employee_id.to_string())
}

pub fn validate_email(email: &str) -> Result<String, String> {
    if !EMAIL_REGEX.is_match(email) {
        return Err(EMAIL_INVALID.to_string());
    }
    Ok(email.to_string())
}

/// Exactly 10 digits, and not the all-zero placeholder
pub fn validate_phone(phone: &str) -> Result<String, String> {
    if !PHONE_REGEX.is_match(phone) {
        return Err(PHONE_INVALID.to_string());
    }
    if phone == "0000000000" {
        return Err(PHONE_ALL_ZEROS.to_string());
    }
    Ok(phone.to_string())
}

pub fn validate_role(role: &str) -> Result<String, String> {
    validate_required(Some(role), ROLE_REQUIRED).map(str::to_string)
}

pub fn validate_department(department: &str) -> Result<Department, String> {
    department
        .parse::<Department>()
        .map_err(|_| DEPARTMENT_INVALID.to_string())
}

/// Parse a joining date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (date taken in UTC) and naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` timestamps.
pub fn parse_joining_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|ts| ts.date())
}

/// Parseable and not after `today`
pub fn validate_joining_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    let date = parse_joining_date(raw).ok_or_else(|| JOINING_DATE_INVALID.to_string())?;
    if date > today {
        return Err(JOINING_DATE_FUTURE.to_string());
    }
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_required() {
        assert_eq!(validate_required(Some("x"), "req"), Ok("x"));
        assert_eq!(validate_required(Some("   "), "req"), Err("req".to_string()));
        assert_eq!(validate_required(None, "req"), Err("req".to_string()));
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Ann Lee").is_ok());
        assert!(validate_name("Bob").is_ok());
        assert!(validate_name(&"a".repeat(50)).is_ok());

        // Too short / too long
        assert_eq!(validate_name("Al"), Err(NAME_INVALID.to_string()));
        assert!(validate_name(&"a".repeat(51)).is_err());

        // Digits and punctuation
        assert!(validate_name("Ann 2").is_err());
        assert!(validate_name("R2D2 Unit").is_err());
        assert!(validate_name("O'Brien").is_err());
    }

    #[test]
    fn test_validate_employee_id() {
        assert!(validate_employee_id("E1").is_ok());
        assert!(validate_employee_id("ABC1234567").is_ok());
        assert!(validate_employee_id("ABC12345678").is_err());
        assert!(validate_employee_id("E-1").is_err());
        assert!(validate_employee_id("E 1").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("first.last@corp.example.org").is_ok());
        assert_eq!(validate_email("a@b"), Err(EMAIL_INVALID.to_string()));
        assert!(validate_email("a b@c.com").is_err());
        assert!(validate_email("a@@b.com").is_err());
        assert!(validate_email("@b.com").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("1234567890").is_ok());
        assert_eq!(validate_phone("0000000000"), Err(PHONE_ALL_ZEROS.to_string()));
        assert_eq!(validate_phone("123456789"), Err(PHONE_INVALID.to_string()));
        assert!(validate_phone("12345678901").is_err());
        assert!(validate_phone("12345-7890").is_err());
        // Arabic-Indic digits are not ASCII digits
        assert!(validate_phone("١٢٣٤٥٦٧٨٩٠").is_err());
    }

    #[test]
    fn test_validate_department() {
        assert_eq!(validate_department("Engineering"), Ok(Department::Engineering));
        assert_eq!(validate_department("hr"), Ok(Department::Hr));
        assert_eq!(validate_department("Sales"), Err(DEPARTMENT_INVALID.to_string()));
    }

    #[test]
    fn test_parse_joining_date_formats() {
        assert_eq!(parse_joining_date("2024-01-01"), Some(day(2024, 1, 1)));
        assert_eq!(parse_joining_date("2024-01-01T00:00:00.000Z"), Some(day(2024, 1, 1)));
        assert_eq!(parse_joining_date("2024-01-01T23:30:00-02:00"), Some(day(2024, 1, 2)));
        assert_eq!(parse_joining_date("2024-03-05T10:20:30"), Some(day(2024, 3, 5)));
        assert_eq!(parse_joining_date("not a date"), None);
        assert_eq!(parse_joining_date("2024-02-30"), None);
    }

    #[test]
    fn test_validate_joining_date() {
        let today = day(2025, 6, 15);
        assert_eq!(validate_joining_date("2025-06-15", today), Ok(today));
        assert_eq!(
            validate_joining_date("2025-06-16", today),
            Err(JOINING_DATE_FUTURE.to_string())
        );
        assert_eq!(
            validate_joining_date("15/06/2025", today),
            Err(JOINING_DATE_INVALID.to_string())
        );
    }
}
