use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::Rng;
use shared::{Department, NewEmployee};
use sqlx::PgPool;
use std::collections::HashMap;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Amara", "Bea", "Chidi", "Dana", "Elif", "Farah", "Grace", "Hiro",
    "Ines", "Jonas", "Kemi", "Linus", "Maya", "Noor", "Omar", "Priya", "Quinn", "Rosa",
];

const LAST_NAMES: &[&str] = &[
    "Adeyemi", "Bauer", "Castro", "Dubois", "Eze", "Fischer", "Garcia", "Hopper", "Ivanova",
    "Jensen", "Kim", "Lovelace", "Moreau", "Nakamura", "Okafor", "Patel", "Rossi", "Silva",
];

const HR_ROLES: &[&str] = &["Recruiter", "HR Generalist", "Payroll Specialist", "HR Manager"];
const ENGINEERING_ROLES: &[&str] = &[
    "Software Engineer",
    "Senior Engineer",
    "QA Engineer",
    "Site Reliability Engineer",
    "Engineering Manager",
];
const MARKETING_ROLES: &[&str] = &[
    "Content Writer",
    "SEO Specialist",
    "Brand Manager",
    "Marketing Analyst",
];

/// Joining dates are drawn from the last ten years, never today or later
const MAX_TENURE_DAYS: i64 = 3650;

fn roles_for(department: Department) -> &'static [&'static str] {
    match department {
        Department::Hr => HR_ROLES,
        Department::Engineering => ENGINEERING_ROLES,
        Department::Marketing => MARKETING_ROLES,
    }
}

/// Names from the custom data file under `key`, keeping only entries that
/// contain nothing but letters
fn custom_names(custom_data: Option<&HashMap<String, serde_json::Value>>, key: &str) -> Vec<String> {
    custom_data
        .and_then(|data| data.get(key))
        .and_then(|v| v.as_array())
        .map(|names| {
            names
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::trim)
                .filter(|name| !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn pick<'a>(rng: &mut StdRng, custom: &'a [String], fallback: &'a [&'a str]) -> &'a str {
    if custom.is_empty() {
        fallback[rng.gen_range(0..fallback.len())]
    } else {
        &custom[rng.gen_range(0..custom.len())]
    }
}

fn generate_phone(rng: &mut StdRng) -> String {
    let mut phone = rng.gen_range(1..=9).to_string();
    for _ in 0..9 {
        phone.push(char::from(b'0' + rng.gen_range(0..10u8)));
    }
    phone
}

/// Build `count` employees that satisfy every validation rule as of `today`
pub fn generate_employees(
    count: usize,
    rng: &mut StdRng,
    custom_data: Option<&HashMap<String, serde_json::Value>>,
    today: NaiveDate,
) -> Vec<NewEmployee> {
    let first_names = custom_names(custom_data, "first_names");
    let last_names = custom_names(custom_data, "last_names");
    let id_base: usize = rng.gen_range(0..90_000);

    (0..count)
        .map(|i| {
            let first = pick(rng, &first_names, FIRST_NAMES).to_string();
            let last = pick(rng, &last_names, LAST_NAMES).to_string();
            let mut name = format!("{} {}", first, last);
            name.truncate(50);

            let department = Department::ALL[rng.gen_range(0..Department::ALL.len())];
            let roles = roles_for(department);
            let role = roles[rng.gen_range(0..roles.len())].to_string();

            NewEmployee {
                email: format!("{}.{}{}@example.com", first, last, i).to_lowercase(),
                name: name.trim_end().to_string(),
                employee_id: format!("EMP{:05}", id_base + i),
                phone: generate_phone(rng),
                department,
                role,
                joining_date: today - Duration::days(rng.gen_range(1..=MAX_TENURE_DAYS)),
            }
        })
        .collect()
}

/// Insert every employee, skipping those whose employee ID is already taken.
/// Returns the number of rows written.
pub async fn insert_employees(pool: &PgPool, employees: &[NewEmployee]) -> Result<u64> {
    let mut inserted = 0;

    for employee in employees {
        let result = sqlx::query(
            "INSERT INTO employees (name, employee_id, email, phone, department, role, joining_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (employee_id) DO NOTHING",
        )
        .bind(&employee.name)
        .bind(&employee.employee_id)
        .bind(&employee.email)
        .bind(&employee.phone)
        .bind(employee.department.as_str())
        .bind(&employee.role)
        .bind(employee.joining_date)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to insert employee {}", employee.employee_id))?;

        inserted += result.rows_affected();
    }

    Ok(inserted)
}
