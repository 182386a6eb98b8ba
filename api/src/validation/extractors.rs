//! Custom Axum extractors for validated input
//!
//! This module provides `ValidatedJson<T>` - a replacement for `Json<T>`
//! that parses, sanitizes and validates incoming JSON payloads, handing the
//! handler the typed value produced by validation.

use std::collections::BTreeMap;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, SecondsFormat, Utc};
use serde::{de::DeserializeOwned, Serialize};
use shared::EmployeeField;
use uuid::Uuid;

use crate::error::ApiError;
use crate::metrics;

/// Field-level validation errors, at most one message per field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<EmployeeField, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error; the first message recorded for a field wins
    pub fn insert(&mut self, field: EmployeeField, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: EmployeeField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: EmployeeField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = EmployeeField> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Validation error response body
#[derive(Debug, Serialize)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub errors: FieldErrors,
    pub code: u16,
    pub timestamp: String,
    pub correlation_id: String,
}

impl ValidationErrorResponse {
    pub fn new(errors: FieldErrors) -> Self {
        let error_summary = match errors.fields().next() {
            Some(field) if errors.len() == 1 => format!("Validation failed for field '{}'", field),
            _ => format!("Validation failed for {} fields", errors.len()),
        };

        Self {
            error: error_summary,
            errors,
            code: StatusCode::BAD_REQUEST.as_u16(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            correlation_id: Uuid::new_v4().to_string(),
        }
    }
}

/// Validation error that converts to a 400 response
#[derive(Debug)]
pub struct ValidationError {
    pub errors: FieldErrors,
}

impl ValidationError {
    pub fn new(errors: FieldErrors) -> Self {
        Self { errors }
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        for field in self.errors.fields() {
            metrics::VALIDATION_FAILURES
                .with_label_values(&[field.as_str()])
                .inc();
        }
        tracing::debug!(errors = ?self.errors, "request rejected by validation");

        let payload = ValidationErrorResponse::new(self.errors);
        let correlation_id = payload.correlation_id.clone();

        let mut response = (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        if let Ok(value) = HeaderValue::from_str(&correlation_id) {
            response
                .headers_mut()
                .insert(header::HeaderName::from_static("x-correlation-id"), value);
        }
        response
    }
}

/// Types that can be sanitized and validated into a typed value
pub trait Validatable: Sized {
    /// What a successful validation produces
    type Valid;

    /// Sanitize the data in-place (trim whitespace etc.)
    fn sanitize(&mut self);

    /// Validate against an explicit "today" so date rules are deterministic
    fn validate_on(&self, today: NaiveDate) -> Result<Self::Valid, FieldErrors>;

    /// Validate against the current UTC date
    fn validate(&self) -> Result<Self::Valid, FieldErrors> {
        self.validate_on(Utc::now().date_naive())
    }
}

/// JSON extractor that sanitizes and validates input
///
/// 1. Parse JSON from the request body
/// 2. Sanitize all string fields
/// 3. Validate every field in one pass
/// 4. Return a 400 with all field errors when validation fails
///
/// ```ignore
/// pub async fn create_employee(
///     ValidatedJson(employee): ValidatedJson<EmployeeInput>,
/// ) -> impl IntoResponse {
///     // employee is a NewEmployee
/// }
/// ```
pub struct ValidatedJson<T: Validatable>(pub T::Valid);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validatable + Send,
    T::Valid: Send,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(mut data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|err| map_json_rejection(err).into_response())?;

        data.sanitize();

        let valid = data
            .validate()
            .map_err(|errors| ValidationError::new(errors).into_response())?;

        Ok(ValidatedJson(valid))
    }
}

fn map_json_rejection(err: JsonRejection) -> ApiError {
    let message = match err {
        JsonRejection::JsonDataError(e) => format!("Invalid JSON data: {}", e.body_text()),
        JsonRejection::JsonSyntaxError(e) => format!("JSON syntax error: {}", e.body_text()),
        JsonRejection::MissingJsonContentType(_) => {
            "Content-Type must be application/json".to_string()
        }
        JsonRejection::BytesRejection(_) => "Failed to read request body".to_string(),
        _ => "Invalid JSON payload".to_string(),
    };
    ApiError::bad_request("InvalidRequest", message)
}

/// Builder for accumulating validation errors across fields
#[derive(Debug, Default)]
pub struct ValidationBuilder {
    errors: FieldErrors,
}

impl ValidationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a validator, recording its error against `field`.
    /// Returns the validated value on success.
    pub fn check<T, F>(&mut self, field: EmployeeField, validator: F) -> Option<T>
    where
        F: FnOnce() -> Result<T, String>,
    {
        match validator() {
            Ok(value) => Some(value),
            Err(message) => {
                self.errors.insert(field, message);
                None
            }
        }
    }

    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }

    pub fn build(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
