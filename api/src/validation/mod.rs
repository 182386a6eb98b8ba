//! Input Validation Module
//!
//! Every write path (create and update) passes through this module before a
//! statement reaches the store.
//!
//! 1. **Extractors** - `ValidatedJson<T>` and the error-accumulating `ValidationBuilder`
//! 2. **Validators** - one rule per employee field
//! 3. **Sanitizers** - trimming applied before the rules run
//!
//! ## Validation Error Response
//!
//! When validation fails, a 400 Bad Request is returned with every failing
//! field in one object:
//!
//! ```json
//! {
//!   "error": "Validation failed for 2 fields",
//!   "errors": {
//!     "name": "Name must be 3-50 characters long and should not contain numbers",
//!     "phone": "Phone number cannot be all zeros"
//!   },
//!   "code": 400,
//!   "timestamp": "2026-02-20T10:30:00Z",
//!   "correlation_id": "uuid-here"
//! }
//! ```

pub mod extractors;
pub mod requests;
pub mod sanitizers;
pub mod validators;

pub use extractors::{FieldErrors, Validatable, ValidatedJson, ValidationBuilder, ValidationError};
