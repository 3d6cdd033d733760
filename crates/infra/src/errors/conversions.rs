//! Conversions from external infrastructure errors into domain errors.

use fieldplan_domain::FieldPlanError;
use reqwest::Error as HttpError;
use reqwest::StatusCode;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub FieldPlanError);

impl From<InfraError> for FieldPlanError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<FieldPlanError> for InfraError {
    fn from(value: FieldPlanError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoFieldPlanError {
    fn into_fieldplan(self) -> FieldPlanError;
}

/* -------------------------------------------------------------------------- */
/* HTTP status → FieldPlanError */
/* -------------------------------------------------------------------------- */

/// Classify an unsuccessful HTTP status.
///
/// Missing resources are `NotFound` so the sync worker can recreate remote
/// events; everything retry-worthy is `Network`.
pub fn status_error(status: StatusCode, context: &str) -> FieldPlanError {
    let code = status.as_u16();
    let message = format!(
        "{context}: HTTP {} {}",
        code,
        status.canonical_reason().unwrap_or("unknown status")
    );

    match code {
        401 | 403 => FieldPlanError::Auth(message),
        404 | 410 => FieldPlanError::NotFound(message),
        408 | 429 => FieldPlanError::Network(message),
        400..=499 => FieldPlanError::InvalidInput(message),
        _ => FieldPlanError::Network(message),
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → FieldPlanError */
/* -------------------------------------------------------------------------- */

impl IntoFieldPlanError for HttpError {
    fn into_fieldplan(self) -> FieldPlanError {
        if self.is_timeout() {
            return FieldPlanError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return FieldPlanError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return status_error(status, "HTTP request failed");
        }

        if self.is_decode() {
            return FieldPlanError::InvalidInput(format!("unexpected response body: {self}"));
        }

        FieldPlanError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_fieldplan())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
