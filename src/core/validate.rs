//! Document validation

use crate::core::document::{CompiledStep, PipelineDocument};
use std::fmt;

/// A single validation failure, addressed by document path.
///
/// Validation failures are data: they are collected, never thrown, and
/// block submission without blocking further editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path into the document, e.g. `steps[2].url`
    pub path: String,
    pub message: String,
}

impl ValidationError {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"];

impl PipelineDocument {
    /// Validate the document against the submission schema.
    ///
    /// Returns every failure found; an empty list means the document is
    /// accepted. Run at submit time and whenever the raw YAML view is
    /// edited.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(ValidationError::new("name", "pipeline name must not be empty"));
        }

        let options = &self.runtime.temporal.activity_options;
        if let Err(e) = options.schedule_to_close_timeout.check_format() {
            errors.push(ValidationError::new(
                "runtime.temporal.activity_options.schedule_to_close_timeout",
                e.to_string(),
            ));
        }
        if let Err(e) = options.start_to_close_timeout.check_format() {
            errors.push(ValidationError::new(
                "runtime.temporal.activity_options.start_to_close_timeout",
                e.to_string(),
            ));
        }
        if options.retry_policy.maximum_attempts == 0 {
            errors.push(ValidationError::new(
                "runtime.temporal.activity_options.retry_policy.maximum_attempts",
                "must be at least 1",
            ));
        }

        for (index, step) in self.steps.iter().enumerate() {
            validate_step(index, step, &mut errors);
        }

        errors
    }

    /// Consume the document, returning it only when validation accepts it
    pub fn validated(self) -> Result<Self, Vec<ValidationError>> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(errors)
        }
    }
}

fn step_path(index: usize, field: &str) -> String {
    format!("steps[{}].{}", index, field)
}

fn require(errors: &mut Vec<ValidationError>, index: usize, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::new(
            step_path(index, field),
            "must not be empty",
        ));
    }
}

fn validate_step(index: usize, step: &CompiledStep, errors: &mut Vec<ValidationError>) {
    match step {
        CompiledStep::Wallet {
            wallet,
            version,
            action,
        } => {
            require(errors, index, "wallet", wallet);
            require(errors, index, "version", version);
            require(errors, index, "action", action);
        }
        CompiledStep::Credential { credential_id } => {
            require(errors, index, "credential_id", credential_id);
        }
        CompiledStep::ConformanceCheck {
            standard,
            version,
            suite,
            test,
        } => {
            require(errors, index, "standard", standard);
            require(errors, index, "version", version);
            require(errors, index, "suite", suite);
            require(errors, index, "test", test);
        }
        CompiledStep::UseCaseVerification { use_case_id } => {
            require(errors, index, "use_case_id", use_case_id);
        }
        CompiledStep::Email { to, subject, .. } => {
            require(errors, index, "subject", subject);
            if !to.contains('@') {
                errors.push(ValidationError::new(
                    step_path(index, "to"),
                    format!("'{}' is not an email address", to),
                ));
            }
        }
        CompiledStep::HttpRequest { method, url, .. } => {
            require(errors, index, "url", url);
            if !HTTP_METHODS.contains(&method.to_ascii_uppercase().as_str()) {
                errors.push(ValidationError::new(
                    step_path(index, "method"),
                    format!("'{}' is not an HTTP method", method),
                ));
            }
        }
        CompiledStep::Debug { message } => {
            require(errors, index, "message", message);
        }
    }
}
