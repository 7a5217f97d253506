//! Step domain model

use serde::{Deserialize, Serialize};
use std::fmt;

/// One unit of an automated test pipeline.
///
/// A closed set of variants: adding a step kind means adding a variant
/// here and a compile arm in [`crate::core::document`], both enforced
/// by exhaustive matching. Every constructed value is fully addressed:
/// the wizard forms only emit a `Step` once all fields for the variant
/// are selected, so a partially-filled step can never enter a builder's
/// ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    /// Drive a registered wallet through one of its published actions
    Wallet {
        wallet: String,
        version: String,
        action: String,
    },

    /// Issue and check a marketplace credential
    Credential { credential_id: String },

    /// Run a single conformance test addressed through the
    /// standard → version → suite → test hierarchy
    ConformanceCheck {
        standard: String,
        version: String,
        suite: String,
        test: String,
    },

    /// Exercise a verifier use case from the marketplace
    UseCaseVerification { use_case_id: String },

    /// A utility action with no external test resource
    Utility(UtilityAction),
}

/// Utility actions available as pipeline steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UtilityAction {
    /// Send a notification email
    Email {
        to: String,
        subject: String,
        body: String,
    },

    /// Perform an arbitrary HTTP request
    HttpRequest {
        method: String,
        url: String,
        body: Option<String>,
    },

    /// Emit a debug message into the run log
    Debug { message: String },
}

/// The step kinds a builder can be asked to add.
///
/// Mirrors the [`Step`] variants one-to-one but carries no payload;
/// it names which sub-form the wizard should open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Wallet,
    Credential,
    ConformanceCheck,
    UseCaseVerification,
    Email,
    HttpRequest,
    Debug,
}

impl Step {
    /// The kind of this step
    pub fn kind(&self) -> StepKind {
        match self {
            Step::Wallet { .. } => StepKind::Wallet,
            Step::Credential { .. } => StepKind::Credential,
            Step::ConformanceCheck { .. } => StepKind::ConformanceCheck,
            Step::UseCaseVerification { .. } => StepKind::UseCaseVerification,
            Step::Utility(UtilityAction::Email { .. }) => StepKind::Email,
            Step::Utility(UtilityAction::HttpRequest { .. }) => StepKind::HttpRequest,
            Step::Utility(UtilityAction::Debug { .. }) => StepKind::Debug,
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepKind::Wallet => "wallet",
            StepKind::Credential => "credential",
            StepKind::ConformanceCheck => "conformance_check",
            StepKind::UseCaseVerification => "use_case_verification",
            StepKind::Email => "email",
            StepKind::HttpRequest => "http_request",
            StepKind::Debug => "debug",
        };
        f.write_str(name)
    }
}
