//! Canonical workflow document and the step compiler

use crate::core::duration::DurationStr;
use crate::core::step::{Step, UtilityAction};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Pipeline-level metadata collected by the builder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineMetadata {
    /// Display name of the pipeline
    pub name: String,
}

/// Execution options applied to every activity of the workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityOptions {
    pub schedule_to_close_timeout: DurationStr,
    pub start_to_close_timeout: DurationStr,
    pub retry_policy: RetryPolicy,
}

/// Retry policy section of the activity options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub maximum_attempts: u32,
}

impl Default for ActivityOptions {
    fn default() -> Self {
        Self {
            schedule_to_close_timeout: DurationStr::parse("20m").expect("default duration"),
            start_to_close_timeout: DurationStr::parse("10m").expect("default duration"),
            retry_policy: RetryPolicy {
                maximum_attempts: 3,
            },
        }
    }
}

/// Runtime section of the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Runtime {
    pub temporal: TemporalRuntime,
}

/// Temporal runtime settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalRuntime {
    pub activity_options: ActivityOptions,
}

/// The wire form of one compiled pipeline step.
///
/// One variant per [`Step`] variant; the `type` tag and field names are
/// the job runner's wire vocabulary. Compilation matches exhaustively,
/// so a new step kind cannot be added without a compile arm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompiledStep {
    Wallet {
        wallet: String,
        version: String,
        action: String,
    },
    Credential {
        credential_id: String,
    },
    ConformanceCheck {
        standard: String,
        version: String,
        suite: String,
        test: String,
    },
    UseCaseVerification {
        use_case_id: String,
    },
    Email {
        to: String,
        subject: String,
        body: String,
    },
    HttpRequest {
        method: String,
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
    Debug {
        message: String,
    },
}

/// The canonical workflow document submitted to the job runner.
///
/// A pure projection of `(metadata, activity options, steps)`: it is
/// recomputed, never mutated in place. Field order is fixed by the type
/// declarations and duration strings are normalized on the way in, so
/// semantically identical documents serialize to byte-identical YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineDocument {
    pub name: String,
    pub runtime: Runtime,
    pub steps: Vec<CompiledStep>,
}

/// Compile builder state into a canonical document.
///
/// Total over well-typed input: every step variant has a shape arm and
/// an empty step list compiles to a document with no steps. Business
/// rules (does the wallet action still exist, is the duration sane) are
/// the validator's concern, not the compiler's.
pub fn compile(
    metadata: &PipelineMetadata,
    options: &ActivityOptions,
    steps: &[Step],
) -> PipelineDocument {
    let mut activity_options = options.clone();
    activity_options.schedule_to_close_timeout.canonicalize();
    activity_options.start_to_close_timeout.canonicalize();

    PipelineDocument {
        name: metadata.name.clone(),
        runtime: Runtime {
            temporal: TemporalRuntime { activity_options },
        },
        steps: steps.iter().map(compile_step).collect(),
    }
}

fn compile_step(step: &Step) -> CompiledStep {
    match step {
        Step::Wallet {
            wallet,
            version,
            action,
        } => CompiledStep::Wallet {
            wallet: wallet.clone(),
            version: version.clone(),
            action: action.clone(),
        },
        Step::Credential { credential_id } => CompiledStep::Credential {
            credential_id: credential_id.clone(),
        },
        Step::ConformanceCheck {
            standard,
            version,
            suite,
            test,
        } => CompiledStep::ConformanceCheck {
            standard: standard.clone(),
            version: version.clone(),
            suite: suite.clone(),
            test: test.clone(),
        },
        Step::UseCaseVerification { use_case_id } => CompiledStep::UseCaseVerification {
            use_case_id: use_case_id.clone(),
        },
        Step::Utility(UtilityAction::Email { to, subject, body }) => CompiledStep::Email {
            to: to.clone(),
            subject: subject.clone(),
            body: body.clone(),
        },
        Step::Utility(UtilityAction::HttpRequest { method, url, body }) => {
            CompiledStep::HttpRequest {
                method: method.clone(),
                url: url.clone(),
                body: body.clone(),
            }
        }
        Step::Utility(UtilityAction::Debug { message }) => CompiledStep::Debug {
            message: message.clone(),
        },
    }
}

impl PipelineDocument {
    /// Parse a document from its YAML text form
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse pipeline document")
    }

    /// Serialize to the canonical YAML text form.
    ///
    /// Durations are normalized first so that documents differing only
    /// in formatting produce identical bytes.
    pub fn to_canonical_yaml(&self) -> String {
        let mut doc = self.clone();
        doc.runtime
            .temporal
            .activity_options
            .schedule_to_close_timeout
            .canonicalize();
        doc.runtime
            .temporal
            .activity_options
            .start_to_close_timeout
            .canonicalize();
        serde_yaml::to_string(&doc).expect("document serialization is infallible")
    }

    /// Serialize to the JSON wire body for submission
    pub fn to_wire_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("document serialization is infallible")
    }
}
