//! Utility step forms (email, HTTP request, debug)

use crate::builder::FormError;
use crate::core::{Step, UtilityAction};

/// Current level of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtilityStage {
    Editing,
    Ready,
}

/// The utility action being drafted
#[derive(Debug, Clone, Default)]
pub enum UtilityDraft {
    Email {
        to: String,
        subject: String,
        body: String,
    },
    HttpRequest {
        method: String,
        url: String,
        body: Option<String>,
    },
    #[default]
    DebugMessage,
}

/// Free-form utility step editor.
///
/// Unlike the catalog-backed wizards there is nothing to fetch; the
/// form is ready once [`UtilityStepForm::complete`] accepts the drafted
/// fields.
#[derive(Debug)]
pub struct UtilityStepForm {
    stage: UtilityStage,
    draft: UtilityDraft,
    debug_message: String,
}

impl UtilityStepForm {
    /// Start drafting an email step
    pub fn email() -> Self {
        Self {
            stage: UtilityStage::Editing,
            draft: UtilityDraft::Email {
                to: String::new(),
                subject: String::new(),
                body: String::new(),
            },
            debug_message: String::new(),
        }
    }

    /// Start drafting an HTTP request step
    pub fn http_request() -> Self {
        Self {
            stage: UtilityStage::Editing,
            draft: UtilityDraft::HttpRequest {
                method: "GET".to_string(),
                url: String::new(),
                body: None,
            },
            debug_message: String::new(),
        }
    }

    /// Start drafting a debug step
    pub fn debug() -> Self {
        Self {
            stage: UtilityStage::Editing,
            draft: UtilityDraft::DebugMessage,
            debug_message: String::new(),
        }
    }

    pub fn stage(&self) -> UtilityStage {
        self.stage
    }

    /// The drafted fields, for the UI to edit in place
    pub fn draft_mut(&mut self) -> &mut UtilityDraft {
        self.stage = UtilityStage::Editing;
        &mut self.draft
    }

    /// The debug message field (only meaningful for debug drafts)
    pub fn debug_message_mut(&mut self) -> &mut String {
        self.stage = UtilityStage::Editing;
        &mut self.debug_message
    }

    /// Check the drafted fields; the form becomes ready when they pass
    pub fn complete(&mut self) -> Result<(), FormError> {
        match &self.draft {
            UtilityDraft::Email { to, subject, .. } => {
                if !to.contains('@') {
                    return Err(FormError::MissingField("to"));
                }
                if subject.trim().is_empty() {
                    return Err(FormError::MissingField("subject"));
                }
            }
            UtilityDraft::HttpRequest { method, url, .. } => {
                if url.trim().is_empty() {
                    return Err(FormError::MissingField("url"));
                }
                if method.trim().is_empty() {
                    return Err(FormError::MissingField("method"));
                }
            }
            UtilityDraft::DebugMessage => {
                if self.debug_message.trim().is_empty() {
                    return Err(FormError::MissingField("message"));
                }
            }
        }
        self.stage = UtilityStage::Ready;
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.stage == UtilityStage::Ready
    }

    /// Consume the form, yielding the completed step exactly once
    pub fn into_step(self) -> Step {
        assert!(
            self.stage == UtilityStage::Ready,
            "utility form consumed before ready"
        );
        let action = match self.draft {
            UtilityDraft::Email { to, subject, body } => UtilityAction::Email { to, subject, body },
            UtilityDraft::HttpRequest { method, url, body } => {
                UtilityAction::HttpRequest { method, url, body }
            }
            UtilityDraft::DebugMessage => UtilityAction::Debug {
                message: self.debug_message,
            },
        };
        Step::Utility(action)
    }
}
