//! Steps builder - owns the ordered step list and the active wizard

use crate::builder::conformance::ConformanceCheckForm;
use crate::builder::marketplace::MarketplaceItemForm;
use crate::builder::utility::UtilityStepForm;
use crate::builder::wallet::WalletStepForm;
use crate::catalog::MarketplaceKind;
use crate::core::{
    compile, ActivityOptions, PipelineDocument, PipelineMetadata, Step, StepKind,
};
use tracing::debug;
use uuid::Uuid;

/// A step placed in the ordered list, addressable for removal and
/// reordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedStep {
    pub id: Uuid,
    pub step: Step,
}

/// The sub-state-machine currently collecting a new step
#[derive(Debug)]
pub enum ActiveForm {
    Wallet(WalletStepForm),
    Conformance(ConformanceCheckForm),
    Marketplace(MarketplaceItemForm),
    Utility(UtilityStepForm),
}

impl ActiveForm {
    /// Whether the form has reached its terminal stage
    pub fn is_ready(&self) -> bool {
        match self {
            ActiveForm::Wallet(form) => form.is_ready(),
            ActiveForm::Conformance(form) => form.is_ready(),
            ActiveForm::Marketplace(form) => form.is_ready(),
            ActiveForm::Utility(form) => form.is_ready(),
        }
    }

    fn into_step(self) -> Step {
        match self {
            ActiveForm::Wallet(form) => form.into_step(),
            ActiveForm::Conformance(form) => form.into_step(),
            ActiveForm::Marketplace(form) => form.into_step(),
            ActiveForm::Utility(form) => form.into_step(),
        }
    }
}

/// Owns the canonical ordered step list and at most one active wizard.
///
/// The compiled document is a cached derivation: any list mutation
/// invalidates it and the next [`StepsBuilder::document`] read
/// recomputes it; there is no explicit recompile call.
#[derive(Debug)]
pub struct StepsBuilder {
    metadata: PipelineMetadata,
    options: ActivityOptions,
    steps: Vec<PlacedStep>,
    active: Option<ActiveForm>,
    document: Option<PipelineDocument>,
}

impl StepsBuilder {
    pub fn new(metadata: PipelineMetadata) -> Self {
        Self {
            metadata,
            options: ActivityOptions::default(),
            steps: Vec::new(),
            active: None,
            document: None,
        }
    }

    /// The ordered step list
    pub fn steps(&self) -> &[PlacedStep] {
        &self.steps
    }

    pub fn metadata(&self) -> &PipelineMetadata {
        &self.metadata
    }

    pub fn activity_options(&self) -> &ActivityOptions {
        &self.options
    }

    pub fn set_metadata(&mut self, metadata: PipelineMetadata) {
        self.metadata = metadata;
        self.document = None;
    }

    pub fn set_activity_options(&mut self, options: ActivityOptions) {
        self.options = options;
        self.document = None;
    }

    /// Open the wizard for a new step of the given kind.
    ///
    /// Starting a new add implicitly abandons any unfinished wizard.
    pub fn init_add_step(&mut self, kind: StepKind) -> &mut ActiveForm {
        if self.active.is_some() {
            debug!("abandoning unfinished step form");
        }
        let form = match kind {
            StepKind::Wallet => ActiveForm::Wallet(WalletStepForm::new()),
            StepKind::ConformanceCheck => ActiveForm::Conformance(ConformanceCheckForm::new()),
            StepKind::Credential => {
                ActiveForm::Marketplace(MarketplaceItemForm::new(MarketplaceKind::Credential))
            }
            StepKind::UseCaseVerification => {
                ActiveForm::Marketplace(MarketplaceItemForm::new(MarketplaceKind::UseCase))
            }
            StepKind::Email => ActiveForm::Utility(UtilityStepForm::email()),
            StepKind::HttpRequest => ActiveForm::Utility(UtilityStepForm::http_request()),
            StepKind::Debug => ActiveForm::Utility(UtilityStepForm::debug()),
        };
        self.active = Some(form);
        self.active.as_mut().expect("active form just set")
    }

    /// The active wizard, if any
    pub fn active_form(&self) -> Option<&ActiveForm> {
        self.active.as_ref()
    }

    /// The active wizard, for the UI to drive
    pub fn active_form_mut(&mut self) -> Option<&mut ActiveForm> {
        self.active.as_mut()
    }

    /// Drop the active wizard without appending; no-op when idle
    pub fn discard_add_step(&mut self) {
        self.active = None;
    }

    /// Harvest a ready wizard: the completed step is appended at the
    /// end of the list and the wizard is discarded.
    ///
    /// Call after driving the active form; returns the new step's id
    /// when one was appended. The form yields its step by move, so a
    /// completion is observed exactly once.
    pub fn complete_active(&mut self) -> Option<Uuid> {
        if !self.active.as_ref().is_some_and(ActiveForm::is_ready) {
            return None;
        }
        let form = self.active.take().expect("checked active form");
        let step = form.into_step();
        let id = Uuid::new_v4();
        debug!(step = %step.kind(), %id, "step appended");
        self.steps.push(PlacedStep { id, step });
        self.document = None;
        Some(id)
    }

    /// Remove a step by id; returns false when the id is unknown
    pub fn remove_step(&mut self, id: Uuid) -> bool {
        let before = self.steps.len();
        self.steps.retain(|s| s.id != id);
        let removed = self.steps.len() != before;
        if removed {
            self.document = None;
        }
        removed
    }

    /// Move a step to a new index, preserving the relative order of all
    /// other steps. Indices past the end clamp to the end.
    pub fn reorder_step(&mut self, id: Uuid, new_index: usize) -> bool {
        let Some(current) = self.steps.iter().position(|s| s.id == id) else {
            return false;
        };
        let step = self.steps.remove(current);
        let target = new_index.min(self.steps.len());
        self.steps.insert(target, step);
        self.document = None;
        true
    }

    /// The compiled document, recomputed lazily after mutations
    pub fn document(&mut self) -> &PipelineDocument {
        if self.document.is_none() {
            self.document = Some(compile(
                &self.metadata,
                &self.options,
                &self
                    .steps
                    .iter()
                    .map(|s| s.step.clone())
                    .collect::<Vec<_>>(),
            ));
        }
        self.document.as_ref().expect("document just computed")
    }
}
