//! Test utility functions for pipebench

use async_trait::async_trait;
use pipebench::builder::{ActiveForm, StepsBuilder, WalletStepForm};
use pipebench::catalog::{
    CatalogService, ConformanceCatalog, MarketplaceItem, MarketplaceKind, Standard,
    StandardVersion, StaticCatalog, Suite, TestCase, WalletAction, WalletSummary,
};
use pipebench::core::PipelineDocument;
use pipebench::queue::QueueTicket;
use pipebench::runner::{JobRunner, RunnerError, SubmitOutcome};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Mock job runner with scripted submission outcomes
pub struct MockRunner {
    outcomes: Mutex<VecDeque<SubmitOutcome>>,
    pub submitted: Mutex<Vec<PipelineDocument>>,
    pub cancelled: Mutex<Vec<(String, Vec<String>)>>,
    pub signals: Mutex<Vec<(String, String, String)>>,
    fail_cancel: bool,
}

impl MockRunner {
    pub fn new(outcomes: Vec<SubmitOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            submitted: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
            signals: Mutex::new(Vec::new()),
            fail_cancel: false,
        }
    }

    /// A runner whose cancel endpoint always fails
    pub fn with_failing_cancel(mut self) -> Self {
        self.fail_cancel = true;
        self
    }
}

#[async_trait]
impl JobRunner for MockRunner {
    async fn submit(&self, document: &PipelineDocument) -> Result<SubmitOutcome, RunnerError> {
        self.submitted.lock().unwrap().push(document.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| RunnerError::Transport("no scripted outcome left".to_string()))
    }

    async fn cancel_queued(
        &self,
        ticket_id: &str,
        runner_ids: &[String],
    ) -> Result<(), RunnerError> {
        if self.fail_cancel {
            return Err(RunnerError::Transport("connection reset".to_string()));
        }
        self.cancelled
            .lock()
            .unwrap()
            .push((ticket_id.to_string(), runner_ids.to_vec()));
        Ok(())
    }

    async fn send_signal(
        &self,
        workflow_id: &str,
        namespace: &str,
        signal: &str,
    ) -> Result<(), RunnerError> {
        self.signals.lock().unwrap().push((
            workflow_id.to_string(),
            namespace.to_string(),
            signal.to_string(),
        ));
        Ok(())
    }
}

/// Ticket fixture (the real thing is only ever minted by the runner)
pub fn queued_ticket(ticket_id: &str, position: u32, line_len: u32) -> QueueTicket {
    QueueTicket {
        ticket_id: ticket_id.to_string(),
        position,
        line_len,
        runner_ids: vec!["bench-1".to_string(), "bench-2".to_string()],
    }
}

fn test_case(id: &str) -> TestCase {
    TestCase {
        id: id.to_string(),
        name: id.to_string(),
    }
}

/// A conformance hierarchy with one standard, one version, two suites
pub fn sample_conformance_catalog() -> ConformanceCatalog {
    ConformanceCatalog {
        standards: vec![Standard {
            id: "iso-18013-5".to_string(),
            name: "ISO 18013-5".to_string(),
            versions: vec![StandardVersion {
                version: "2021".to_string(),
                suites: vec![
                    Suite {
                        id: "proximity".to_string(),
                        tests: vec![test_case("engagement-qr"), test_case("engagement-nfc")],
                    },
                    Suite {
                        id: "issuance".to_string(),
                        tests: vec![test_case("provision")],
                    },
                ],
            }],
        }],
    }
}

/// Catalog with one wallet (two versions) and one credential item
pub fn sample_catalog() -> StaticCatalog {
    StaticCatalog::new(sample_conformance_catalog())
        .with_wallet(
            WalletSummary {
                id: "acme-wallet".to_string(),
                name: "Acme Wallet".to_string(),
                versions: vec!["1.0".to_string(), "2.1".to_string()],
            },
            vec![
                WalletAction {
                    id: "present-credential".to_string(),
                    name: "Present credential".to_string(),
                },
                WalletAction {
                    id: "refresh".to_string(),
                    name: "Refresh stored credentials".to_string(),
                },
            ],
        )
        .with_item(MarketplaceItem {
            id: "cred-mdl".to_string(),
            name: "Mobile driving licence".to_string(),
            kind: MarketplaceKind::Credential,
        })
        .with_item(MarketplaceItem {
            id: "uc-age-check".to_string(),
            name: "Age verification".to_string(),
            kind: MarketplaceKind::UseCase,
        })
}

/// Issue a wallet search through the catalog and feed the outcome back
pub async fn run_wallet_search(
    form: &mut WalletStepForm,
    catalog: &impl CatalogService,
    query: &str,
) {
    let seq = form.begin_wallet_search(query);
    let outcome = catalog.search_wallets(query).await;
    form.resolve_wallet_search(seq, outcome);
}

/// Issue an action search through the catalog and feed the outcome back
pub async fn run_action_search(
    form: &mut WalletStepForm,
    catalog: &impl CatalogService,
    query: &str,
) {
    let wallet = form
        .selected_wallet()
        .expect("wallet selected before action search")
        .id
        .clone();
    let version = form
        .selected_version()
        .expect("version selected before action search")
        .to_string();
    let seq = form.begin_action_search(query);
    let outcome = catalog.search_wallet_actions(&wallet, &version, query).await;
    form.resolve_action_search(seq, outcome);
}

/// Build a wallet step through the wizard against the given catalog
pub async fn add_wallet_step(
    builder: &mut StepsBuilder,
    catalog: &impl CatalogService,
    wallet: &str,
    version: &str,
    action: &str,
) {
    builder.init_add_step(pipebench::core::StepKind::Wallet);
    let Some(ActiveForm::Wallet(form)) = builder.active_form_mut() else {
        panic!("wallet form expected");
    };
    run_wallet_search(form, catalog, wallet).await;
    form.select_wallet(wallet).unwrap();
    if form.selected_version().is_none() {
        form.select_version(version).unwrap();
    }
    run_action_search(form, catalog, action).await;
    form.select_action(action).unwrap();
    builder.complete_active().expect("wallet step appended");
}

/// Build a conformance step through the wizard against the given catalog
pub async fn add_conformance_step(
    builder: &mut StepsBuilder,
    catalog: &impl CatalogService,
    standard: &str,
    version: &str,
    suite: &str,
    test: &str,
) {
    builder.init_add_step(pipebench::core::StepKind::ConformanceCheck);
    let Some(ActiveForm::Conformance(form)) = builder.active_form_mut() else {
        panic!("conformance form expected");
    };
    form.catalog_loaded(catalog.conformance_catalog().await);
    form.select_standard(standard).unwrap();
    if form.selected_version().is_none() {
        form.select_version(version).unwrap();
    }
    if form.selected_suite().is_none() {
        form.select_suite(suite).unwrap();
    }
    if !form.is_ready() {
        form.select_test(test).unwrap();
    }
    builder.complete_active().expect("conformance step appended");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipebench::core::{PipelineMetadata, Step};

    #[tokio::test]
    async fn test_add_wallet_step_helper() {
        let catalog = sample_catalog();
        let mut builder = StepsBuilder::new(PipelineMetadata {
            name: "helper-test".to_string(),
        });
        add_wallet_step(&mut builder, &catalog, "acme-wallet", "2.1", "refresh").await;

        assert_eq!(builder.steps().len(), 1);
        assert!(matches!(builder.steps()[0].step, Step::Wallet { .. }));
    }

    #[tokio::test]
    async fn test_mock_runner_scripted_outcomes() {
        let runner = MockRunner::new(vec![SubmitOutcome::Queued {
            ticket: queued_ticket("T-1", 0, 1),
        }]);
        let doc = pipebench::core::compile(
            &PipelineMetadata::default(),
            &pipebench::core::ActivityOptions::default(),
            &[],
        );

        let outcome = runner.submit(&doc).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Queued { .. }));
        assert!(runner.submit(&doc).await.is_err());
    }
}
