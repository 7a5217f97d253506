//! Wallet-action step wizard

use crate::builder::search::SearchField;
use crate::builder::FormError;
use crate::catalog::{CatalogError, WalletAction, WalletSummary};
use crate::core::Step;

/// Current selection level of the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletStage {
    SelectWallet,
    SelectVersion,
    SelectAction,
    Ready,
}

/// Wizard state for picking a wallet, a version and an action.
///
/// Structurally the same machine as the conformance form, but the
/// wallet and action levels are fed by debounced search instead of a
/// static catalog. Versions come from the selected wallet record, so a
/// wallet with a single published version auto-advances past the
/// version level; action search never auto-advances.
#[derive(Debug)]
pub struct WalletStepForm {
    stage: WalletStage,
    wallet_search: SearchField<WalletSummary>,
    action_search: SearchField<WalletAction>,
    wallet: Option<WalletSummary>,
    version: Option<String>,
    action: Option<String>,
}

impl WalletStepForm {
    pub fn new() -> Self {
        Self {
            stage: WalletStage::SelectWallet,
            wallet_search: SearchField::new(),
            action_search: SearchField::new(),
            wallet: None,
            version: None,
            action: None,
        }
    }

    pub fn stage(&self) -> WalletStage {
        self.stage
    }

    pub fn selected_wallet(&self) -> Option<&WalletSummary> {
        self.wallet.as_ref()
    }

    pub fn selected_version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn selected_action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// The wallet candidate list
    pub fn wallet_results(&self) -> &[WalletSummary] {
        self.wallet_search.results()
    }

    /// The action candidate list
    pub fn action_results(&self) -> &[WalletAction] {
        self.action_search.results()
    }

    /// Record an issued wallet search, returning its sequence stamp
    pub fn begin_wallet_search(&mut self, query: &str) -> u64 {
        self.wallet_search.begin_search(query)
    }

    /// Deliver a wallet search outcome; stale outcomes are dropped
    pub fn resolve_wallet_search(
        &mut self,
        seq: u64,
        outcome: Result<Vec<WalletSummary>, CatalogError>,
    ) -> bool {
        match outcome {
            Ok(results) => self.wallet_search.resolve(seq, results),
            Err(e) => self.wallet_search.fail(seq, e.to_string()),
        }
    }

    /// Record an issued action search, returning its sequence stamp
    pub fn begin_action_search(&mut self, query: &str) -> u64 {
        self.action_search.begin_search(query)
    }

    /// Deliver an action search outcome; stale outcomes are dropped
    pub fn resolve_action_search(
        &mut self,
        seq: u64,
        outcome: Result<Vec<WalletAction>, CatalogError>,
    ) -> bool {
        match outcome {
            Ok(results) => self.action_search.resolve(seq, results),
            Err(e) => self.action_search.fail(seq, e.to_string()),
        }
    }

    /// Select a wallet from the current candidate list.
    ///
    /// Rejected while a search is still resolving; auto-advances when
    /// the wallet publishes exactly one version.
    pub fn select_wallet(&mut self, id: &str) -> Result<(), FormError> {
        if self.wallet_search.is_loading() {
            return Err(FormError::CatalogLoading);
        }
        let wallet = self
            .wallet_search
            .results()
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or_else(|| FormError::NotFound(id.to_string()))?;

        self.wallet = Some(wallet);
        self.version = None;
        self.action = None;
        self.action_search.clear();
        self.stage = WalletStage::SelectVersion;

        let versions = &self.wallet.as_ref().expect("wallet just set").versions;
        if let [only] = versions.as_slice() {
            let version = only.clone();
            return self.select_version(&version);
        }
        Ok(())
    }

    /// Versions published by the selected wallet
    pub fn version_options(&self) -> Result<&[String], FormError> {
        self.wallet
            .as_ref()
            .map(|w| w.versions.as_slice())
            .ok_or(FormError::OutOfOrder("no wallet selected"))
    }

    /// Select one of the wallet's versions
    pub fn select_version(&mut self, version: &str) -> Result<(), FormError> {
        let known = self
            .version_options()?
            .iter()
            .any(|v| v == version);
        if !known {
            return Err(FormError::NotFound(version.to_string()));
        }

        self.version = Some(version.to_string());
        self.action = None;
        self.action_search.clear();
        self.stage = WalletStage::SelectAction;
        Ok(())
    }

    /// Select an action from the current candidate list; the form
    /// becomes ready
    pub fn select_action(&mut self, id: &str) -> Result<(), FormError> {
        if self.version.is_none() {
            return Err(FormError::OutOfOrder("no version selected"));
        }
        if self.action_search.is_loading() {
            return Err(FormError::CatalogLoading);
        }
        let action = self
            .action_search
            .results()
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| FormError::NotFound(id.to_string()))?;

        self.action = Some(action.id.clone());
        self.stage = WalletStage::Ready;
        Ok(())
    }

    /// Clear the wallet and everything under it
    pub fn discard_wallet(&mut self) {
        self.wallet = None;
        self.version = None;
        self.action = None;
        self.action_search.clear();
        self.stage = WalletStage::SelectWallet;
    }

    /// Clear the version and the action; the wallet stays
    pub fn discard_version(&mut self) {
        self.version = None;
        self.action = None;
        self.action_search.clear();
        if self.wallet.is_some() {
            self.stage = WalletStage::SelectVersion;
        }
    }

    /// Clear only the action
    pub fn discard_action(&mut self) {
        self.action = None;
        if self.version.is_some() {
            self.stage = WalletStage::SelectAction;
        }
    }

    pub fn is_ready(&self) -> bool {
        self.stage == WalletStage::Ready
    }

    /// Consume the form, yielding the completed step exactly once.
    ///
    /// Panics when the stage and the selection fields disagree.
    pub fn into_step(self) -> Step {
        assert!(
            self.stage == WalletStage::Ready,
            "wallet form consumed before ready (stage {:?})",
            self.stage
        );
        match (self.wallet, self.version, self.action) {
            (Some(wallet), Some(version), Some(action)) => Step::Wallet {
                wallet: wallet.id,
                version,
                action,
            },
            (wallet, version, action) => panic!(
                "ready wallet form missing fields: wallet={:?} version={:?} action={:?}",
                wallet.map(|w| w.id),
                version,
                action
            ),
        }
    }
}

impl Default for WalletStepForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme(versions: &[&str]) -> WalletSummary {
        WalletSummary {
            id: "acme".to_string(),
            name: "Acme Wallet".to_string(),
            versions: versions.iter().map(|v| v.to_string()).collect(),
        }
    }

    fn present() -> WalletAction {
        WalletAction {
            id: "present".to_string(),
            name: "Present credential".to_string(),
        }
    }

    #[test]
    fn test_select_rejected_while_search_pending() {
        let mut form = WalletStepForm::new();
        form.begin_wallet_search("acme");
        assert!(matches!(
            form.select_wallet("acme"),
            Err(FormError::CatalogLoading)
        ));
    }

    #[test]
    fn test_full_walk_to_ready() {
        let mut form = WalletStepForm::new();
        let seq = form.begin_wallet_search("acme");
        form.resolve_wallet_search(seq, Ok(vec![acme(&["1.0", "2.0"])]));
        form.select_wallet("acme").unwrap();
        assert_eq!(form.stage(), WalletStage::SelectVersion);

        form.select_version("2.0").unwrap();
        assert_eq!(form.stage(), WalletStage::SelectAction);

        let seq = form.begin_action_search("present");
        form.resolve_action_search(seq, Ok(vec![present()]));
        form.select_action("present").unwrap();

        assert!(form.is_ready());
        assert_eq!(
            form.into_step(),
            Step::Wallet {
                wallet: "acme".to_string(),
                version: "2.0".to_string(),
                action: "present".to_string(),
            }
        );
    }

    #[test]
    fn test_single_version_auto_advances() {
        let mut form = WalletStepForm::new();
        let seq = form.begin_wallet_search("acme");
        form.resolve_wallet_search(seq, Ok(vec![acme(&["1.0"])]));
        form.select_wallet("acme").unwrap();

        assert_eq!(form.stage(), WalletStage::SelectAction);
        assert_eq!(form.selected_version(), Some("1.0"));
    }

    #[test]
    fn test_discard_version_keeps_wallet() {
        let mut form = WalletStepForm::new();
        let seq = form.begin_wallet_search("acme");
        form.resolve_wallet_search(seq, Ok(vec![acme(&["1.0", "2.0"])]));
        form.select_wallet("acme").unwrap();
        form.select_version("1.0").unwrap();

        form.discard_version();
        assert!(form.selected_wallet().is_some());
        assert!(form.selected_version().is_none());
        assert_eq!(form.stage(), WalletStage::SelectVersion);
    }

    #[test]
    fn test_search_failure_surfaces_and_is_retryable() {
        let mut form = WalletStepForm::new();
        let seq = form.begin_wallet_search("acme");
        form.resolve_wallet_search(seq, Err(CatalogError::Transport("offline".to_string())));
        assert!(matches!(
            form.select_wallet("acme"),
            Err(FormError::NotFound(_))
        ));

        // The same search can simply be issued again
        let seq = form.begin_wallet_search("acme");
        form.resolve_wallet_search(seq, Ok(vec![acme(&["1.0", "2.0"])]));
        assert!(form.select_wallet("acme").is_ok());
    }

    #[test]
    #[should_panic(expected = "consumed before ready")]
    fn test_into_step_before_ready_panics() {
        let form = WalletStepForm::new();
        let _ = form.into_step();
    }
}
