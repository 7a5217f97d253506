//! Marketplace-item step wizard (credentials and verifier use cases)

use crate::builder::search::SearchField;
use crate::builder::FormError;
use crate::catalog::{CatalogError, MarketplaceItem, MarketplaceKind};
use crate::core::Step;

/// Current level of the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketplaceStage {
    Search,
    Ready,
}

/// The one-level degenerate form: search the marketplace, pick an item.
#[derive(Debug)]
pub struct MarketplaceItemForm {
    kind: MarketplaceKind,
    stage: MarketplaceStage,
    search: SearchField<MarketplaceItem>,
    selected: Option<String>,
}

impl MarketplaceItemForm {
    pub fn new(kind: MarketplaceKind) -> Self {
        Self {
            kind,
            stage: MarketplaceStage::Search,
            search: SearchField::new(),
            selected: None,
        }
    }

    pub fn kind(&self) -> MarketplaceKind {
        self.kind
    }

    pub fn stage(&self) -> MarketplaceStage {
        self.stage
    }

    pub fn results(&self) -> &[MarketplaceItem] {
        self.search.results()
    }

    pub fn selected_item(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Record an issued search, returning its sequence stamp
    pub fn begin_search(&mut self, query: &str) -> u64 {
        self.search.begin_search(query)
    }

    /// Deliver a search outcome; stale outcomes are dropped
    pub fn resolve_search(
        &mut self,
        seq: u64,
        outcome: Result<Vec<MarketplaceItem>, CatalogError>,
    ) -> bool {
        match outcome {
            Ok(results) => self.search.resolve(seq, results),
            Err(e) => self.search.fail(seq, e.to_string()),
        }
    }

    /// Select an item from the current results; the form becomes ready
    pub fn select_item(&mut self, id: &str) -> Result<(), FormError> {
        if self.search.is_loading() {
            return Err(FormError::CatalogLoading);
        }
        let item = self
            .search
            .results()
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| FormError::NotFound(id.to_string()))?;

        self.selected = Some(item.id.clone());
        self.stage = MarketplaceStage::Ready;
        Ok(())
    }

    /// Clear the selection and return to searching
    pub fn discard_item(&mut self) {
        self.selected = None;
        self.stage = MarketplaceStage::Search;
    }

    pub fn is_ready(&self) -> bool {
        self.stage == MarketplaceStage::Ready
    }

    /// Consume the form, yielding the completed step exactly once
    pub fn into_step(self) -> Step {
        assert!(
            self.stage == MarketplaceStage::Ready,
            "marketplace form consumed before ready"
        );
        let id = self
            .selected
            .unwrap_or_else(|| panic!("ready marketplace form has no selection"));
        match self.kind {
            MarketplaceKind::Credential => Step::Credential { credential_id: id },
            MarketplaceKind::UseCase => Step::UseCaseVerification { use_case_id: id },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, kind: MarketplaceKind) -> MarketplaceItem {
        MarketplaceItem {
            id: id.to_string(),
            name: id.to_string(),
            kind,
        }
    }

    #[test]
    fn test_search_select_ready() {
        let mut form = MarketplaceItemForm::new(MarketplaceKind::Credential);
        let seq = form.begin_search("licence");
        form.resolve_search(seq, Ok(vec![item("cred-1", MarketplaceKind::Credential)]));
        form.select_item("cred-1").unwrap();

        assert!(form.is_ready());
        assert_eq!(
            form.into_step(),
            Step::Credential {
                credential_id: "cred-1".to_string()
            }
        );
    }

    #[test]
    fn test_use_case_maps_to_verification_step() {
        let mut form = MarketplaceItemForm::new(MarketplaceKind::UseCase);
        let seq = form.begin_search("age");
        form.resolve_search(seq, Ok(vec![item("uc-17", MarketplaceKind::UseCase)]));
        form.select_item("uc-17").unwrap();
        assert_eq!(
            form.into_step(),
            Step::UseCaseVerification {
                use_case_id: "uc-17".to_string()
            }
        );
    }

    #[test]
    fn test_select_unknown_item_is_not_found() {
        let mut form = MarketplaceItemForm::new(MarketplaceKind::Credential);
        let seq = form.begin_search("x");
        form.resolve_search(seq, Ok(vec![]));
        assert!(matches!(
            form.select_item("missing"),
            Err(FormError::NotFound(_))
        ));
        assert_eq!(form.stage(), MarketplaceStage::Search);
    }

    #[test]
    fn test_discard_returns_to_search() {
        let mut form = MarketplaceItemForm::new(MarketplaceKind::Credential);
        let seq = form.begin_search("licence");
        form.resolve_search(seq, Ok(vec![item("cred-1", MarketplaceKind::Credential)]));
        form.select_item("cred-1").unwrap();
        form.discard_item();
        assert_eq!(form.stage(), MarketplaceStage::Search);
        assert!(form.selected_item().is_none());
    }
}
