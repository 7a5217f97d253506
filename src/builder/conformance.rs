//! Conformance-check step wizard

use crate::builder::FormError;
use crate::catalog::{CatalogError, ConformanceCatalog, Standard, StandardVersion, Suite};
use crate::core::Step;
use tracing::debug;

/// Backing catalog availability.
///
/// Loading and error are first-class states: the UI may re-render while
/// the fetch is outstanding, and selections made before the catalog has
/// resolved are rejected rather than raced.
#[derive(Debug)]
pub enum CatalogState {
    Loading,
    Ready(ConformanceCatalog),
    Error(CatalogError),
}

/// Current selection level of the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConformanceStage {
    SelectStandard,
    SelectVersion,
    SelectSuite,
    SelectTest,
    Ready,
}

/// Wizard state for picking one conformance test.
///
/// Linear with backtrack: selecting at one level clears everything
/// deeper, and when the newly revealed option set has exactly one
/// member the form advances through it automatically. The stage field
/// is the state; which selection fields are present is asserted as an
/// invariant when the step is taken, not used to infer the stage.
#[derive(Debug)]
pub struct ConformanceCheckForm {
    catalog: CatalogState,
    stage: ConformanceStage,
    standard: Option<String>,
    version: Option<String>,
    suite: Option<String>,
    test: Option<String>,
}

impl ConformanceCheckForm {
    /// Create a form awaiting its catalog
    pub fn new() -> Self {
        Self {
            catalog: CatalogState::Loading,
            stage: ConformanceStage::SelectStandard,
            standard: None,
            version: None,
            suite: None,
            test: None,
        }
    }

    /// Deliver the catalog fetch outcome
    pub fn catalog_loaded(&mut self, result: Result<ConformanceCatalog, CatalogError>) {
        self.catalog = match result {
            Ok(catalog) => CatalogState::Ready(catalog),
            Err(e) => CatalogState::Error(e),
        };
    }

    /// Forget a failed fetch and await a fresh one.
    ///
    /// Selections are cleared because they referenced the old catalog.
    pub fn reload(&mut self) {
        self.catalog = CatalogState::Loading;
        self.discard_standard();
    }

    pub fn stage(&self) -> ConformanceStage {
        self.stage
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.catalog, CatalogState::Loading)
    }

    /// The catalog error, if the fetch failed
    pub fn load_error(&self) -> Option<&CatalogError> {
        match &self.catalog {
            CatalogState::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn selected_standard(&self) -> Option<&str> {
        self.standard.as_deref()
    }

    pub fn selected_version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn selected_suite(&self) -> Option<&str> {
        self.suite.as_deref()
    }

    pub fn selected_test(&self) -> Option<&str> {
        self.test.as_deref()
    }

    fn catalog(&self) -> Result<&ConformanceCatalog, FormError> {
        match &self.catalog {
            CatalogState::Ready(catalog) => Ok(catalog),
            CatalogState::Loading => Err(FormError::CatalogLoading),
            CatalogState::Error(e) => Err(FormError::CatalogFailed(e.to_string())),
        }
    }

    fn standard_entry(&self) -> Result<&Standard, FormError> {
        let id = self
            .standard
            .as_deref()
            .ok_or(FormError::OutOfOrder("no standard selected"))?;
        self.catalog()?
            .standard(id)
            .ok_or_else(|| FormError::NotFound(id.to_string()))
    }

    fn version_entry(&self) -> Result<&StandardVersion, FormError> {
        let version = self
            .version
            .as_deref()
            .ok_or(FormError::OutOfOrder("no version selected"))?;
        self.standard_entry()?
            .version(version)
            .ok_or_else(|| FormError::NotFound(version.to_string()))
    }

    fn suite_entry(&self) -> Result<&Suite, FormError> {
        let id = self
            .suite
            .as_deref()
            .ok_or(FormError::OutOfOrder("no suite selected"))?;
        self.version_entry()?
            .suite(id)
            .ok_or_else(|| FormError::NotFound(id.to_string()))
    }

    /// Standards offered at the top level
    pub fn standard_options(&self) -> Result<Vec<&str>, FormError> {
        Ok(self
            .catalog()?
            .standards
            .iter()
            .map(|s| s.id.as_str())
            .collect())
    }

    /// Versions revealed by the selected standard
    pub fn version_options(&self) -> Result<Vec<&str>, FormError> {
        Ok(self
            .standard_entry()?
            .versions
            .iter()
            .map(|v| v.version.as_str())
            .collect())
    }

    /// Suites revealed by the selected version
    pub fn suite_options(&self) -> Result<Vec<&str>, FormError> {
        Ok(self
            .version_entry()?
            .suites
            .iter()
            .map(|s| s.id.as_str())
            .collect())
    }

    /// Tests revealed by the selected suite
    pub fn test_options(&self) -> Result<Vec<&str>, FormError> {
        Ok(self
            .suite_entry()?
            .tests
            .iter()
            .map(|t| t.id.as_str())
            .collect())
    }

    /// Select a standard, clearing deeper levels.
    ///
    /// Auto-advances through any level that offers exactly one option.
    pub fn select_standard(&mut self, id: &str) -> Result<(), FormError> {
        let catalog = self.catalog()?;
        if catalog.standard(id).is_none() {
            return Err(FormError::NotFound(id.to_string()));
        }

        self.standard = Some(id.to_string());
        self.version = None;
        self.suite = None;
        self.test = None;
        self.stage = ConformanceStage::SelectVersion;

        self.auto_advance_version()
    }

    /// Select a version under the chosen standard
    pub fn select_version(&mut self, version: &str) -> Result<(), FormError> {
        if self.standard_entry()?.version(version).is_none() {
            return Err(FormError::NotFound(version.to_string()));
        }

        self.version = Some(version.to_string());
        self.suite = None;
        self.test = None;
        self.stage = ConformanceStage::SelectSuite;

        self.auto_advance_suite()
    }

    /// Select a suite under the chosen version
    pub fn select_suite(&mut self, id: &str) -> Result<(), FormError> {
        if self.version_entry()?.suite(id).is_none() {
            return Err(FormError::NotFound(id.to_string()));
        }

        self.suite = Some(id.to_string());
        self.test = None;
        self.stage = ConformanceStage::SelectTest;

        self.auto_advance_test()
    }

    /// Select the test; the form becomes ready
    pub fn select_test(&mut self, id: &str) -> Result<(), FormError> {
        if self.suite_entry()?.test(id).is_none() {
            return Err(FormError::NotFound(id.to_string()));
        }

        self.test = Some(id.to_string());
        self.stage = ConformanceStage::Ready;
        debug!(
            standard = self.standard.as_deref().unwrap_or(""),
            test = id,
            "conformance selection complete"
        );
        Ok(())
    }

    fn auto_advance_version(&mut self) -> Result<(), FormError> {
        let versions = self.standard_entry()?.versions.as_slice();
        if let [only] = versions {
            let version = only.version.clone();
            return self.select_version(&version);
        }
        Ok(())
    }

    fn auto_advance_suite(&mut self) -> Result<(), FormError> {
        let suites = self.version_entry()?.suites.as_slice();
        if let [only] = suites {
            let id = only.id.clone();
            return self.select_suite(&id);
        }
        Ok(())
    }

    fn auto_advance_test(&mut self) -> Result<(), FormError> {
        let tests = self.suite_entry()?.tests.as_slice();
        if let [only] = tests {
            let id = only.id.clone();
            return self.select_test(&id);
        }
        Ok(())
    }

    /// Clear the standard and everything under it
    pub fn discard_standard(&mut self) {
        self.standard = None;
        self.version = None;
        self.suite = None;
        self.test = None;
        self.stage = ConformanceStage::SelectStandard;
    }

    /// Clear the version and everything under it; the standard stays
    pub fn discard_version(&mut self) {
        self.version = None;
        self.suite = None;
        self.test = None;
        if self.standard.is_some() {
            self.stage = ConformanceStage::SelectVersion;
        }
    }

    /// Clear the suite and the test; shallower levels stay
    pub fn discard_suite(&mut self) {
        self.suite = None;
        self.test = None;
        if self.version.is_some() {
            self.stage = ConformanceStage::SelectSuite;
        }
    }

    /// Clear only the test
    pub fn discard_test(&mut self) {
        self.test = None;
        if self.suite.is_some() {
            self.stage = ConformanceStage::SelectTest;
        }
    }

    pub fn is_ready(&self) -> bool {
        self.stage == ConformanceStage::Ready
    }

    /// Consume the form, yielding the completed step exactly once.
    ///
    /// Panics when called before the form is ready, or when the stage
    /// claims readiness without a full selection - both are programming
    /// errors, not user input.
    pub fn into_step(self) -> Step {
        assert!(
            self.stage == ConformanceStage::Ready,
            "conformance form consumed before ready (stage {:?})",
            self.stage
        );
        match (self.standard, self.version, self.suite, self.test) {
            (Some(standard), Some(version), Some(suite), Some(test)) => Step::ConformanceCheck {
                standard,
                version,
                suite,
                test,
            },
            (standard, version, suite, test) => panic!(
                "ready conformance form missing fields: standard={:?} version={:?} suite={:?} test={:?}",
                standard, version, suite, test
            ),
        }
    }
}

impl Default for ConformanceCheckForm {
    fn default() -> Self {
        Self::new()
    }
}
