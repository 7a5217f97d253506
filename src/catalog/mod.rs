//! Catalog service - read-only listings backing the step wizard
//!
//! The conformance catalog is a hierarchy (standards → versions →
//! suites → tests) fetched whole; wallets, wallet actions and
//! marketplace items are reached through free-text search.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from catalog lookups
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Transport(String),

    #[error("no such record: {0}")]
    NotFound(String),
}

/// The full conformance-check hierarchy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConformanceCatalog {
    pub standards: Vec<Standard>,
}

/// A conformance standard with its published versions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standard {
    pub id: String,
    pub name: String,
    pub versions: Vec<StandardVersion>,
}

/// One version of a standard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardVersion {
    pub version: String,
    pub suites: Vec<Suite>,
}

/// A test suite within a standard version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suite {
    pub id: String,
    pub tests: Vec<TestCase>,
}

/// A single conformance test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub name: String,
}

impl ConformanceCatalog {
    /// Look up a standard by id
    pub fn standard(&self, id: &str) -> Option<&Standard> {
        self.standards.iter().find(|s| s.id == id)
    }
}

impl Standard {
    /// Look up a version by its version string
    pub fn version(&self, version: &str) -> Option<&StandardVersion> {
        self.versions.iter().find(|v| v.version == version)
    }
}

impl StandardVersion {
    /// Look up a suite by id
    pub fn suite(&self, id: &str) -> Option<&Suite> {
        self.suites.iter().find(|s| s.id == id)
    }
}

impl Suite {
    /// Look up a test by id
    pub fn test(&self, id: &str) -> Option<&TestCase> {
        self.tests.iter().find(|t| t.id == id)
    }
}

/// A registered wallet as returned by search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSummary {
    pub id: String,
    pub name: String,
    pub versions: Vec<String>,
}

/// An action a wallet version can perform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAction {
    pub id: String,
    pub name: String,
}

/// Marketplace item categories addressable as pipeline steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketplaceKind {
    Credential,
    UseCase,
}

/// A marketplace search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceItem {
    pub id: String,
    pub name: String,
    pub kind: MarketplaceKind,
}

/// Read-only catalog access used by the wizard drivers
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetch the whole conformance hierarchy
    async fn conformance_catalog(&self) -> Result<ConformanceCatalog, CatalogError>;

    /// Free-text wallet search
    async fn search_wallets(&self, query: &str) -> Result<Vec<WalletSummary>, CatalogError>;

    /// Free-text search over the actions of one wallet version
    async fn search_wallet_actions(
        &self,
        wallet: &str,
        version: &str,
        query: &str,
    ) -> Result<Vec<WalletAction>, CatalogError>;

    /// Free-text marketplace search filtered by item kind
    async fn search_items(
        &self,
        kind: MarketplaceKind,
        query: &str,
    ) -> Result<Vec<MarketplaceItem>, CatalogError>;
}

/// In-memory catalog (for tests or a bundled local catalog)
pub struct StaticCatalog {
    conformance: ConformanceCatalog,
    wallets: Vec<WalletSummary>,
    actions: std::collections::HashMap<(String, String), Vec<WalletAction>>,
    items: Vec<MarketplaceItem>,
}

impl StaticCatalog {
    pub fn new(conformance: ConformanceCatalog) -> Self {
        Self {
            conformance,
            wallets: Vec::new(),
            actions: std::collections::HashMap::new(),
            items: Vec::new(),
        }
    }

    pub fn with_wallet(mut self, wallet: WalletSummary, actions: Vec<WalletAction>) -> Self {
        for version in &wallet.versions {
            self.actions
                .insert((wallet.id.clone(), version.clone()), actions.clone());
        }
        self.wallets.push(wallet);
        self
    }

    pub fn with_item(mut self, item: MarketplaceItem) -> Self {
        self.items.push(item);
        self
    }
}

fn matches(query: &str, haystack: &str) -> bool {
    haystack.to_lowercase().contains(&query.to_lowercase())
}

#[async_trait]
impl CatalogService for StaticCatalog {
    async fn conformance_catalog(&self) -> Result<ConformanceCatalog, CatalogError> {
        Ok(self.conformance.clone())
    }

    async fn search_wallets(&self, query: &str) -> Result<Vec<WalletSummary>, CatalogError> {
        Ok(self
            .wallets
            .iter()
            .filter(|w| matches(query, &w.name) || matches(query, &w.id))
            .cloned()
            .collect())
    }

    async fn search_wallet_actions(
        &self,
        wallet: &str,
        version: &str,
        query: &str,
    ) -> Result<Vec<WalletAction>, CatalogError> {
        let actions = self
            .actions
            .get(&(wallet.to_string(), version.to_string()))
            .ok_or_else(|| CatalogError::NotFound(format!("{}@{}", wallet, version)))?;
        Ok(actions
            .iter()
            .filter(|a| matches(query, &a.name) || matches(query, &a.id))
            .cloned()
            .collect())
    }

    async fn search_items(
        &self,
        kind: MarketplaceKind,
        query: &str,
    ) -> Result<Vec<MarketplaceItem>, CatalogError> {
        Ok(self
            .items
            .iter()
            .filter(|i| i.kind == kind && (matches(query, &i.name) || matches(query, &i.id)))
            .cloned()
            .collect())
    }
}
