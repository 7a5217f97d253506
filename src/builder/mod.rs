//! Pipeline builder - wizard state machines and the ordered step list
//!
//! Each step kind has its own sub-state-machine over catalog data and
//! user selections; [`steps::StepsBuilder`] owns the ordered list and
//! at most one active machine, and derives the compiled document.

pub mod conformance;
pub mod marketplace;
pub mod search;
pub mod steps;
pub mod utility;
pub mod wallet;

pub use conformance::{ConformanceCheckForm, ConformanceStage};
pub use marketplace::{MarketplaceItemForm, MarketplaceStage};
pub use search::{Debouncer, SearchField, DEFAULT_DEBOUNCE};
pub use steps::{ActiveForm, PlacedStep, StepsBuilder};
pub use utility::{UtilityDraft, UtilityStepForm};
pub use wallet::{WalletStepForm, WalletStage};

use thiserror::Error;

/// Recoverable wizard errors.
///
/// These surface at the boundary nearest their cause and never unwind
/// past a single wizard step; the user retries the same action.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    /// The backing catalog or search has not resolved yet
    #[error("catalog is still loading")]
    CatalogLoading,

    /// The catalog fetch failed; the cause is kept for display
    #[error("catalog failed to load: {0}")]
    CatalogFailed(String),

    /// The selected id is not in the current option set
    #[error("no such option: {0}")]
    NotFound(String),

    /// A deeper level was selected before its parent
    #[error("selection out of order: {0}")]
    OutOfOrder(&'static str),

    /// A required form field is empty or malformed
    #[error("missing or invalid field: {0}")]
    MissingField(&'static str),
}
