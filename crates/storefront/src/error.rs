//! Unified error handling for the cart client.
//!
//! Module-level errors (`CatalogError`, `ValidationErrors`) are
//! aggregated into a single `CartError` so the embedding application
//! handles one type. All core errors are recoverable: a failed lookup
//! degrades the affected derived value and a later recompute retries.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::controller::FlowState;
use crate::validation::ValidationErrors;

/// Application-level error type for the cart client.
#[derive(Debug, Error)]
pub enum CartError {
    /// Remote catalog lookup failed or returned malformed data.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Delivery form failed validation at the checkout gate.
    #[error("delivery details rejected: {0}")]
    ValidationRejected(ValidationErrors),

    /// Checkout requires a non-empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// The requested transition is not legal in the current flow state.
    #[error("not allowed while {state:?}")]
    InvalidState { state: FlowState },
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
