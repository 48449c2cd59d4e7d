use thiserror::Error;

use crate::domain::product::ProductId;

/// Failure reported by a collaborator read (catalog or purchase history).
/// Carries the upstream message unchanged; the engine neither retries nor
/// masks these.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct CollaboratorError(pub String);

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RecommendationError {
    #[error("product `{0}` was not found in the catalog")]
    UnknownProduct(ProductId),
    #[error("catalog read failed: {0}")]
    Catalog(#[source] CollaboratorError),
    #[error("purchase history read failed: {0}")]
    PurchaseHistory(#[source] CollaboratorError),
}

impl RecommendationError {
    /// True for the one failure the HTTP layer maps to a client error;
    /// everything else is an internal error. An empty recommendation list
    /// is never an error at all.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownProduct(_))
    }
}
