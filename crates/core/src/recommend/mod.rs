//! Content-based product recommendations.
//!
//! Ranks catalog candidates against the product a shopper is viewing by
//! combining a bag-of-words cosine similarity over product names with
//! normalized price proximity. All working state (vocabulary, vectors,
//! price range) is built per request from a fresh catalog snapshot.

mod engine;
mod similarity;
mod text;
mod types;

pub use engine::RecommendationEngine;
pub use similarity::{cosine_similarity, price_similarity, PriceRange};
pub use text::{tokenize, Vocabulary};
pub use types::ScoredProduct;

use async_trait::async_trait;

use crate::domain::product::{Product, ProductId};
use crate::domain::shopper::ShopperId;
use crate::errors::{CollaboratorError, RecommendationError};

/// Result type for recommendation operations
pub type RecommendResult<T> = Result<T, RecommendationError>;

/// Maximum entries returned for a single reference product
pub const MAX_RECOMMENDATIONS: usize = 4;

/// Read-only view of the product catalog.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    async fn product_by_id(&self, id: &ProductId) -> Result<Option<Product>, CollaboratorError>;

    /// Every catalog product except `id`, in catalog order.
    async fn products_excluding(&self, id: &ProductId) -> Result<Vec<Product>, CollaboratorError>;
}

/// Gate deciding whether a shopper receives recommendations at all.
#[async_trait]
pub trait PurchaseHistory: Send + Sync {
    async fn has_completed_order(&self, shopper: &ShopperId) -> Result<bool, CollaboratorError>;
}
