use std::sync::Arc;

use crate::domain::product::{Product, ProductId};
use crate::domain::shopper::ShopperId;
use crate::errors::RecommendationError;

use super::similarity::{cosine_similarity, price_similarity, PriceRange};
use super::text::Vocabulary;
use super::types::ScoredProduct;
use super::{CatalogReader, PurchaseHistory, RecommendResult, MAX_RECOMMENDATIONS};

/// Content-based recommendation engine.
///
/// A pure function of the catalog snapshot, the reference id, and the
/// purchase-history predicate: every call fetches fresh data and builds its
/// own vocabulary, vectors, and price range, so concurrent calls share
/// nothing and the engine performs no writes.
pub struct RecommendationEngine {
    catalog: Arc<dyn CatalogReader>,
    history: Arc<dyn PurchaseHistory>,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<dyn CatalogReader>, history: Arc<dyn PurchaseHistory>) -> Self {
        Self { catalog, history }
    }

    /// Ranks catalog candidates against the product `reference_id`.
    ///
    /// Returns an empty list when there is no shopper, the shopper has no
    /// completed order, or the catalog holds no other products. The only
    /// error distinct from upstream failure is an unresolved reference id.
    pub async fn recommend(
        &self,
        reference_id: &ProductId,
        shopper: Option<&ShopperId>,
    ) -> RecommendResult<Vec<ScoredProduct>> {
        let Some(shopper) = shopper else {
            return Ok(Vec::new());
        };

        let has_history = self
            .history
            .has_completed_order(shopper)
            .await
            .map_err(RecommendationError::PurchaseHistory)?;
        if !has_history {
            return Ok(Vec::new());
        }

        let reference = self
            .catalog
            .product_by_id(reference_id)
            .await
            .map_err(RecommendationError::Catalog)?
            .ok_or_else(|| RecommendationError::UnknownProduct(reference_id.clone()))?;

        let candidates = self
            .catalog
            .products_excluding(reference_id)
            .await
            .map_err(RecommendationError::Catalog)?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        Ok(rank(&reference, candidates))
    }
}

/// Scores every candidate against the reference and keeps the best four.
fn rank(reference: &Product, candidates: Vec<Product>) -> Vec<ScoredProduct> {
    let vocabulary = Vocabulary::build(
        std::iter::once(reference.name.as_str())
            .chain(candidates.iter().map(|candidate| candidate.name.as_str())),
    );
    let reference_vector = vocabulary.term_frequencies(&reference.name);

    let Some(range) = PriceRange::spanning(
        std::iter::once(reference.price).chain(candidates.iter().map(|candidate| candidate.price)),
    ) else {
        return Vec::new();
    };
    let reference_price = range.normalize(reference.price);

    let mut scored: Vec<ScoredProduct> = candidates
        .into_iter()
        .map(|candidate| {
            let name_similarity = cosine_similarity(
                &reference_vector,
                &vocabulary.term_frequencies(&candidate.name),
            );
            let price_score =
                price_similarity(reference_price, range.normalize(candidate.price));
            let similarity_score = (name_similarity + price_score) / 2.0;
            ScoredProduct { product: candidate, similarity_score }
        })
        .collect();

    // Stable sort keeps catalog order between equal scores.
    scored.sort_by(|a, b| {
        b.similarity_score.partial_cmp(&a.similarity_score).unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(MAX_RECOMMENDATIONS);
    scored
}
