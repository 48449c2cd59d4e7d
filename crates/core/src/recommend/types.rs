use serde::Serialize;

use crate::domain::product::Product;

/// A candidate product paired with its similarity to the reference product.
///
/// Serializes as the product's own fields with `similarityScore` appended,
/// the shape the storefront SPA consumes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoredProduct {
    #[serde(flatten)]
    pub product: Product,
    #[serde(rename = "similarityScore")]
    pub similarity_score: f64,
}
