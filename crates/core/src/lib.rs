pub mod config;
pub mod domain;
pub mod errors;
pub mod recommend;

pub use domain::order::{Order, OrderId, OrderLine, OrderStatus};
pub use domain::product::{Product, ProductId};
pub use domain::shopper::ShopperId;
pub use errors::{CollaboratorError, RecommendationError};
pub use recommend::{
    CatalogReader, PurchaseHistory, RecommendationEngine, ScoredProduct, MAX_RECOMMENDATIONS,
};
