use async_trait::async_trait;
use thiserror::Error;

use shopfront_core::domain::order::{Order, OrderId};
use shopfront_core::domain::product::{Product, ProductId};
use shopfront_core::domain::shopper::ShopperId;
use shopfront_core::errors::CollaboratorError;

pub mod memory;
pub mod order;
pub mod product;

pub use memory::{InMemoryOrderRepository, InMemoryProductRepository};
pub use order::SqlOrderRepository;
pub use product::SqlProductRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for CollaboratorError {
    fn from(value: RepositoryError) -> Self {
        CollaboratorError::new(value.to_string())
    }
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Full catalog, in catalog order (oldest first).
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Catalog minus one product, in catalog order (oldest first).
    async fn list_excluding(&self, id: &ProductId) -> Result<Vec<Product>, RepositoryError>;

    async fn save(&self, product: Product) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError>;

    async fn has_completed_order(&self, shopper: &ShopperId) -> Result<bool, RepositoryError>;

    async fn save(&self, order: Order) -> Result<(), RepositoryError>;
}
