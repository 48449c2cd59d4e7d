use tokio::sync::RwLock;

use shopfront_core::domain::order::{Order, OrderId, OrderStatus};
use shopfront_core::domain::product::{Product, ProductId};
use shopfront_core::domain::shopper::ShopperId;
use shopfront_core::errors::CollaboratorError;
use shopfront_core::recommend::{CatalogReader, PurchaseHistory};

use super::{OrderRepository, ProductRepository, RepositoryError};

/// Vec-backed so the catalog order is insertion order, matching the SQL
/// repository's oldest-first listing.
#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|product| &product.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.clone())
    }

    async fn list_excluding(&self, id: &ProductId) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.iter().filter(|product| &product.id != id).cloned().collect())
    }

    async fn save(&self, product: Product) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;
        if let Some(existing) = products.iter_mut().find(|entry| entry.id == product.id) {
            *existing = product;
        } else {
            products.push(product);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CatalogReader for InMemoryProductRepository {
    async fn product_by_id(&self, id: &ProductId) -> Result<Option<Product>, CollaboratorError> {
        Ok(ProductRepository::find_by_id(self, id).await?)
    }

    async fn products_excluding(&self, id: &ProductId) -> Result<Vec<Product>, CollaboratorError> {
        Ok(ProductRepository::list_excluding(self, id).await?)
    }
}

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<Vec<Order>>,
}

#[async_trait::async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        let orders = self.orders.read().await;
        Ok(orders.iter().find(|order| &order.id == id).cloned())
    }

    async fn has_completed_order(&self, shopper: &ShopperId) -> Result<bool, RepositoryError> {
        let orders = self.orders.read().await;
        Ok(orders
            .iter()
            .any(|order| &order.shopper_id == shopper && order.status == OrderStatus::Completed))
    }

    async fn save(&self, order: Order) -> Result<(), RepositoryError> {
        let mut orders = self.orders.write().await;
        if let Some(existing) = orders.iter_mut().find(|entry| entry.id == order.id) {
            *existing = order;
        } else {
            orders.push(order);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl PurchaseHistory for InMemoryOrderRepository {
    async fn has_completed_order(&self, shopper: &ShopperId) -> Result<bool, CollaboratorError> {
        Ok(OrderRepository::has_completed_order(self, shopper).await?)
    }
}
