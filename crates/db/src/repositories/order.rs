use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::Row;

use shopfront_core::domain::order::{Order, OrderId, OrderLine, OrderStatus};
use shopfront_core::domain::product::ProductId;
use shopfront_core::domain::shopper::ShopperId;
use shopfront_core::errors::CollaboratorError;
use shopfront_core::recommend::PurchaseHistory;

use super::{OrderRepository, RepositoryError};
use crate::DbPool;

pub struct SqlOrderRepository {
    pool: DbPool,
}

impl SqlOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_line(row: &sqlx::sqlite::SqliteRow) -> Result<OrderLine, RepositoryError> {
    let product_id: String =
        row.try_get("product_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let quantity: i64 =
        row.try_get("quantity").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let unit_price_raw: String =
        row.try_get("unit_price").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let quantity = u32::try_from(quantity)
        .map_err(|_| RepositoryError::Decode(format!("invalid quantity `{quantity}`")))?;
    let unit_price = Decimal::from_str(&unit_price_raw).map_err(|e| {
        RepositoryError::Decode(format!("invalid unit_price `{unit_price_raw}`: {e}"))
    })?;

    Ok(OrderLine { product_id: ProductId(product_id), quantity, unit_price })
}

#[async_trait::async_trait]
impl OrderRepository for SqlOrderRepository {
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, shopper_id, status, created_at FROM orders WHERE id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let shopper_id: String =
            row.try_get("shopper_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
        let status_raw: String =
            row.try_get("status").map_err(|e| RepositoryError::Decode(e.to_string()))?;
        let created_at_raw: String =
            row.try_get("created_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;

        let status = status_raw
            .parse::<OrderStatus>()
            .map_err(|e| RepositoryError::Decode(e.to_string()))?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_raw)
            .map(|stamp| stamp.with_timezone(&Utc))
            .map_err(|e| {
                RepositoryError::Decode(format!("invalid created_at `{created_at_raw}`: {e}"))
            })?;

        let line_rows = sqlx::query(
            "SELECT product_id, quantity, unit_price
             FROM order_line
             WHERE order_id = ?
             ORDER BY id",
        )
        .bind(&id.0)
        .fetch_all(&self.pool)
        .await?;
        let lines = line_rows.iter().map(row_to_line).collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Order {
            id: id.clone(),
            shopper_id: ShopperId(shopper_id),
            status,
            lines,
            created_at,
        }))
    }

    async fn has_completed_order(&self, shopper: &ShopperId) -> Result<bool, RepositoryError> {
        let exists: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM orders WHERE shopper_id = ?1 AND status = 'completed')",
        )
        .bind(&shopper.0)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists == 1)
    }

    async fn save(&self, order: Order) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO orders (id, shopper_id, status, created_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET status = excluded.status",
        )
        .bind(&order.id.0)
        .bind(&order.shopper_id.0)
        .bind(order.status.as_str())
        .bind(order.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM order_line WHERE order_id = ?")
            .bind(&order.id.0)
            .execute(&mut *tx)
            .await?;

        for (position, line) in order.lines.iter().enumerate() {
            sqlx::query(
                "INSERT INTO order_line (id, order_id, product_id, quantity, unit_price)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(format!("{}:{position}", order.id.0))
            .bind(&order.id.0)
            .bind(&line.product_id.0)
            .bind(i64::from(line.quantity))
            .bind(line.unit_price.to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl PurchaseHistory for SqlOrderRepository {
    async fn has_completed_order(&self, shopper: &ShopperId) -> Result<bool, CollaboratorError> {
        Ok(OrderRepository::has_completed_order(self, shopper).await?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use shopfront_core::domain::order::{Order, OrderId, OrderLine, OrderStatus};
    use shopfront_core::domain::product::{Product, ProductId};
    use shopfront_core::domain::shopper::ShopperId;

    use crate::repositories::{
        OrderRepository, ProductRepository, SqlOrderRepository, SqlProductRepository,
    };
    use crate::{connect_with_settings, migrations, DbPool};

    async fn pool() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("run migrations");
        pool
    }

    async fn seed_product(pool: &DbPool, id: &str) {
        let repo = SqlProductRepository::new(pool.clone());
        repo.save(Product {
            id: ProductId(id.to_owned()),
            name: format!("Product {id}"),
            description: None,
            price: Decimal::new(4999, 2),
            image_url: None,
            created_at: Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap(),
        })
        .await
        .expect("seed product");
    }

    fn order(id: &str, shopper: &str, status: OrderStatus, product_ids: &[&str]) -> Order {
        Order {
            id: OrderId(id.to_owned()),
            shopper_id: ShopperId(shopper.to_owned()),
            status,
            lines: product_ids
                .iter()
                .map(|product_id| OrderLine {
                    product_id: ProductId((*product_id).to_owned()),
                    quantity: 1,
                    unit_price: Decimal::new(4999, 2),
                })
                .collect(),
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn save_and_find_round_trip_with_lines() {
        let pool = pool().await;
        seed_product(&pool, "prod-a").await;
        seed_product(&pool, "prod-b").await;

        let repo = SqlOrderRepository::new(pool);
        let saved =
            order("ord-001", "shopper-1", OrderStatus::Completed, &["prod-a", "prod-b"]);

        repo.save(saved.clone()).await.expect("save order");
        let found = repo.find_by_id(&saved.id).await.expect("find order");

        assert_eq!(found, Some(saved));
    }

    #[tokio::test]
    async fn completed_order_counts_as_purchase_history() {
        let pool = pool().await;
        seed_product(&pool, "prod-a").await;

        let repo = SqlOrderRepository::new(pool);
        repo.save(order("ord-001", "shopper-1", OrderStatus::Completed, &["prod-a"]))
            .await
            .expect("save order");

        assert!(repo
            .has_completed_order(&ShopperId("shopper-1".to_owned()))
            .await
            .expect("check history"));
    }

    #[tokio::test]
    async fn pending_and_cancelled_orders_do_not_count() {
        let pool = pool().await;
        seed_product(&pool, "prod-a").await;

        let repo = SqlOrderRepository::new(pool);
        repo.save(order("ord-001", "shopper-1", OrderStatus::Pending, &["prod-a"]))
            .await
            .expect("save pending order");
        repo.save(order("ord-002", "shopper-1", OrderStatus::Cancelled, &["prod-a"]))
            .await
            .expect("save cancelled order");

        assert!(!repo
            .has_completed_order(&ShopperId("shopper-1".to_owned()))
            .await
            .expect("check history"));
        assert!(!repo
            .has_completed_order(&ShopperId("shopper-unknown".to_owned()))
            .await
            .expect("check unknown shopper"));
    }

    #[tokio::test]
    async fn resave_replaces_status_and_lines() {
        let pool = pool().await;
        seed_product(&pool, "prod-a").await;
        seed_product(&pool, "prod-b").await;

        let repo = SqlOrderRepository::new(pool);
        repo.save(order("ord-001", "shopper-1", OrderStatus::Pending, &["prod-a", "prod-b"]))
            .await
            .expect("save order");
        let updated = order("ord-001", "shopper-1", OrderStatus::Completed, &["prod-a"]);
        repo.save(updated.clone()).await.expect("resave order");

        let found = repo.find_by_id(&updated.id).await.expect("find order");
        assert_eq!(found, Some(updated));
    }
}
