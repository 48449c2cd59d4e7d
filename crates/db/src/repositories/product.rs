use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::Row;

use shopfront_core::domain::product::{Product, ProductId};
use shopfront_core::errors::CollaboratorError;
use shopfront_core::recommend::CatalogReader;

use super::{ProductRepository, RepositoryError};
use crate::DbPool;

pub struct SqlProductRepository {
    pool: DbPool,
}

impl SqlProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_product(row: &sqlx::sqlite::SqliteRow) -> Result<Product, RepositoryError> {
    let id: String = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let description: Option<String> =
        row.try_get("description").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let price_raw: String =
        row.try_get("price").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let image_url: Option<String> =
        row.try_get("image_url").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let created_at_raw: String =
        row.try_get("created_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let price = Decimal::from_str(&price_raw)
        .map_err(|e| RepositoryError::Decode(format!("invalid price `{price_raw}`: {e}")))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_raw)
        .map(|stamp| stamp.with_timezone(&Utc))
        .map_err(|e| {
            RepositoryError::Decode(format!("invalid created_at `{created_at_raw}`: {e}"))
        })?;

    Ok(Product { id: ProductId(id), name, description, price, image_url, created_at })
}

#[async_trait::async_trait]
impl ProductRepository for SqlProductRepository {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, description, price, image_url, created_at
             FROM product
             WHERE id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_product).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, description, price, image_url, created_at
             FROM product
             ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_product).collect()
    }

    async fn list_excluding(&self, id: &ProductId) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, description, price, image_url, created_at
             FROM product
             WHERE id <> ?
             ORDER BY created_at, id",
        )
        .bind(&id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_product).collect()
    }

    async fn save(&self, product: Product) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO product (id, name, description, price, image_url, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 description = excluded.description,
                 price = excluded.price,
                 image_url = excluded.image_url",
        )
        .bind(&product.id.0)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.to_string())
        .bind(&product.image_url)
        .bind(product.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl CatalogReader for SqlProductRepository {
    async fn product_by_id(&self, id: &ProductId) -> Result<Option<Product>, CollaboratorError> {
        Ok(ProductRepository::find_by_id(self, id).await?)
    }

    async fn products_excluding(&self, id: &ProductId) -> Result<Vec<Product>, CollaboratorError> {
        Ok(ProductRepository::list_excluding(self, id).await?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use shopfront_core::domain::product::{Product, ProductId};

    use crate::repositories::{ProductRepository, SqlProductRepository};
    use crate::{connect_with_settings, migrations};

    fn product(id: &str, name: &str, cents: i64, minute: u32) -> Product {
        Product {
            id: ProductId(id.to_owned()),
            name: name.to_owned(),
            description: Some(format!("{name} (demo)")),
            price: Decimal::new(cents, 2),
            image_url: None,
            created_at: Utc.with_ymd_and_hms(2026, 2, 1, 9, minute, 0).unwrap(),
        }
    }

    async fn repo() -> SqlProductRepository {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("run migrations");
        SqlProductRepository::new(pool)
    }

    #[tokio::test]
    async fn save_and_find_round_trip_preserves_price_precision() {
        let repo = repo().await;
        let saved = product("prod-hdp-001", "Aurora Wireless Headphones", 12999, 0);

        repo.save(saved.clone()).await.expect("save product");
        let found = repo.find_by_id(&saved.id).await.expect("find product");

        assert_eq!(found, Some(saved));
    }

    #[tokio::test]
    async fn save_is_an_upsert_that_keeps_catalog_position() {
        let repo = repo().await;
        let original = product("prod-hdp-001", "Aurora Wireless Headphones", 12999, 0);
        repo.save(original.clone()).await.expect("save product");

        let mut repriced = original.clone();
        repriced.price = Decimal::new(10999, 2);
        repo.save(repriced.clone()).await.expect("resave product");

        let found = repo.find_by_id(&original.id).await.expect("find product");
        assert_eq!(found, Some(repriced));
    }

    #[tokio::test]
    async fn list_excluding_omits_the_reference_and_orders_by_age() {
        let repo = repo().await;
        repo.save(product("prod-b", "Boom Speaker", 9999, 5)).await.expect("save");
        repo.save(product("prod-a", "Mini Speaker", 4999, 0)).await.expect("save");
        repo.save(product("prod-c", "Fitness Watch", 19999, 10)).await.expect("save");

        let listed =
            repo.list_excluding(&ProductId("prod-b".to_owned())).await.expect("list catalog");

        let ids: Vec<&str> = listed.iter().map(|product| product.id.0.as_str()).collect();
        assert_eq!(ids, vec!["prod-a", "prod-c"]);
    }

    #[tokio::test]
    async fn missing_product_is_none_not_an_error() {
        let repo = repo().await;
        let found =
            repo.find_by_id(&ProductId("prod-404".to_owned())).await.expect("find product");
        assert_eq!(found, None);
    }
}
