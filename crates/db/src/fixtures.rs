use crate::connection::DbPool;
use crate::repositories::RepositoryError;
use sqlx::Executor;

/// Canonical demo catalog contract: id, name, price as stored.
const SEED_PRODUCTS: &[ProductSeedContract] = &[
    ProductSeedContract { product_id: "prod-hdp-001", name: "Aurora Wireless Headphones", price: "129.99" },
    ProductSeedContract { product_id: "prod-hdp-002", name: "Aurora Wired Headphones", price: "59.99" },
    ProductSeedContract { product_id: "prod-spk-001", name: "Aurora Mini Speaker", price: "49.99" },
    ProductSeedContract { product_id: "prod-spk-002", name: "Aurora Boom Speaker", price: "99.99" },
    ProductSeedContract { product_id: "prod-trn-001", name: "Trailblazer Running Shoes", price: "89.99" },
    ProductSeedContract { product_id: "prod-trn-002", name: "Trailblazer Hiking Boots", price: "139.99" },
    ProductSeedContract { product_id: "prod-wtc-001", name: "Pulse Fitness Watch", price: "199.99" },
    ProductSeedContract { product_id: "prod-cbl-001", name: "USB-C Charging Cable", price: "12.99" },
];

/// Demo shopper with a completed order; receives recommendations.
pub const SEED_SHOPPER_WITH_HISTORY: &str = "shopper-demo-001";

/// Demo shopper whose only order is still pending; receives none.
pub const SEED_SHOPPER_WITHOUT_HISTORY: &str = "shopper-demo-002";

const SEED_ORDER_IDS: &[&str] = &["ord-demo-001", "ord-demo-002"];

struct ProductSeedContract {
    product_id: &'static str,
    name: &'static str,
    price: &'static str,
}

#[derive(Clone, Copy, Debug)]
pub struct ProductSeedInfo {
    pub product_id: &'static str,
    pub name: &'static str,
}

#[derive(Debug)]
pub struct SeedResult {
    pub products: Vec<ProductSeedInfo>,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

/// Deterministic demo dataset for the storefront: the catalog the
/// recommendation endpoint ranks over, plus the two demo shoppers that
/// exercise both sides of the purchase-history gate.
pub struct SeedCatalog;

impl SeedCatalog {
    /// SQL fixture content for the demo catalog.
    pub const SQL: &str = include_str!("../../../config/fixtures/seed_catalog.sql");

    /// Load the demo catalog into the database. Idempotent.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;

        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        let products = SEED_PRODUCTS
            .iter()
            .map(|seed| ProductSeedInfo { product_id: seed.product_id, name: seed.name })
            .collect::<Vec<_>>();

        Ok(SeedResult { products })
    }

    /// Verify that seed data exists and matches the contract.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        for seed in SEED_PRODUCTS {
            let present: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM product WHERE id = ?1 AND name = ?2 AND price = ?3)",
            )
            .bind(seed.product_id)
            .bind(seed.name)
            .bind(seed.price)
            .fetch_one(pool)
            .await?;
            checks.push((seed.product_id, present == 1));
        }

        let completed: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM orders WHERE shopper_id = ?1 AND status = 'completed')",
        )
        .bind(SEED_SHOPPER_WITH_HISTORY)
        .fetch_one(pool)
        .await?;
        checks.push(("shopper-with-history", completed == 1));

        let without_history: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM orders WHERE shopper_id = ?1 AND status = 'completed')",
        )
        .bind(SEED_SHOPPER_WITHOUT_HISTORY)
        .fetch_one(pool)
        .await?;
        checks.push(("shopper-without-history", without_history == 0));

        let quoted_orders = sql_array_from_ids(SEED_ORDER_IDS);
        let order_count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(1) FROM orders WHERE id IN {quoted_orders}"
        ))
        .fetch_one(pool)
        .await?;
        checks.push(("orders", order_count == SEED_ORDER_IDS.len() as i64));

        let line_count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(1) FROM order_line WHERE order_id IN {quoted_orders}"
        ))
        .fetch_one(pool)
        .await?;
        checks.push(("order-lines", line_count == 3));

        let all_present = checks.iter().all(|(_, passed)| *passed);
        Ok(VerificationResult { all_present, checks })
    }
}

fn sql_array_from_ids(ids: &[&str]) -> String {
    let quoted = ids.iter().map(|id| format!("'{id}'")).collect::<Vec<_>>().join(", ");
    format!("({quoted})")
}
