use std::sync::Arc;

use crate::commands::CommandResult;
use shopfront_core::config::{AppConfig, LoadOptions};
use shopfront_core::domain::product::ProductId;
use shopfront_core::domain::shopper::ShopperId;
use shopfront_core::recommend::RecommendationEngine;
use shopfront_db::repositories::{SqlOrderRepository, SqlProductRepository};
use shopfront_db::connect_with_settings;

/// Runs the recommendation engine end-to-end against the configured
/// database and prints the ranked list, exercising the same path the API
/// serves.
pub fn run(product: &str, shopper: Option<&str>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "recommend",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "recommend",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        let engine = RecommendationEngine::new(
            Arc::new(SqlProductRepository::new(pool.clone())),
            Arc::new(SqlOrderRepository::new(pool.clone())),
        );

        let reference = ProductId(product.to_owned());
        let shopper_id = shopper.map(|value| ShopperId(value.to_owned()));
        let outcome = engine.recommend(&reference, shopper_id.as_ref()).await;

        pool.close().await;

        match outcome {
            Ok(recommendations) => {
                let rendered = serde_json::to_string_pretty(&recommendations)
                    .unwrap_or_else(|error| format!("[serialization failed: {error}]"));
                Ok(format!(
                    "{} recommendations for product `{product}`:\n{rendered}",
                    recommendations.len()
                ))
            }
            Err(error) if error.is_not_found() => {
                Err(("unknown_product", error.to_string(), 5u8))
            }
            Err(error) => Err(("recommendation", error.to_string(), 6u8)),
        }
    });

    match result {
        Ok(message) => CommandResult::success("recommend", message),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("recommend", error_class, message, exit_code)
        }
    }
}
