//! Seed the catalog with sample data for local development.

use rust_decimal::dec;

use storekeeper_core::Money;
use storekeeper_server::db::{CategoryRepository, ProductRepository, RepositoryError};
use storekeeper_server::db::products::ProductInput;

use super::{CommandError, connect};

/// Seed categories and products. Safe to re-run: duplicate categories are
/// skipped, products are inserted again.
///
/// # Errors
///
/// Returns `CommandError::Database` if any insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    let categories = CategoryRepository::new(&pool);
    let products = ProductRepository::new(&pool);

    let mut seeded = Vec::new();
    for (name, description) in [
        ("Apparel", "Clothing and accessories"),
        ("Home", "Homeware and decor"),
        ("Outdoors", "Camping and outdoor gear"),
    ] {
        match categories.create(name, Some(description)).await {
            Ok(category) => {
                tracing::info!("Created category: {}", category.name);
                seeded.push(category);
            }
            Err(RepositoryError::Conflict(_)) => {
                tracing::info!("Category already exists, skipping: {name}");
            }
            Err(e) => return Err(CommandError::Invalid(e.to_string())),
        }
    }

    let samples = [
        ("Canvas Tote", dec!(24.00), 120),
        ("Enamel Mug", dec!(14.50), 300),
        ("Trail Lantern", dec!(39.99), 45),
    ];

    for (i, (name, price, stock)) in samples.into_iter().enumerate() {
        let input = ProductInput {
            name: name.to_owned(),
            description: None,
            price: Money::new(price)
                .map_err(|e| CommandError::Invalid(e.to_string()))?,
            stock_quantity: stock,
            image_url: None,
            category_id: seeded.get(i % seeded.len().max(1)).map(|c| c.id),
        };

        let product = products
            .create(&input)
            .await
            .map_err(|e| CommandError::Invalid(e.to_string()))?;
        tracing::info!("Created product: {} ({})", product.name, product.id);
    }

    tracing::info!("Seeding complete!");
    Ok(())
}
