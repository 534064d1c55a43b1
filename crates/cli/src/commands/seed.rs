//! Seed the product catalog from a YAML file.
//!
//! ```yaml
//! products:
//!   - name: Banana
//!     price: "3.50"
//!     image_url: https://images.example.com/banana.jpg
//!     description: optional
//! ```
//!
//! The file is parsed and validated before the database is touched.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{error, info};

use shopping_cart_api::db;
use shopping_cart_core::Price;

use super::{CommandError, database_url};

/// Root of a product seed file.
#[derive(Debug, Deserialize)]
pub struct ProductSeedFile {
    pub products: Vec<ProductSeed>,
}

/// One product entry of a seed file.
#[derive(Debug, Deserialize)]
pub struct ProductSeed {
    pub name: String,
    pub price: Decimal,
    pub image_url: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Collect every problem in the seed file.
#[must_use]
pub fn validate(file: &ProductSeedFile) -> Vec<String> {
    let mut errors = Vec::new();

    if file.products.is_empty() {
        errors.push("no products listed".to_string());
    }

    for (index, product) in file.products.iter().enumerate() {
        let entry = index + 1;
        if product.name.trim().is_empty() {
            errors.push(format!("product #{entry}: name is blank"));
        }
        if product.name.len() > 255 {
            errors.push(format!("product #{entry}: name exceeds 255 bytes"));
        }
        if let Err(e) = Price::new(product.price) {
            errors.push(format!("product #{entry} ({}): {e}", product.name));
        }
        if product.image_url.trim().is_empty() {
            errors.push(format!("product #{entry} ({}): image_url is blank", product.name));
        }
    }

    errors
}

/// Insert the products of `file_path`.
///
/// With `clear_existing`, every product and every cart row is removed first.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation, or if
/// a database operation fails. Nothing is written on error.
pub async fn products(file_path: &str, clear_existing: bool) -> Result<(), CommandError> {
    let path = Path::new(file_path);
    info!(path = %file_path, "Loading products from file");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::Io {
            path: file_path.to_owned(),
            source,
        })?;
    let file: ProductSeedFile = serde_yaml::from_str(&content)?;
    info!(products = file.products.len(), "Parsed seed file");

    let errors = validate(&file);
    if !errors.is_empty() {
        error!("Seed file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(CommandError::Validation(errors.len()));
    }

    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let inserted = insert_products(&pool, &file.products, clear_existing).await?;
    info!(inserted, clear_existing, "Seeding complete!");

    Ok(())
}

async fn insert_products(
    pool: &PgPool,
    products: &[ProductSeed],
    clear_existing: bool,
) -> Result<usize, CommandError> {
    let mut tx = pool.begin().await?;

    if clear_existing {
        sqlx::query("TRUNCATE cart_item, product RESTART IDENTITY")
            .execute(&mut *tx)
            .await?;
        info!("Cleared existing products and cart items");
    }

    for product in products {
        sqlx::query(
            r"
            INSERT INTO product (name, price, image_url, description)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(product.name.trim())
        .bind(product.price)
        .bind(product.image_url.trim())
        .bind(product.description.as_deref())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(products.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_validate() {
        let file: ProductSeedFile = serde_yaml::from_str(
            r#"
products:
  - name: Banana
    price: "3.50"
    image_url: https://images.example.com/banana.jpg
  - name: Mango
    price: "2.80"
    image_url: https://images.example.com/mango.jpg
    description: Sweet.
"#,
        )
        .unwrap();

        assert_eq!(file.products.len(), 2);
        assert_eq!(file.products[1].description.as_deref(), Some("Sweet."));
        assert!(validate(&file).is_empty());
    }

    #[test]
    fn test_validation_collects_every_problem() {
        let file: ProductSeedFile = serde_yaml::from_str(
            r#"
products:
  - name: " "
    price: "-1.00"
    image_url: ""
"#,
        )
        .unwrap();

        assert_eq!(validate(&file).len(), 3);
        assert_eq!(validate(&ProductSeedFile { products: vec![] }).len(), 1);
    }

    #[test]
    fn test_bundled_seed_file_is_valid() {
        let content = include_str!("../../../../seeds/products.yaml");
        let file: ProductSeedFile = serde_yaml::from_str(content).unwrap();
        assert!(validate(&file).is_empty());
    }
}
