//! Product catalog service.

use thiserror::Error;
use tracing::instrument;

use shopping_cart_core::ProductId;

use crate::db::{ProductStore, RepositoryError};
use crate::dto::{ProductPage, ProductResponse};
use crate::models::{PageError, ProductError, Products};

/// Errors from catalog reads.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    Product(#[from] ProductError),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Read-only product catalog.
pub struct ProductService<P> {
    products: P,
}

impl<P: ProductStore> ProductService<P> {
    #[must_use]
    pub const fn new(products: P) -> Self {
        Self { products }
    }

    /// One page of the catalog, ordered by product ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Page` if `page_size` or `page` is zero.
    #[instrument(skip(self))]
    pub async fn page(&self, page_size: u32, page: u32) -> Result<ProductPage, CatalogError> {
        let products = Products::new(self.products.find_all().await?);
        let items = products
            .slice(page_size, page)?
            .iter()
            .map(ProductResponse::from)
            .collect();

        Ok(ProductPage {
            items,
            page,
            page_size,
            total: products.len(),
            total_pages: products.total_pages(page_size),
        })
    }

    /// A single product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Product` if no product has the ID.
    pub async fn find(&self, id: ProductId) -> Result<ProductResponse, CatalogError> {
        let product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        Ok(ProductResponse::from(&product))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use shopping_cart_core::Price;

    use super::*;
    use crate::db::MemoryStore;
    use crate::models::Product;

    fn store() -> MemoryStore {
        MemoryStore::with_products((1..=5).map(|id| Product {
            id: ProductId::new(id),
            name: format!("product-{id}"),
            price: Price::from_cents(id * 100).unwrap(),
            image_url: format!("https://img.example/{id}.png"),
            description: Some("fresh".to_string()),
        }))
    }

    #[tokio::test]
    async fn test_page() {
        let service = ProductService::new(store());

        let page = service.page(2, 3).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, ProductId::new(5));
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);

        assert!(service.page(2, 4).await.unwrap().items.is_empty());
        assert!(matches!(
            service.page(0, 1).await,
            Err(CatalogError::Page(PageError::InvalidPageSize))
        ));
    }

    #[tokio::test]
    async fn test_find() {
        let service = ProductService::new(store());
        assert_eq!(service.find(ProductId::new(2)).await.unwrap().name, "product-2");
        assert!(matches!(
            service.find(ProductId::new(42)).await,
            Err(CatalogError::Product(ProductError::NotFound(_)))
        ));
    }
}
