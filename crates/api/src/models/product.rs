//! Product domain types and the in-memory product read model.

use thiserror::Error;

use shopping_cart_core::{Price, ProductId};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image_url: String,
    pub description: Option<String>,
}

/// Product lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    /// No product has the given ID.
    #[error("product {0} does not exist")]
    NotFound(ProductId),
}

/// Invalid pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page size must be at least 1")]
    InvalidPageSize,
    #[error("page must be at least 1")]
    InvalidPage,
}

/// An in-memory product list supporting lookup and page slicing.
#[derive(Debug, Clone, Default)]
pub struct Products {
    items: Vec<Product>,
}

impl Products {
    #[must_use]
    pub const fn new(items: Vec<Product>) -> Self {
        Self { items }
    }

    /// Returns page `page` (1-based) of `page_size` products.
    ///
    /// The last page may be partial. A page that starts past the end of the
    /// list is empty.
    ///
    /// # Errors
    ///
    /// Returns `PageError` if `page_size` or `page` is zero.
    pub fn slice(&self, page_size: u32, page: u32) -> Result<&[Product], PageError> {
        if page_size == 0 {
            return Err(PageError::InvalidPageSize);
        }
        if page == 0 {
            return Err(PageError::InvalidPage);
        }

        let size = page_size as usize;
        let total = self.items.len();
        let Some(from) = size.checked_mul(page as usize - 1) else {
            return Ok(&[]);
        };
        if from >= total {
            return Ok(&[]);
        }
        let to = from.saturating_add(size).min(total);

        Ok(self.items.get(from..to).unwrap_or(&[]))
    }

    /// Finds a product by ID with a linear scan.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if no product has the ID.
    pub fn find_by_id(&self, id: ProductId) -> Result<&Product, ProductError> {
        self.items
            .iter()
            .find(|product| product.id == id)
            .ok_or(ProductError::NotFound(id))
    }

    /// Number of pages of `page_size` needed to show every product.
    #[must_use]
    pub fn total_pages(&self, page_size: u32) -> usize {
        if page_size == 0 {
            return 0;
        }
        self.items.len().div_ceil(page_size as usize)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn product(id: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("product-{id}"),
            price: Price::from_cents(id * 100).unwrap(),
            image_url: format!("https://img.example/{id}.png"),
            description: None,
        }
    }

    fn five_products() -> Products {
        Products::new((1..=5).map(product).collect())
    }

    #[test]
    fn test_slice_first_page() {
        let products = five_products();
        let page = products.slice(2, 1).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, ProductId::new(1));
        assert_eq!(page[1].id, ProductId::new(2));
    }

    #[test]
    fn test_slice_partial_last_page() {
        let products = five_products();
        let page = products.slice(2, 3).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, ProductId::new(5));
    }

    #[test]
    fn test_slice_past_end_is_empty() {
        let products = five_products();
        assert!(products.slice(2, 4).unwrap().is_empty());
        assert!(products.slice(u32::MAX, u32::MAX).unwrap().is_empty());
    }

    #[test]
    fn test_slice_rejects_zero() {
        let products = five_products();
        assert_eq!(products.slice(0, 1), Err(PageError::InvalidPageSize));
        assert_eq!(products.slice(2, 0), Err(PageError::InvalidPage));
    }

    #[test]
    fn test_find_by_id() {
        let products = five_products();
        assert_eq!(products.find_by_id(ProductId::new(3)).unwrap().name, "product-3");
        assert_eq!(
            products.find_by_id(ProductId::new(99)),
            Err(ProductError::NotFound(ProductId::new(99)))
        );
    }

    #[test]
    fn test_total_pages() {
        let products = five_products();
        assert_eq!(products.total_pages(2), 3);
        assert_eq!(products.total_pages(5), 1);
        assert_eq!(products.total_pages(0), 0);
        assert_eq!(Products::default().total_pages(3), 0);
    }
}
