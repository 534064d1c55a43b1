//! Cart item repository for database operations.
//!
//! One parameterized statement per operation against `cart_item`. List
//! queries carry no `ORDER BY`.

use sqlx::PgPool;

use shopping_cart_core::{CartItemId, CustomerId, ProductId};

use super::{CartItemStore, RepositoryError};
use crate::models::{CartItem, CartItemUpdate, NewCartItem};

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    id: i64,
    customer_id: i64,
    product_id: i64,
    quantity: i32,
    checked: bool,
}

impl TryFrom<CartItemRow> for CartItem {
    type Error = RepositoryError;

    fn try_from(row: CartItemRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(row.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "negative quantity {} on cart item {}",
                row.quantity, row.id
            ))
        })?;

        Ok(Self {
            id: CartItemId::new(row.id),
            customer_id: CustomerId::new(row.customer_id),
            product_id: ProductId::new(row.product_id),
            quantity,
            checked: row.checked,
        })
    }
}

/// Convert a domain quantity into the `INTEGER` column type.
fn quantity_param(quantity: u32) -> Result<i32, RepositoryError> {
    i32::try_from(quantity).map_err(|_| {
        RepositoryError::DataCorruption(format!("quantity {quantity} exceeds column range"))
    })
}

/// Repository for cart item database operations.
pub struct CartItemRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartItemRepository<'a> {
    /// Create a new cart item repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl CartItemStore for CartItemRepository<'_> {
    async fn find_product_ids_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<ProductId>, RepositoryError> {
        let ids = sqlx::query_scalar::<_, ProductId>(
            "SELECT product_id FROM cart_item WHERE customer_id = $1",
        )
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(ids)
    }

    async fn find_ids_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<CartItemId>, RepositoryError> {
        let ids =
            sqlx::query_scalar::<_, CartItemId>("SELECT id FROM cart_item WHERE customer_id = $1")
                .bind(customer_id)
                .fetch_all(self.pool)
                .await?;

        Ok(ids)
    }

    async fn find_product_id_by_id(&self, id: CartItemId) -> Result<ProductId, RepositoryError> {
        sqlx::query_scalar::<_, ProductId>("SELECT product_id FROM cart_item WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn add_cart_item(
        &self,
        customer_id: CustomerId,
        item: &NewCartItem,
    ) -> Result<CartItemId, RepositoryError> {
        let id = sqlx::query_scalar::<_, CartItemId>(
            r"
            INSERT INTO cart_item (customer_id, product_id, quantity, checked)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            ",
        )
        .bind(customer_id)
        .bind(item.product_id)
        .bind(quantity_param(item.quantity)?)
        .bind(item.checked)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    async fn delete_cart_item(&self, id: CartItemId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_item WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete_all_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_item WHERE customer_id = $1")
            .bind(customer_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    async fn find_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<CartItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartItemRow>(
            r"
            SELECT id, customer_id, product_id, quantity, checked
            FROM cart_item
            WHERE customer_id = $1
            ",
        )
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn update(
        &self,
        customer_id: CustomerId,
        update: &CartItemUpdate,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            UPDATE cart_item
            SET quantity = $1, checked = $2
            WHERE customer_id = $3 AND id = $4
            ",
        )
        .bind(quantity_param(update.quantity)?)
        .bind(update.checked)
        .bind(customer_id)
        .bind(update.id)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_quantity_row_is_corruption() {
        let row = CartItemRow {
            id: 1,
            customer_id: 2,
            product_id: 3,
            quantity: -1,
            checked: true,
        };
        assert!(matches!(
            CartItem::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_quantity_param_range() {
        assert!(matches!(quantity_param(5), Ok(5)));
        assert!(quantity_param(u32::MAX).is_err());
    }
}
