//! In-memory store implementing every store trait.
//!
//! Shares the constraint behavior of the `PostgreSQL` schema: unique
//! usernames and emails, and cart rows removed with their customer. Used by
//! service tests and local tooling that must not touch a database.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use shopping_cart_core::{CartItemId, CustomerId, Email, Name, ProductId};

use super::customers::{EMAIL_CONSTRAINT, USERNAME_CONSTRAINT};
use super::{CartItemStore, CustomerStore, ProductStore, RepositoryError};
use crate::models::{
    CartItem, CartItemUpdate, Customer, HashedPassword, NewCartItem, NewCustomer, Product,
};

#[derive(Debug, Default)]
struct State {
    customers: BTreeMap<CustomerId, Customer>,
    cart_items: BTreeMap<CartItemId, CartItem>,
    products: BTreeMap<ProductId, Product>,
    next_customer_id: i64,
    next_cart_item_id: i64,
}

impl State {
    fn customer_by_name(&self, name: &str) -> Option<&Customer> {
        self.customers.values().find(|c| c.name.as_str() == name)
    }
}

/// Thread-safe in-memory storage for customers, cart rows and products.
///
/// Clones share the same underlying state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose catalog holds `products`.
    #[must_use]
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let state = State {
            products: products.into_iter().map(|p| (p.id, p)).collect(),
            ..State::default()
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Number of cart rows across all customers.
    pub async fn cart_item_count(&self) -> usize {
        self.state.read().await.cart_items.len()
    }
}

impl CustomerStore for MemoryStore {
    async fn exists_by_name(&self, name: &Name) -> Result<bool, RepositoryError> {
        Ok(self
            .state
            .read()
            .await
            .customer_by_name(name.as_str())
            .is_some())
    }

    async fn exists_by_email(&self, email: &Email) -> Result<bool, RepositoryError> {
        Ok(self
            .state
            .read()
            .await
            .customers
            .values()
            .any(|c| c.email == *email))
    }

    async fn save(&self, customer: &NewCustomer) -> Result<Customer, RepositoryError> {
        let mut state = self.state.write().await;

        if state.customer_by_name(customer.name.as_str()).is_some() {
            return Err(RepositoryError::Conflict(USERNAME_CONSTRAINT.to_owned()));
        }
        if state.customers.values().any(|c| c.email == customer.email) {
            return Err(RepositoryError::Conflict(EMAIL_CONSTRAINT.to_owned()));
        }

        state.next_customer_id += 1;
        let stored = Customer {
            id: CustomerId::new(state.next_customer_id),
            name: customer.name.clone(),
            email: customer.email.clone(),
            password: customer.password.clone(),
            created_at: Utc::now(),
        };
        state.customers.insert(stored.id, stored.clone());

        Ok(stored)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.state.read().await.customer_by_name(name).cloned())
    }

    async fn update_password(
        &self,
        name: &Name,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        let customer = state
            .customers
            .values_mut()
            .find(|c| c.name == *name)
            .ok_or(RepositoryError::NotFound)?;
        customer.password = HashedPassword::from_stored(password_hash.to_owned());

        Ok(())
    }

    async fn delete_by_name(&self, name: &Name) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        let id = state
            .customer_by_name(name.as_str())
            .map(|c| c.id)
            .ok_or(RepositoryError::NotFound)?;

        state.customers.remove(&id);
        state.cart_items.retain(|_, item| item.customer_id != id);

        Ok(())
    }
}

impl CartItemStore for MemoryStore {
    async fn find_product_ids_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<ProductId>, RepositoryError> {
        Ok(self
            .state
            .read()
            .await
            .cart_items
            .values()
            .filter(|item| item.customer_id == customer_id)
            .map(|item| item.product_id)
            .collect())
    }

    async fn find_ids_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<CartItemId>, RepositoryError> {
        Ok(self
            .state
            .read()
            .await
            .cart_items
            .values()
            .filter(|item| item.customer_id == customer_id)
            .map(|item| item.id)
            .collect())
    }

    async fn find_product_id_by_id(&self, id: CartItemId) -> Result<ProductId, RepositoryError> {
        self.state
            .read()
            .await
            .cart_items
            .get(&id)
            .map(|item| item.product_id)
            .ok_or(RepositoryError::NotFound)
    }

    async fn add_cart_item(
        &self,
        customer_id: CustomerId,
        item: &NewCartItem,
    ) -> Result<CartItemId, RepositoryError> {
        let mut state = self.state.write().await;

        if !state.customers.contains_key(&customer_id) {
            return Err(RepositoryError::Conflict("cart_item_customer_id_fkey".to_owned()));
        }
        if !state.products.contains_key(&item.product_id) {
            return Err(RepositoryError::Conflict("cart_item_product_id_fkey".to_owned()));
        }

        state.next_cart_item_id += 1;
        let id = CartItemId::new(state.next_cart_item_id);
        state.cart_items.insert(
            id,
            CartItem {
                id,
                customer_id,
                product_id: item.product_id,
                quantity: item.quantity,
                checked: item.checked,
            },
        );

        Ok(id)
    }

    async fn delete_cart_item(&self, id: CartItemId) -> Result<(), RepositoryError> {
        self.state
            .write()
            .await
            .cart_items
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn delete_all_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> Result<(), RepositoryError> {
        self.state
            .write()
            .await
            .cart_items
            .retain(|_, item| item.customer_id != customer_id);

        Ok(())
    }

    async fn find_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<CartItem>, RepositoryError> {
        Ok(self
            .state
            .read()
            .await
            .cart_items
            .values()
            .filter(|item| item.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        customer_id: CustomerId,
        update: &CartItemUpdate,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        if let Some(item) = state.cart_items.get_mut(&update.id)
            && item.customer_id == customer_id
        {
            item.quantity = update.quantity;
            item.checked = update.checked;
        }

        Ok(())
    }
}

impl ProductStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.state.read().await.products.values().cloned().collect())
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.state.read().await.products.get(&id).cloned())
    }
}
