//! Customer account service: signup, password change, account deletion.

use thiserror::Error;
use tracing::instrument;

use shopping_cart_core::{Email, EmailError, Name, NameError, Password, PasswordError};

use crate::db::customers::{EMAIL_CONSTRAINT, USERNAME_CONSTRAINT};
use crate::db::{CustomerStore, RepositoryError};
use crate::dto::{
    ChangePasswordRequest, CustomerResponse, DeleteCustomerRequest, SignUpRequest, SignUpResponse,
};
use crate::models::{AuthorizedCustomer, Customer, HashedPassword, NewCustomer, PasswordHashError};

/// Errors from customer account operations.
#[derive(Debug, Error)]
pub enum CustomerError {
    #[error("invalid username: {0}")]
    InvalidName(#[from] NameError),

    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("invalid password: {0}")]
    InvalidPassword(#[from] PasswordError),

    #[error("username is already taken")]
    DuplicateName,

    #[error("email is already registered")]
    DuplicateEmail,

    /// The supplied current password does not match.
    #[error("password does not match")]
    PasswordMismatch,

    /// The authenticated customer no longer exists.
    #[error("customer not found")]
    NotFound,

    #[error(transparent)]
    PasswordHash(#[from] PasswordHashError),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Customer account operations over a customer store.
pub struct CustomerService<C> {
    customers: C,
}

impl<C: CustomerStore> CustomerService<C> {
    #[must_use]
    pub const fn new(customers: C) -> Self {
        Self { customers }
    }

    /// Register a new customer.
    ///
    /// Input is validated before any storage access. The username is checked
    /// for uniqueness before the email.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad username, email or password,
    /// `CustomerError::DuplicateName` / `CustomerError::DuplicateEmail` if
    /// either is taken, or a storage error.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpResponse, CustomerError> {
        let name = Name::parse(&request.username)?;
        let email = Email::parse(&request.email)?;
        let password = Password::parse(&request.password)?;

        if self.customers.exists_by_name(&name).await? {
            return Err(CustomerError::DuplicateName);
        }
        if self.customers.exists_by_email(&email).await? {
            return Err(CustomerError::DuplicateEmail);
        }

        let new_customer = NewCustomer::new(name, email, &password)?;
        let customer = self
            .customers
            .save(&new_customer)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(constraint) if constraint == USERNAME_CONSTRAINT => {
                    CustomerError::DuplicateName
                }
                RepositoryError::Conflict(constraint) if constraint == EMAIL_CONSTRAINT => {
                    CustomerError::DuplicateEmail
                }
                other => CustomerError::Repository(other),
            })?;

        tracing::info!(customer_id = %customer.id, "Customer signed up");

        Ok(SignUpResponse::from(&customer))
    }

    /// Profile of the authenticated customer.
    #[must_use]
    pub fn find_customer(&self, principal: &AuthorizedCustomer) -> CustomerResponse {
        CustomerResponse::from(principal.customer())
    }

    /// Replace the customer's password after verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::PasswordMismatch` if the current password is
    /// wrong; the stored hash is left untouched in that case.
    #[instrument(skip_all, fields(customer_id = %principal.id()))]
    pub async fn change_password(
        &self,
        principal: &AuthorizedCustomer,
        request: &ChangePasswordRequest,
    ) -> Result<(), CustomerError> {
        let current = Password::parse(&request.password)?;
        let new_password = Password::parse(&request.new_password)?;

        let customer = self.verified_customer(principal, &current).await?;
        let hash = HashedPassword::hash(&new_password)?;

        self.customers
            .update_password(&customer.name, hash.as_str())
            .await
            .map_err(not_found_as_missing_customer)?;

        tracing::info!("Password changed");

        Ok(())
    }

    /// Delete the customer.
    ///
    /// The cart rows go in the same statement: the store removes them with
    /// their customer (`ON DELETE CASCADE` in `PostgreSQL`).
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::PasswordMismatch` if the password is wrong.
    #[instrument(skip_all, fields(customer_id = %principal.id()))]
    pub async fn delete_customer(
        &self,
        principal: &AuthorizedCustomer,
        request: &DeleteCustomerRequest,
    ) -> Result<(), CustomerError> {
        let password = Password::parse(&request.password)?;
        let customer = self.verified_customer(principal, &password).await?;

        self.customers
            .delete_by_name(&customer.name)
            .await
            .map_err(not_found_as_missing_customer)?;

        tracing::info!("Customer deleted");

        Ok(())
    }

    /// Reload the principal's row and check `password` against its hash.
    async fn verified_customer(
        &self,
        principal: &AuthorizedCustomer,
        password: &Password,
    ) -> Result<Customer, CustomerError> {
        let customer = self
            .customers
            .find_by_name(principal.name().as_str())
            .await?
            .ok_or(CustomerError::NotFound)?;

        if !customer.is_same_password(password) {
            return Err(CustomerError::PasswordMismatch);
        }

        Ok(customer)
    }
}

fn not_found_as_missing_customer(e: RepositoryError) -> CustomerError {
    match e {
        RepositoryError::NotFound => CustomerError::NotFound,
        other => CustomerError::Repository(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopping_cart_core::{Price, ProductId};

    use super::*;
    use crate::db::{CartItemStore, MemoryStore};
    use crate::models::{NewCartItem, Product};

    /// Customer store whose deletes always fail.
    struct FailingDelete(MemoryStore);

    impl CustomerStore for FailingDelete {
        async fn exists_by_name(&self, name: &Name) -> Result<bool, RepositoryError> {
            self.0.exists_by_name(name).await
        }

        async fn exists_by_email(&self, email: &Email) -> Result<bool, RepositoryError> {
            self.0.exists_by_email(email).await
        }

        async fn save(&self, customer: &NewCustomer) -> Result<Customer, RepositoryError> {
            self.0.save(customer).await
        }

        async fn find_by_name(&self, name: &str) -> Result<Option<Customer>, RepositoryError> {
            self.0.find_by_name(name).await
        }

        async fn update_password(
            &self,
            name: &Name,
            password_hash: &str,
        ) -> Result<(), RepositoryError> {
            self.0.update_password(name, password_hash).await
        }

        async fn delete_by_name(&self, _name: &Name) -> Result<(), RepositoryError> {
            Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    fn apple() -> Product {
        Product {
            id: ProductId::new(1),
            name: "apple".to_string(),
            price: Price::from_cents(1000).unwrap(),
            image_url: "https://img.example/apple.png".to_string(),
            description: None,
        }
    }

    fn one_apple() -> NewCartItem {
        NewCartItem {
            product_id: ProductId::new(1),
            quantity: 2,
            checked: true,
        }
    }

    fn service(store: &MemoryStore) -> CustomerService<MemoryStore> {
        CustomerService::new(store.clone())
    }

    fn sign_up_request(username: &str, email: &str) -> SignUpRequest {
        SignUpRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
        }
    }

    async fn principal(store: &MemoryStore, name: &str) -> AuthorizedCustomer {
        store
            .find_by_name(name)
            .await
            .unwrap()
            .map(AuthorizedCustomer::from)
            .unwrap()
    }

    #[tokio::test]
    async fn test_sign_up_persists_one_customer() {
        let store = MemoryStore::new();
        let response = service(&store)
            .sign_up(&sign_up_request("puppy", "puppy@woowa.com"))
            .await
            .unwrap();

        assert_eq!(
            response,
            SignUpResponse {
                username: "puppy".to_string(),
                email: "puppy@woowa.com".to_string(),
            }
        );
        let stored = store.find_by_name("puppy").await.unwrap().unwrap();
        assert!(stored.is_same_password(&Password::parse("password123").unwrap()));
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_name_persists_nothing() {
        let store = MemoryStore::new();
        let service = service(&store);
        service
            .sign_up(&sign_up_request("puppy", "puppy@woowa.com"))
            .await
            .unwrap();

        let err = service
            .sign_up(&sign_up_request("puppy", "other@woowa.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CustomerError::DuplicateName));
        assert!(
            !store
                .exists_by_email(&Email::parse("other@woowa.com").unwrap())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email() {
        let store = MemoryStore::new();
        let service = service(&store);
        service
            .sign_up(&sign_up_request("puppy", "puppy@woowa.com"))
            .await
            .unwrap();

        let err = service
            .sign_up(&sign_up_request("kitty", "puppy@woowa.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CustomerError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_sign_up_validates_before_storage() {
        let store = MemoryStore::new();
        let service = service(&store);

        let err = service
            .sign_up(&sign_up_request("   ", "puppy@woowa.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CustomerError::InvalidName(_)));

        let err = service
            .sign_up(&sign_up_request("puppy", "not-an-email"))
            .await
            .unwrap_err();
        assert!(matches!(err, CustomerError::InvalidEmail(_)));

        let mut request = sign_up_request("puppy", "puppy@woowa.com");
        request.password = "short".to_string();
        let err = service.sign_up(&request).await.unwrap_err();
        assert!(matches!(err, CustomerError::InvalidPassword(_)));
        assert!(store.find_by_name("puppy").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_change_password_wrong_current_keeps_hash() {
        let store = MemoryStore::new();
        let service = service(&store);
        service
            .sign_up(&sign_up_request("puppy", "puppy@woowa.com"))
            .await
            .unwrap();
        let principal = principal(&store, "puppy").await;

        let err = service
            .change_password(
                &principal,
                &ChangePasswordRequest {
                    password: "password999".to_string(),
                    new_password: "newpassword1".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CustomerError::PasswordMismatch));

        let stored = store.find_by_name("puppy").await.unwrap().unwrap();
        assert_eq!(stored.password, principal.customer().password);
    }

    #[tokio::test]
    async fn test_change_password_stores_new_hash() {
        let store = MemoryStore::new();
        let service = service(&store);
        service
            .sign_up(&sign_up_request("puppy", "puppy@woowa.com"))
            .await
            .unwrap();
        let principal = principal(&store, "puppy").await;

        service
            .change_password(
                &principal,
                &ChangePasswordRequest {
                    password: "password123".to_string(),
                    new_password: "newpassword1".to_string(),
                },
            )
            .await
            .unwrap();

        let stored = store.find_by_name("puppy").await.unwrap().unwrap();
        assert!(stored.is_same_password(&Password::parse("newpassword1").unwrap()));
        assert!(!stored.is_same_password(&Password::parse("password123").unwrap()));
    }

    #[tokio::test]
    async fn test_delete_customer_removes_cart_rows() {
        let store = MemoryStore::with_products([apple()]);
        let service = service(&store);
        service
            .sign_up(&sign_up_request("puppy", "puppy@woowa.com"))
            .await
            .unwrap();
        let principal = principal(&store, "puppy").await;
        store.add_cart_item(principal.id(), &one_apple()).await.unwrap();

        let wrong = DeleteCustomerRequest {
            password: "password999".to_string(),
        };
        assert!(matches!(
            service.delete_customer(&principal, &wrong).await,
            Err(CustomerError::PasswordMismatch)
        ));
        assert_eq!(store.cart_item_count().await, 1);

        let right = DeleteCustomerRequest {
            password: "password123".to_string(),
        };
        service.delete_customer(&principal, &right).await.unwrap();
        assert_eq!(store.cart_item_count().await, 0);
        assert!(store.find_by_name("puppy").await.unwrap().is_none());

        assert!(matches!(
            service.delete_customer(&principal, &right).await,
            Err(CustomerError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_cart_rows() {
        let store = MemoryStore::with_products([apple()]);
        service(&store)
            .sign_up(&sign_up_request("puppy", "puppy@woowa.com"))
            .await
            .unwrap();
        let principal = principal(&store, "puppy").await;
        store.add_cart_item(principal.id(), &one_apple()).await.unwrap();

        let failing = CustomerService::new(FailingDelete(store.clone()));
        let request = DeleteCustomerRequest {
            password: "password123".to_string(),
        };
        assert!(matches!(
            failing.delete_customer(&principal, &request).await,
            Err(CustomerError::Repository(_))
        ));

        assert_eq!(store.cart_item_count().await, 1);
        assert!(store.find_by_name("puppy").await.unwrap().is_some());
    }
}
