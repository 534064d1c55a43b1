//! Customer repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shopping_cart_core::{CustomerId, Email, Name};

use super::{CustomerStore, RepositoryError, map_unique_violation};
use crate::models::{Customer, HashedPassword, NewCustomer};

/// Name of the unique constraint on `customer.username`.
pub const USERNAME_CONSTRAINT: &str = "customer_username_unique";

/// Name of the unique constraint on `customer.email`.
pub const EMAIL_CONSTRAINT: &str = "customer_email_unique";

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    username: String,
    email: String,
    password: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let name = Name::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: CustomerId::new(row.id),
            name,
            email,
            password: HashedPassword::from_stored(row.password),
            created_at: row.created_at,
        })
    }
}

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl CustomerStore for CustomerRepository<'_> {
    async fn exists_by_name(&self, name: &Name) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM customer WHERE username = $1)",
        )
        .bind(name.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    async fn exists_by_email(&self, email: &Email) -> Result<bool, RepositoryError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM customer WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(self.pool)
                .await?;

        Ok(exists)
    }

    async fn save(&self, customer: &NewCustomer) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            INSERT INTO customer (username, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password, created_at
            ",
        )
        .bind(customer.name.as_str())
        .bind(customer.email.as_str())
        .bind(customer.password.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(map_unique_violation)?;

        row.try_into()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, username, email, password, created_at
            FROM customer
            WHERE username = $1
            ",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn update_password(
        &self,
        name: &Name,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE customer SET password = $1 WHERE username = $2")
            .bind(password_hash)
            .bind(name.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete_by_name(&self, name: &Name) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM customer WHERE username = $1")
            .bind(name.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
