//! Teacher account operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{Account, NewAccount};
use crate::repository::Database;

impl Database {
    // ==================== Account Operations ====================

    /// Insert a new account
    pub async fn insert_account(&self, account: NewAccount) -> Result<Account, DbError> {
        let now = Utc::now();

        // Check if account already exists
        let existing = self.get_account_by_email(&account.email).await?;
        if existing.is_some() {
            return Err(DbError::Duplicate(format!(
                "Account '{}' already exists",
                account.email
            )));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO accounts (first_name, last_name, email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_insert(e, format!("Account '{}' already exists", account.email)))?;

        let id: i64 = result.get("id");

        Ok(Account {
            id,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            password_hash: account.password_hash,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get an account by email
    pub async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, first_name, last_name, email, password_hash, created_at, updated_at
            FROM accounts
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Account::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get an account by ID
    pub async fn get_account_by_id(&self, id: i64) -> Result<Option<Account>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, first_name, last_name, email, password_hash, created_at, updated_at
            FROM accounts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Account::try_from(&row).map_err(DbError::from)).transpose()
    }
}
