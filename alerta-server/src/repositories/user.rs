use std::sync::Arc;

use sqlx::{Error, Pool, Sqlite, Transaction};

use crate::configs::Storage;
use crate::models::User;

#[derive(Clone)]
pub struct UserRepository {
    storage: Arc<Storage>,
}

impl UserRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub fn get_pool(&self) -> &Pool<Sqlite> {
        self.storage.get_pool()
    }
}

impl UserRepository {
    pub async fn create(
        &self,
        item: &User,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, push_token, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&item.id)
        .bind(&item.email)
        .bind(&item.name)
        .bind(&item.push_token)
        .bind(item.created_at)
        .execute(&mut **transaction)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, Error> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(self.storage.get_pool())
            .await?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(self.storage.get_pool())
            .await?;

        Ok(user)
    }

    pub async fn find_push_token(&self, id: &str) -> Result<Option<String>, Error> {
        let token: Option<Option<String>> =
            sqlx::query_scalar("SELECT push_token FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(self.storage.get_pool())
                .await?;

        Ok(token.flatten().filter(|token| !token.is_empty()))
    }

    /// Overwrites the stored token. Returns false when the user does not exist.
    pub async fn update_push_token(
        &self,
        id: &str,
        token: Option<&str>,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<bool, Error> {
        let result = sqlx::query("UPDATE users SET push_token = $1 WHERE id = $2")
            .bind(token.filter(|token| !token.is_empty()))
            .bind(id)
            .execute(&mut **transaction)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::*;

    use super::*;

    #[tokio::test]
    async fn test_find_user_by_email() {
        let storage = setup_test_db().await;
        let user = create_test_user(storage.clone(), "findme@example.com", None).await;

        let repo = UserRepository::new(storage.clone());
        let found = repo.find_by_email("findme@example.com").await.unwrap().unwrap();

        assert_eq!(found.id, user.id);
        assert!(found.push_token.is_none());
    }

    #[tokio::test]
    async fn test_update_push_token_overwrites() {
        let storage = setup_test_db().await;
        let user = create_test_user(storage.clone(), "token@example.com", Some("first")).await;

        let repo = UserRepository::new(storage.clone());
        let mut tx = storage.get_pool().begin().await.unwrap();
        assert!(repo.update_push_token(&user.id, Some("second"), &mut tx).await.unwrap());
        tx.commit().await.unwrap();

        assert_eq!(repo.find_push_token(&user.id).await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_empty_push_token_reads_as_absent() {
        let storage = setup_test_db().await;
        let user = create_test_user(storage.clone(), "empty@example.com", Some("token")).await;

        let repo = UserRepository::new(storage.clone());
        let mut tx = storage.get_pool().begin().await.unwrap();
        repo.update_push_token(&user.id, Some(""), &mut tx).await.unwrap();
        tx.commit().await.unwrap();

        assert!(repo.find_push_token(&user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_push_token_unknown_user() {
        let storage = setup_test_db().await;

        let repo = UserRepository::new(storage.clone());
        let mut tx = storage.get_pool().begin().await.unwrap();
        assert!(!repo.update_push_token("missing", Some("token"), &mut tx).await.unwrap());
        tx.commit().await.unwrap();
    }
}
