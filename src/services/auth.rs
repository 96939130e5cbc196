// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserStore,
    models::auth::{Claims, User},
};

/// Emissor de identidade: usuários com senha bcrypt e tokens JWT HS256.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt_secret: String,
    bcrypt_cost: u32,
    token_ttl_days: i64,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        jwt_secret: String,
        bcrypt_cost: u32,
        token_ttl_days: i64,
    ) -> Self {
        Self { users, jwt_secret, bcrypt_cost, token_ttl_days }
    }

    /// Cria o principal (e-mail + senha). E-mail repetido vira `DuplicateIdentity`.
    pub async fn issue_principal(&self, email: &str, password: &str) -> Result<User, AppError> {
        // Hashing fora do executor assíncrono
        let password_clone = password.to_owned();
        let cost = self.bcrypt_cost;
        let hashed_password = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.users.create_user(email, &hashed_password).await
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        // Token de um usuário que não existe mais
        self.users
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    pub fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(self.token_ttl_days);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryStore::new()), "segredo-de-teste".into(), 4, 7)
    }

    #[tokio::test]
    async fn login_returns_a_token_for_the_principal() {
        let auth = service();
        let user = auth.issue_principal("p@x.com", "secret1").await.unwrap();
        assert_ne!(user.password_hash, "secret1");

        let token = auth.login_user("p@x.com", "secret1").await.unwrap();
        let resolved = auth.validate_token(&token).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let auth = service();
        auth.issue_principal("p@x.com", "secret1").await.unwrap();

        let err = auth.login_user("p@x.com", "outra-senha").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));

        let err = auth.login_user("ninguem@x.com", "secret1").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_duplicate_identity() {
        let auth = service();
        auth.issue_principal("p@x.com", "secret1").await.unwrap();

        let err = auth.issue_principal("p@x.com", "secret2").await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateIdentity(_)));
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let err = service().validate_token("nao.e.um.jwt").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }
}
