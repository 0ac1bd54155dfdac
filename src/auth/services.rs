use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::{rngs::OsRng, Rng};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    activities::services::record_activity,
    auth::{
        dto::{LoginRequest, RegisterRequest},
        jwt::JwtKeys,
        repo_types::{RegistrationCode, User},
    },
    dates,
    error::{ApiError, ApiResult},
    store::Store,
};

/// Argon2 PHC string stored for a new account.
fn password_hash_for(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("hash password: {e}"))
}

impl User {
    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
    fn password_matches(&self, password: &str) -> anyhow::Result<bool> {
        let stored = PasswordHash::new(&self.password_hash)
            .map_err(|e| anyhow::anyhow!("stored hash for {} is unreadable: {e}", self.username))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &stored)
            .is_ok())
    }
}

fn required(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.trim().is_empty())
}

pub async fn register(store: &dyn Store, req: RegisterRequest) -> ApiResult<User> {
    let (Some(username), Some(password), Some(register_code)) = (
        required(req.username),
        required(req.password),
        required(req.register_code),
    ) else {
        return Err(ApiError::Validation(
            "Username, password, and registration code are required".into(),
        ));
    };

    if store.find_user(&username).await?.is_some() {
        warn!(%username, "username already registered");
        return Err(ApiError::DuplicateUser);
    }

    if store.find_code(&register_code).await?.is_none() {
        warn!(%username, "unknown registration code");
        return Err(ApiError::InvalidCode);
    }

    let user = User {
        id: Uuid::new_v4(),
        username,
        password_hash: password_hash_for(&password)?,
        is_admin: false,
        created_at: dates::render_user_stamp(dates::now()),
    };
    store.insert_user(&user).await?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(user)
}

pub async fn login(store: &dyn Store, keys: &JwtKeys, req: LoginRequest) -> ApiResult<String> {
    let (Some(username), Some(password)) = (required(req.username), required(req.password)) else {
        return Err(ApiError::Validation("Username and password are required".into()));
    };

    let Some(user) = store.find_user(&username).await? else {
        warn!(%username, "login unknown username");
        return Err(ApiError::InvalidCredentials);
    };

    if !user.password_matches(&password)? {
        warn!(%username, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = keys.sign(&user.username)?;
    record_activity(store, &user.username, "logged in").await?;

    info!(username = %user.username, "user logged in");
    Ok(token)
}

/// Issues a random six digit registration code. Any authenticated user may call this.
pub async fn generate_code(store: &dyn Store, caller: &str) -> ApiResult<String> {
    let code = RegistrationCode {
        id: Uuid::new_v4(),
        code: rand::thread_rng().gen_range(100_000..=999_999).to_string(),
        created_at: dates::render_user_stamp(dates::now()),
    };
    store.insert_code(&code).await?;
    info!(%caller, "registration code generated");
    Ok(code.code)
}

/// Makes sure `code` can be used for registration.
pub async fn ensure_code(store: &dyn Store, code: &str) -> anyhow::Result<()> {
    if store.find_code(code).await?.is_some() {
        return Ok(());
    }
    store
        .insert_code(&RegistrationCode {
            id: Uuid::new_v4(),
            code: code.to_string(),
            created_at: dates::render_user_stamp(dates::now()),
        })
        .await?;
    info!("seed registration code stored");
    Ok(())
}

pub async fn list_usernames(store: &dyn Store) -> ApiResult<Vec<String>> {
    Ok(store.list_usernames().await?)
}

#[cfg(test)]
mod password_tests {
    use super::*;

    fn account(password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: "asad".into(),
            password_hash: password_hash_for(password).unwrap(),
            is_admin: false,
            created_at: "1/3/24 1:00 PM".into(),
        }
    }

    #[test]
    fn stored_hash_accepts_only_the_original_password() {
        let user = account("chai-and-samosa");
        assert!(user.password_matches("chai-and-samosa").unwrap());
        assert!(!user.password_matches("chai").unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        assert_ne!(password_hash_for("same").unwrap(), password_hash_for("same").unwrap());
    }

    #[test]
    fn unreadable_stored_hash_is_an_error() {
        let mut user = account("x");
        user.password_hash = "not-a-valid-hash".into();
        assert!(user.password_matches("x").is_err());
    }
}
