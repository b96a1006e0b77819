//! Opaque bearer tokens, persisted in Postgres. At most one active token
//! per user; login hands back the existing one instead of rotating it.

use rand::RngCore;
use sqlx::PgPool;
use uuid::Uuid;

const TOKEN_BYTES: usize = 20;

/// 40 lowercase hex characters from 20 bytes of OS entropy.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Returns the user's active token, inserting a fresh one if none exists.
///
/// The conflict arm rewrites the row with its own token, so two concurrent
/// logins for the same user resolve to a single token.
pub async fn issue_or_reuse(db: &PgPool, user_id: Uuid) -> Result<String, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        INSERT INTO auth_tokens (token, user_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO UPDATE SET token = auth_tokens.token
        RETURNING token
        "#,
    )
    .bind(generate_token())
    .bind(user_id)
    .fetch_one(db)
    .await
}

/// Deletes the token row. Revoking an already-absent token is a no-op.
pub async fn revoke(db: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM auth_tokens WHERE token = $1")
        .bind(token)
        .execute(db)
        .await?;
    Ok(())
}

/// Resolves a presented token to its owning user.
pub async fn resolve(db: &PgPool, token: &str) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM auth_tokens WHERE token = $1")
        .bind(token)
        .fetch_optional(db)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_40_hex_chars() {
        let token = generate_token();
        assert_eq!(token.len(), 40);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(token, token.to_lowercase());
    }

    #[test]
    fn tokens_do_not_repeat() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
    }
}
