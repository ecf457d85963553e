//! License service - core licensing business logic.
//!
//! This service handles:
//! - The eligibility check (purchase set ⊇ required-product set)
//! - Pseudo-random key generation with a configurable prefix
//! - Idempotent, first-write-wins issuance (one key per user, never replaced)
//! - Key verification for the public endpoint
//! - Settings and purchase persistence
//!
//! # Issuance Guarantee
//!
//! Issuance inserts with `ON CONFLICT(user_id) DO NOTHING` and re-selects,
//! so concurrent issuance attempts for one user converge on a single key.

use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use crate::{
    config::Config,
    db::DbPool,
    error::AppError,
    models::{
        license::License,
        purchase::Purchase,
        settings::{Settings, format_product_ids, parse_product_ids},
    },
};

/// Alphabet for generated license keys.
///
/// Uppercase alphanumerics without the easily-confused 0/O and 1/I, since
/// users retype these keys into a chat client.
const KEY_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Number of random character groups in a generated key.
const KEY_GROUPS: usize = 4;

/// Characters per group.
const KEY_GROUP_LEN: usize = 4;

/// Outcome of the eligibility check for one user.
#[derive(Debug, Clone)]
pub struct EligibilityCheck {
    /// Whether the user currently qualifies for a license
    pub eligible: bool,

    /// Required product IDs the user has not purchased
    pub missing_product_ids: Vec<i64>,
}

/// Generate a license key: `<PREFIX>-XXXX-XXXX-XXXX-XXXX`.
pub fn generate_key(prefix: &str) -> String {
    let mut rng = rand::rng();
    let mut key = String::with_capacity(prefix.len() + KEY_GROUPS * (KEY_GROUP_LEN + 1));
    key.push_str(prefix);
    for _ in 0..KEY_GROUPS {
        key.push('-');
        for _ in 0..KEY_GROUP_LEN {
            let idx = rng.random_range(0..KEY_ALPHABET.len());
            key.push(KEY_ALPHABET[idx] as char);
        }
    }
    key
}

/// Required product IDs absent from the owned set.
///
/// Set-containment: ordering and duplicates in either input are irrelevant.
pub fn missing_products(required: &[i64], owned: &[i64]) -> Vec<i64> {
    required
        .iter()
        .filter(|id| !owned.contains(id))
        .copied()
        .collect()
}

/// Fetch the settings row.
pub async fn get_settings(pool: &DbPool) -> Result<Settings, AppError> {
    let settings = sqlx::query_as::<_, Settings>(
        "SELECT id, required_product_ids, key_prefix, updated_at FROM settings WHERE id = 1",
    )
    .fetch_one(pool)
    .await?;

    Ok(settings)
}

/// Update stored settings. `None` fields keep their current value.
///
/// # Errors
///
/// - `InvalidRequest`: a product ID is not positive, or the prefix is not
///   1-16 ASCII alphanumeric characters
pub async fn update_settings(
    pool: &DbPool,
    required_product_ids: Option<Vec<i64>>,
    key_prefix: Option<String>,
) -> Result<Settings, AppError> {
    let current = get_settings(pool).await?;

    let required = match required_product_ids {
        Some(ids) => {
            if ids.iter().any(|id| *id <= 0) {
                return Err(AppError::InvalidRequest(
                    "Product IDs must be positive".to_string(),
                ));
            }
            // Drop duplicates, first occurrence wins
            let mut deduped = Vec::with_capacity(ids.len());
            for id in ids {
                if !deduped.contains(&id) {
                    deduped.push(id);
                }
            }
            format_product_ids(&deduped)
        }
        None => current.required_product_ids,
    };

    let prefix = match key_prefix {
        Some(prefix) => {
            let prefix = prefix.trim().to_string();
            if prefix.is_empty()
                || prefix.len() > 16
                || !prefix.chars().all(|c| c.is_ascii_alphanumeric())
            {
                return Err(AppError::InvalidRequest(
                    "Key prefix must be 1-16 ASCII alphanumeric characters".to_string(),
                ));
            }
            prefix
        }
        None => current.key_prefix,
    };

    let settings = sqlx::query_as::<_, Settings>(
        r#"
        UPDATE settings
        SET required_product_ids = ?,
            key_prefix = ?,
            updated_at = ?
        WHERE id = 1
        RETURNING id, required_product_ids, key_prefix, updated_at
        "#,
    )
    .bind(required)
    .bind(prefix)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(settings)
}

/// Apply environment-provided setting overrides at startup.
///
/// Deployments that pin `REQUIRED_PRODUCT_IDS` or `LICENSE_KEY_PREFIX` in
/// the environment win over whatever an admin last stored.
pub async fn apply_startup_overrides(pool: &DbPool, config: &Config) -> Result<(), AppError> {
    let required = match &config.required_product_ids {
        Some(raw) => Some(parse_product_ids(raw).map_err(|e| {
            AppError::InvalidRequest(format!("REQUIRED_PRODUCT_IDS is not a product ID list: {e}"))
        })?),
        None => None,
    };
    let prefix = config.license_key_prefix.clone();

    if required.is_none() && prefix.is_none() {
        return Ok(());
    }

    let settings = update_settings(pool, required, prefix).await?;
    tracing::info!(
        required_product_ids = %settings.required_product_ids,
        key_prefix = %settings.key_prefix,
        "Applied settings overrides from environment"
    );

    Ok(())
}

/// Record the products of a completed order for a user.
///
/// Re-recording an already-owned product is a no-op.
pub async fn record_purchases(
    pool: &DbPool,
    user_id: i64,
    product_ids: &[i64],
) -> Result<(), AppError> {
    let now = Utc::now();
    for product_id in product_ids {
        sqlx::query(
            r#"
            INSERT INTO purchases (user_id, product_id, purchased_at)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id, product_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .bind(now)
        .execute(pool)
        .await?;
    }

    Ok(())
}

/// All recorded purchases for a user, oldest first.
pub async fn purchases_for_user(pool: &DbPool, user_id: i64) -> Result<Vec<Purchase>, AppError> {
    let purchases = sqlx::query_as::<_, Purchase>(
        r#"
        SELECT user_id, product_id, purchased_at
        FROM purchases
        WHERE user_id = ?
        ORDER BY purchased_at ASC, product_id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(purchases)
}

/// Check whether a user's purchase history covers the required-product set.
///
/// A user with no recorded purchases is never eligible, even when no
/// required products are configured: issuance only follows a purchase.
pub async fn check_eligibility(pool: &DbPool, user_id: i64) -> Result<EligibilityCheck, AppError> {
    let settings = get_settings(pool).await?;
    let required = settings.required_products();
    let owned: Vec<i64> = purchases_for_user(pool, user_id)
        .await?
        .into_iter()
        .map(|p| p.product_id)
        .collect();

    let missing = missing_products(&required, &owned);
    let eligible = missing.is_empty() && !owned.is_empty();

    Ok(EligibilityCheck {
        eligible,
        missing_product_ids: missing,
    })
}

/// Find a user's license, if one has been issued.
pub async fn find_license_by_user(
    pool: &DbPool,
    user_id: i64,
) -> Result<Option<License>, AppError> {
    let license = sqlx::query_as::<_, License>(
        "SELECT id, user_id, license_key, issued_at FROM licenses WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(license)
}

/// Issue a license to an eligible user.
///
/// Idempotent: an already-licensed user gets their existing license back,
/// unchanged. Otherwise the eligibility check runs and, when it passes, a
/// key is generated with the configured prefix and stored first-write-wins.
///
/// # Errors
///
/// - `NotEligible`: required products are missing, or the user has no
///   recorded purchases
pub async fn issue_license(pool: &DbPool, user_id: i64) -> Result<License, AppError> {
    // First-write-wins: an existing key is never replaced
    if let Some(existing) = find_license_by_user(pool, user_id).await? {
        return Ok(existing);
    }

    let check = check_eligibility(pool, user_id).await?;
    if !check.eligible {
        if check.missing_product_ids.is_empty() {
            return Err(AppError::NotEligible("no recorded purchases".to_string()));
        }
        return Err(AppError::NotEligible(format!(
            "missing required products: {}",
            format_product_ids(&check.missing_product_ids)
        )));
    }

    let settings = get_settings(pool).await?;
    let key = generate_key(&settings.key_prefix);

    // A concurrent issuance for the same user may land first; DO NOTHING
    // plus re-select makes both callers observe the same stored key.
    sqlx::query(
        r#"
        INSERT INTO licenses (id, user_id, license_key, issued_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(user_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&key)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    let license = find_license_by_user(pool, user_id)
        .await?
        .ok_or(AppError::LicenseNotFound)?;

    tracing::info!(user_id, license_key = %license.license_key, "License issued");

    Ok(license)
}

/// Manually store a license for a user (admin surface).
///
/// Unlike [`issue_license`] this skips the eligibility check, but the
/// one-license-per-user and unique-key invariants still hold.
///
/// # Errors
///
/// - `DuplicateLicense`: the user already holds a license, or the key is
///   already in use
pub async fn add_license(pool: &DbPool, user_id: i64, key: &str) -> Result<License, AppError> {
    if find_license_by_user(pool, user_id).await?.is_some() {
        return Err(AppError::DuplicateLicense(format!(
            "user {user_id} already has a license"
        )));
    }

    let result = sqlx::query_as::<_, License>(
        r#"
        INSERT INTO licenses (id, user_id, license_key, issued_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, user_id, license_key, issued_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(key)
    .bind(Utc::now())
    .fetch_one(pool)
    .await;

    match result {
        Ok(license) => Ok(license),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(
            AppError::DuplicateLicense("license key already exists".to_string()),
        ),
        Err(e) => Err(e.into()),
    }
}

/// Delete a license by key (admin revocation).
pub async fn delete_license(pool: &DbPool, key: &str) -> Result<(), AppError> {
    let deleted = sqlx::query("DELETE FROM licenses WHERE license_key = ?")
        .bind(key)
        .execute(pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::LicenseNotFound);
    }

    tracing::info!(license_key = %key, "License deleted");

    Ok(())
}

/// All issued licenses, newest first.
pub async fn list_licenses(pool: &DbPool) -> Result<Vec<License>, AppError> {
    let licenses = sqlx::query_as::<_, License>(
        "SELECT id, user_id, license_key, issued_at FROM licenses ORDER BY issued_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(licenses)
}

/// Whether a submitted key matches any stored license.
pub async fn verify_key(pool: &DbPool, key: &str) -> Result<bool, AppError> {
    let found = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM licenses WHERE license_key = ?")
        .bind(key)
        .fetch_one(pool)
        .await?;

    Ok(found > 0)
}

#[cfg(test)]
mod tests {
    use super::{KEY_ALPHABET, generate_key, missing_products};

    #[test]
    fn generated_key_has_prefix_and_format() {
        let key = generate_key("BOT");
        assert!(key.starts_with("BOT-"));

        let groups: Vec<&str> = key["BOT-".len()..].split('-').collect();
        assert_eq!(groups.len(), 4);
        for group in groups {
            assert_eq!(group.len(), 4);
            assert!(group.bytes().all(|b| KEY_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn generated_keys_avoid_ambiguous_characters() {
        for _ in 0..100 {
            let key = generate_key("LIC");
            let random_part = &key["LIC-".len()..];
            assert!(!random_part.contains(['0', 'O', '1', 'I']));
        }
    }

    #[test]
    fn missing_products_is_set_containment() {
        assert_eq!(missing_products(&[10, 20], &[20, 10, 30]), Vec::<i64>::new());
        assert_eq!(missing_products(&[10, 20], &[10]), vec![20]);
        assert_eq!(missing_products(&[], &[]), Vec::<i64>::new());
        assert_eq!(missing_products(&[5], &[]), vec![5]);
    }
}
