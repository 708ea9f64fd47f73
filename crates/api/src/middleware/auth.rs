//! # Authentication Module
//!
//! Password hashing and verification for staff accounts, using Argon2 with
//! a random salt per password and the PHC string format for storage.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use eyre::Result;
use turnero_core::{
    errors::{TurnoError, TurnoResult},
    models::staff::StaffUser,
    store::DirectoryStore,
};

/// Hashes a password using the Argon2 algorithm
///
/// # Example
///
/// ```
/// use turnero_api::middleware::auth::{hash_password, verify_password};
///
/// let hashed = hash_password("tijeras").unwrap();
/// assert!(verify_password("tijeras", &hashed).unwrap());
/// ```
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Checks `password` against a stored PHC hash. A malformed hash is an error,
/// a wrong password is `Ok(false)`.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| eyre::eyre!("Stored password hash is malformed: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Looks up a staff member and verifies their password. Unknown usernames and
/// wrong passwords fail with the same message.
pub async fn authenticate(
    directory: &dyn DirectoryStore,
    username: &str,
    password: &str,
) -> TurnoResult<StaffUser> {
    let invalid = || TurnoError::Authentication("Invalid username or password".to_string());

    let user = directory
        .find_staff_by_username(username)
        .await?
        .ok_or_else(invalid)?;

    if verify_password(password, &user.password_hash)? {
        Ok(user)
    } else {
        Err(invalid())
    }
}
