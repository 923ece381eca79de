//! Password policy enforcement for new account passwords.
//!
//! Share passwords are not subject to this policy; they gate a single file
//! and are chosen by the share owner.

use nimbus_core::config::auth::AuthConfig;
use nimbus_core::error::AppError;

/// Validates password strength against configured policies.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Validates a password against all configured policies.
    ///
    /// Returns `Ok(())` if the password meets all requirements,
    /// or an error describing the first violation found.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.len() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        let estimate = zxcvbn::zxcvbn(password, &[]);
        if estimate.score() < zxcvbn::Score::Three {
            return Err(AppError::validation(
                "Password is too weak. Please use a stronger password with more entropy.",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> PasswordValidator {
        PasswordValidator { min_length: 8 }
    }

    #[test]
    fn test_rejects_short_passwords() {
        assert!(validator().validate("abc").is_err());
    }

    #[test]
    fn test_rejects_weak_passwords() {
        assert!(validator().validate("password").is_err());
    }

    #[test]
    fn test_accepts_strong_passwords() {
        assert!(validator().validate("korrekt-horse-battery-staple9").is_ok());
    }
}
