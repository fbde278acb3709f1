//! Plain-text password handling and the account password policy.

use std::fmt;

use zeroize::Zeroizing;

/// Minimum number of characters a password must contain.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// First policy rule a candidate password failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least 8 characters")]
    TooShort,
    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,
    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,
    #[error("Password must contain at least one digit")]
    MissingDigit,
}

/// Password strength rules applied to new passwords.
pub struct PasswordPolicy;

impl PasswordPolicy {
    /// Check `raw` against the policy, reporting the first failed rule.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{PasswordPolicy, PasswordPolicyError};
    ///
    /// assert!(PasswordPolicy::check("Str0ngPass").is_ok());
    /// assert_eq!(
    ///     PasswordPolicy::check("NoDigitsHere"),
    ///     Err(PasswordPolicyError::MissingDigit)
    /// );
    /// ```
    pub fn check(raw: &str) -> Result<(), PasswordPolicyError> {
        if raw.chars().count() < PASSWORD_MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort);
        }
        if !raw.chars().any(char::is_uppercase) {
            return Err(PasswordPolicyError::MissingUppercase);
        }
        if !raw.chars().any(char::is_lowercase) {
            return Err(PasswordPolicyError::MissingLowercase);
        }
        if !raw.chars().any(|c| c.is_ascii_digit()) {
            return Err(PasswordPolicyError::MissingDigit);
        }
        Ok(())
    }
}

/// Caller-supplied password held in memory that is wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct PlainPassword(Zeroizing<String>);

impl PlainPassword {
    /// Wrap a password without applying the policy.
    ///
    /// Used for login and current-password checks where legacy passwords
    /// must still be accepted.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Wrap a new password after checking it against [`PasswordPolicy`].
    pub fn new_checked(raw: impl Into<String>) -> Result<Self, PasswordPolicyError> {
        let raw = raw.into();
        PasswordPolicy::check(&raw)?;
        Ok(Self::new(raw))
    }

    /// Borrow the password text.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Whether the password is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainPassword(<redacted>)")
    }
}
