//! Referral codes handed out to every account.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

const PREFIX: &str = "QU";
const SUFFIX_LEN: usize = 8;

/// Error returned when a stored referral code is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("referral code must be QU followed by 8 uppercase hex characters")]
pub struct ReferralCodeError;

/// Referral code of the form `QU` followed by 8 uppercase hex characters.
///
/// # Examples
/// ```
/// use backend::domain::ReferralCode;
///
/// let code = ReferralCode::generate(&mut rand::thread_rng());
/// assert!(code.as_str().starts_with("QU"));
/// assert_eq!(code.as_str().len(), 10);
/// assert!(ReferralCode::parse("QU1A2B3C4D").is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReferralCode(String);

impl ReferralCode {
    /// Draw a fresh code from `rng`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let suffix: u32 = rng.r#gen();
        Self(format!("{PREFIX}{suffix:08X}"))
    }

    /// Validate a previously issued code.
    pub fn parse(raw: &str) -> Result<Self, ReferralCodeError> {
        let suffix = raw.strip_prefix(PREFIX).ok_or(ReferralCodeError)?;
        let well_formed = suffix.len() == SUFFIX_LEN
            && suffix
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c));
        if well_formed {
            Ok(Self(raw.to_owned()))
        } else {
            Err(ReferralCodeError)
        }
    }

    /// Borrow the code text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ReferralCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ReferralCode {
    type Error = ReferralCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ReferralCode> for String {
    fn from(value: ReferralCode) -> Self {
        value.0
    }
}
