//! Shared user builders for unit tests.

use chrono::{DateTime, TimeZone, Utc};

use super::{NewAccount, User};
use crate::domain::{Email, ReferralCode};

pub(crate) const SAMPLE_EMAIL: &str = "ada@example.com";
pub(crate) const SAMPLE_REFERRAL: &str = "QU1A2B3C4D";

/// Fixed instant used by tests that do not care about time.
pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid fixed timestamp")
}

/// Freshly registered account with the given password hash.
pub(crate) fn sample_user_with_hash(password_hash: &str) -> User {
    User::register(
        NewAccount {
            email: Email::parse(SAMPLE_EMAIL).expect("valid email"),
            password_hash: password_hash.to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            phone: None,
        },
        ReferralCode::parse(SAMPLE_REFERRAL).expect("valid referral code"),
        fixed_now(),
    )
}

/// Freshly registered account with a placeholder hash.
pub(crate) fn sample_user() -> User {
    sample_user_with_hash("hashed:Analytical1")
}
