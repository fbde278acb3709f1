//! User account aggregate and its identity primitives.
//!
//! The [`User`] aggregate owns every per-account document the API exposes:
//! identity and contact details, verification flags, travel preferences,
//! subscription, statistics and the bounded activity log. Services load it
//! from a [`crate::domain::ports::UserRepository`], mutate it through the
//! methods below, and write it back as a whole.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ReferralCode;
use crate::domain::user_profile::{
    ActivityEntry, Address, Engagement, NotificationPreferences, Subscription, TravelPreferences,
    UserStats,
};

/// Maximum number of activity entries retained per account.
pub const ACTIVITY_LOG_CAPACITY: usize = 100;

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 50;
const PROFILE_COMPLETION_CHECKS: usize = 9;

/// Validation errors returned by the user primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyEmail,
    InvalidEmail,
    NameTooShort { field: &'static str, min: usize },
    NameTooLong { field: &'static str, max: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "value is not a valid email address"),
            Self::NameTooShort { field, min } => {
                write!(f, "{field} must be at least {min} characters")
            }
            Self::NameTooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
///
/// # Examples
/// ```
/// use backend::domain::UserId;
///
/// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid uuid");
/// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref().trim();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

/// Lowercased email address used as the login identifier.
///
/// ## Invariants
/// - Trimmed and lowercased.
/// - Exactly one `@`, a non-empty local part and a dotted domain without
///   empty labels or whitespace.
///
/// # Examples
/// ```
/// use backend::domain::Email;
///
/// let email = Email::parse("  Ada@Example.COM ").expect("valid email");
/// assert_eq!(email.as_str(), "ada@example.com");
/// assert!(Email::parse("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Normalise and validate an email address.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        let normalised = raw.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if normalised.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        let Some((local, domain)) = normalised.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        if local.is_empty() || domain.contains('@') {
            return Err(UserValidationError::InvalidEmail);
        }
        let labels: Vec<&str> = domain.split('.').collect();
        if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }

    /// Borrow the normalised address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

/// First or last name supplied by the account holder.
///
/// Names are trimmed and must be between 2 and 50 characters.
///
/// # Examples
/// ```
/// use backend::domain::PersonName;
///
/// let name = PersonName::parse("first_name", " Ada ").expect("valid name");
/// assert_eq!(name.as_ref(), "Ada");
/// assert!(PersonName::parse("last_name", "L").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Trim and validate a name, naming `field` in any error.
    pub fn parse(field: &'static str, raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        let length = trimmed.chars().count();
        if length < NAME_MIN {
            return Err(UserValidationError::NameTooShort {
                field,
                min: NAME_MIN,
            });
        }
        if length > NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                field,
                max: NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Consume the wrapper and return the trimmed name.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Lifecycle state of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Registered but email not yet verified.
    #[default]
    Pending,
    /// Fully active account.
    Active,
    /// Temporarily blocked by an operator.
    Suspended,
    /// Permanently blocked by an operator.
    Disabled,
    /// Closed by the account holder.
    Deactivated,
}

impl AccountStatus {
    /// Stable identifier used in persistence and responses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Disabled => "disabled",
            Self::Deactivated => "deactivated",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "suspended" => Ok(Self::Suspended),
            "disabled" => Ok(Self::Disabled),
            "deactivated" => Ok(Self::Deactivated),
            other => Err(format!("unknown account status: {other}")),
        }
    }
}

/// Validated input for a password registration.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: Email,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// Identity details asserted by Google for a new account.
#[derive(Debug, Clone)]
pub struct FederatedAccount {
    pub google_id: String,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub profile_photo: Option<String>,
    /// Hash of a random password the holder never learns.
    pub password_hash: String,
}

/// User account aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub profile_photo: Option<String>,
    pub cover_photo: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub status: AccountStatus,
    pub is_email_verified: bool,
    pub is_phone_verified: bool,
    pub is_active: bool,
    pub is_deleted: bool,
    pub address: Option<Address>,
    /// Saved address book.
    pub addresses: Vec<Address>,
    pub preferences: Option<TravelPreferences>,
    pub notification_preferences: NotificationPreferences,
    pub subscription: Subscription,
    pub stats: UserStats,
    pub engagement: Engagement,
    pub assigned_agent_id: Option<Uuid>,
    pub favorite_destinations: Vec<String>,
    pub favorite_vendors: Vec<Uuid>,
    pub google_id: Option<String>,
    pub referral_code: ReferralCode,
    pub last_login_at: Option<DateTime<Utc>>,
    pub activity_log: Vec<ActivityEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    fn blank(
        email: Email,
        password_hash: String,
        referral_code: ReferralCode,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::random(),
            email,
            password_hash,
            first_name: String::new(),
            last_name: String::new(),
            display_name: None,
            phone: None,
            bio: None,
            profile_photo: None,
            cover_photo: None,
            date_of_birth: None,
            gender: None,
            status: AccountStatus::Pending,
            is_email_verified: false,
            is_phone_verified: false,
            is_active: true,
            is_deleted: false,
            address: None,
            addresses: Vec::new(),
            preferences: None,
            notification_preferences: NotificationPreferences::default(),
            subscription: Subscription::free(now),
            stats: UserStats::default(),
            engagement: Engagement::default(),
            assigned_agent_id: None,
            favorite_destinations: Vec::new(),
            favorite_vendors: Vec::new(),
            google_id: None,
            referral_code,
            last_login_at: None,
            activity_log: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a pending account from a password registration.
    ///
    /// The account starts active but unverified, on the free plan, with
    /// default preferences, notification flags and statistics.
    #[must_use]
    pub fn register(account: NewAccount, referral_code: ReferralCode, now: DateTime<Utc>) -> Self {
        let NewAccount {
            email,
            password_hash,
            first_name,
            last_name,
            phone,
        } = account;
        let mut user = Self::blank(email, password_hash, referral_code, now);
        user.first_name = first_name;
        user.last_name = last_name;
        user.phone = phone;
        user.preferences = Some(TravelPreferences::default());
        user
    }

    /// Create an active, email-verified account from a Google identity.
    #[must_use]
    pub fn from_google(
        account: FederatedAccount,
        referral_code: ReferralCode,
        now: DateTime<Utc>,
    ) -> Self {
        let FederatedAccount {
            google_id,
            email,
            first_name,
            last_name,
            profile_photo,
            password_hash,
        } = account;
        let mut user = Self::blank(email, password_hash, referral_code, now);
        user.first_name = first_name;
        user.last_name = last_name;
        user.google_id = Some(google_id);
        user.profile_photo = profile_photo;
        user.status = AccountStatus::Active;
        user.is_email_verified = true;
        user
    }

    /// First and last name joined by a single space.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }

    /// Percentage (0–100) of profile completeness checks that pass.
    ///
    /// The checks are: first name, last name, phone, profile photo, bio, date
    /// of birth, verified email, an address (profile or saved) and saved
    /// preferences.
    #[must_use]
    pub fn profile_completion(&self) -> u8 {
        let checks = [
            !self.first_name.is_empty(),
            !self.last_name.is_empty(),
            is_present(self.phone.as_deref()),
            is_present(self.profile_photo.as_deref()),
            is_present(self.bio.as_deref()),
            self.date_of_birth.is_some(),
            self.is_email_verified,
            self.address.is_some() || !self.addresses.is_empty(),
            self.preferences.is_some(),
        ];
        let passed = checks.iter().filter(|check| **check).count();
        let percentage = passed * 100 / PROFILE_COMPLETION_CHECKS;
        u8::try_from(percentage).unwrap_or(100)
    }

    /// Number of saved destinations and vendors.
    #[must_use]
    pub fn favorites_count(&self) -> usize {
        self.favorite_destinations.len() + self.favorite_vendors.len()
    }

    /// Save an address; a primary one demotes every earlier entry.
    pub fn add_address(&mut self, address: Address) {
        if address.is_primary {
            for saved in &mut self.addresses {
                saved.is_primary = false;
            }
        }
        self.addresses.push(address);
    }

    /// Append an activity entry, keeping only the most recent
    /// [`ACTIVITY_LOG_CAPACITY`] entries.
    pub fn record_activity(&mut self, entry: ActivityEntry) {
        self.activity_log.push(entry);
        if self.activity_log.len() > ACTIVITY_LOG_CAPACITY {
            let overflow = self.activity_log.len() - ACTIVITY_LOG_CAPACITY;
            self.activity_log.drain(..overflow);
        }
    }

    /// Register a successful sign-in.
    pub fn record_login(&mut self, now: DateTime<Utc>) {
        self.last_login_at = Some(now);
        self.engagement.login_count = self.engagement.login_count.saturating_add(1);
        self.updated_at = now;
    }

    /// Close the account without removing its data.
    pub fn soft_delete(&mut self, now: DateTime<Utc>) {
        self.is_deleted = true;
        self.is_active = false;
        self.status = AccountStatus::Deactivated;
        self.updated_at = now;
    }

    /// Whether the account may obtain new tokens.
    #[must_use]
    pub const fn can_refresh(&self) -> bool {
        self.is_active && !self.is_deleted
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|inner| !inner.trim().is_empty())
}

#[cfg(test)]
pub(crate) mod fixtures;
