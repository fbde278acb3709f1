//! Nested documents carried by the [`crate::domain::User`] aggregate.
//!
//! Each document serialises with serde so persistence adapters can store it
//! as a JSON column without a bespoke mapping.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Postal address of an account holder.
///
/// Used both for the profile address and for the saved address book, where
/// at most one entry is primary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub label: String,
    pub street: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default = "primary_by_default")]
    pub is_primary: bool,
}

const fn primary_by_default() -> bool {
    true
}

/// Validation errors for [`Address`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressValidationError {
    #[error("Address city is required")]
    MissingCity,
    #[error("Address state is required")]
    MissingState,
}

/// Unvalidated address fields as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressDraft {
    pub label: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_primary: Option<bool>,
}

impl Address {
    /// Label applied when the client omits one.
    pub const DEFAULT_LABEL: &'static str = "Home";
    /// Country applied when the client omits one.
    pub const DEFAULT_COUNTRY: &'static str = "Nigeria";

    /// Validate a draft, filling in the default label and country. Addresses
    /// are primary unless the draft says otherwise.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{Address, AddressDraft};
    ///
    /// let address = Address::try_from_draft(AddressDraft {
    ///     city: Some("Lagos".into()),
    ///     state: Some("Lagos".into()),
    ///     ..AddressDraft::default()
    /// })
    /// .expect("city and state supplied");
    /// assert_eq!(address.country, "Nigeria");
    /// assert_eq!(address.label, "Home");
    /// ```
    pub fn try_from_draft(draft: AddressDraft) -> Result<Self, AddressValidationError> {
        let city = non_blank(draft.city).ok_or(AddressValidationError::MissingCity)?;
        let state = non_blank(draft.state).ok_or(AddressValidationError::MissingState)?;
        Ok(Self {
            label: non_blank(draft.label).unwrap_or_else(|| Self::DEFAULT_LABEL.to_owned()),
            street: non_blank(draft.street),
            city,
            state,
            country: non_blank(draft.country).unwrap_or_else(|| Self::DEFAULT_COUNTRY.to_owned()),
            postal_code: non_blank(draft.postal_code),
            latitude: draft.latitude,
            longitude: draft.longitude,
            is_primary: draft.is_primary.unwrap_or(true),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|inner| inner.trim().to_owned())
        .filter(|inner| !inner.is_empty())
}

/// Travel preferences used to tailor recommendations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelPreferences {
    pub interests: Vec<String>,
    pub travel_style: Option<String>,
    pub dietary_restrictions: Vec<String>,
    pub languages: Vec<String>,
    pub currency: String,
}

impl Default for TravelPreferences {
    fn default() -> Self {
        Self {
            interests: Vec::new(),
            travel_style: None,
            dietary_restrictions: Vec::new(),
            languages: vec!["English".to_owned()],
            currency: "NGN".to_owned(),
        }
    }
}

/// Partial update of [`TravelPreferences`]; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TravelPreferencesUpdate {
    pub interests: Option<Vec<String>>,
    pub travel_style: Option<String>,
    pub dietary_restrictions: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    pub currency: Option<String>,
}

impl TravelPreferences {
    /// Apply the supplied fields of `update`.
    pub fn apply(&mut self, update: TravelPreferencesUpdate) {
        if let Some(interests) = update.interests {
            self.interests = interests;
        }
        if let Some(style) = update.travel_style {
            self.travel_style = Some(style);
        }
        if let Some(restrictions) = update.dietary_restrictions {
            self.dietary_restrictions = restrictions;
        }
        if let Some(languages) = update.languages {
            self.languages = languages;
        }
        if let Some(currency) = update.currency {
            self.currency = currency;
        }
    }
}

/// Error raised when a notification update names an unknown flag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown notification preference: {key}")]
pub struct UnknownNotificationFlag {
    pub key: String,
}

/// Per-channel notification switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPreferences {
    pub email_bookings: bool,
    pub email_promotions: bool,
    pub email_newsletter: bool,
    pub email_experience_updates: bool,
    pub email_agent_messages: bool,
    pub push_bookings: bool,
    pub push_messages: bool,
    pub push_promotions: bool,
    pub push_experience_updates: bool,
    pub sms_bookings: bool,
    pub sms_verification: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email_bookings: true,
            email_promotions: false,
            email_newsletter: false,
            email_experience_updates: true,
            email_agent_messages: true,
            push_bookings: true,
            push_messages: true,
            push_promotions: false,
            push_experience_updates: true,
            sms_bookings: false,
            sms_verification: true,
        }
    }
}

impl NotificationPreferences {
    fn flag_mut(&mut self, key: &str) -> Option<&mut bool> {
        let flag = match key {
            "email_bookings" => &mut self.email_bookings,
            "email_promotions" => &mut self.email_promotions,
            "email_newsletter" => &mut self.email_newsletter,
            "email_experience_updates" => &mut self.email_experience_updates,
            "email_agent_messages" => &mut self.email_agent_messages,
            "push_bookings" => &mut self.push_bookings,
            "push_messages" => &mut self.push_messages,
            "push_promotions" => &mut self.push_promotions,
            "push_experience_updates" => &mut self.push_experience_updates,
            "sms_bookings" => &mut self.sms_bookings,
            "sms_verification" => &mut self.sms_verification,
            _ => return None,
        };
        Some(flag)
    }

    /// Merge the supplied flags.
    ///
    /// The update is all-or-nothing: an unknown key leaves `self` untouched.
    ///
    /// # Examples
    /// ```
    /// use std::collections::BTreeMap;
    /// use backend::domain::NotificationPreferences;
    ///
    /// let mut prefs = NotificationPreferences::default();
    /// let update = BTreeMap::from([("email_newsletter".to_owned(), true)]);
    /// prefs.apply(&update).expect("known flag");
    /// assert!(prefs.email_newsletter);
    /// ```
    pub fn apply(&mut self, update: &BTreeMap<String, bool>) -> Result<(), UnknownNotificationFlag> {
        let mut merged = *self;
        for (key, value) in update {
            let flag = merged
                .flag_mut(key)
                .ok_or_else(|| UnknownNotificationFlag { key: key.clone() })?;
            *flag = *value;
        }
        *self = merged;
        Ok(())
    }
}

/// Subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionPlan {
    #[default]
    Free,
    Basic,
    Premium,
    Enterprise,
    Vip,
}

impl SubscriptionPlan {
    /// Stable identifier used in responses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Basic => "basic",
            Self::Premium => "premium",
            Self::Enterprise => "enterprise",
            Self::Vip => "vip",
        }
    }
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current subscription of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub plan: SubscriptionPlan,
    pub started_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub auto_renew: bool,
    pub features: Vec<String>,
}

impl Subscription {
    /// Free plan starting at `now`, without expiry.
    #[must_use]
    pub fn free(now: DateTime<Utc>) -> Self {
        Self {
            plan: SubscriptionPlan::Free,
            started_at: now,
            expires_at: None,
            is_active: true,
            auto_renew: false,
            features: Vec::new(),
        }
    }
}

/// Aggregated travel statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStats {
    pub total_experiences: u32,
    pub completed_experiences: u32,
    pub upcoming_experiences: u32,
    pub cancelled_experiences: u32,
    pub total_bookings: u32,
    pub total_spent: f64,
    pub total_reviews: u32,
    pub average_rating_given: f64,
    pub total_saved: f64,
    pub countries_visited: u32,
    pub cities_visited: u32,
}

/// Social and referral counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Engagement {
    pub followers_count: u32,
    pub following_count: u32,
    pub experiences_count: u32,
    pub reviews_count: u32,
    pub referral_count: u32,
    pub referral_credits: u32,
    pub login_count: u32,
}

/// Kind of account activity recorded in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Register,
    Login,
    GoogleLogin,
    Logout,
    ProfileUpdate,
    PasswordChange,
    AccountDeleted,
}

impl ActivityKind {
    /// Stable action identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Login => "login",
            Self::GoogleLogin => "google_login",
            Self::Logout => "logout",
            Self::ProfileUpdate => "profile_update",
            Self::PasswordChange => "password_change",
            Self::AccountDeleted => "account_deleted",
        }
    }
}

/// Single entry of the per-account activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub action: ActivityKind,
    pub description: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ActivityEntry {
    /// Build an entry for `action` with a human-readable description.
    pub fn new(
        action: ActivityKind,
        description: impl Into<String>,
        client: &ClientContext,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            action,
            description: description.into(),
            ip_address: client.ip_address.clone(),
            user_agent: client.user_agent.clone(),
            created_at,
        }
    }
}

/// Request metadata recorded alongside account activity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Partial update of the profile fields a user may edit.
///
/// Outer `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub address: Option<AddressDraft>,
}
