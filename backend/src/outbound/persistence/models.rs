//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{revoked_tokens, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
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
    pub status: String,
    pub is_email_verified: bool,
    pub is_phone_verified: bool,
    pub is_active: bool,
    pub is_deleted: bool,
    pub google_id: Option<String>,
    pub referral_code: String,
    pub assigned_agent_id: Option<Uuid>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub favorite_destinations: Vec<String>,
    pub favorite_vendors: Vec<Uuid>,
    pub address: Option<serde_json::Value>,
    pub addresses: serde_json::Value,
    pub preferences: Option<serde_json::Value>,
    pub notification_preferences: serde_json::Value,
    pub subscription: serde_json::Value,
    pub stats: serde_json::Value,
    pub engagement: serde_json::Value,
    pub activity_log: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full user record used for inserts and whole-aggregate updates.
///
/// `treat_none_as_null` makes updates clear optional columns instead of
/// skipping them.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserRecord<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub display_name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub profile_photo: Option<&'a str>,
    pub cover_photo: Option<&'a str>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<&'a str>,
    pub status: &'a str,
    pub is_email_verified: bool,
    pub is_phone_verified: bool,
    pub is_active: bool,
    pub is_deleted: bool,
    pub google_id: Option<&'a str>,
    pub referral_code: &'a str,
    pub assigned_agent_id: Option<Uuid>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub favorite_destinations: &'a [String],
    pub favorite_vendors: &'a [Uuid],
    pub address: Option<serde_json::Value>,
    pub addresses: serde_json::Value,
    pub preferences: Option<serde_json::Value>,
    pub notification_preferences: serde_json::Value,
    pub subscription: serde_json::Value,
    pub stats: serde_json::Value,
    pub engagement: serde_json::Value,
    pub activity_log: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for revoking a token.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = revoked_tokens)]
pub(crate) struct NewRevokedTokenRow {
    pub jti: Uuid,
    pub expires_at: DateTime<Utc>,
}
