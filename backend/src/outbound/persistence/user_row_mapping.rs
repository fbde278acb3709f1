//! Conversion between [`User`] aggregates and `users` rows.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::ports::UserPersistenceError;
use crate::domain::{AccountStatus, Email, ReferralCode, User, UserId};

use super::models::{UserRecord, UserRow};

fn to_json<T: Serialize>(field: &'static str, value: &T) -> Result<serde_json::Value, UserPersistenceError> {
    serde_json::to_value(value)
        .map_err(|err| UserPersistenceError::query(format!("failed to encode {field}: {err}")))
}

fn from_json<T: DeserializeOwned>(
    field: &'static str,
    value: serde_json::Value,
) -> Result<T, UserPersistenceError> {
    serde_json::from_value(value)
        .map_err(|err| UserPersistenceError::query(format!("stored {field} is malformed: {err}")))
}

/// Borrow `user` as a full database record.
pub(crate) fn user_to_record(user: &User) -> Result<UserRecord<'_>, UserPersistenceError> {
    Ok(UserRecord {
        id: *user.id.as_uuid(),
        email: user.email.as_str(),
        password_hash: &user.password_hash,
        first_name: &user.first_name,
        last_name: &user.last_name,
        display_name: user.display_name.as_deref(),
        phone: user.phone.as_deref(),
        bio: user.bio.as_deref(),
        profile_photo: user.profile_photo.as_deref(),
        cover_photo: user.cover_photo.as_deref(),
        date_of_birth: user.date_of_birth,
        gender: user.gender.as_deref(),
        status: user.status.as_str(),
        is_email_verified: user.is_email_verified,
        is_phone_verified: user.is_phone_verified,
        is_active: user.is_active,
        is_deleted: user.is_deleted,
        google_id: user.google_id.as_deref(),
        referral_code: user.referral_code.as_str(),
        assigned_agent_id: user.assigned_agent_id,
        last_login_at: user.last_login_at,
        favorite_destinations: &user.favorite_destinations,
        favorite_vendors: &user.favorite_vendors,
        address: user
            .address
            .as_ref()
            .map(|address| to_json("address", address))
            .transpose()?,
        addresses: to_json("addresses", &user.addresses)?,
        preferences: user
            .preferences
            .as_ref()
            .map(|preferences| to_json("preferences", preferences))
            .transpose()?,
        notification_preferences: to_json(
            "notification_preferences",
            &user.notification_preferences,
        )?,
        subscription: to_json("subscription", &user.subscription)?,
        stats: to_json("stats", &user.stats)?,
        engagement: to_json("engagement", &user.engagement)?,
        activity_log: to_json("activity_log", &user.activity_log)?,
        created_at: user.created_at,
        updated_at: user.updated_at,
    })
}

/// Rebuild a [`User`] from a stored row.
pub(crate) fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let email = Email::parse(&row.email)
        .map_err(|err| UserPersistenceError::query(format!("stored email is malformed: {err}")))?;
    let referral_code = ReferralCode::parse(&row.referral_code).map_err(|err| {
        UserPersistenceError::query(format!("stored referral code is malformed: {err}"))
    })?;
    let status = row.status.parse::<AccountStatus>().map_err(|err| {
        UserPersistenceError::query(format!("stored status is malformed: {err}"))
    })?;

    Ok(User {
        id: UserId::from_uuid(row.id),
        email,
        password_hash: row.password_hash,
        first_name: row.first_name,
        last_name: row.last_name,
        display_name: row.display_name,
        phone: row.phone,
        bio: row.bio,
        profile_photo: row.profile_photo,
        cover_photo: row.cover_photo,
        date_of_birth: row.date_of_birth,
        gender: row.gender,
        status,
        is_email_verified: row.is_email_verified,
        is_phone_verified: row.is_phone_verified,
        is_active: row.is_active,
        is_deleted: row.is_deleted,
        address: row
            .address
            .map(|value| from_json("address", value))
            .transpose()?,
        addresses: from_json("addresses", row.addresses)?,
        preferences: row
            .preferences
            .map(|value| from_json("preferences", value))
            .transpose()?,
        notification_preferences: from_json(
            "notification_preferences",
            row.notification_preferences,
        )?,
        subscription: from_json("subscription", row.subscription)?,
        stats: from_json("stats", row.stats)?,
        engagement: from_json("engagement", row.engagement)?,
        assigned_agent_id: row.assigned_agent_id,
        favorite_destinations: row.favorite_destinations,
        favorite_vendors: row.favorite_vendors,
        google_id: row.google_id,
        referral_code,
        last_login_at: row.last_login_at,
        activity_log: from_json("activity_log", row.activity_log)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
