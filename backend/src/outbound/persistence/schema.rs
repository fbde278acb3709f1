//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// User accounts.
    ///
    /// Scalar profile fields live in columns; nested documents (addresses,
    /// preferences, notification flags, subscription, statistics, counters
    /// and the activity log) are stored as JSONB.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Lowercased email, unique.
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        display_name -> Nullable<Varchar>,
        phone -> Nullable<Varchar>,
        bio -> Nullable<Text>,
        profile_photo -> Nullable<Text>,
        cover_photo -> Nullable<Text>,
        date_of_birth -> Nullable<Date>,
        gender -> Nullable<Varchar>,
        /// One of pending, active, suspended, disabled, deactivated.
        status -> Varchar,
        is_email_verified -> Bool,
        is_phone_verified -> Bool,
        is_active -> Bool,
        is_deleted -> Bool,
        /// Google subject identifier, unique when present.
        google_id -> Nullable<Varchar>,
        /// Unique referral code.
        referral_code -> Varchar,
        assigned_agent_id -> Nullable<Uuid>,
        last_login_at -> Nullable<Timestamptz>,
        favorite_destinations -> Array<Text>,
        favorite_vendors -> Array<Uuid>,
        address -> Nullable<Jsonb>,
        /// Saved address book.
        addresses -> Jsonb,
        preferences -> Nullable<Jsonb>,
        notification_preferences -> Jsonb,
        subscription -> Jsonb,
        stats -> Jsonb,
        engagement -> Jsonb,
        /// Most recent activity entries, oldest first.
        activity_log -> Jsonb,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Refresh token identifiers revoked at logout.
    revoked_tokens (jti) {
        /// Token identifier (`jti` claim).
        jti -> Uuid,
        /// Expiry of the revoked token; rows may be purged afterwards.
        expires_at -> Timestamptz,
        created_at -> Timestamptz,
    }
}
