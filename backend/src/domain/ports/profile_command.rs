//! Driving port for changes the current user makes to their own account.
//!
//! Handlers resolve the account through the bearer extractor first and hand
//! the loaded [`User`] over, so every method returns the updated aggregate.

use std::collections::BTreeMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    AddressDraft, ClientContext, Error, PlainPassword, ProfileUpdate, TravelPreferencesUpdate,
    User,
};

/// Domain use-case port for profile and settings updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCommand: Send + Sync {
    /// Apply a partial profile update.
    async fn update_profile(
        &self,
        user: User,
        update: ProfileUpdate,
        client: ClientContext,
    ) -> Result<User, Error>;

    /// Replace the profile photo URL.
    async fn set_profile_photo(&self, user: User, url: String) -> Result<User, Error>;

    /// Replace the cover photo URL.
    async fn set_cover_photo(&self, user: User, url: String) -> Result<User, Error>;

    /// Apply a partial travel preferences update.
    async fn update_preferences(
        &self,
        user: User,
        update: TravelPreferencesUpdate,
    ) -> Result<User, Error>;

    /// Merge notification flags; unknown keys are rejected.
    async fn update_notification_preferences(
        &self,
        user: User,
        flags: BTreeMap<String, bool>,
    ) -> Result<User, Error>;

    /// Verify the current password and store a new one.
    async fn change_password(
        &self,
        user: User,
        current: PlainPassword,
        new: PlainPassword,
        client: ClientContext,
    ) -> Result<User, Error>;

    /// Soft-delete the account.
    async fn delete_account(
        &self,
        user: User,
        reason: Option<String>,
        client: ClientContext,
    ) -> Result<User, Error>;

    /// Save a destination; saving twice is a no-op.
    async fn add_favorite_destination(&self, user: User, destination: String)
    -> Result<User, Error>;

    /// Forget a saved destination.
    async fn remove_favorite_destination(
        &self,
        user: User,
        destination: String,
    ) -> Result<User, Error>;

    /// Validate and save an address to the address book.
    async fn add_address(&self, user: User, draft: AddressDraft) -> Result<User, Error>;

    /// Save a vendor; saving twice is a no-op.
    async fn add_favorite_vendor(&self, user: User, vendor_id: Uuid) -> Result<User, Error>;

    /// Forget a saved vendor.
    async fn remove_favorite_vendor(&self, user: User, vendor_id: Uuid) -> Result<User, Error>;
}
