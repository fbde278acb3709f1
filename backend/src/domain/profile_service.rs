//! Profile and account settings service for the current user.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{PasswordHasher, ProfileCommand, UserRepository};
use crate::domain::service_support::{map_password_hash_error, map_user_persistence_error};
use crate::domain::{
    ActivityEntry, ActivityKind, Address, AddressDraft, ClientContext, Error, PasswordPolicy,
    PersonName, PlainPassword, ProfileUpdate, TravelPreferences, TravelPreferencesUpdate, User,
};

/// [`ProfileCommand`] implementation persisting through a [`UserRepository`].
#[derive(Clone)]
pub struct ProfileService<R> {
    users: Arc<R>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl<R> ProfileService<R> {
    /// Create the service.
    pub fn new(users: Arc<R>, hasher: Arc<dyn PasswordHasher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }
}

fn optional_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn required_url(field: &str, value: String) -> Result<String, Error> {
    optional_text(value).ok_or_else(|| Error::unprocessable(format!("{field} must not be empty")))
}

fn apply_profile_update(user: &mut User, update: ProfileUpdate) -> Result<(), Error> {
    let first_name = update
        .first_name
        .map(|raw| PersonName::parse("first_name", &raw))
        .transpose()
        .map_err(|err| Error::unprocessable(err.to_string()))?;
    let last_name = update
        .last_name
        .map(|raw| PersonName::parse("last_name", &raw))
        .transpose()
        .map_err(|err| Error::unprocessable(err.to_string()))?;
    let address = update
        .address
        .map(Address::try_from_draft)
        .transpose()
        .map_err(|err| Error::unprocessable(err.to_string()))?;

    if let Some(name) = first_name {
        user.first_name = name.into_inner();
    }
    if let Some(name) = last_name {
        user.last_name = name.into_inner();
    }
    if let Some(display_name) = update.display_name {
        user.display_name = optional_text(display_name);
    }
    if let Some(phone) = update.phone {
        user.phone = optional_text(phone);
    }
    if let Some(bio) = update.bio {
        user.bio = optional_text(bio);
    }
    if let Some(gender) = update.gender {
        user.gender = optional_text(gender);
    }
    if let Some(date_of_birth) = update.date_of_birth {
        user.date_of_birth = Some(date_of_birth);
    }
    if let Some(address) = address {
        user.address = Some(address);
    }
    Ok(())
}

impl<R> ProfileService<R>
where
    R: UserRepository,
{
    async fn save(&self, mut user: User) -> Result<User, Error> {
        user.updated_at = self.clock.utc();
        self.users
            .update(&user)
            .await
            .map_err(map_user_persistence_error)?;
        Ok(user)
    }
}

#[async_trait]
impl<R> ProfileCommand for ProfileService<R>
where
    R: UserRepository,
{
    async fn update_profile(
        &self,
        mut user: User,
        update: ProfileUpdate,
        client: ClientContext,
    ) -> Result<User, Error> {
        apply_profile_update(&mut user, update)?;
        user.record_activity(ActivityEntry::new(
            ActivityKind::ProfileUpdate,
            "Profile updated",
            &client,
            self.clock.utc(),
        ));
        self.save(user).await
    }

    async fn set_profile_photo(&self, mut user: User, url: String) -> Result<User, Error> {
        user.profile_photo = Some(required_url("profile_photo", url)?);
        self.save(user).await
    }

    async fn set_cover_photo(&self, mut user: User, url: String) -> Result<User, Error> {
        user.cover_photo = Some(required_url("cover_photo", url)?);
        self.save(user).await
    }

    async fn update_preferences(
        &self,
        mut user: User,
        update: TravelPreferencesUpdate,
    ) -> Result<User, Error> {
        user.preferences
            .get_or_insert_with(TravelPreferences::default)
            .apply(update);
        self.save(user).await
    }

    async fn update_notification_preferences(
        &self,
        mut user: User,
        flags: BTreeMap<String, bool>,
    ) -> Result<User, Error> {
        user.notification_preferences
            .apply(&flags)
            .map_err(|err| Error::unprocessable(err.to_string()))?;
        self.save(user).await
    }

    async fn change_password(
        &self,
        mut user: User,
        current: PlainPassword,
        new: PlainPassword,
        client: ClientContext,
    ) -> Result<User, Error> {
        let matches = self
            .hasher
            .verify(&current, &user.password_hash)
            .unwrap_or(false);
        if !matches {
            return Err(Error::unauthorized("Current password is incorrect"));
        }
        PasswordPolicy::check(new.expose()).map_err(|err| Error::unprocessable(err.to_string()))?;

        user.password_hash = self.hasher.hash(&new).map_err(map_password_hash_error)?;
        user.record_activity(ActivityEntry::new(
            ActivityKind::PasswordChange,
            "Password changed",
            &client,
            self.clock.utc(),
        ));
        info!(user_id = %user.id, "password changed");
        self.save(user).await
    }

    async fn delete_account(
        &self,
        mut user: User,
        reason: Option<String>,
        client: ClientContext,
    ) -> Result<User, Error> {
        let now = self.clock.utc();
        let description = match reason.and_then(optional_text) {
            Some(reason) => format!("Account deleted: {reason}"),
            None => "Account deleted".to_owned(),
        };
        user.soft_delete(now);
        user.record_activity(ActivityEntry::new(
            ActivityKind::AccountDeleted,
            description,
            &client,
            now,
        ));
        info!(user_id = %user.id, "account soft-deleted");
        self.save(user).await
    }

    async fn add_favorite_destination(
        &self,
        mut user: User,
        destination: String,
    ) -> Result<User, Error> {
        let destination = optional_text(destination)
            .ok_or_else(|| Error::unprocessable("destination must not be empty"))?;
        if user.favorite_destinations.contains(&destination) {
            return Ok(user);
        }
        user.favorite_destinations.push(destination);
        self.save(user).await
    }

    async fn remove_favorite_destination(
        &self,
        mut user: User,
        destination: String,
    ) -> Result<User, Error> {
        let before = user.favorite_destinations.len();
        user.favorite_destinations
            .retain(|saved| saved != destination.trim());
        if user.favorite_destinations.len() == before {
            return Ok(user);
        }
        self.save(user).await
    }

    async fn add_address(&self, mut user: User, draft: AddressDraft) -> Result<User, Error> {
        let address =
            Address::try_from_draft(draft).map_err(|err| Error::unprocessable(err.to_string()))?;
        user.add_address(address);
        self.save(user).await
    }

    async fn add_favorite_vendor(&self, mut user: User, vendor_id: Uuid) -> Result<User, Error> {
        if user.favorite_vendors.contains(&vendor_id) {
            return Ok(user);
        }
        user.favorite_vendors.push(vendor_id);
        self.save(user).await
    }

    async fn remove_favorite_vendor(
        &self,
        mut user: User,
        vendor_id: Uuid,
    ) -> Result<User, Error> {
        let before = user.favorite_vendors.len();
        user.favorite_vendors.retain(|saved| *saved != vendor_id);
        if user.favorite_vendors.len() == before {
            return Ok(user);
        }
        self.save(user).await
    }
}

#[cfg(test)]
#[path = "profile_service_tests.rs"]
mod tests;
