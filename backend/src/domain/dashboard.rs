//! Read-models derived from the [`User`] aggregate for dashboards and
//! activity listings.
//!
//! Nothing here touches storage: each model is computed from an already
//! loaded account.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{ActivityEntry, SubscriptionPlan, User, UserStats};

/// Currency used for spending summaries.
pub const DASHBOARD_CURRENCY: &str = "NGN";
/// Largest page size accepted by activity listings.
pub const ACTIVITY_PAGE_MAX: u32 = 100;

/// Landing dashboard of the current user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDashboard {
    pub stats: UserStats,
    pub assigned_agent: Option<Uuid>,
    pub profile_completion: u8,
    pub is_email_verified: bool,
    pub is_phone_verified: bool,
}

impl From<&User> for UserDashboard {
    fn from(user: &User) -> Self {
        Self {
            stats: user.stats.clone(),
            assigned_agent: user.assigned_agent_id,
            profile_completion: user.profile_completion(),
            is_email_verified: user.is_email_verified,
            is_phone_verified: user.is_phone_verified,
        }
    }
}

/// Flat statistics view.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub stats: UserStats,
    pub favorite_destinations_count: usize,
    pub favorite_vendors_count: usize,
    pub followers_count: u32,
    pub following_count: u32,
    pub profile_completion: u8,
}

impl From<&User> for DashboardStats {
    fn from(user: &User) -> Self {
        Self {
            stats: user.stats.clone(),
            favorite_destinations_count: user.favorite_destinations.len(),
            favorite_vendors_count: user.favorite_vendors.len(),
            followers_count: user.engagement.followers_count,
            following_count: user.engagement.following_count,
            profile_completion: user.profile_completion(),
        }
    }
}

/// Profile card shown on the overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewProfile {
    pub name: String,
    pub email: String,
    pub profile_photo: Option<String>,
    pub profile_completion: u8,
    pub is_verified: bool,
    pub member_since: DateTime<Utc>,
}

/// Headline counters shown on the overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickStats {
    pub experiences: u32,
    pub upcoming: u32,
    pub bookings: u32,
    pub reviews: u32,
    pub favorites: usize,
    pub followers: u32,
    pub following: u32,
}

/// Spending summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Spending {
    pub total_spent: f64,
    pub total_saved: f64,
    pub currency: &'static str,
}

/// Overview dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOverview {
    pub profile: OverviewProfile,
    pub quick_stats: QuickStats,
    pub spending: Spending,
    pub countries_visited: u32,
    pub cities_visited: u32,
    pub plan: SubscriptionPlan,
    pub subscription_active: bool,
    pub subscription_expires_at: Option<DateTime<Utc>>,
    pub agent_id: Option<Uuid>,
}

impl From<&User> for DashboardOverview {
    fn from(user: &User) -> Self {
        let stats = &user.stats;
        Self {
            profile: OverviewProfile {
                name: user.full_name(),
                email: user.email.to_string(),
                profile_photo: user.profile_photo.clone(),
                profile_completion: user.profile_completion(),
                is_verified: user.is_email_verified,
                member_since: user.created_at,
            },
            quick_stats: QuickStats {
                experiences: stats.total_experiences,
                upcoming: stats.upcoming_experiences,
                bookings: stats.total_bookings,
                reviews: stats.total_reviews,
                favorites: user.favorites_count(),
                followers: user.engagement.followers_count,
                following: user.engagement.following_count,
            },
            spending: Spending {
                total_spent: stats.total_spent,
                total_saved: stats.total_saved,
                currency: DASHBOARD_CURRENCY,
            },
            countries_visited: stats.countries_visited,
            cities_visited: stats.cities_visited,
            plan: user.subscription.plan,
            subscription_active: user.subscription.is_active,
            subscription_expires_at: user.subscription.expires_at,
            agent_id: user.assigned_agent_id,
        }
    }
}

/// Signals recommendations are derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationBasis {
    pub interests: Vec<String>,
    pub travel_style: Option<String>,
    pub favorite_destinations: Vec<String>,
}

impl From<&User> for RecommendationBasis {
    fn from(user: &User) -> Self {
        let preferences = user.preferences.clone().unwrap_or_default();
        Self {
            interests: preferences.interests,
            travel_style: preferences.travel_style,
            favorite_destinations: user.favorite_destinations.clone(),
        }
    }
}

/// Reasons an activity page request is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ActivityPageError {
    #[error("limit must be between 1 and 100")]
    LimitOutOfRange,
}

/// One page of the activity log, most recent first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityPage {
    pub activities: Vec<ActivityEntry>,
    pub total: usize,
    pub page: usize,
    pub pages: usize,
    pub limit: u32,
}

impl ActivityPage {
    /// Slice the activity log of `user`.
    ///
    /// # Examples
    /// ```
    /// # use backend::domain::{ActivityPage, ActivityPageError};
    /// # fn check(user: &backend::domain::User) {
    /// assert_eq!(
    ///     ActivityPage::for_user(user, 0, 0),
    ///     Err(ActivityPageError::LimitOutOfRange)
    /// );
    /// # }
    /// ```
    pub fn for_user(user: &User, skip: usize, limit: u32) -> Result<Self, ActivityPageError> {
        if limit == 0 || limit > ACTIVITY_PAGE_MAX {
            return Err(ActivityPageError::LimitOutOfRange);
        }
        let page_size = limit as usize;
        let total = user.activity_log.len();
        let activities = user
            .activity_log
            .iter()
            .rev()
            .skip(skip)
            .take(page_size)
            .cloned()
            .collect();
        Ok(Self {
            activities,
            total,
            page: skip / page_size + 1,
            pages: total.div_ceil(page_size),
            limit,
        })
    }
}
