//! Dashboard API handlers.
//!
//! ```text
//! GET /api/v1/dashboards/user
//! GET /api/v1/dashboards/user/stats
//! GET /api/v1/dashboards/user/overview
//! GET /api/v1/dashboards/user/recommendations
//! ```
//!
//! Read-models come from [`crate::domain::dashboard`]; this module only shapes
//! them into JSON. Bookings, notifications and recommendations are served by
//! other systems, so their lists are always empty here.

use actix_web::{get, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    DashboardOverview, DashboardStats, RecommendationBasis, UserDashboard, UserStats,
};
use crate::inbound::http::bearer::ActiveUser;
use crate::inbound::http::error::ErrorBody;

/// Reference to the account's travel agent.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AgentRef {
    pub id: Uuid,
}

/// Landing dashboard.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDashboardResponse {
    #[schema(value_type = Object)]
    pub stats: UserStats,
    #[schema(value_type = Vec<Object>)]
    pub upcoming_experiences: Vec<Value>,
    #[schema(value_type = Vec<Object>)]
    pub recent_bookings: Vec<Value>,
    #[schema(value_type = Vec<Object>)]
    pub recent_notifications: Vec<Value>,
    #[schema(value_type = Vec<Object>)]
    pub recommended_destinations: Vec<Value>,
    #[schema(value_type = Vec<Object>)]
    pub recommended_experiences: Vec<Value>,
    pub assigned_agent: Option<AgentRef>,
    pub profile_completion: u8,
    pub is_email_verified: bool,
    pub is_phone_verified: bool,
}

impl From<UserDashboard> for UserDashboardResponse {
    fn from(value: UserDashboard) -> Self {
        Self {
            stats: value.stats,
            upcoming_experiences: Vec::new(),
            recent_bookings: Vec::new(),
            recent_notifications: Vec::new(),
            recommended_destinations: Vec::new(),
            recommended_experiences: Vec::new(),
            assigned_agent: value.assigned_agent.map(|id| AgentRef { id }),
            profile_completion: value.profile_completion,
            is_email_verified: value.is_email_verified,
            is_phone_verified: value.is_phone_verified,
        }
    }
}

/// Statistics as a single flat object.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardStatsResponse {
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
    pub favorite_destinations_count: usize,
    pub favorite_vendors_count: usize,
    pub followers_count: u32,
    pub following_count: u32,
    pub profile_completion: u8,
}

impl From<DashboardStats> for DashboardStatsResponse {
    fn from(value: DashboardStats) -> Self {
        let DashboardStats {
            stats,
            favorite_destinations_count,
            favorite_vendors_count,
            followers_count,
            following_count,
            profile_completion,
        } = value;
        Self {
            total_experiences: stats.total_experiences,
            completed_experiences: stats.completed_experiences,
            upcoming_experiences: stats.upcoming_experiences,
            cancelled_experiences: stats.cancelled_experiences,
            total_bookings: stats.total_bookings,
            total_spent: stats.total_spent,
            total_reviews: stats.total_reviews,
            average_rating_given: stats.average_rating_given,
            total_saved: stats.total_saved,
            countries_visited: stats.countries_visited,
            cities_visited: stats.cities_visited,
            favorite_destinations_count,
            favorite_vendors_count,
            followers_count,
            following_count,
            profile_completion,
        }
    }
}

/// Profile card of the overview.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OverviewProfileBody {
    pub name: String,
    pub email: String,
    pub profile_photo: Option<String>,
    pub profile_completion: u8,
    pub is_verified: bool,
    pub member_since: DateTime<Utc>,
}

/// Headline counters of the overview.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuickStatsBody {
    pub experiences: u32,
    pub upcoming: u32,
    pub bookings: u32,
    pub reviews: u32,
    pub favorites: usize,
    pub followers: u32,
    pub following: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SpendingBody {
    pub total_spent: f64,
    pub total_saved: f64,
    #[schema(example = "NGN")]
    pub currency: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TravelStatsBody {
    pub countries_visited: u32,
    pub cities_visited: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionBody {
    #[schema(example = "free")]
    pub plan: String,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AgentBody {
    pub has_agent: bool,
    pub agent_id: Option<Uuid>,
}

/// Overview dashboard.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardOverviewResponse {
    pub profile: OverviewProfileBody,
    pub quick_stats: QuickStatsBody,
    pub spending: SpendingBody,
    pub travel_stats: TravelStatsBody,
    pub subscription: SubscriptionBody,
    pub agent: AgentBody,
}

impl From<DashboardOverview> for DashboardOverviewResponse {
    fn from(value: DashboardOverview) -> Self {
        let DashboardOverview {
            profile,
            quick_stats,
            spending,
            countries_visited,
            cities_visited,
            plan,
            subscription_active,
            subscription_expires_at,
            agent_id,
        } = value;
        Self {
            profile: OverviewProfileBody {
                name: profile.name,
                email: profile.email,
                profile_photo: profile.profile_photo,
                profile_completion: profile.profile_completion,
                is_verified: profile.is_verified,
                member_since: profile.member_since,
            },
            quick_stats: QuickStatsBody {
                experiences: quick_stats.experiences,
                upcoming: quick_stats.upcoming,
                bookings: quick_stats.bookings,
                reviews: quick_stats.reviews,
                favorites: quick_stats.favorites,
                followers: quick_stats.followers,
                following: quick_stats.following,
            },
            spending: SpendingBody {
                total_spent: spending.total_spent,
                total_saved: spending.total_saved,
                currency: spending.currency.to_owned(),
            },
            travel_stats: TravelStatsBody {
                countries_visited,
                cities_visited,
            },
            subscription: SubscriptionBody {
                plan: plan.as_str().to_owned(),
                is_active: subscription_active,
                expires_at: subscription_expires_at,
            },
            agent: AgentBody {
                has_agent: agent_id.is_some(),
                agent_id,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BasedOnBody {
    pub interests: Vec<String>,
    pub travel_style: Option<String>,
    pub favorite_destinations: Vec<String>,
}

/// Recommendation lists with the signals they were derived from.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecommendationsResponse {
    #[schema(value_type = Vec<Object>)]
    pub destinations: Vec<Value>,
    #[schema(value_type = Vec<Object>)]
    pub experiences: Vec<Value>,
    #[schema(value_type = Vec<Object>)]
    pub events: Vec<Value>,
    #[schema(value_type = Vec<Object>)]
    pub vendors: Vec<Value>,
    pub based_on: BasedOnBody,
}

impl From<RecommendationBasis> for RecommendationsResponse {
    fn from(value: RecommendationBasis) -> Self {
        Self {
            destinations: Vec::new(),
            experiences: Vec::new(),
            events: Vec::new(),
            vendors: Vec::new(),
            based_on: BasedOnBody {
                interests: value.interests,
                travel_style: value.travel_style,
                favorite_destinations: value.favorite_destinations,
            },
        }
    }
}

/// Landing dashboard of the current user.
#[utoipa::path(
    get,
    path = "/api/v1/dashboards/user",
    responses(
        (status = 200, description = "Dashboard", body = UserDashboardResponse),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 403, description = "Account is not active", body = ErrorBody)
    ),
    tags = ["dashboards"],
    operation_id = "userDashboard"
)]
#[get("/dashboards/user")]
pub async fn user_dashboard(user: ActiveUser) -> web::Json<UserDashboardResponse> {
    web::Json(UserDashboard::from(&user.0).into())
}

/// Flat statistics of the current user.
#[utoipa::path(
    get,
    path = "/api/v1/dashboards/user/stats",
    responses(
        (status = 200, description = "Statistics", body = DashboardStatsResponse),
        (status = 403, description = "Account is not active", body = ErrorBody)
    ),
    tags = ["dashboards"],
    operation_id = "userDashboardStats"
)]
#[get("/dashboards/user/stats")]
pub async fn user_dashboard_stats(user: ActiveUser) -> web::Json<DashboardStatsResponse> {
    web::Json(DashboardStats::from(&user.0).into())
}

/// Overview of profile, activity, spending and subscription.
#[utoipa::path(
    get,
    path = "/api/v1/dashboards/user/overview",
    responses(
        (status = 200, description = "Overview", body = DashboardOverviewResponse),
        (status = 403, description = "Account is not active", body = ErrorBody)
    ),
    tags = ["dashboards"],
    operation_id = "userDashboardOverview"
)]
#[get("/dashboards/user/overview")]
pub async fn user_dashboard_overview(user: ActiveUser) -> web::Json<DashboardOverviewResponse> {
    web::Json(DashboardOverview::from(&user.0).into())
}

/// Personalised recommendations.
#[utoipa::path(
    get,
    path = "/api/v1/dashboards/user/recommendations",
    responses(
        (status = 200, description = "Recommendations", body = RecommendationsResponse),
        (status = 403, description = "Account is not active", body = ErrorBody)
    ),
    tags = ["dashboards"],
    operation_id = "userRecommendations"
)]
#[get("/dashboards/user/recommendations")]
pub async fn user_recommendations(user: ActiveUser) -> web::Json<RecommendationsResponse> {
    web::Json(RecommendationBasis::from(&user.0).into())
}
