//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod auth;
pub mod bearer;
pub mod client;
pub mod dashboards;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;

/// Register every `/api/v1` endpoint together with the extractor
/// configuration that maps payload failures onto the error envelope.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
///
/// let app = App::new().service(web::scope("/api/v1").configure(backend::inbound::http::configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .app_data(error::query_config())
        .app_data(error::path_config())
        .service(auth::register)
        .service(auth::login)
        .service(auth::refresh)
        .service(auth::logout)
        .service(auth::oauth_status)
        .service(auth::google_login)
        .service(auth::google_callback)
        .service(auth::google_token)
        .service(users::current_user)
        .service(users::update_current_user)
        .service(users::delete_current_user)
        .service(users::update_profile_photo)
        .service(users::update_cover_photo)
        .service(users::get_preferences)
        .service(users::update_preferences)
        .service(users::update_notification_preferences)
        .service(users::list_addresses)
        .service(users::add_address)
        .service(users::change_password)
        .service(users::list_activity)
        .service(users::get_referrals)
        .service(users::get_favorites)
        .service(users::add_favorite_destination)
        .service(users::remove_favorite_destination)
        .service(users::add_favorite_vendor)
        .service(users::remove_favorite_vendor)
        .service(dashboards::user_dashboard)
        .service(dashboards::user_dashboard_stats)
        .service(dashboards::user_dashboard_overview)
        .service(dashboards::user_recommendations);
}
