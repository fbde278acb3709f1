//! HTTP server assembly.

mod config;
mod state_builders;

pub use config::{AppSettings, ServerConfig};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use backend::Trace;
use backend::inbound::http::configure_api;
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::state::HttpState;

use state_builders::build_http_state;

/// Base path of the versioned REST API.
const API_PREFIX: &str = "/api/v1";

/// Routes and shared state for one worker.
///
/// The API lives under [`API_PREFIX`]; the probes stay at the root so
/// orchestrators can reach them without knowing the version.
fn build_app(
    health: web::Data<HealthState>,
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health)
        .app_data(state)
        .wrap(Trace)
        .service(web::scope(API_PREFIX).configure(configure_api))
        .service(ready)
        .service(live);
    with_api_docs(app)
}

#[cfg(debug_assertions)]
fn with_api_docs<T>(app: App<T>) -> App<T>
where
    T: ServiceFactory<ServiceRequest, Config = (), Error = actix_web::Error, InitError = ()>,
{
    use backend::ApiDoc;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(not(debug_assertions))]
fn with_api_docs<T>(app: App<T>) -> App<T> {
    app
}

/// Bind the server described by `config`.
///
/// Adapters are built once and shared by every worker. `health_state` is
/// marked ready once the socket is bound.
///
/// # Errors
/// Fails when an adapter cannot be built or the address cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config)?);
    let worker_health = health_state.clone();

    let server = HttpServer::new(move || build_app(worker_health.clone(), http_state.clone()))
        .bind(config.bind_addr)?
        .run();

    info!(bind_addr = %config.bind_addr, "listening");
    health_state.mark_ready();
    Ok(server)
}
