use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, patch, post, MethodRouter},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::entities::{
    ContestResults, Contests, Entity, Flights, Players, Results, SponsorLevels, Sponsors, Teams, TournamentYears,
};
use crate::handlers::{health, resource, sponsors, upload};
use crate::state::AppState;

/// Full application: routes plus CORS, tracing and the body size limit
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut app = router(state)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(TraceLayer::new_for_http());

    if config.security.enable_cors {
        app = app.layer(cors_layer(&config.security.cors_origins));
    }
    app
}

/// Routes only, used directly by the in-process tests
pub fn router(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .merge(tournament_routes())
        .merge(scoring_routes())
        .merge(sponsor_routes())
        .route("/api/upload", post(upload::upload))
        .with_state(state)
}

/// GET list + POST create for one entity
fn collection<E: Entity>() -> MethodRouter<AppState> {
    get(resource::list::<E>).post(resource::create::<E>)
}

fn tournament_routes() -> Router<AppState> {
    Router::new()
        .route("/api/tournament-years", collection::<TournamentYears>())
        .route("/api/flights", collection::<Flights>())
        .route("/api/teams", collection::<Teams>())
        .route("/api/teams/:id", patch(resource::patch::<Teams>))
        .route("/api/players", collection::<Players>())
        .route("/api/players/:id", patch(resource::patch::<Players>))
}

fn scoring_routes() -> Router<AppState> {
    Router::new()
        .route("/api/contests", collection::<Contests>())
        .route("/api/results", collection::<Results>())
        .route("/api/results/:id", patch(resource::patch::<Results>))
        .route("/api/contest-results", collection::<ContestResults>())
}

fn sponsor_routes() -> Router<AppState> {
    Router::new()
        .route("/api/sponsor-levels", collection::<SponsorLevels>())
        .route("/api/sponsors", collection::<Sponsors>())
        .route("/api/sponsors/:id", patch(sponsors::patch).delete(sponsors::delete))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
