use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
};
use reqwest::Client;
use serde::Serialize;

use crate::{
    ForecastConfig, ForecastError, Result,
    cache::CityStore,
    geocoding::OpenMeteoGeocoder,
    location_resolver::CoordinateResolver,
    views,
    weather::{WeatherClient, format_forecast},
};

pub mod auth;

pub use auth::BasicCredentials;

const RECENT_CITIES_LIMIT: u32 = 20;
const USER_AGENT: &str = concat!("cityforecast/", env!("CARGO_PKG_VERSION"));

/// Shared handler state. Cloned per request; everything inside is behind `Arc`
/// or already cheap to clone.
#[derive(Clone)]
pub struct AppState {
    resolver: CoordinateResolver,
    weather: WeatherClient,
    store: Arc<dyn CityStore>,
    credentials: Arc<BasicCredentials>,
}

impl AppState {
    /// Wire the Open-Meteo clients and the given store together.
    pub fn new(store: Arc<dyn CityStore>, config: &ForecastConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ForecastError::config(format!("Failed to create HTTP client: {e}")))?;

        let geocoder = Arc::new(OpenMeteoGeocoder::new(
            client.clone(),
            config.geocoding_url.clone(),
        ));

        Ok(Self {
            resolver: CoordinateResolver::new(store.clone(), geocoder),
            weather: WeatherClient::new(client, config.forecast_url.clone()),
            store,
            credentials: Arc::new(BasicCredentials::new(
                config.stats_username.clone(),
                config.stats_password.clone(),
            )),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ForecastError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Query of `/weather`. A repeated `city` keeps its first value and a
/// missing one is empty.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
}

impl WeatherQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let city = pairs
            .into_iter()
            .find(|(key, _)| key == "city")
            .map(|(_, value)| value)
            .unwrap_or_default();
        Self { city }
    }
}

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/stats", get(get_stats))
        .route_layer(middleware::from_fn_with_state(
            state.credentials.clone(),
            auth::require_basic_auth,
        ));

    Router::new()
        .route("/", get(get_home))
        .route("/weather", get(get_weather))
        .merge(protected)
        .with_state(state)
}

async fn get_home() -> Html<String> {
    Html(views::home())
}

async fn get_weather(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Html<String>> {
    let query = WeatherQuery::from_pairs(pairs);
    let coordinate = state.resolver.resolve(&query.city).await?;
    let raw = state.weather.fetch_forecast(coordinate).await?;
    let display = format_forecast(&query.city, &raw)?;
    Ok(Html(views::weather(&display)))
}

async fn get_stats(State(state): State<AppState>) -> Result<Html<String>> {
    let names: Vec<String> = state
        .store
        .recent_cities(RECENT_CITIES_LIMIT)
        .await?
        .into_iter()
        .map(|city| city.name)
        .collect();
    Ok(Html(views::stats(&names)))
}
