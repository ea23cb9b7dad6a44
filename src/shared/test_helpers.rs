#![cfg(test)]

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

use crate::features::auth::JwtValidator;
use crate::features::weather_reports::{InMemoryWeatherReportStore, WeatherReportLookup};
use crate::features::world_cities::{InMemoryWorldCityRepository, WorldCityService};

pub const TEST_JWT_SECRET: &[u8] = b"test-secret-for-world-cities";

pub fn test_validator() -> JwtValidator {
    JwtValidator::with_secret(TEST_JWT_SECRET, None, None, Duration::from_secs(0))
}

pub fn mint_token_with(claims: Value, secret: &[u8]) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .unwrap()
}

/// Valid HS256 token for `sub`, good for one hour
pub fn mint_token(sub: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    mint_token_with(
        json!({ "sub": sub, "iat": now, "exp": now + 3600, "roles": ["editor"] }),
        TEST_JWT_SECRET,
    )
}

/// Service backed by empty in-memory stores; the weather store is returned for seeding
pub fn in_memory_service() -> (Arc<WorldCityService>, Arc<InMemoryWeatherReportStore>) {
    let weather = Arc::new(InMemoryWeatherReportStore::new());
    let service = Arc::new(WorldCityService::new(
        Arc::new(InMemoryWorldCityRepository::new()),
        Arc::clone(&weather) as Arc<dyn WeatherReportLookup>,
    ));
    (service, weather)
}

/// The New York row of the SimpleMaps dataset, in wire format
pub fn new_york_json() -> Value {
    json!({
        "simpleMapsId": 1840034016_i64,
        "city": "New York",
        "cityAscii": "New York",
        "lat": 40.6943,
        "lng": -73.9249,
        "country": "United States",
        "iso2": "US",
        "iso3": "USA"
    })
}
