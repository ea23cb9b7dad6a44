use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;

/// Database model for world city
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct WorldCity {
    pub id: String,
    pub simple_maps_id: i64,
    pub city: String,
    pub city_ascii: String,
    pub lat: f64,
    pub lng: f64,
    pub country: String,
    pub iso2: String,
    pub iso3: String,
    pub admin_name: Option<String>,
    pub capital: Option<String>,
    pub population: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields of a record about to be created
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorldCity {
    pub simple_maps_id: i64,
    pub city: String,
    pub city_ascii: String,
    pub lat: f64,
    pub lng: f64,
    pub country: String,
    pub iso2: String,
    pub iso3: String,
    pub admin_name: Option<String>,
    pub capital: Option<String>,
    pub population: Option<i32>,
}

/// Validated partial update. `None` leaves a column untouched; for the
/// nullable columns `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldCityChanges {
    pub simple_maps_id: Option<i64>,
    pub city: Option<String>,
    pub city_ascii: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub country: Option<String>,
    pub iso2: Option<String>,
    pub iso3: Option<String>,
    pub admin_name: Option<Option<String>>,
    pub capital: Option<Option<String>>,
    pub population: Option<Option<i32>>,
}

impl WorldCity {
    /// A fresh record; `created_at == updated_at == now`
    pub fn create(id: String, new: NewWorldCity, now: DateTime<Utc>) -> Self {
        Self {
            id,
            simple_maps_id: new.simple_maps_id,
            city: new.city,
            city_ascii: new.city_ascii,
            lat: new.lat,
            lng: new.lng,
            country: new.country,
            iso2: new.iso2,
            iso3: new.iso3,
            admin_name: new.admin_name,
            capital: new.capital,
            population: new.population,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply `changes` and bump `updated_at` to the later of `now` and one
    /// microsecond past its previous value.
    pub fn apply(&mut self, changes: WorldCityChanges, now: DateTime<Utc>) {
        if let Some(v) = changes.simple_maps_id {
            self.simple_maps_id = v;
        }
        if let Some(v) = changes.city {
            self.city = v;
        }
        if let Some(v) = changes.city_ascii {
            self.city_ascii = v;
        }
        if let Some(v) = changes.lat {
            self.lat = v;
        }
        if let Some(v) = changes.lng {
            self.lng = v;
        }
        if let Some(v) = changes.country {
            self.country = v;
        }
        if let Some(v) = changes.iso2 {
            self.iso2 = v;
        }
        if let Some(v) = changes.iso3 {
            self.iso3 = v;
        }
        if let Some(v) = changes.admin_name {
            self.admin_name = v;
        }
        if let Some(v) = changes.capital {
            self.capital = v;
        }
        if let Some(v) = changes.population {
            self.population = v;
        }
        self.updated_at = next_updated_at(self.updated_at, now);
    }
}

/// Timestamps are kept at microsecond precision (Postgres `TIMESTAMPTZ`),
/// so strictly increasing means at least one microsecond later.
pub fn next_updated_at(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    now.max(previous + Duration::microseconds(1))
}
