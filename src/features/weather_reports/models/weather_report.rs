use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for a weather observation of one world city
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct WeatherReport {
    pub id: String,
    pub world_city_id: String,
    pub observed_at: DateTime<Utc>,
    pub temperature_c: Option<f64>,
    pub conditions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
