use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::weather_reports::models::WeatherReport;

/// Response DTO for weather report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReportResponseDto {
    pub id: String,
    pub world_city_id: String,
    pub observed_at: DateTime<Utc>,
    pub temperature_c: Option<f64>,
    pub conditions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WeatherReport> for WeatherReportResponseDto {
    fn from(r: WeatherReport) -> Self {
        Self {
            id: r.id,
            world_city_id: r.world_city_id,
            observed_at: r.observed_at,
            temperature_c: r.temperature_c,
            conditions: r.conditions,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
