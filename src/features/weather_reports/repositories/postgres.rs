use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use super::{group_by_city, WeatherReportLookup};
use crate::core::error::Result;
use crate::features::weather_reports::models::WeatherReport;

/// Weather reports read from the `weather_reports` table
pub struct PgWeatherReportStore {
    pool: PgPool,
}

impl PgWeatherReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WeatherReportLookup for PgWeatherReportStore {
    async fn find_by_world_city_ids(
        &self,
        world_city_ids: &[String],
    ) -> Result<HashMap<String, Vec<WeatherReport>>> {
        if world_city_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let reports = sqlx::query_as::<_, WeatherReport>(
            r#"
            SELECT id, world_city_id, observed_at, temperature_c, conditions, created_at, updated_at
            FROM weather_reports
            WHERE world_city_id = ANY($1)
            ORDER BY observed_at DESC, id
            "#,
        )
        .bind(world_city_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(group_by_city(reports))
    }
}
