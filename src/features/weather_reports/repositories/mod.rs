mod in_memory;
mod postgres;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::weather_reports::models::WeatherReport;

pub use in_memory::InMemoryWeatherReportStore;
pub use postgres::PgWeatherReportStore;

/// Read access to weather reports, keyed by world city id.
///
/// Reports for one city come back newest `observed_at` first.
#[async_trait]
pub trait WeatherReportLookup: Send + Sync {
    /// Cities without reports are absent from the returned map.
    async fn find_by_world_city_ids(
        &self,
        world_city_ids: &[String],
    ) -> Result<HashMap<String, Vec<WeatherReport>>>;

    async fn find_by_world_city(&self, world_city_id: &str) -> Result<Vec<WeatherReport>> {
        let mut by_city = self
            .find_by_world_city_ids(&[world_city_id.to_string()])
            .await?;
        Ok(by_city.remove(world_city_id).unwrap_or_default())
    }
}

fn group_by_city(reports: Vec<WeatherReport>) -> HashMap<String, Vec<WeatherReport>> {
    let mut by_city: HashMap<String, Vec<WeatherReport>> = HashMap::new();
    for report in reports {
        by_city
            .entry(report.world_city_id.clone())
            .or_default()
            .push(report);
    }
    by_city
}
