use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{group_by_city, WeatherReportLookup};
use crate::core::error::Result;
use crate::features::weather_reports::models::WeatherReport;

/// In-memory weather reports.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryWeatherReportStore {
    reports: RwLock<Vec<WeatherReport>>,
}

impl InMemoryWeatherReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn insert(&self, report: WeatherReport) {
        self.reports.write().await.push(report);
    }
}

#[async_trait]
impl WeatherReportLookup for InMemoryWeatherReportStore {
    async fn find_by_world_city_ids(
        &self,
        world_city_ids: &[String],
    ) -> Result<HashMap<String, Vec<WeatherReport>>> {
        let mut matching: Vec<WeatherReport> = self
            .reports
            .read()
            .await
            .iter()
            .filter(|r| world_city_ids.contains(&r.world_city_id))
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            b.observed_at
                .cmp(&a.observed_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(group_by_city(matching))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn report(id: &str, city: &str, hours: i64) -> WeatherReport {
        let observed_at = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap() + Duration::hours(hours);
        WeatherReport {
            id: id.to_string(),
            world_city_id: city.to_string(),
            observed_at,
            temperature_c: Some(12.5),
            conditions: Some("Cloudy".to_string()),
            created_at: observed_at,
            updated_at: observed_at,
        }
    }

    #[tokio::test]
    async fn test_reports_grouped_by_city_newest_first() {
        let store = InMemoryWeatherReportStore::new();
        store.insert(report("r1", "nyc", 1)).await;
        store.insert(report("r2", "nyc", 3)).await;
        store.insert(report("r3", "oslo", 2)).await;
        store.insert(report("r4", "lima", 2)).await;

        let by_city = store
            .find_by_world_city_ids(&["nyc".to_string(), "oslo".to_string()])
            .await
            .unwrap();

        assert_eq!(by_city.len(), 2);
        let nyc: Vec<&str> = by_city["nyc"].iter().map(|r| r.id.as_str()).collect();
        assert_eq!(nyc, vec!["r2", "r1"]);
        assert_eq!(by_city["oslo"].len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_world_city_without_reports_is_empty() {
        let store = InMemoryWeatherReportStore::new();
        store.insert(report("r1", "nyc", 1)).await;

        assert!(store.find_by_world_city("paris").await.unwrap().is_empty());
        assert_eq!(store.find_by_world_city("nyc").await.unwrap().len(), 1);
    }
}
