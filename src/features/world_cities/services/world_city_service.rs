use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::weather_reports::WeatherReportLookup;
use crate::features::world_cities::dtos::{
    CreateWorldCityDto, UpdateWorldCityDto, WorldCityResponseDto,
};
use crate::features::world_cities::models::WorldCity;
use crate::features::world_cities::repositories::WorldCityRepository;

/// Service for world city operations
pub struct WorldCityService {
    repository: Arc<dyn WorldCityRepository>,
    weather_reports: Arc<dyn WeatherReportLookup>,
}

impl std::fmt::Debug for WorldCityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldCityService")
            .field("repository", &"<dyn WorldCityRepository>")
            .field("weather_reports", &"<dyn WeatherReportLookup>")
            .finish()
    }
}

/// Current time at the precision the store keeps
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("World city with id {} not found", id))
}

impl WorldCityService {
    pub fn new(
        repository: Arc<dyn WorldCityRepository>,
        weather_reports: Arc<dyn WeatherReportLookup>,
    ) -> Self {
        Self {
            repository,
            weather_reports,
        }
    }

    /// List every world city with its weather reports
    pub async fn list(&self) -> Result<Vec<WorldCityResponseDto>> {
        let cities = self.repository.list().await?;

        let ids: Vec<String> = cities.iter().map(|c| c.id.clone()).collect();
        let mut reports = self.weather_reports.find_by_world_city_ids(&ids).await?;

        Ok(cities
            .into_iter()
            .map(|c| {
                let city_reports = reports.remove(&c.id).unwrap_or_default();
                WorldCityResponseDto::new(c, city_reports)
            })
            .collect())
    }

    /// Get a world city by id; `None` when absent
    pub async fn get(&self, id: &str) -> Result<Option<WorldCityResponseDto>> {
        match self.repository.find_by_id(id).await? {
            Some(city) => Ok(Some(self.with_reports(city).await?)),
            None => Ok(None),
        }
    }

    /// Create a world city with a generated id
    pub async fn create(&self, dto: CreateWorldCityDto) -> Result<WorldCityResponseDto> {
        let new = dto.into_new_world_city()?;

        let city = WorldCity::create(Uuid::now_v7().to_string(), new, now());
        let city = self.repository.insert(city).await?;

        tracing::debug!(id = %city.id, simple_maps_id = city.simple_maps_id, "World city created");

        // A new id has no reports yet
        Ok(WorldCityResponseDto::new(city, Vec::new()))
    }

    /// Update the fields present in `dto`
    pub async fn update(&self, id: &str, dto: UpdateWorldCityDto) -> Result<WorldCityResponseDto> {
        let changes = dto.into_changes()?;

        let city = self
            .repository
            .update(id, changes, now())
            .await?
            .ok_or_else(|| not_found(id))?;

        tracing::debug!(id = %city.id, "World city updated");

        self.with_reports(city).await
    }

    /// Delete permanently, returning the record as it was
    pub async fn delete(&self, id: &str) -> Result<WorldCityResponseDto> {
        // Reports cascade with the row, so capture them first
        let reports = self.weather_reports.find_by_world_city(id).await?;

        let city = self
            .repository
            .delete(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        tracing::debug!(id = %city.id, "World city deleted");

        Ok(WorldCityResponseDto::new(city, reports))
    }

    async fn with_reports(&self, city: WorldCity) -> Result<WorldCityResponseDto> {
        let reports = self.weather_reports.find_by_world_city(&city.id).await?;
        Ok(WorldCityResponseDto::new(city, reports))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::weather_reports::models::WeatherReport;
    use crate::shared::test_helpers::{in_memory_service, new_york_json};
    use fake::faker::address::en::{CityName, CountryName};
    use fake::Fake;
    use serde_json::json;

    fn create_dto(body: serde_json::Value) -> CreateWorldCityDto {
        serde_json::from_value(body).unwrap()
    }

    fn update_dto(body: serde_json::Value) -> UpdateWorldCityDto {
        serde_json::from_value(body).unwrap()
    }

    fn random_city(simple_maps_id: i64) -> serde_json::Value {
        let name: String = CityName().fake();
        let country: String = CountryName().fake();
        json!({
            "simpleMapsId": simple_maps_id,
            "city": name,
            "cityAscii": name,
            "lat": (-90.0..90.0).fake::<f64>(),
            "lng": (-180.0..180.0).fake::<f64>(),
            "country": country,
            "iso2": "ZZ",
            "iso3": "ZZZ",
            "population": (0..10_000_000).fake::<i32>()
        })
    }

    #[tokio::test]
    async fn test_create_new_york() {
        let (service, _) = in_memory_service();

        let city = service.create(create_dto(new_york_json())).await.unwrap();

        assert!(!city.id.is_empty());
        assert_eq!(city.simple_maps_id, 1840034016);
        assert_eq!(city.city, "New York");
        assert_eq!(city.city_ascii, "New York");
        assert_eq!(city.lat, 40.6943);
        assert_eq!(city.lng, -73.9249);
        assert_eq!(city.country, "United States");
        assert_eq!(city.iso2, "US");
        assert_eq!(city.iso3, "USA");
        assert_eq!(city.created_at, city.updated_at);
        assert!(city.weather_reports.is_empty());
    }

    #[tokio::test]
    async fn test_create_keeps_lower_case_country_codes() {
        let (service, _) = in_memory_service();
        let mut body = new_york_json();
        body["iso2"] = json!("us");
        body["iso3"] = json!("usa");

        let city = service.create(create_dto(body)).await.unwrap();

        assert_eq!(city.iso2, "us");
        assert_eq!(city.iso3, "usa");
    }

    #[tokio::test]
    async fn test_create_then_get_returns_equal_record() {
        let (service, _) = in_memory_service();

        for simple_maps_id in 1..=5 {
            let created = service
                .create(create_dto(random_city(simple_maps_id)))
                .await
                .unwrap();
            let fetched = service.get(&created.id).await.unwrap();
            assert_eq!(fetched, Some(created));
        }
    }

    #[tokio::test]
    async fn test_create_generates_unique_ids() {
        let (service, _) = in_memory_service();

        let a = service.create(create_dto(random_city(1))).await.unwrap();
        let b = service.create(create_dto(random_city(2))).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_create_missing_city_fails_and_persists_nothing() {
        let (service, _) = in_memory_service();
        let mut body = new_york_json();
        body.as_object_mut().unwrap().remove("city");

        let err = service.create(create_dto(body)).await.unwrap_err();

        match err {
            AppError::Validation(messages) => {
                assert_eq!(messages, vec!["city: is required".to_string()])
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_duplicate_simple_maps_id_conflicts() {
        let (service, _) = in_memory_service();
        service.create(create_dto(new_york_json())).await.unwrap();

        let err = service.create(create_dto(new_york_json())).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_none() {
        let (service, _) = in_memory_service();
        assert_eq!(service.get("does-not-exist").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_includes_every_record_once() {
        let (service, _) = in_memory_service();
        let mut ids = Vec::new();
        for simple_maps_id in 10..20 {
            ids.push(
                service
                    .create(create_dto(random_city(simple_maps_id)))
                    .await
                    .unwrap()
                    .id,
            );
        }

        let mut listed: Vec<String> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        listed.sort();
        ids.sort();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn test_empty_update_only_advances_updated_at() {
        let (service, _) = in_memory_service();
        let created = service.create(create_dto(new_york_json())).await.unwrap();

        let updated = service
            .update(&created.id, update_dto(json!({})))
            .await
            .unwrap();

        assert!(updated.updated_at > created.updated_at);
        assert_eq!(
            WorldCityResponseDto {
                updated_at: created.updated_at,
                ..updated.clone()
            },
            created
        );

        let again = service
            .update(&created.id, update_dto(json!({})))
            .await
            .unwrap();
        assert!(again.updated_at > updated.updated_at);
    }

    #[tokio::test]
    async fn test_update_overwrites_present_fields() {
        let (service, _) = in_memory_service();
        let created = service
            .create(create_dto(json!({
                "simpleMapsId": 1578324706,
                "city": "Oslo",
                "cityAscii": "Oslo",
                "lat": 59.9133,
                "lng": 10.7389,
                "country": "Norway",
                "iso2": "NO",
                "iso3": "NOR",
                "adminName": "Oslo",
                "capital": "primary",
                "population": 1_082_575
            })))
            .await
            .unwrap();

        let updated = service
            .update(
                &created.id,
                update_dto(json!({ "population": 1_100_000, "capital": null })),
            )
            .await
            .unwrap();

        assert_eq!(updated.population, Some(1_100_000));
        assert_eq!(updated.capital, None);
        assert_eq!(updated.admin_name.as_deref(), Some("Oslo"));
        assert_eq!(updated.city, "Oslo");
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(service.get(&created.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_update_invalid_field_leaves_record_untouched() {
        let (service, _) = in_memory_service();
        let created = service.create(create_dto(new_york_json())).await.unwrap();

        let err = service
            .update(&created.id, update_dto(json!({ "city": null })))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(service.get(&created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_update_unknown_id_not_found() {
        let (service, _) = in_memory_service();
        let err = service
            .update("does-not-exist", update_dto(json!({ "city": "Nowhere" })))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_returns_record_then_get_is_none() {
        let (service, _) = in_memory_service();
        let created = service.create(create_dto(new_york_json())).await.unwrap();

        let deleted = service.delete(&created.id).await.unwrap();

        assert_eq!(deleted, created);
        assert_eq!(service.get(&created.id).await.unwrap(), None);
        assert!(matches!(
            service.delete(&created.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_delete_unknown_id_not_found() {
        let (service, _) = in_memory_service();
        let err = service.delete("does-not-exist").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_weather_reports_attached_to_their_city() {
        let (service, weather) = in_memory_service();
        let nyc = service.create(create_dto(new_york_json())).await.unwrap();
        let other = service.create(create_dto(random_city(42))).await.unwrap();

        let observed_at = now();
        weather
            .insert(WeatherReport {
                id: "report-1".to_string(),
                world_city_id: nyc.id.clone(),
                observed_at,
                temperature_c: Some(21.5),
                conditions: Some("Clear".to_string()),
                created_at: observed_at,
                updated_at: observed_at,
            })
            .await;

        let fetched = service.get(&nyc.id).await.unwrap().unwrap();
        assert_eq!(fetched.weather_reports.len(), 1);
        assert_eq!(fetched.weather_reports[0].id, "report-1");

        let listed = service.list().await.unwrap();
        let listed_other = listed.iter().find(|c| c.id == other.id).unwrap();
        assert!(listed_other.weather_reports.is_empty());
        let listed_nyc = listed.iter().find(|c| c.id == nyc.id).unwrap();
        assert_eq!(listed_nyc.weather_reports.len(), 1);

        let deleted = service.delete(&nyc.id).await.unwrap();
        assert_eq!(deleted.weather_reports.len(), 1);
    }

    #[tokio::test]
    async fn test_simple_maps_id_beyond_double_precision_survives() {
        let (service, _) = in_memory_service();
        let mut body = new_york_json();
        body["simpleMapsId"] = json!("9007199254740993");

        let created = service.create(create_dto(body)).await.unwrap();
        let fetched = service.get(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.simple_maps_id, 9_007_199_254_740_993);
    }
}
