use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{WorldCityRepository, DUPLICATE_SIMPLE_MAPS_ID};
use crate::core::error::{AppError, Result};
use crate::features::world_cities::models::{WorldCity, WorldCityChanges};

/// In-memory world city store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryWorldCityRepository {
    cities: RwLock<HashMap<String, WorldCity>>,
}

impl InMemoryWorldCityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn simple_maps_id_taken(
    cities: &HashMap<String, WorldCity>,
    simple_maps_id: i64,
    except_id: Option<&str>,
) -> bool {
    cities
        .values()
        .any(|c| c.simple_maps_id == simple_maps_id && Some(c.id.as_str()) != except_id)
}

#[async_trait]
impl WorldCityRepository for InMemoryWorldCityRepository {
    async fn list(&self) -> Result<Vec<WorldCity>> {
        let mut cities: Vec<WorldCity> = self.cities.read().await.values().cloned().collect();
        cities.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(cities)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<WorldCity>> {
        Ok(self.cities.read().await.get(id).cloned())
    }

    async fn insert(&self, city: WorldCity) -> Result<WorldCity> {
        let mut cities = self.cities.write().await;

        if cities.contains_key(&city.id) {
            return Err(AppError::Conflict(format!(
                "World city with id {} already exists",
                city.id
            )));
        }
        if simple_maps_id_taken(&cities, city.simple_maps_id, None) {
            return Err(AppError::Conflict(DUPLICATE_SIMPLE_MAPS_ID.to_string()));
        }

        cities.insert(city.id.clone(), city.clone());
        Ok(city)
    }

    async fn update(
        &self,
        id: &str,
        changes: WorldCityChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<WorldCity>> {
        let mut cities = self.cities.write().await;

        if let Some(simple_maps_id) = changes.simple_maps_id {
            if cities.contains_key(id) && simple_maps_id_taken(&cities, simple_maps_id, Some(id)) {
                return Err(AppError::Conflict(DUPLICATE_SIMPLE_MAPS_ID.to_string()));
            }
        }

        Ok(cities.get_mut(id).map(|city| {
            city.apply(changes, now);
            city.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<Option<WorldCity>> {
        Ok(self.cities.write().await.remove(id))
    }
}
