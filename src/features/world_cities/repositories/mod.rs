mod in_memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::error::Result;
use crate::features::world_cities::models::{WorldCity, WorldCityChanges};

pub use in_memory::InMemoryWorldCityRepository;
pub use postgres::PgWorldCityRepository;

/// Persistence for world city records.
///
/// Each method touches a single record atomically. `simple_maps_id` is unique
/// across records; a clash surfaces as `AppError::Conflict`.
#[async_trait]
pub trait WorldCityRepository: Send + Sync {
    /// Every record, ordered by `created_at` then `id`
    async fn list(&self) -> Result<Vec<WorldCity>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<WorldCity>>;

    async fn insert(&self, city: WorldCity) -> Result<WorldCity>;

    /// Apply `changes` and advance `updated_at` past its previous value.
    /// `Ok(None)` when no record has this id.
    async fn update(
        &self,
        id: &str,
        changes: WorldCityChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<WorldCity>>;

    /// Hard delete, returning the removed record
    async fn delete(&self, id: &str) -> Result<Option<WorldCity>>;
}

pub(crate) const DUPLICATE_SIMPLE_MAPS_ID: &str =
    "A world city with this simpleMapsId already exists";
