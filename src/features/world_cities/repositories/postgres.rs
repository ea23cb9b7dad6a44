use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{WorldCityRepository, DUPLICATE_SIMPLE_MAPS_ID};
use crate::core::error::{AppError, Result};
use crate::features::world_cities::models::{WorldCity, WorldCityChanges};

const COLUMNS: &str = "id, simple_maps_id, city, city_ascii, lat, lng, country, iso2, iso3, \
                       admin_name, capital, population, created_at, updated_at";

/// Convert database error to more specific AppError with user-friendly messages
fn handle_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        // Unique constraint violation (PostgreSQL error code 23505)
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23505")) {
            if db_err
                .constraint()
                .is_some_and(|c| c.contains("simple_maps_id"))
            {
                return AppError::Conflict(DUPLICATE_SIMPLE_MAPS_ID.to_string());
            }
            return AppError::Conflict("World city already exists".to_string());
        }
    }

    // Logged once, when the error becomes a response
    AppError::Database(e)
}

/// World cities stored in the `world_cities` table
pub struct PgWorldCityRepository {
    pool: PgPool,
}

impl PgWorldCityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorldCityRepository for PgWorldCityRepository {
    async fn list(&self) -> Result<Vec<WorldCity>> {
        let query = format!(
            "SELECT {} FROM world_cities ORDER BY created_at, id",
            COLUMNS
        );

        sqlx::query_as::<_, WorldCity>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<WorldCity>> {
        let query = format!("SELECT {} FROM world_cities WHERE id = $1", COLUMNS);

        sqlx::query_as::<_, WorldCity>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn insert(&self, city: WorldCity) -> Result<WorldCity> {
        let query = format!(
            r#"
            INSERT INTO world_cities ({})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {}
            "#,
            COLUMNS, COLUMNS
        );

        sqlx::query_as::<_, WorldCity>(&query)
            .bind(&city.id)
            .bind(city.simple_maps_id)
            .bind(&city.city)
            .bind(&city.city_ascii)
            .bind(city.lat)
            .bind(city.lng)
            .bind(&city.country)
            .bind(&city.iso2)
            .bind(&city.iso3)
            .bind(&city.admin_name)
            .bind(&city.capital)
            .bind(city.population)
            .bind(city.created_at)
            .bind(city.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn update(
        &self,
        id: &str,
        changes: WorldCityChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<WorldCity>> {
        // Nullable columns take a "was provided" flag so an explicit null can clear them
        let query = format!(
            r#"
            UPDATE world_cities
            SET simple_maps_id = COALESCE($2, simple_maps_id),
                city = COALESCE($3, city),
                city_ascii = COALESCE($4, city_ascii),
                lat = COALESCE($5, lat),
                lng = COALESCE($6, lng),
                country = COALESCE($7, country),
                iso2 = COALESCE($8, iso2),
                iso3 = COALESCE($9, iso3),
                admin_name = CASE WHEN $10 THEN $11 ELSE admin_name END,
                capital = CASE WHEN $12 THEN $13 ELSE capital END,
                population = CASE WHEN $14 THEN $15 ELSE population END,
                updated_at = GREATEST($16, updated_at + INTERVAL '1 microsecond')
            WHERE id = $1
            RETURNING {}
            "#,
            COLUMNS
        );

        sqlx::query_as::<_, WorldCity>(&query)
            .bind(id)
            .bind(changes.simple_maps_id)
            .bind(changes.city)
            .bind(changes.city_ascii)
            .bind(changes.lat)
            .bind(changes.lng)
            .bind(changes.country)
            .bind(changes.iso2)
            .bind(changes.iso3)
            .bind(changes.admin_name.is_some())
            .bind(changes.admin_name.flatten())
            .bind(changes.capital.is_some())
            .bind(changes.capital.flatten())
            .bind(changes.population.is_some())
            .bind(changes.population.flatten())
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn delete(&self, id: &str) -> Result<Option<WorldCity>> {
        let query = format!("DELETE FROM world_cities WHERE id = $1 RETURNING {}", COLUMNS);

        sqlx::query_as::<_, WorldCity>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)
    }
}
