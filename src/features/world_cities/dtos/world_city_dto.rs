use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::features::weather_reports::dtos::WeatherReportResponseDto;
use crate::features::weather_reports::models::WeatherReport;
use crate::features::world_cities::models::{NewWorldCity, WorldCity, WorldCityChanges};
use crate::shared::serde_helpers::{big_int, double_option};

// Create request
//
// Every field is optional at the serde level so a missing required field
// surfaces as a field-level validation error rather than a decode failure.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateWorldCityDto {
    /// SimpleMaps identifier; accepted as a string or an integer
    #[serde(default, deserialize_with = "big_int::deserialize_option")]
    #[schema(value_type = String, example = "1840034016")]
    #[validate(
        required(message = "is required"),
        range(min = 1, message = "must be a positive integer")
    )]
    pub simple_maps_id: Option<i64>,

    #[schema(value_type = String, example = "New York")]
    #[validate(
        required(message = "is required"),
        length(min = 1, max = 200, message = "must be 1 to 200 characters")
    )]
    pub city: Option<String>,

    #[schema(value_type = String, example = "New York")]
    #[validate(
        required(message = "is required"),
        length(min = 1, max = 200, message = "must be 1 to 200 characters")
    )]
    pub city_ascii: Option<String>,

    #[schema(value_type = f64, example = 40.6943)]
    #[validate(
        required(message = "is required"),
        range(min = -90.0, max = 90.0, message = "must be between -90 and 90")
    )]
    pub lat: Option<f64>,

    #[schema(value_type = f64, example = -73.9249)]
    #[validate(
        required(message = "is required"),
        range(min = -180.0, max = 180.0, message = "must be between -180 and 180")
    )]
    pub lng: Option<f64>,

    #[schema(value_type = String, example = "United States")]
    #[validate(
        required(message = "is required"),
        length(min = 1, max = 200, message = "must be 1 to 200 characters")
    )]
    pub country: Option<String>,

    #[schema(value_type = String, example = "US")]
    #[validate(
        required(message = "is required"),
        length(equal = 2, message = "must be exactly 2 characters")
    )]
    pub iso2: Option<String>,

    #[schema(value_type = String, example = "USA")]
    #[validate(
        required(message = "is required"),
        length(equal = 3, message = "must be exactly 3 characters")
    )]
    pub iso3: Option<String>,

    #[schema(example = "New York")]
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub admin_name: Option<String>,

    /// "primary", "admin", "minor" or absent
    #[schema(example = "primary")]
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub capital: Option<String>,

    #[schema(example = 18908608)]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub population: Option<i32>,
}

impl CreateWorldCityDto {
    /// Validate and convert into the fields of a new record
    pub fn into_new_world_city(self) -> Result<NewWorldCity, ValidationErrors> {
        self.validate()?;

        let (
            Some(simple_maps_id),
            Some(city),
            Some(city_ascii),
            Some(lat),
            Some(lng),
            Some(country),
            Some(iso2),
            Some(iso3),
        ) = (
            self.simple_maps_id,
            self.city,
            self.city_ascii,
            self.lat,
            self.lng,
            self.country,
            self.iso2,
            self.iso3,
        )
        else {
            // validate() has already rejected any missing required field
            let mut errors = ValidationErrors::new();
            errors.add("input", ValidationError::new("required"));
            return Err(errors);
        };

        Ok(NewWorldCity {
            simple_maps_id,
            city,
            city_ascii,
            lat,
            lng,
            country,
            iso2,
            iso3,
            admin_name: self.admin_name,
            capital: self.capital,
            population: self.population,
        })
    }
}

// Update request
//
// Absent fields are left unchanged. An explicit `null` clears `adminName`,
// `capital` and `population`; on any other field it is rejected.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateWorldCityDto {
    #[serde(default, deserialize_with = "big_int::deserialize_double_option")]
    #[schema(value_type = Option<String>, example = "1840034016")]
    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub simple_maps_id: Option<Option<i64>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    #[validate(length(min = 1, max = 200, message = "must be 1 to 200 characters"))]
    pub city: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    #[validate(length(min = 1, max = 200, message = "must be 1 to 200 characters"))]
    pub city_ascii: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    #[validate(range(min = -90.0, max = 90.0, message = "must be between -90 and 90"))]
    pub lat: Option<Option<f64>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    #[validate(range(min = -180.0, max = 180.0, message = "must be between -180 and 180"))]
    pub lng: Option<Option<f64>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    #[validate(length(min = 1, max = 200, message = "must be 1 to 200 characters"))]
    pub country: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    #[validate(length(equal = 2, message = "must be exactly 2 characters"))]
    pub iso2: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    #[validate(length(equal = 3, message = "must be exactly 3 characters"))]
    pub iso3: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub admin_name: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub capital: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>, nullable)]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub population: Option<Option<i32>>,
}

impl UpdateWorldCityDto {
    /// Validate and convert into a partial update
    pub fn into_changes(self) -> Result<WorldCityChanges, ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        let explicit_nulls = [
            ("simple_maps_id", matches!(self.simple_maps_id, Some(None))),
            ("city", matches!(self.city, Some(None))),
            ("city_ascii", matches!(self.city_ascii, Some(None))),
            ("lat", matches!(self.lat, Some(None))),
            ("lng", matches!(self.lng, Some(None))),
            ("country", matches!(self.country, Some(None))),
            ("iso2", matches!(self.iso2, Some(None))),
            ("iso3", matches!(self.iso3, Some(None))),
        ];
        for (field, is_null) in explicit_nulls {
            if is_null {
                errors.add(
                    field,
                    ValidationError::new("not_nullable").with_message("cannot be null".into()),
                );
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(WorldCityChanges {
            simple_maps_id: self.simple_maps_id.flatten(),
            city: self.city.flatten(),
            city_ascii: self.city_ascii.flatten(),
            lat: self.lat.flatten(),
            lng: self.lng.flatten(),
            country: self.country.flatten(),
            iso2: self.iso2.flatten(),
            iso3: self.iso3.flatten(),
            admin_name: self.admin_name,
            capital: self.capital,
            population: self.population,
        })
    }
}

/// Response DTO for world city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorldCityResponseDto {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Serialized as a string; values may exceed 2^53
    #[serde(with = "big_int")]
    #[schema(value_type = String, example = "1840034016")]
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
    pub weather_reports: Vec<WeatherReportResponseDto>,
}

impl WorldCityResponseDto {
    pub fn new(c: WorldCity, weather_reports: Vec<WeatherReport>) -> Self {
        Self {
            id: c.id,
            created_at: c.created_at,
            updated_at: c.updated_at,
            simple_maps_id: c.simple_maps_id,
            city: c.city,
            city_ascii: c.city_ascii,
            lat: c.lat,
            lng: c.lng,
            country: c.country,
            iso2: c.iso2,
            iso3: c.iso3,
            admin_name: c.admin_name,
            capital: c.capital,
            population: c.population,
            weather_reports: weather_reports.into_iter().map(Into::into).collect(),
        }
    }
}
