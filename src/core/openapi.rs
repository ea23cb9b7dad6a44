use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::weather_reports::dtos as weather_reports_dtos;
use crate::features::world_cities::{dtos as world_cities_dtos, handlers as world_cities_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // World cities (protected)
        world_cities_handlers::list_world_cities,
        world_cities_handlers::get_world_city,
        world_cities_handlers::create_world_city,
        world_cities_handlers::update_world_city,
        world_cities_handlers::delete_world_city,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Weather reports
            weather_reports_dtos::WeatherReportResponseDto,
            // World cities
            world_cities_dtos::CreateWorldCityDto,
            world_cities_dtos::UpdateWorldCityDto,
            world_cities_dtos::WorldCityResponseDto,
            ApiResponse<world_cities_dtos::WorldCityResponseDto>,
            ApiResponse<Vec<world_cities_dtos::WorldCityResponseDto>>,
        )
    ),
    tags(
        (name = "world-cities", description = "World city reference data with attached weather reports"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "World Cities API",
        version = "0.1.0",
        description = "API documentation for the world cities resource",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
