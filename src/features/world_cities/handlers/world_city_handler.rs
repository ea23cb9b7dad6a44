use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::world_cities::dtos::{
    CreateWorldCityDto, UpdateWorldCityDto, WorldCityResponseDto,
};
use crate::features::world_cities::services::WorldCityService;
use crate::shared::types::{ApiResponse, Meta};

/// List all world cities
#[utoipa::path(
    get,
    path = "/api/world-cities",
    responses(
        (status = 200, description = "List of world cities", body = ApiResponse<Vec<WorldCityResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "world-cities",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_world_cities(
    _user: AuthenticatedUser,
    State(service): State<Arc<WorldCityService>>,
) -> Result<Json<ApiResponse<Vec<WorldCityResponseDto>>>> {
    let cities = service.list().await?;
    let total = cities.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(cities),
        None,
        Some(Meta { total }),
    )))
}

/// Get a world city by ID
///
/// An unknown ID is not an error: the response carries `data: null`.
#[utoipa::path(
    get,
    path = "/api/world-cities/{id}",
    params(
        ("id" = String, Path, description = "World city ID")
    ),
    responses(
        (status = 200, description = "World city, or null data when absent", body = ApiResponse<WorldCityResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "world-cities",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_world_city(
    _user: AuthenticatedUser,
    State(service): State<Arc<WorldCityService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<WorldCityResponseDto>>> {
    let city = service.get(&id).await?;
    Ok(Json(ApiResponse::success(city, None, None)))
}

/// Create a new world city
#[utoipa::path(
    post,
    path = "/api/world-cities",
    request_body = CreateWorldCityDto,
    responses(
        (status = 201, description = "World city created successfully", body = ApiResponse<WorldCityResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "simpleMapsId already in use")
    ),
    tag = "world-cities",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_world_city(
    user: AuthenticatedUser,
    State(service): State<Arc<WorldCityService>>,
    AppJson(dto): AppJson<CreateWorldCityDto>,
) -> Result<(StatusCode, Json<ApiResponse<WorldCityResponseDto>>)> {
    let city = service.create(dto).await?;
    tracing::info!(caller = %user.sub, id = %city.id, "World city created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(city), None, None)),
    ))
}

/// Update a world city
///
/// Fields absent from the body keep their stored value.
#[utoipa::path(
    patch,
    path = "/api/world-cities/{id}",
    params(
        ("id" = String, Path, description = "World city ID")
    ),
    request_body = UpdateWorldCityDto,
    responses(
        (status = 200, description = "World city updated successfully", body = ApiResponse<WorldCityResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "World city not found"),
        (status = 409, description = "simpleMapsId already in use")
    ),
    tag = "world-cities",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_world_city(
    user: AuthenticatedUser,
    State(service): State<Arc<WorldCityService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateWorldCityDto>,
) -> Result<Json<ApiResponse<WorldCityResponseDto>>> {
    let city = service.update(&id, dto).await?;
    tracing::info!(caller = %user.sub, id = %city.id, "World city updated");
    Ok(Json(ApiResponse::success(Some(city), None, None)))
}

/// Delete a world city (hard delete)
///
/// Returns the record as it was immediately before deletion.
#[utoipa::path(
    delete,
    path = "/api/world-cities/{id}",
    params(
        ("id" = String, Path, description = "World city ID")
    ),
    responses(
        (status = 200, description = "World city deleted successfully", body = ApiResponse<WorldCityResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "World city not found")
    ),
    tag = "world-cities",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_world_city(
    user: AuthenticatedUser,
    State(service): State<Arc<WorldCityService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<WorldCityResponseDto>>> {
    let city = service.delete(&id).await?;
    tracing::info!(caller = %user.sub, id = %city.id, "World city deleted");
    Ok(Json(ApiResponse::success(Some(city), None, None)))
}
