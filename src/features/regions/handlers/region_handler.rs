use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::features::regions::dtos::RegionResponseDto;
use crate::features::regions::models::Region;
use crate::features::regions::services::RegionService;
use crate::shared::types::{ApiResponse, Meta};

fn list_response(regions: Vec<Region>) -> Json<ApiResponse<Vec<RegionResponseDto>>> {
    let total = regions.len() as i64;
    let dtos: Vec<RegionResponseDto> = regions.into_iter().map(Into::into).collect();
    Json(ApiResponse::success(Some(dtos), None, Some(Meta { total })))
}

/// List all provinces
#[utoipa::path(
    get,
    path = "/api/regions/provinces",
    responses(
        (status = 200, description = "List of provinces", body = ApiResponse<Vec<RegionResponseDto>>),
        (status = 502, description = "Region service unavailable")
    ),
    tag = "regions"
)]
pub async fn list_provinces(
    State(service): State<Arc<RegionService>>,
) -> Result<Json<ApiResponse<Vec<RegionResponseDto>>>> {
    let provinces = service.list_provinces().await?;
    Ok(list_response(provinces))
}

/// List cities/regencies in a province
#[utoipa::path(
    get,
    path = "/api/regions/provinces/{id}/cities",
    params(
        ("id" = String, Path, description = "Province id (2 digits)")
    ),
    responses(
        (status = 200, description = "List of cities in the province", body = ApiResponse<Vec<RegionResponseDto>>),
        (status = 400, description = "Invalid province id"),
        (status = 404, description = "Province not found"),
        (status = 502, description = "Region service unavailable")
    ),
    tag = "regions"
)]
pub async fn list_cities_by_province(
    State(service): State<Arc<RegionService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<RegionResponseDto>>>> {
    let cities = service.list_cities(&id).await?;
    Ok(list_response(cities))
}

/// List districts in a city
#[utoipa::path(
    get,
    path = "/api/regions/cities/{id}/districts",
    params(
        ("id" = String, Path, description = "City/regency id (4 digits)")
    ),
    responses(
        (status = 200, description = "List of districts in the city", body = ApiResponse<Vec<RegionResponseDto>>),
        (status = 400, description = "Invalid city id"),
        (status = 404, description = "City not found"),
        (status = 502, description = "Region service unavailable")
    ),
    tag = "regions"
)]
pub async fn list_districts_by_city(
    State(service): State<Arc<RegionService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<RegionResponseDto>>>> {
    let districts = service.list_districts(&id).await?;
    Ok(list_response(districts))
}

/// List villages in a district
#[utoipa::path(
    get,
    path = "/api/regions/districts/{id}/villages",
    params(
        ("id" = String, Path, description = "District id (7 digits)")
    ),
    responses(
        (status = 200, description = "List of villages in the district", body = ApiResponse<Vec<RegionResponseDto>>),
        (status = 400, description = "Invalid district id"),
        (status = 404, description = "District not found"),
        (status = 502, description = "Region service unavailable")
    ),
    tag = "regions"
)]
pub async fn list_villages_by_district(
    State(service): State<Arc<RegionService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<RegionResponseDto>>>> {
    let villages = service.list_villages(&id).await?;
    Ok(list_response(villages))
}
