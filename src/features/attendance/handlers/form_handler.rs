use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::attendance::dtos::{FormViewDto, SelectRegionDto, UpdateIdentityDto};
use crate::features::attendance::services::{FormService, FormSession};
use crate::features::regions::models::RegionLevel;
use crate::shared::types::ApiResponse;

fn view(session: FormSession) -> Json<ApiResponse<FormViewDto>> {
    Json(ApiResponse::success(Some(session.into()), None, None))
}

/// Start a new attendance form
///
/// The province list is fetched before the response is returned.
#[utoipa::path(
    post,
    path = "/api/forms",
    responses(
        (status = 201, description = "Form created", body = ApiResponse<FormViewDto>),
        (status = 429, description = "Too many active forms")
    ),
    tag = "attendance"
)]
pub async fn create_form(
    State(service): State<Arc<FormService>>,
) -> Result<(StatusCode, Json<ApiResponse<FormViewDto>>)> {
    let session = service.create_session().await?;
    Ok((StatusCode::CREATED, view(session)))
}

/// Get the current state of a form
#[utoipa::path(
    get,
    path = "/api/forms/{id}",
    params(
        ("id" = Uuid, Path, description = "Form id")
    ),
    responses(
        (status = 200, description = "Form found", body = ApiResponse<FormViewDto>),
        (status = 404, description = "Form not found")
    ),
    tag = "attendance"
)]
pub async fn get_form(
    State(service): State<Arc<FormService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FormViewDto>>> {
    let session = service.get_session(id).await?;
    Ok(view(session))
}

/// Discard a form
#[utoipa::path(
    delete,
    path = "/api/forms/{id}",
    params(
        ("id" = Uuid, Path, description = "Form id")
    ),
    responses(
        (status = 200, description = "Form discarded"),
        (status = 404, description = "Form not found")
    ),
    tag = "attendance"
)]
pub async fn delete_form(
    State(service): State<Arc<FormService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_session(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Form discarded".to_string()),
        None,
    )))
}

/// Update the identity fields (name, phone, address, institution)
#[utoipa::path(
    patch,
    path = "/api/forms/{id}/identity",
    params(
        ("id" = Uuid, Path, description = "Form id")
    ),
    request_body = UpdateIdentityDto,
    responses(
        (status = 200, description = "Identity updated", body = ApiResponse<FormViewDto>),
        (status = 400, description = "Invalid request body"),
        (status = 404, description = "Form not found")
    ),
    tag = "attendance"
)]
pub async fn update_identity(
    State(service): State<Arc<FormService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateIdentityDto>,
) -> Result<Json<ApiResponse<FormViewDto>>> {
    let session = service.update_identity(id, dto).await?;
    Ok(view(session))
}

/// Select a province and load its cities
#[utoipa::path(
    put,
    path = "/api/forms/{id}/province",
    params(
        ("id" = Uuid, Path, description = "Form id")
    ),
    request_body = SelectRegionDto,
    responses(
        (status = 200, description = "Province selected", body = ApiResponse<FormViewDto>),
        (status = 400, description = "Unknown province"),
        (status = 404, description = "Form not found")
    ),
    tag = "attendance"
)]
pub async fn select_province(
    State(service): State<Arc<FormService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SelectRegionDto>,
) -> Result<Json<ApiResponse<FormViewDto>>> {
    let session = service.select_province(id, &dto.id).await?;
    Ok(view(session))
}

/// Select a city/regency and load its districts
#[utoipa::path(
    put,
    path = "/api/forms/{id}/city",
    params(
        ("id" = Uuid, Path, description = "Form id")
    ),
    request_body = SelectRegionDto,
    responses(
        (status = 200, description = "City selected", body = ApiResponse<FormViewDto>),
        (status = 400, description = "Unknown city, or no province selected"),
        (status = 404, description = "Form not found")
    ),
    tag = "attendance"
)]
pub async fn select_city(
    State(service): State<Arc<FormService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SelectRegionDto>,
) -> Result<Json<ApiResponse<FormViewDto>>> {
    let session = service.select_city(id, &dto.id).await?;
    Ok(view(session))
}

/// Select a district and load its villages
#[utoipa::path(
    put,
    path = "/api/forms/{id}/district",
    params(
        ("id" = Uuid, Path, description = "Form id")
    ),
    request_body = SelectRegionDto,
    responses(
        (status = 200, description = "District selected", body = ApiResponse<FormViewDto>),
        (status = 400, description = "Unknown district, or no city selected"),
        (status = 404, description = "Form not found")
    ),
    tag = "attendance"
)]
pub async fn select_district(
    State(service): State<Arc<FormService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SelectRegionDto>,
) -> Result<Json<ApiResponse<FormViewDto>>> {
    let session = service.select_district(id, &dto.id).await?;
    Ok(view(session))
}

/// Select a village
#[utoipa::path(
    put,
    path = "/api/forms/{id}/village",
    params(
        ("id" = Uuid, Path, description = "Form id")
    ),
    request_body = SelectRegionDto,
    responses(
        (status = 200, description = "Village selected", body = ApiResponse<FormViewDto>),
        (status = 400, description = "Unknown village, or no district selected"),
        (status = 404, description = "Form not found")
    ),
    tag = "attendance"
)]
pub async fn select_village(
    State(service): State<Arc<FormService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SelectRegionDto>,
) -> Result<Json<ApiResponse<FormViewDto>>> {
    let session = service.select_village(id, &dto.id).await?;
    Ok(view(session))
}

/// Re-fetch one region list
///
/// Used after a failed load. Clears the level and everything below it.
#[utoipa::path(
    post,
    path = "/api/forms/{id}/levels/{level}/reload",
    params(
        ("id" = Uuid, Path, description = "Form id"),
        ("level" = RegionLevel, Path, description = "province, city, district or village")
    ),
    responses(
        (status = 200, description = "List reloaded", body = ApiResponse<FormViewDto>),
        (status = 400, description = "Parent level has no selection"),
        (status = 404, description = "Form not found")
    ),
    tag = "attendance"
)]
pub async fn reload_level(
    State(service): State<Arc<FormService>>,
    Path((id, level)): Path<(Uuid, RegionLevel)>,
) -> Result<Json<ApiResponse<FormViewDto>>> {
    let session = service.reload_level(id, level).await?;
    Ok(view(session))
}

/// Submit the attendance record
///
/// A delivery failure still returns 200: the form keeps its data and
/// carries the connection alert instead.
#[utoipa::path(
    post,
    path = "/api/forms/{id}/submit",
    params(
        ("id" = Uuid, Path, description = "Form id")
    ),
    responses(
        (status = 200, description = "Submission finished", body = ApiResponse<FormViewDto>),
        (status = 400, description = "Required fields are empty"),
        (status = 404, description = "Form not found"),
        (status = 409, description = "A submission is already in flight")
    ),
    tag = "attendance"
)]
pub async fn submit_form(
    State(service): State<Arc<FormService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FormViewDto>>> {
    let session = service.submit(id).await?;
    Ok(view(session))
}

/// Close the success overlay
#[utoipa::path(
    post,
    path = "/api/forms/{id}/success/dismiss",
    params(
        ("id" = Uuid, Path, description = "Form id")
    ),
    responses(
        (status = 200, description = "Overlay closed", body = ApiResponse<FormViewDto>),
        (status = 404, description = "Form not found")
    ),
    tag = "attendance"
)]
pub async fn dismiss_success(
    State(service): State<Arc<FormService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FormViewDto>>> {
    let session = service.dismiss_success(id).await?;
    Ok(view(session))
}

/// Acknowledge the connection alert
#[utoipa::path(
    post,
    path = "/api/forms/{id}/alert/dismiss",
    params(
        ("id" = Uuid, Path, description = "Form id")
    ),
    responses(
        (status = 200, description = "Alert cleared", body = ApiResponse<FormViewDto>),
        (status = 404, description = "Form not found")
    ),
    tag = "attendance"
)]
pub async fn dismiss_alert(
    State(service): State<Arc<FormService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FormViewDto>>> {
    let session = service.dismiss_alert(id).await?;
    Ok(view(session))
}
