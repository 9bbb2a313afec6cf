use utoipa::{Modify, OpenApi};

use crate::features::attendance::{
    dtos as attendance_dtos, handlers as attendance_handlers, models as attendance_models,
};
use crate::features::regions::{
    dtos as regions_dtos, handlers as regions_handlers, models as regions_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Attendance forms
        attendance_handlers::create_form,
        attendance_handlers::get_form,
        attendance_handlers::delete_form,
        attendance_handlers::update_identity,
        attendance_handlers::select_province,
        attendance_handlers::select_city,
        attendance_handlers::select_district,
        attendance_handlers::select_village,
        attendance_handlers::reload_level,
        attendance_handlers::submit_form,
        attendance_handlers::dismiss_success,
        attendance_handlers::dismiss_alert,
        // Regions
        regions_handlers::list_provinces,
        regions_handlers::list_cities_by_province,
        regions_handlers::list_districts_by_city,
        regions_handlers::list_villages_by_district,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Attendance
            attendance_models::AttendanceRecord,
            attendance_models::LevelStatus,
            attendance_models::SubmissionStatus,
            attendance_dtos::UpdateIdentityDto,
            attendance_dtos::SelectRegionDto,
            attendance_dtos::RegionControlDto,
            attendance_dtos::FormViewDto,
            ApiResponse<attendance_dtos::FormViewDto>,
            // Regions
            regions_models::RegionLevel,
            regions_dtos::RegionResponseDto,
            ApiResponse<Vec<regions_dtos::RegionResponseDto>>,
        )
    ),
    tags(
        (name = "attendance", description = "Attendance form sessions"),
        (name = "regions", description = "Indonesian administrative regions (provinces, cities, districts, villages)"),
    ),
    info(
        title = "Presensi API",
        version = "0.1.0",
        description = "API documentation for the attendance form",
    )
)]
pub struct ApiDoc;

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
