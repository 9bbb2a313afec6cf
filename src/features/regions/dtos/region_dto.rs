use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::regions::models::Region;

/// Response DTO for a region of any level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionResponseDto {
    /// Region id from the reference API (e.g. "32", "3273")
    pub id: String,
    pub name: String,
}

impl From<Region> for RegionResponseDto {
    fn from(region: Region) -> Self {
        Self {
            id: region.id,
            name: region.name,
        }
    }
}
