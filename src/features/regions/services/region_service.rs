use std::sync::Arc;

use crate::core::error::Result;
use crate::features::regions::clients::RegionSource;
use crate::features::regions::models::{Region, RegionLevel};

/// Service for looking up Indonesian administrative regions
pub struct RegionService {
    source: Arc<dyn RegionSource>,
}

impl RegionService {
    pub fn new(source: Arc<dyn RegionSource>) -> Self {
        Self { source }
    }

    /// List all provinces
    pub async fn list_provinces(&self) -> Result<Vec<Region>> {
        self.source.list_regions(RegionLevel::Province, None).await
    }

    /// List cities/regencies of a province
    pub async fn list_cities(&self, province_id: &str) -> Result<Vec<Region>> {
        self.source
            .list_regions(RegionLevel::City, Some(province_id))
            .await
    }

    /// List districts of a city
    pub async fn list_districts(&self, city_id: &str) -> Result<Vec<Region>> {
        self.source
            .list_regions(RegionLevel::District, Some(city_id))
            .await
    }

    /// List villages of a district
    pub async fn list_villages(&self, district_id: &str) -> Result<Vec<Region>> {
        self.source
            .list_regions(RegionLevel::Village, Some(district_id))
            .await
    }
}
