use async_trait::async_trait;

use crate::core::config::WilayahConfig;
use crate::core::error::{AppError, Result};
use crate::features::regions::models::{Region, RegionLevel};
use crate::shared::constants::HTTP_USER_AGENT;
use crate::shared::validation::REGION_ID_REGEX;

/// Read-only source of region lists.
///
/// `parent_id` must be `None` for [`RegionLevel::Province`] and the id of the
/// selected parent region for every other level.
#[async_trait]
pub trait RegionSource: Send + Sync {
    async fn list_regions(
        &self,
        level: RegionLevel,
        parent_id: Option<&str>,
    ) -> Result<Vec<Region>>;
}

/// HTTP client for the emsifa api-wilayah-indonesia static JSON API
pub struct WilayahClient {
    client: reqwest::Client,
    base_url: String,
}

impl WilayahClient {
    pub fn new(config: &WilayahConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(HTTP_USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Build the URL of the list for `level` under `parent_id`
    fn endpoint(&self, level: RegionLevel, parent_id: Option<&str>) -> Result<String> {
        let collection = match level {
            RegionLevel::Province => {
                return match parent_id {
                    None => Ok(format!("{}/provinces.json", self.base_url)),
                    Some(_) => Err(AppError::BadRequest(
                        "Provinces are not nested under a parent".to_string(),
                    )),
                };
            }
            RegionLevel::City => "regencies",
            RegionLevel::District => "districts",
            RegionLevel::Village => "villages",
        };

        let parent_id = parent_id.ok_or_else(|| {
            AppError::BadRequest(format!("Listing {} requires a parent region id", level))
        })?;

        if !REGION_ID_REGEX.is_match(parent_id) {
            return Err(AppError::Validation(format!(
                "Invalid region id '{}'",
                parent_id
            )));
        }

        Ok(format!(
            "{}/{}/{}.json",
            self.base_url,
            collection,
            urlencoding::encode(parent_id)
        ))
    }
}

#[async_trait]
impl RegionSource for WilayahClient {
    async fn list_regions(
        &self,
        level: RegionLevel,
        parent_id: Option<&str>,
    ) -> Result<Vec<Region>> {
        let url = self.endpoint(level, parent_id)?;
        tracing::debug!("Fetching {} list from {}", level, url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Region service request failed: {}", e))
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!(
                "No {} list found for parent '{}'",
                level,
                parent_id.unwrap_or("-")
            )));
        }
        if !status.is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "Region service returned HTTP {} for {}",
                status, url
            )));
        }

        let regions: Vec<Region> = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Invalid region list payload: {}", e))
        })?;

        tracing::debug!("Fetched {} {} entries", regions.len(), level);
        Ok(regions)
    }
}
